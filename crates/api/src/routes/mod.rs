//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod arts;
pub mod companies;
pub mod employee_skills;
pub mod employees;
pub mod feeds;
pub mod health;
pub mod images;
pub mod payments;
pub mod projects;
pub mod skills;
pub mod transactions;

/// Creates the API router; everything except the health check requires a bearer token.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(companies::routes())
        .merge(employees::routes())
        .merge(skills::routes())
        .merge(employee_skills::routes())
        .merge(projects::routes())
        .merge(transactions::routes())
        .merge(arts::routes())
        .merge(images::routes(state.upload_policy.max_file_size))
        .merge(payments::routes())
        .merge(feeds::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}
