//! Company routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use kaizen_db::{CompanyRepository, entities::companies};
use kaizen_shared::AppError;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::{
    AppState,
    error::ApiResult,
    extract::{Path, Query},
    middleware::{AuthUser, require_admin},
};

/// Creates the company routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies", get(list_companies).post(create_company))
        .route("/companies/by-name", get(find_company_by_name))
        .route(
            "/companies/{uen}",
            get(get_company).put(update_company).delete(delete_company),
        )
}

/// Request body for creating a company.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    /// Unique Entity Number.
    #[validate(length(min = 9, max = 10))]
    pub uen: String,
    /// Registered name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Request body for renaming a company.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCompanyRequest {
    /// Registered name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Query for the name lookup.
#[derive(Debug, Deserialize)]
pub struct CompanyNameQuery {
    /// Exact registered name.
    #[serde(default)]
    pub name: Option<String>,
}

/// GET `/companies` - List all companies.
async fn list_companies(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<companies::Model>>> {
    let repo = CompanyRepository::new((*state.db).clone());
    Ok(Json(repo.list().await?))
}

/// POST `/companies` - Register a company. Admin only.
async fn create_company(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateCompanyRequest>,
) -> ApiResult<(StatusCode, Json<companies::Model>)> {
    require_admin(&auth)?;
    payload.validate()?;

    let repo = CompanyRepository::new((*state.db).clone());
    let company = repo.create(payload.uen.trim(), payload.name.trim()).await?;
    info!(uen = %company.uen, created_by = auth.subject(), "company registered");
    Ok((StatusCode::CREATED, Json(company)))
}

/// GET `/companies/{uen}` - Get one company.
async fn get_company(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(uen): Path<String>,
) -> ApiResult<Json<companies::Model>> {
    let repo = CompanyRepository::new((*state.db).clone());
    Ok(Json(repo.get(&uen).await?))
}

/// GET `/companies/by-name?name=` - Find a company by its registered name.
async fn find_company_by_name(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<CompanyNameQuery>,
) -> ApiResult<Json<companies::Model>> {
    let name = query.name.unwrap_or_default();
    if name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()).into());
    }
    let repo = CompanyRepository::new((*state.db).clone());
    Ok(Json(repo.find_by_name(&name).await?))
}

/// PUT `/companies/{uen}` - Rename a company. Admin only.
async fn update_company(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(uen): Path<String>,
    Json(payload): Json<UpdateCompanyRequest>,
) -> ApiResult<Json<companies::Model>> {
    require_admin(&auth)?;
    payload.validate()?;

    let repo = CompanyRepository::new((*state.db).clone());
    let company = repo.update(&uen, &payload.name).await?;
    info!(uen = %company.uen, updated_by = auth.subject(), "company renamed");
    Ok(Json(company))
}

/// DELETE `/companies/{uen}` - Remove a company with its employees and loans. Admin only.
async fn delete_company(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(uen): Path<String>,
) -> ApiResult<StatusCode> {
    require_admin(&auth)?;
    let repo = CompanyRepository::new((*state.db).clone());
    repo.delete(&uen).await?;
    info!(%uen, deleted_by = auth.subject(), "company deleted");
    Ok(StatusCode::NO_CONTENT)
}
