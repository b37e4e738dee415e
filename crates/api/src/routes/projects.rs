//! Project routes.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use kaizen_core::project::{Project, ProjectDraft};
use kaizen_db::ProjectRepository;
use serde::Deserialize;
use tracing::info;

use crate::{
    AppState,
    error::ApiResult,
    extract::{Path, Query},
    middleware::AuthUser,
};

/// Creates the project routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
}

/// Optional company filter.
#[derive(Debug, Deserialize)]
pub struct ProjectQuery {
    /// Only projects staffed by this company.
    #[serde(rename = "companyId", default)]
    pub company_id: Option<String>,
}

/// GET `/projects[?companyId=]` - Every project, or those a company takes part in.
async fn list_projects(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ProjectQuery>,
) -> ApiResult<Json<Vec<Project>>> {
    let repo = ProjectRepository::new((*state.db).clone());
    let projects = match query.company_id.as_deref().map(str::trim) {
        Some(company) if !company.is_empty() => repo.list_by_company(company).await?,
        _ => repo.list().await?,
    };
    Ok(Json(projects))
}

/// POST `/projects` - Create a project with its staff.
async fn create_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(draft): Json<ProjectDraft>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let project = draft.into_project()?;
    let repo = ProjectRepository::new((*state.db).clone());
    let project = repo.create(project).await?;
    info!(project_id = project.header.id, created_by = auth.subject(), "project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET `/projects/{id}` - One project.
async fn get_project(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Project>> {
    let repo = ProjectRepository::new((*state.db).clone());
    Ok(Json(repo.get(id).await?))
}

/// PUT `/projects/{id}` - Replace the fields and staff of a project.
async fn update_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(draft): Json<ProjectDraft>,
) -> ApiResult<Json<Project>> {
    let project = draft.into_project()?;
    let repo = ProjectRepository::new((*state.db).clone());
    let project = repo.update(id, project).await?;
    info!(project_id = id, updated_by = auth.subject(), "project updated");
    Ok(Json(project))
}

/// DELETE `/projects/{id}` - Remove a project.
async fn delete_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let repo = ProjectRepository::new((*state.db).clone());
    repo.delete(id).await?;
    info!(project_id = id, deleted_by = auth.subject(), "project deleted");
    Ok(StatusCode::NO_CONTENT)
}
