//! ART (antigen rapid test) routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get},
};
use chrono::{NaiveDate, Utc};
use kaizen_core::art::{ArtRecord, NewArt};
use kaizen_db::ArtRepository;
use kaizen_shared::AppError;
use kaizen_shared::types::{CompanyId, EmployeeId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    AppState,
    error::ApiResult,
    extract::{Path, Query},
    middleware::AuthUser,
};

/// Creates the ART routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/arts", get(list_arts).post(create_art))
        .route("/arts/latest", get(latest_arts))
        .route("/arts/{id}", delete(delete_art))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query selecting a company.
#[derive(Debug, Deserialize)]
pub struct ArtListQuery {
    /// Company UEN.
    #[serde(rename = "compId", default)]
    pub comp_id: Option<String>,
}

/// Query for the latest test of each employee.
#[derive(Debug, Deserialize)]
pub struct LatestArtQuery {
    /// Company UEN.
    #[serde(rename = "compId", default)]
    pub comp_id: Option<String>,
    /// Ignore tests taken after this day.
    #[serde(rename = "asOf", default)]
    pub as_of: Option<NaiveDate>,
}

/// Query naming who took the test and who reports it.
#[derive(Debug, Deserialize)]
pub struct CreateArtQuery {
    /// Employee work permit number.
    #[serde(rename = "empId", default)]
    pub emp_id: Option<String>,
    /// Company UEN.
    #[serde(rename = "compId", default)]
    pub comp_id: Option<String>,
}

/// Request body for reporting a test.
#[derive(Debug, Deserialize)]
pub struct CreateArtRequest {
    /// Day the test was taken.
    pub date_of_test: NaiveDate,
    /// `true` when positive.
    pub result: bool,
}

/// A test together with whether it clears the employee today.
#[derive(Debug, Serialize)]
pub struct ArtResponse {
    /// Stored record.
    #[serde(flatten)]
    pub record: ArtRecord,
    /// Negative and not yet expired.
    pub valid: bool,
}

impl ArtResponse {
    fn new(record: ArtRecord, today: NaiveDate) -> Self {
        let valid = record.is_valid_on(today);
        Self { record, valid }
    }
}

fn company_param(comp_id: Option<String>) -> ApiResult<CompanyId> {
    let company = CompanyId::new(comp_id.unwrap_or_default());
    if company.is_blank() {
        return Err(AppError::Validation("compId is required".to_string()).into());
    }
    Ok(company)
}

fn responses(records: Vec<ArtRecord>) -> Vec<ArtResponse> {
    let today = Utc::now().date_naive();
    records
        .into_iter()
        .map(|r| ArtResponse::new(r, today))
        .collect()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/arts?compId=` - All tests reported by a company.
async fn list_arts(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ArtListQuery>,
) -> ApiResult<Json<Vec<ArtResponse>>> {
    let company = company_param(query.comp_id)?;
    let repo = ArtRepository::new((*state.db).clone());
    Ok(Json(responses(repo.list_by_company(&company).await?)))
}

/// GET `/arts/latest?compId=&asOf=` - Newest test of each employee.
async fn latest_arts(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<LatestArtQuery>,
) -> ApiResult<Json<Vec<ArtResponse>>> {
    let company = company_param(query.comp_id)?;
    let repo = ArtRepository::new((*state.db).clone());
    Ok(Json(responses(repo.find_latest(&company, query.as_of).await?)))
}

/// POST `/arts?empId=&compId=` - Report a test.
async fn create_art(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<CreateArtQuery>,
    Json(payload): Json<CreateArtRequest>,
) -> ApiResult<(StatusCode, Json<ArtResponse>)> {
    let company = company_param(query.comp_id)?;
    let employee = EmployeeId::new(query.emp_id.unwrap_or_default());
    if employee.is_blank() {
        return Err(AppError::Validation("empId is required".to_string()).into());
    }

    let today = Utc::now().date_naive();
    let entry = NewArt {
        employee_id: employee,
        company_id: company,
        date_of_test: payload.date_of_test,
        result: payload.result,
    }
    .into_entry(today, state.art_validity_days)?;

    let repo = ArtRepository::new((*state.db).clone());
    let record = repo.create(entry).await?;
    info!(id = record.id, reported_by = auth.subject(), "ART reported");
    Ok((StatusCode::CREATED, Json(ArtResponse::new(record, today))))
}

/// DELETE `/arts/{id}` - Remove a test.
async fn delete_art(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let repo = ArtRepository::new((*state.db).clone());
    repo.delete(id).await?;
    info!(id, deleted_by = auth.subject(), "ART deleted");
    Ok(StatusCode::NO_CONTENT)
}
