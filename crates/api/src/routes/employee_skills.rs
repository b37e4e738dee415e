//! Employee skill profile routes.
//!
//! A company lists what its own employees can do and browses what other
//! companies offer.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use kaizen_core::skill::{EmployeeSkill, EmployeeSkillKey, SkillLevel, SkillSummary};
use kaizen_db::{EmployeeSkillRepository, repositories::SkillListing};
use kaizen_shared::{AppError, types::CompanyId};
use serde::Deserialize;
use tracing::info;

use crate::{
    AppState,
    error::ApiResult,
    extract::{Path, Query},
    middleware::AuthUser,
};

/// Creates the employee skill routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/employee-skills",
            get(list_company_skills).post(create_employee_skill),
        )
        .route("/employee-skills/market", get(list_market))
        .route("/employee-skills/collate", get(collate_market))
        .route("/employees/{work_permit_number}/skills", get(list_employee_skills))
        .route(
            "/employees/{work_permit_number}/skills/{skill}",
            get(get_employee_skill)
                .put(update_employee_skill)
                .delete(delete_employee_skill),
        )
}

/// Company selector shared by the profile queries.
#[derive(Debug, Deserialize)]
pub struct CompanySkillQuery {
    /// Company UEN.
    #[serde(rename = "compId", default)]
    pub comp_id: Option<String>,
    /// Optional skill filter for the market listing.
    #[serde(rename = "skillId", default)]
    pub skill_id: Option<String>,
}

impl CompanySkillQuery {
    fn company(&self) -> Result<CompanyId, AppError> {
        self.comp_id
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(CompanyId::from)
            .ok_or_else(|| AppError::Validation("compId is required".to_string()))
    }
}

/// Request body for adding a profile.
#[derive(Debug, Deserialize)]
pub struct CreateEmployeeSkillRequest {
    /// Work permit number.
    pub employee_id: String,
    /// Skill from the catalog.
    pub skill: String,
    /// Experience, rating and cost.
    #[serde(flatten)]
    pub level: SkillLevel,
}

/// GET `/employee-skills?compId=` - Profiles the company offers.
async fn list_company_skills(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<CompanySkillQuery>,
) -> ApiResult<Json<Vec<EmployeeSkill>>> {
    let company = query.company()?;
    let repo = EmployeeSkillRepository::new((*state.db).clone());
    Ok(Json(repo.list_by_company(company.as_str()).await?))
}

/// GET `/employee-skills/market?compId=[&skillId=]` - Profiles other companies offer.
async fn list_market(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<CompanySkillQuery>,
) -> ApiResult<Json<Vec<SkillListing>>> {
    let company = query.company()?;
    let skill = query.skill_id.as_deref().filter(|s| !s.trim().is_empty());
    let repo = EmployeeSkillRepository::new((*state.db).clone());
    Ok(Json(
        repo.list_offered_by_others(company.as_str(), skill).await?,
    ))
}

/// GET `/employee-skills/collate?compId=` - Headcount and cheapest cost per skill on the market.
async fn collate_market(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<CompanySkillQuery>,
) -> ApiResult<Json<Vec<SkillSummary>>> {
    let company = query.company()?;
    let repo = EmployeeSkillRepository::new((*state.db).clone());
    Ok(Json(repo.collate(company.as_str()).await?))
}

/// POST `/employee-skills?compId=` - Add a profile on behalf of a company.
async fn create_employee_skill(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<CompanySkillQuery>,
    Json(payload): Json<CreateEmployeeSkillRequest>,
) -> ApiResult<(StatusCode, Json<EmployeeSkill>)> {
    let company = query.company()?;
    let profile = EmployeeSkill::new(
        EmployeeSkillKey {
            employee_id: payload.employee_id.trim().into(),
            skill: payload.skill.trim().to_string(),
        },
        company,
        payload.level,
    )?;

    let repo = EmployeeSkillRepository::new((*state.db).clone());
    let profile = repo.create(profile).await?;
    info!(key = %profile.key, created_by = auth.subject(), "employee skill listed");
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET `/employees/{wp}/skills` - Profiles of one employee.
async fn list_employee_skills(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(work_permit_number): Path<String>,
) -> ApiResult<Json<Vec<EmployeeSkill>>> {
    let repo = EmployeeSkillRepository::new((*state.db).clone());
    Ok(Json(repo.list_by_employee(&work_permit_number).await?))
}

/// GET `/employees/{wp}/skills/{skill}` - One profile.
async fn get_employee_skill(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((work_permit_number, skill)): Path<(String, String)>,
) -> ApiResult<Json<EmployeeSkill>> {
    let key = EmployeeSkillKey {
        employee_id: work_permit_number.into(),
        skill,
    };
    let repo = EmployeeSkillRepository::new((*state.db).clone());
    Ok(Json(repo.get(&key).await?))
}

/// PUT `/employees/{wp}/skills/{skill}?compId=` - Replace the level and offering company.
async fn update_employee_skill(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((work_permit_number, skill)): Path<(String, String)>,
    Query(query): Query<CompanySkillQuery>,
    Json(level): Json<SkillLevel>,
) -> ApiResult<Json<EmployeeSkill>> {
    let company = query.company()?;
    level.validate()?;

    let key = EmployeeSkillKey {
        employee_id: work_permit_number.into(),
        skill,
    };
    let repo = EmployeeSkillRepository::new((*state.db).clone());
    let profile = repo.update(&key, &company, level).await?;
    info!(key = %profile.key, updated_by = auth.subject(), "employee skill updated");
    Ok(Json(profile))
}

/// DELETE `/employees/{wp}/skills/{skill}` - Remove a profile.
async fn delete_employee_skill(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((work_permit_number, skill)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let key = EmployeeSkillKey {
        employee_id: work_permit_number.into(),
        skill,
    };
    let repo = EmployeeSkillRepository::new((*state.db).clone());
    repo.delete(&key).await?;
    info!(%key, deleted_by = auth.subject(), "employee skill removed");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, header::AUTHORIZATION},
    };
    use kaizen_db::entities::employee_skills;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, prelude::Decimal};
    use tower::ServiceExt;

    use crate::{create_router, test_support};

    fn row(employee: &str, skill: &str, company: &str) -> employee_skills::Model {
        employee_skills::Model {
            employee_id: employee.to_string(),
            skill_id: skill.to_string(),
            company_id: company.to_string(),
            experience: 4,
            rating: Decimal::new(450, 2),
            cost: Decimal::new(2200, 2),
        }
    }

    fn request(method: &str, uri: &str, body: Option<&str>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(
                AUTHORIZATION,
                format!("Bearer {}", test_support::user_token()),
            );
        match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_employee_skill() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row("G12345678", "welding", "201900001A")]])
            .into_connection();
        let app = create_router(test_support::state_with_db(db));

        let response = app
            .oneshot(request(
                "POST",
                "/api/v1/employee-skills?compId=201900001A",
                Some(
                    r#"{"employee_id":"G12345678","skill":"welding","experience":4,"rating":"4.5","cost":"22"}"#,
                ),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = test_support::json_body(response).await;
        assert_eq!(body["employee_id"], "G12345678");
        assert_eq!(body["skill"], "welding");
        assert_eq!(body["company_id"], "201900001A");
    }

    #[tokio::test]
    async fn test_create_rejects_bad_profile_before_database() {
        let app = create_router(test_support::state());

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/employee-skills?compId=201900001A",
                Some(r#"{"employee_id":"G12345678","skill":"welding","experience":4,"rating":"6","cost":"22"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = test_support::json_body(response).await;
        assert_eq!(body["error"], "invalid_value");

        let response = app
            .oneshot(request(
                "POST",
                "/api/v1/employee-skills",
                Some(r#"{"employee_id":"G12345678","skill":"welding","experience":4,"rating":"4","cost":"22"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = test_support::json_body(response).await;
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_unknown_profile_is_404() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<employee_skills::Model>::new()])
            .append_query_results([Vec::<employee_skills::Model>::new()])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let app = create_router(test_support::state_with_db(db));

        let response = app
            .clone()
            .oneshot(request("GET", "/api/v1/employees/G12345678/skills/plumbing", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                "/api/v1/employees/G12345678/skills/plumbing?compId=201900001A",
                Some(r#"{"experience":1,"rating":"3","cost":"18"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(request("DELETE", "/api/v1/employees/G12345678/skills/plumbing", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_employee_skill() {
        let mut updated = row("G12345678", "welding", "201900002B");
        updated.experience = 5;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row("G12345678", "welding", "201900001A")]])
            .append_query_results([vec![updated]])
            .into_connection();
        let app = create_router(test_support::state_with_db(db));

        let response = app
            .oneshot(request(
                "PUT",
                "/api/v1/employees/G12345678/skills/welding?compId=201900002B",
                Some(r#"{"experience":5,"rating":"4.5","cost":"22"}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = test_support::json_body(response).await;
        assert_eq!(body["company_id"], "201900002B");
        assert_eq!(body["experience"], 5);
    }

    #[tokio::test]
    async fn test_collate_excludes_own_company() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                row("G1", "welding", "201900002B"),
                row("G2", "welding", "201900003C"),
                row("G3", "formwork", "201900002B"),
            ]])
            .into_connection();
        let app = create_router(test_support::state_with_db(db));

        let response = app
            .oneshot(request(
                "GET",
                "/api/v1/employee-skills/collate?compId=201900001A",
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = test_support::json_body(response).await;
        assert_eq!(body[0]["skill"], "formwork");
        assert_eq!(body[1]["skill"], "welding");
        assert_eq!(body[1]["pax"], 2);
    }
}
