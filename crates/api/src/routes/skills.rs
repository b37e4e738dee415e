//! Skill catalog routes.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use kaizen_db::{SkillRepository, entities::skills};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::{
    AppState,
    error::ApiResult,
    extract::Path,
    middleware::{AuthUser, require_admin},
};

/// Creates the skill catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/skills", get(list_skills).post(create_skill))
        .route(
            "/skills/{skill}",
            get(get_skill).put(update_skill).delete(delete_skill),
        )
}

/// Request body for adding a skill.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSkillRequest {
    /// Skill name.
    #[validate(length(min = 1, max = 100))]
    pub skill: String,
    /// What the skill covers.
    #[validate(length(min = 1, max = 255))]
    pub task: String,
}

/// Request body for describing a skill.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSkillRequest {
    /// What the skill covers.
    #[validate(length(min = 1, max = 255))]
    pub task: String,
}

/// GET `/skills` - The catalog.
async fn list_skills(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<skills::Model>>> {
    let repo = SkillRepository::new((*state.db).clone());
    Ok(Json(repo.list().await?))
}

/// POST `/skills` - Add a skill. Admin only.
async fn create_skill(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateSkillRequest>,
) -> ApiResult<(StatusCode, Json<skills::Model>)> {
    require_admin(&auth)?;
    payload.validate()?;

    let repo = SkillRepository::new((*state.db).clone());
    let skill = repo.create(&payload.skill, &payload.task).await?;
    Ok((StatusCode::CREATED, Json(skill)))
}

/// GET `/skills/{skill}` - One skill.
async fn get_skill(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(skill): Path<String>,
) -> ApiResult<Json<skills::Model>> {
    let repo = SkillRepository::new((*state.db).clone());
    Ok(Json(repo.get(&skill).await?))
}

/// PUT `/skills/{skill}` - Replace the task description. Admin only.
async fn update_skill(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(skill): Path<String>,
    Json(payload): Json<UpdateSkillRequest>,
) -> ApiResult<Json<skills::Model>> {
    require_admin(&auth)?;
    payload.validate()?;

    let repo = SkillRepository::new((*state.db).clone());
    Ok(Json(repo.update(&skill, &payload.task).await?))
}

/// DELETE `/skills/{skill}` - Remove a skill and the profiles listing it. Admin only.
async fn delete_skill(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(skill): Path<String>,
) -> ApiResult<StatusCode> {
    require_admin(&auth)?;
    let repo = SkillRepository::new((*state.db).clone());
    repo.delete(&skill).await?;
    info!(%skill, deleted_by = auth.subject(), "skill deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, header::AUTHORIZATION},
    };
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use tower::ServiceExt;

    use crate::{create_router, test_support};

    fn skill(name: &str, task: &str) -> skills::Model {
        skills::Model {
            skill: name.to_string(),
            task: task.to_string(),
        }
    }

    fn request(token: &str, method: &str, uri: &str, body: Option<&str>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"));
        match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_list_skills() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                skill("formwork", "Erect and strip formwork"),
                skill("welding", "Structural steel welding"),
            ]])
            .into_connection();
        let app = create_router(test_support::state_with_db(db));

        let response = app
            .oneshot(request(&test_support::user_token(), "GET", "/api/v1/skills", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = test_support::json_body(response).await;
        assert_eq!(body[1]["skill"], "welding");
    }

    #[tokio::test]
    async fn test_create_skill() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![skill("welding", "Structural steel welding")]])
            .into_connection();
        let app = create_router(test_support::state_with_db(db));

        let response = app
            .oneshot(request(
                &test_support::admin_token(),
                "POST",
                "/api/v1/skills",
                Some(r#"{"skill":"welding","task":"Structural steel welding"}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = test_support::json_body(response).await;
        assert_eq!(body["task"], "Structural steel welding");
    }

    #[tokio::test]
    async fn test_catalog_writes_require_admin() {
        let app = create_router(test_support::state());
        let token = test_support::user_token();

        let response = app
            .clone()
            .oneshot(request(
                &token,
                "POST",
                "/api/v1/skills",
                Some(r#"{"skill":"welding","task":"Structural steel welding"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(request(&token, "DELETE", "/api/v1/skills/welding", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_skill_is_404() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<skills::Model>::new()])
            .append_query_results([Vec::<skills::Model>::new()])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let app = create_router(test_support::state_with_db(db));
        let token = test_support::admin_token();

        let response = app
            .clone()
            .oneshot(request(&token, "GET", "/api/v1/skills/plumbing", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(request(
                &token,
                "PUT",
                "/api/v1/skills/plumbing",
                Some(r#"{"task":"Pipes"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(request(&token, "DELETE", "/api/v1/skills/plumbing", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = test_support::json_body(response).await;
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_blank_skill_rejected() {
        let app = create_router(test_support::state());
        let response = app
            .oneshot(request(
                &test_support::admin_token(),
                "POST",
                "/api/v1/skills",
                Some(r#"{"skill":"","task":"Nothing"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
