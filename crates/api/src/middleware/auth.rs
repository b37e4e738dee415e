//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use kaizen_shared::{AppError, Principal, UserRole};
use tracing::debug;

use crate::AppState;
use crate::error::ApiError;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates bearer tokens.
///
/// The resolved [`Principal`] is stored in the request extensions for
/// handlers to pick up through [`AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return ApiError::from(AppError::Unauthorized(
            "Authorization header with Bearer token is required".to_string(),
        ))
        .into_response();
    };

    match state.verifier.verify(token) {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, "rejected bearer token");
            ApiError::from(e).into_response()
        }
    }
}

/// Extractor for the authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl AuthUser {
    /// Returns the subject of the token.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.0.subject
    }

    /// Returns the caller's role.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.0.role
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()).into())
    }
}

/// Fails with `Forbidden` unless the caller is an admin.
pub fn require_admin(user: &AuthUser) -> Result<(), ApiError> {
    if user.role().is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "'{}' requires the admin role",
            user.subject()
        ))
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
    };
    use chrono::Utc;
    use kaizen_shared::Claims;
    use tower::ServiceExt;

    use crate::test_support;

    async fn whoami(user: AuthUser) -> String {
        format!("{}:{}", user.subject(), user.role())
    }

    fn app() -> Router {
        let state = test_support::state();
        Router::new()
            .route("/whoami", get(whoami))
            .layer(from_fn_with_state(state.clone(), auth_middleware))
            .with_state(state)
    }

    async fn call(token: Option<&str>) -> Response {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[tokio::test]
    async fn test_missing_token_is_401() {
        let response = call(None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = test_support::json_body(response).await;
        assert_eq!(body["error"], "unauthorized");
    }

    #[tokio::test]
    async fn test_garbage_token_is_401() {
        let response = call(Some("not-a-jwt")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = test_support::json_body(response).await;
        assert_eq!(body["error"], "invalid_token");
    }

    #[tokio::test]
    async fn test_expired_token_is_401() {
        let now = Utc::now().timestamp();
        let token = test_support::jwt()
            .encode_claims(&Claims {
                sub: "site-manager".to_string(),
                username: None,
                groups: vec![],
                iss: "https://idp.kaizen.test".to_string(),
                iat: now - 7200,
                exp: now - 3600,
            })
            .unwrap();
        let response = call(Some(&token)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = test_support::json_body(response).await;
        assert_eq!(body["error"], "token_expired");
    }

    #[tokio::test]
    async fn test_valid_token_resolves_role() {
        let response = call(Some(&test_support::admin_token())).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = call(Some(&test_support::user_token())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        assert_eq!(&bytes[..], b"site-manager:user");
    }

    #[test]
    fn test_require_admin() {
        let user = AuthUser(Principal {
            subject: "site-manager".to_string(),
            username: None,
            role: UserRole::User,
        });
        let err = require_admin(&user).unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }
}
