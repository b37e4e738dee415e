//! News and updates feed routes.

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use kaizen_core::feed::{FeedItem, FeedKind};
use kaizen_shared::AppError;

use crate::{AppState, error::ApiResult, extract::Path, middleware::AuthUser};

/// Creates the feed routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/feeds/{kind}", get(list_feed))
}

/// GET `/feeds/{news|updates}` - Items from the last successful refresh.
async fn list_feed(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(kind): Path<String>,
) -> ApiResult<Json<Vec<FeedItem>>> {
    let kind = FeedKind::parse(&kind)
        .ok_or_else(|| AppError::NotFound(format!("unknown feed '{kind}'")))?;
    Ok(Json(state.feeds.list(kind).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::AUTHORIZATION},
    };
    use kaizen_core::feed::{FeedStore, InMemoryFeedStore};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::{create_router, test_support};

    fn get_feed(path: &str) -> Request<Body> {
        Request::builder()
            .uri(path)
            .header(AUTHORIZATION, format!("Bearer {}", test_support::user_token()))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_lists_stored_news() {
        let feeds = Arc::new(InMemoryFeedStore::new());
        feeds
            .replace(
                FeedKind::News,
                vec![FeedItem {
                    header: "New levy rates announced".to_string(),
                    url: "https://news.kaizen.test/levy".to_string(),
                    excerpt: None,
                    image_url: None,
                    published: Some("19 Oct 2026".to_string()),
                }],
            )
            .await
            .unwrap();
        let app = create_router(test_support::state_with_feeds(feeds));

        let response = app.clone().oneshot(get_feed("/api/v1/feeds/news")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = test_support::json_body(response).await;
        assert_eq!(body[0]["header"], "New levy rates announced");

        let response = app.oneshot(get_feed("/api/v1/feeds/updates")).await.unwrap();
        let body = test_support::json_body(response).await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_feed_is_404() {
        let app = create_router(test_support::state());
        let response = app.oneshot(get_feed("/api/v1/feeds/weather")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
