//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - Bearer token authentication middleware and role checks
//! - Mapping of domain errors to the JSON error envelope

pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use kaizen_core::feed::FeedStore;
use kaizen_core::payment::PaymentProcessor;
use kaizen_core::storage::{BlobStore, UploadPolicy};
use kaizen_core::transaction::{TransactionService, TransactionStore};
use kaizen_shared::TokenVerifier;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Verifies bearer tokens.
    pub verifier: Arc<dyn TokenVerifier>,
    /// Worker-loan transaction engine.
    pub transactions: TransactionService<dyn TransactionStore>,
    /// Cached news and updates.
    pub feeds: Arc<dyn FeedStore>,
    /// Object storage for employee images (optional).
    pub storage: Option<Arc<dyn BlobStore>>,
    /// Size and type limits for uploaded images.
    pub upload_policy: UploadPolicy,
    /// Payment gateway (optional).
    pub payments: Option<Arc<dyn PaymentProcessor>>,
    /// Days an ART result stays valid.
    pub art_validity_days: u32,
    /// Returned when an employee has no profile image.
    pub placeholder_image_url: Option<String>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
