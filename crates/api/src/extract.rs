//! Request extractors whose rejections use the JSON error envelope.
//!
//! Axum's own `Query` and `Path` reject malformed input with a plain-text
//! body; these wrappers route the rejection through [`ApiError`] instead.

use axum::extract::{
    FromRequestParts,
    rejection::{PathRejection, QueryRejection},
};
use kaizen_shared::AppError;

use crate::error::ApiError;

/// Query string extractor.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

/// Path parameter extractor.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text()).into()
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(e) => {
                AppError::Validation(e.body_text()).into()
            }
            other => AppError::Internal(other.body_text()).into(),
        }
    }
}
