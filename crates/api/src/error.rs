//! JSON error envelope returned by every handler.
//!
//! Each domain error keeps its own status and code; this module only turns
//! them into `{"error": "<snake_code>", "message": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kaizen_core::art::ArtError;
use kaizen_core::feed::FeedError;
use kaizen_core::payment::PaymentError;
use kaizen_core::project::ProjectError;
use kaizen_core::skill::SkillError;
use kaizen_core::storage::StorageError;
use kaizen_core::transaction::TransactionError;
use kaizen_db::repositories::{
    ArtRepositoryError, CompanyError, EmployeeError, EmployeeSkillError, ProjectRepositoryError,
    SkillRepositoryError,
};
use kaizen_shared::{AppError, JwtError};
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// An error ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: u16, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            message: message.into(),
        }
    }

    /// Returns the HTTP status of this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the snake_case error code sent to clients.
    #[must_use]
    pub fn code(&self) -> String {
        self.code.to_ascii_lowercase()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = if self.status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(code = self.code, error = %self.message, "request failed");
            "An error occurred".to_string()
        } else {
            self.message
        };
        (
            self.status,
            Json(json!({
                "error": self.code.to_ascii_lowercase(),
                "message": message,
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<TransactionError> for ApiError {
    fn from(err: TransactionError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<ArtError> for ApiError {
    fn from(err: ArtError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<FeedError> for ApiError {
    fn from(err: FeedError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<SkillError> for ApiError {
    fn from(err: SkillError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<ProjectError> for ApiError {
    fn from(err: ProjectError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => Self::new(401, "TOKEN_EXPIRED", "Token has expired"),
            _ => Self::new(401, "INVALID_TOKEN", "Invalid or malformed token"),
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        AppError::Database(err.to_string()).into()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string()).into()
    }
}

impl From<CompanyError> for ApiError {
    fn from(err: CompanyError) -> Self {
        match err {
            CompanyError::AlreadyExists(_) => AppError::Conflict(err.to_string()).into(),
            CompanyError::NotFound(_) => AppError::NotFound(err.to_string()).into(),
            CompanyError::Database(e) => e.into(),
        }
    }
}

impl From<EmployeeError> for ApiError {
    fn from(err: EmployeeError) -> Self {
        match err {
            EmployeeError::AlreadyExists(_) => AppError::Conflict(err.to_string()).into(),
            EmployeeError::NotFound(_) | EmployeeError::CompanyNotFound(_) => {
                AppError::NotFound(err.to_string()).into()
            }
            EmployeeError::Database(e) => e.into(),
        }
    }
}

impl From<ArtRepositoryError> for ApiError {
    fn from(err: ArtRepositoryError) -> Self {
        match err {
            ArtRepositoryError::NotFound(_) | ArtRepositoryError::MissingReference { .. } => {
                AppError::NotFound(err.to_string()).into()
            }
            ArtRepositoryError::Database(e) => e.into(),
        }
    }
}

impl From<SkillRepositoryError> for ApiError {
    fn from(err: SkillRepositoryError) -> Self {
        match err {
            SkillRepositoryError::AlreadyExists(_) => AppError::Conflict(err.to_string()).into(),
            SkillRepositoryError::NotFound(_) => AppError::NotFound(err.to_string()).into(),
            SkillRepositoryError::Database(e) => e.into(),
        }
    }
}

impl From<EmployeeSkillError> for ApiError {
    fn from(err: EmployeeSkillError) -> Self {
        match err {
            EmployeeSkillError::AlreadyExists(_) => {
                Self::new(409, "OBJECT_EXISTS", err.to_string())
            }
            EmployeeSkillError::NotFound(_) | EmployeeSkillError::MissingReference(_) => {
                AppError::NotFound(err.to_string()).into()
            }
            EmployeeSkillError::Database(e) => e.into(),
        }
    }
}

impl From<ProjectRepositoryError> for ApiError {
    fn from(err: ProjectRepositoryError) -> Self {
        match err {
            ProjectRepositoryError::NotFound(_) | ProjectRepositoryError::MissingEmployees(_) => {
                AppError::NotFound(err.to_string()).into()
            }
            ProjectRepositoryError::Database(e) => e.into(),
        }
    }
}
