//! Transaction engine error types.

use thiserror::Error;

use super::store::StoreError;
use super::types::{DateRange, TransactionKey};

/// Errors raised by the transaction consistency engine.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// A required field was absent or blank.
    #[error("missing required value: {0}")]
    MissingValue(&'static str),

    /// A field was present but out of range.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// The candidate's dates collide with a stored loan of the same employee.
    #[error("loan period {candidate} conflicts with existing loan {existing}")]
    DateConflict {
        /// Submitted range.
        candidate: DateRange,
        /// Stored range it collided with.
        existing: DateRange,
    },

    /// A transaction with the same composite key already exists.
    #[error("transaction {0} already exists")]
    DuplicateKey(TransactionKey),

    /// Lookup found nothing.
    #[error("{0} not found")]
    NotFound(String),

    /// The backing store failed.
    #[error("transaction store failure: {0}")]
    Store(String),
}

impl TransactionError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::MissingValue(_) | Self::InvalidValue(_) => 400,
            Self::NotFound(_) => 404,
            Self::DateConflict { .. } | Self::DuplicateKey(_) => 409,
            Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingValue(_) => "MISSING_VALUE",
            Self::InvalidValue(_) => "INVALID_VALUE",
            Self::DateConflict { .. } => "DATE_CONFLICT",
            Self::DuplicateKey(_) => "DUPLICATE_KEY",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Store(_) => "STORE_ERROR",
        }
    }
}

impl From<StoreError> for TransactionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(key) => Self::DuplicateKey(key),
            StoreError::MissingReference(what) => Self::NotFound(what),
            StoreError::Backend(msg) => Self::Store(msg),
        }
    }
}
