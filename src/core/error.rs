//! Core Error Types
//!
//! Unified error handling for ingestion, form management and analytics.

use thiserror::Error;

use crate::schema::{DefinitionError, ValidationError};
use crate::store::StoreError;

/// Core module result type
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error type
#[derive(Debug, Error)]
pub enum CoreError {
    /// No form with this ID
    #[error("Form not found: {0}")]
    FormNotFound(String),

    /// Form exists but does not accept submissions yet
    #[error("Form is not published: {0}")]
    FormNotPublished(String),

    /// Submission rejected by the schema
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Form definition rejected
    #[error(transparent)]
    InvalidDefinition(#[from] DefinitionError),

    /// Fields of a published form cannot change
    #[error("Form is immutable: {0}")]
    FormImmutable(String),

    /// Caller does not own the form
    #[error("Access denied")]
    AccessDenied,

    /// Caller identity missing
    #[error("Authentication required")]
    AuthRequired,

    /// Backing store failed
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Create a not found error
    pub fn not_found(form_id: impl Into<String>) -> Self {
        Self::FormNotFound(form_id.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::FormNotFound(_) => "FORM_NOT_FOUND",
            Self::FormNotPublished(_) => "FORM_NOT_PUBLISHED",
            Self::Validation(e) => e.code(),
            Self::InvalidDefinition(e) => e.code(),
            Self::FormImmutable(_) => "FORM_IMMUTABLE",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::AuthRequired => "AUTH_REQUIRED",
            Self::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::FormNotFound(_) => 404,
            Self::FormNotPublished(_) => 400,
            Self::Validation(_) => 400,
            Self::InvalidDefinition(_) => 400,
            Self::FormImmutable(_) => 409,
            Self::AccessDenied => 403,
            Self::AuthRequired => 401,
            Self::StorageUnavailable(_) => 500,
            Self::Internal(_) => 500,
        }
    }

    /// Whether the error was caused by the request rather than the server
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<StoreError> for CoreError {
    fn from(e: StoreError) -> Self {
        Self::StorageUnavailable(e.to_string())
    }
}
