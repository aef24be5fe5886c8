//! Error responses
//!
//! Every failed request returns `{"error", "code", "status"}` with the
//! HTTP status taken from the error.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::core::{CoreError, CoreResult};
use crate::observability::{log_event_with_fields, Event};

/// JSON error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub status: u16,
}

/// Error returned by handlers
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: message.into(),
                code: code.to_string(),
                status: status.as_u16(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        if !err.is_client_error() {
            log_event_with_fields(
                Event::RequestFailed,
                &[("code", err.code()), ("error", &err.to_string())],
            );
        }
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, err.code(), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_BODY", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Run a service call off the async workers; store access is synchronous I/O
pub async fn run_blocking<T, F>(call: F) -> ApiResult<T>
where
    F: FnOnce() -> CoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| ApiError::from(CoreError::internal(e.to_string())))?
        .map_err(ApiError::from)
}
