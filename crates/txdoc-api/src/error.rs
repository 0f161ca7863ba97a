//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps record service errors to HTTP status codes with a JSON body of the
//! form `{"error": {"code", "message"}}`. Infrastructure failures are logged
//! and their details withheld from the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use txdoc_records::RecordError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Field validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// An organization reference does not resolve (422).
    #[error("referential error: {0}")]
    Referential(String),

    /// Request body or query could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The organization directory failed (502). Message is logged, not returned.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Internal server error (500). Message is logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Referential(_) => (StatusCode::UNPROCESSABLE_ENTITY, "REFERENTIAL_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::Upstream(_) => "The organization directory is unavailable".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::Upstream(_) => tracing::error!(error = %self, "organization directory failure"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RecordError> for AppError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::Validation(e) => Self::Validation(e.to_string()),
            RecordError::Referential(e) => Self::Referential(e.to_string()),
            RecordError::NotFound(id) => Self::NotFound(format!("compliance record {id}")),
            err @ RecordError::Deleted(_) => Self::Conflict(err.to_string()),
            RecordError::Directory(e) => Self::Upstream(e.to_string()),
            RecordError::Storage(msg) => Self::Internal(msg),
        }
    }
}

impl From<txdoc_core::ValidationError> for AppError {
    fn from(err: txdoc_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}
