use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// HTTP-surface error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Failure of an external generation, grading or hint call.
/// Always recoverable: the session substitutes a local result and carries on.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("external assistant is unavailable")]
    Unavailable,

    #[error("external call timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ServiceError {
    /// Short failure category shown in mode-change reasons.
    pub fn category(&self) -> &'static str {
        match self {
            ServiceError::Unavailable => "Unavailable",
            ServiceError::Timeout { .. } => "Timeout",
            ServiceError::Transport(_) => "Transport",
            ServiceError::Malformed(_) => "Malformed",
        }
    }
}

impl From<LlmError> for ServiceError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Http(e) if e.is_timeout() => ServiceError::Timeout { seconds: 0 },
            LlmError::Http(e) => ServiceError::Transport(e.to_string()),
            LlmError::Api { status: 503 | 529, .. } => ServiceError::Unavailable,
            LlmError::Api { status, message } => {
                ServiceError::Transport(format!("status {status}: {message}"))
            }
            LlmError::Parse(e) => ServiceError::Malformed(e.to_string()),
            LlmError::EmptyContent => ServiceError::Malformed("empty content".to_string()),
        }
    }
}
