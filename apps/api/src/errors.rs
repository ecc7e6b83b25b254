use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::parsing::ResponseFormatError;
use crate::prompting::PromptError;
use crate::tasks::QueueError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Model transport failures never appear here: the orchestrator absorbs them
/// into fallback content.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A post-processing step broke a result invariant, e.g. filtering
    /// removed every learning step.
    #[error("Structural invariant violated: {0}")]
    StructuralInvariant(String),

    #[error("Model response could not be parsed: {0}")]
    ResponseFormat(#[from] ResponseFormatError),

    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::StructuralInvariant(msg) => {
                tracing::error!("Structural invariant violated: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "STRUCTURAL_INVARIANT",
                    msg.clone(),
                )
            }
            AppError::ResponseFormat(e) => {
                tracing::error!("Model response format error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "RESPONSE_FORMAT_ERROR",
                    "The AI service returned a response in an unexpected format".to_string(),
                )
            }
            AppError::Prompt(e) => {
                tracing::error!("Prompt error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PROMPT_ERROR",
                    "A prompt could not be built".to_string(),
                )
            }
            AppError::Queue(e) => {
                tracing::error!("Queue error: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "QUEUE_UNAVAILABLE",
                    e.to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
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
