//! Error types for the relay.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use brain_core::BrainError;
use database::ValidationError;
use thiserror::Error;

/// Errors that can occur while handling a request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] database::DatabaseError),

    /// The language model could not answer.
    #[error("{0}")]
    Upstream(#[from] BrainError),

    /// Workflow error.
    #[error("Workflow error: {0}")]
    Workflow(#[from] orchestrator::OrchestratorError),

    /// Invalid input.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Missing or malformed request fields.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            RelayError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            RelayError::Upstream(err) => {
                tracing::error!("Upstream model error: {}", err);
                let status = match err {
                    BrainError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                    BrainError::Configuration(_) | BrainError::Unavailable(_) => {
                        StatusCode::SERVICE_UNAVAILABLE
                    }
                    _ => StatusCode::BAD_GATEWAY,
                };
                (status, err.to_string())
            }
            RelayError::Workflow(err) => {
                tracing::error!("Workflow error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            RelayError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            RelayError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            RelayError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for relay handlers.
pub type Result<T> = std::result::Result<T, RelayError>;
