//! Error types for the API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use orchestrator::OrchestratorError;
use thiserror::Error;

/// Errors that can occur handling an API request.
///
/// Only malformed requests reach this type; every provider-side condition
/// is absorbed by the orchestrator's fallback cascade.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body failed validation.
    #[error("{0}")]
    Invalid(#[from] OrchestratorError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::Invalid(err) = self;
        tracing::warn!(error = %err, "Rejecting malformed request");

        let body = serde_json::json!({
            "error": err.to_string()
        });

        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
