//! Error types for orchestration.

use reply_core::RequestError;
use thiserror::Error;

/// Errors visible to the caller of the orchestrator.
///
/// Provider failures never appear here; they are masked by the fallback
/// cascade. The only way `process` fails is a malformed inbound request.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The inbound request is missing required fields.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestError),
}
