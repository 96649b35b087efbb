//! Application state shared across handlers.

use std::sync::Arc;

use orchestrator::ReplyOrchestrator;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The reply orchestrator.
    pub orchestrator: Arc<ReplyOrchestrator>,
}

impl AppState {
    /// Create new application state.
    pub fn new(orchestrator: Arc<ReplyOrchestrator>) -> Self {
        Self { orchestrator }
    }
}
