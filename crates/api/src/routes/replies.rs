//! Reply generation route.

use axum::extract::State;
use axum::Json;
use reply_core::{GenerationRequest, GenerationResult};
use tracing::info;

use crate::error::Result;
use crate::state::AppState;

/// Generate a reply for an inbound request.
///
/// Always answers 200 with a [`GenerationResult`] unless the request body
/// itself is malformed; provider failures are masked by the fallback
/// cascade.
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<GenerationResult>> {
    let result = state.orchestrator.process(request).await?;

    info!(
        provider = %result.provider,
        latency_ms = result.latency_ms,
        "Reply generated"
    );

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchestrator::{ProviderRegistry, ReplyOrchestrator, TierLimits, TierPolicy};
    use reply_core::{ProviderId, SeafarerProfile};
    use std::sync::Arc;

    fn state() -> AppState {
        let orchestrator = ReplyOrchestrator::new(
            ProviderRegistry::new(),
            TierPolicy::new(TierLimits::default()),
        );
        AppState::new(Arc::new(orchestrator))
    }

    #[tokio::test]
    async fn test_valid_request_yields_result() {
        let request = GenerationRequest::builder(
            "How do I test a lifeboat engine?",
            "safety",
            SeafarerProfile::new("usr-1", "Second Mate", "Bulk Carrier"),
        )
        .build();

        // No providers configured: still a 200-shaped result via fallback.
        let Json(result) = generate(State(state()), Json(request)).await.unwrap();
        assert_eq!(result.provider, ProviderId::Fallback);
        assert!(!result.content.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_request_is_rejected() {
        let request = GenerationRequest::builder(
            "",
            "safety",
            SeafarerProfile::new("usr-1", "Second Mate", "Bulk Carrier"),
        )
        .build();

        let result = generate(State(state()), Json(request)).await;
        assert!(result.is_err());
    }
}
