//! Main orchestrator that coordinates reply generation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reply_core::{
    ChatProvider, ComposedPrompt, GenerationRequest, GenerationResult, PromptComposer,
    ProviderError, ProviderId, ProviderReply, SeafarerProfile,
};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::OrchestratorError;
use crate::fallback;
use crate::oracle::HttpPremiumOracle;
use crate::registry::ProviderRegistry;
use crate::sanitizer;
use crate::selection::{FixedPriority, SelectionStrategy};
use crate::tier::{Tier, TierPolicy};

/// Default bound on a single provider call.
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Coordinates one generation request end-to-end.
///
/// The orchestrator:
/// - Validates the request (the only caller-visible failure)
/// - Composes the provider-agnostic prompt
/// - Selects a starting provider and walks the fallback cascade
/// - Bounds every provider call with a timeout
/// - Sanitizes the raw text and applies the tier policy
/// - Always returns a [`GenerationResult`], falling back to canned text
pub struct ReplyOrchestrator {
    registry: ProviderRegistry,
    composer: PromptComposer,
    tier: TierPolicy,
    strategy: Box<dyn SelectionStrategy>,
    call_timeout: Duration,
}

impl ReplyOrchestrator {
    /// Create an orchestrator over a registry with the given tier policy.
    pub fn new(registry: ProviderRegistry, tier: TierPolicy) -> Self {
        Self {
            registry,
            composer: PromptComposer::new(),
            tier,
            strategy: Box::new(FixedPriority),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Create an orchestrator from environment configuration.
    pub fn from_env() -> Self {
        let registry = ProviderRegistry::from_env();
        let oracle = HttpPremiumOracle::from_env()
            .map(|oracle| Arc::new(oracle) as Arc<dyn crate::oracle::PremiumOracle>);
        let tier = TierPolicy::from_env(oracle);

        let call_timeout = std::env::var("ORCHESTRATOR_CALL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_CALL_TIMEOUT);

        Self {
            registry,
            composer: PromptComposer::new(),
            tier,
            strategy: Box::new(FixedPriority),
            call_timeout,
        }
    }

    /// Replace the selection strategy.
    pub fn with_strategy(mut self, strategy: Box<dyn SelectionStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Replace the per-call timeout.
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Replace the prompt composer.
    pub fn with_composer(mut self, composer: PromptComposer) -> Self {
        self.composer = composer;
        self
    }

    /// Get the provider registry.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Get the tier policy.
    pub fn tier_policy(&self) -> &TierPolicy {
        &self.tier
    }

    /// Process a request end-to-end.
    ///
    /// Provider failures cascade through each provider's rescue order, every
    /// provider at most once, then degrade to the static canned response.
    /// The only error this returns is request validation.
    pub async fn process(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResult, OrchestratorError> {
        request.validate()?;

        let prompt = self.composer.compose(&request);
        let tier = self.tier.resolve(&request.profile).await;

        info!(
            requester = %request.profile.key,
            category = %request.category,
            ?tier,
            preferred = ?request.preferred,
            "Processing generation request"
        );

        let mut tried: Vec<ProviderId> = Vec::new();
        let mut current = self.strategy.select(request.preferred, &self.registry);

        while let Some(id) = current {
            tried.push(id);
            // The strategy and rescue orders only yield configured ids.
            let Some(provider) = self.registry.get(id) else {
                current = self.next_provider(id, &tried);
                continue;
            };

            let (outcome, latency) = self
                .attempt(provider.as_ref(), &prompt, &request.profile)
                .await;

            match outcome {
                Ok(reply) => {
                    return Ok(self.finish(reply, id, tier, latency));
                }
                Err(ProviderError::EmptyContent) => {
                    // Resolved locally: a randomized micro-answer attributed
                    // to this provider. Does not advance the cascade.
                    info!(provider = %id, "Empty content, substituting micro-answer");
                    let reply = ProviderReply::text(fallback::empty_content_answer());
                    return Ok(self.finish(reply, id, tier, latency));
                }
                Err(err) => {
                    warn!(provider = %id, error = %err, "Provider failed, advancing cascade");
                    current = self.next_provider(id, &tried);
                }
            }
        }

        info!(?tried, "All providers exhausted, returning static fallback");
        let reply = ProviderReply::text(fallback::static_fallback());
        Ok(self.finish(reply, ProviderId::Fallback, tier, Duration::ZERO))
    }

    /// One bounded provider call.
    async fn attempt(
        &self,
        provider: &dyn ChatProvider,
        prompt: &ComposedPrompt,
        profile: &SeafarerProfile,
    ) -> (Result<ProviderReply, ProviderError>, Duration) {
        let started = Instant::now();
        let outcome = match timeout(self.call_timeout, provider.generate(prompt, profile)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Upstream(format!(
                "call exceeded {:?}",
                self.call_timeout
            ))),
        };
        (outcome, started.elapsed())
    }

    /// Next untried provider along the failed provider's rescue order.
    fn next_provider(&self, failed: ProviderId, tried: &[ProviderId]) -> Option<ProviderId> {
        failed
            .fallback_order()
            .iter()
            .copied()
            .find(|id| !tried.contains(id) && self.registry.is_configured(*id))
    }

    /// Sanitize, apply the tier, and assemble the result.
    fn finish(
        &self,
        reply: ProviderReply,
        provider: ProviderId,
        tier: Tier,
        latency: Duration,
    ) -> GenerationResult {
        let sanitized = sanitizer::sanitize(&reply.text);
        let content = self.tier.apply(&sanitized, tier);

        debug!(
            %provider,
            ?tier,
            raw_chars = reply.text.len(),
            final_chars = content.len(),
            "Reply finished"
        );

        GenerationResult {
            content,
            provider,
            tokens_used: reply.tokens_used,
            latency_ms: latency.as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::TierLimits;

    fn orchestrator() -> ReplyOrchestrator {
        ReplyOrchestrator::new(
            ProviderRegistry::new(),
            TierPolicy::new(TierLimits::default()),
        )
    }

    #[tokio::test]
    async fn test_invalid_request_is_the_only_error() {
        let request = GenerationRequest::builder(
            "",
            "engine",
            SeafarerProfile::new("usr-1", "Oiler", "Tug"),
        )
        .build();

        let result = orchestrator().process(request).await;
        assert!(matches!(result, Err(OrchestratorError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_empty_registry_degrades_to_static_fallback() {
        let request = GenerationRequest::builder(
            "Why is the purifier vibrating?",
            "engine",
            SeafarerProfile::new("usr-1", "Oiler", "Tug"),
        )
        .build();

        let result = orchestrator().process(request).await.unwrap();
        assert_eq!(result.provider, ProviderId::Fallback);
        assert!(fallback::STATIC_FALLBACKS.contains(&result.content.as_str()));
    }
}
