//! Provider selection strategies.
//!
//! Selection of the starting provider is pluggable so the default policy
//! (honor a configured preference, otherwise a fixed default) can be
//! swapped without touching the fallback machinery.

use reply_core::ProviderId;

use crate::registry::ProviderRegistry;

/// Chooses the starting provider for a request.
pub trait SelectionStrategy: Send + Sync {
    /// Pick a configured starting provider, or `None` when nothing is
    /// configured at all.
    fn select(&self, preferred: Option<ProviderId>, registry: &ProviderRegistry)
        -> Option<ProviderId>;
}

/// Default strategy: the caller's preference if that provider is
/// configured, otherwise the fixed default, otherwise the first configured
/// backend in priority order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPriority;

impl SelectionStrategy for FixedPriority {
    fn select(
        &self,
        preferred: Option<ProviderId>,
        registry: &ProviderRegistry,
    ) -> Option<ProviderId> {
        if let Some(id) = preferred {
            if registry.is_configured(id) {
                return Some(id);
            }
        }

        if registry.is_configured(ProviderId::DEFAULT) {
            return Some(ProviderId::DEFAULT);
        }

        ProviderId::backends()
            .iter()
            .copied()
            .find(|id| registry.is_configured(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groq_provider::{GroqConfig, GroqProvider};
    use std::sync::Arc;

    fn registry_with_groq() -> ProviderRegistry {
        ProviderRegistry::new().with_provider(Arc::new(
            GroqProvider::new(GroqConfig::builder().api_key("k").build()).unwrap(),
        ))
    }

    #[test]
    fn test_preferred_wins_when_configured() {
        let registry = registry_with_groq();
        let selected = FixedPriority.select(Some(ProviderId::Groq), &registry);
        assert_eq!(selected, Some(ProviderId::Groq));
    }

    #[test]
    fn test_unconfigured_preference_falls_through() {
        let registry = registry_with_groq();
        // OpenAI preferred but not configured; Groq is the only backend.
        let selected = FixedPriority.select(Some(ProviderId::OpenAi), &registry);
        assert_eq!(selected, Some(ProviderId::Groq));
    }

    #[test]
    fn test_no_providers_selects_none() {
        let registry = ProviderRegistry::new();
        assert_eq!(FixedPriority.select(None, &registry), None);
    }
}
