//! Provider registry.
//!
//! Built once at process startup from configuration and injected into the
//! orchestrator, so "is this provider configured" is a static property of
//! the registry rather than a lazily discovered one.

use std::collections::HashMap;
use std::sync::Arc;

use cohere_provider::CohereProvider;
use gemini_provider::GeminiProvider;
use groq_provider::GroqProvider;
use openai_provider::OpenAiProvider;
use reply_core::{ChatProvider, ProviderError, ProviderId};
use tracing::{info, warn};

/// The set of configured providers for this process.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderId, Arc<dyn ChatProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its own id. Replaces any previous entry.
    pub fn register(&mut self, provider: Arc<dyn ChatProvider>) {
        self.providers.insert(provider.id(), provider);
    }

    /// Register a provider, builder style.
    pub fn with_provider(mut self, provider: Arc<dyn ChatProvider>) -> Self {
        self.register(provider);
        self
    }

    /// Build the registry from environment configuration.
    ///
    /// A provider whose credential is absent is simply left out; any other
    /// initialization error is also treated as unconfigured, with a warning.
    pub fn from_env() -> Self {
        let mut registry = Self::new();

        match OpenAiProvider::from_env() {
            Ok(provider) => registry.register(Arc::new(provider)),
            Err(err) => log_unconfigured(ProviderId::OpenAi, &err),
        }
        match GeminiProvider::from_env() {
            Ok(provider) => registry.register(Arc::new(provider)),
            Err(err) => log_unconfigured(ProviderId::Gemini, &err),
        }
        match GroqProvider::from_env() {
            Ok(provider) => registry.register(Arc::new(provider)),
            Err(err) => log_unconfigured(ProviderId::Groq, &err),
        }
        match CohereProvider::from_env() {
            Ok(provider) => registry.register(Arc::new(provider)),
            Err(err) => log_unconfigured(ProviderId::Cohere, &err),
        }

        info!(
            configured = ?registry.configured_ids(),
            "Provider registry built"
        );

        registry
    }

    /// Look up a configured provider.
    pub fn get(&self, id: ProviderId) -> Option<Arc<dyn ChatProvider>> {
        self.providers.get(&id).cloned()
    }

    /// Whether a provider is configured.
    pub fn is_configured(&self, id: ProviderId) -> bool {
        self.providers.contains_key(&id)
    }

    /// Configured backends in priority order.
    pub fn configured_ids(&self) -> Vec<ProviderId> {
        ProviderId::backends()
            .iter()
            .copied()
            .filter(|id| self.is_configured(*id))
            .collect()
    }

    /// Number of configured providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no provider is configured.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

fn log_unconfigured(id: ProviderId, err: &ProviderError) {
    match err {
        ProviderError::ConfigurationMissing(msg) => {
            info!(provider = %id, %msg, "Provider not configured, skipping")
        }
        other => warn!(provider = %id, error = %other, "Provider init failed, skipping"),
    }
}
