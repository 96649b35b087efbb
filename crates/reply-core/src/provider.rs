//! The ChatProvider trait definition.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::profile::SeafarerProfile;
use crate::prompt::ComposedPrompt;
use crate::provider_id::ProviderId;

/// Raw output of a single provider call.
#[derive(Debug, Clone)]
pub struct ProviderReply {
    /// Raw model text before sanitization and tiering.
    pub text: String,
    /// Token usage reported by the backend, if available.
    pub tokens_used: Option<u32>,
}

impl ProviderReply {
    /// Create a reply with text only.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tokens_used: None,
        }
    }

    /// Create a reply with text and a token count.
    pub fn with_tokens(text: impl Into<String>, tokens_used: u32) -> Self {
        Self {
            text: text.into(),
            tokens_used: Some(tokens_used),
        }
    }
}

/// A uniform wrapper around one generation backend.
///
/// Implementations differ in transport shape, token ceiling, and whether
/// they keep server-side conversation state, but share this contract.
/// This trait is object-safe and used as `Arc<dyn ChatProvider>`.
///
/// Adapters must not mutate shared state beyond the network call itself;
/// the stateful provider's conversation store is its own.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Execute one generation call and return the raw model text.
    ///
    /// The profile is consulted only for per-tier token ceilings and, for
    /// the stateful provider, the conversation handle key.
    async fn generate(
        &self,
        prompt: &ComposedPrompt,
        profile: &SeafarerProfile,
    ) -> Result<ProviderReply, ProviderError>;

    /// The backend identifier for this adapter.
    fn id(&self) -> ProviderId;

    /// Human-readable name for logs.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_reply_constructors() {
        let reply = ProviderReply::text("hello");
        assert_eq!(reply.text, "hello");
        assert!(reply.tokens_used.is_none());

        let reply = ProviderReply::with_tokens("hello", 42);
        assert_eq!(reply.tokens_used, Some(42));
    }
}
