//! Scripted provider implementations.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use reply_core::{
    async_trait, ChatProvider, ComposedPrompt, ProviderError, ProviderId, ProviderReply,
    SeafarerProfile,
};

/// A provider that returns a fixed reply and counts its calls.
#[derive(Debug)]
pub struct ScriptedProvider {
    id: ProviderId,
    reply: String,
    tokens_used: Option<u32>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    /// Create a provider that answers with `reply`.
    pub fn new(id: ProviderId, reply: impl Into<String>) -> Self {
        Self {
            id,
            reply: reply.into(),
            tokens_used: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a provider that also reports a token count.
    pub fn with_tokens(id: ProviderId, reply: impl Into<String>, tokens_used: u32) -> Self {
        Self {
            id,
            reply: reply.into(),
            tokens_used: Some(tokens_used),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of generate calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    async fn generate(
        &self,
        _prompt: &ComposedPrompt,
        _profile: &SeafarerProfile,
    ) -> Result<ProviderReply, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ProviderReply {
            text: self.reply.clone(),
            tokens_used: self.tokens_used,
        })
    }

    fn id(&self) -> ProviderId {
        self.id
    }

    fn name(&self) -> &str {
        "ScriptedProvider"
    }
}

/// A provider whose every call fails with an upstream error.
#[derive(Debug)]
pub struct FailingProvider {
    id: ProviderId,
    calls: AtomicUsize,
}

impl FailingProvider {
    /// Create a failing provider.
    pub fn new(id: ProviderId) -> Self {
        Self {
            id,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of generate calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatProvider for FailingProvider {
    async fn generate(
        &self,
        _prompt: &ComposedPrompt,
        _profile: &SeafarerProfile,
    ) -> Result<ProviderReply, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ProviderError::Upstream("scripted failure".to_string()))
    }

    fn id(&self) -> ProviderId {
        self.id
    }

    fn name(&self) -> &str {
        "FailingProvider"
    }
}

/// A provider that succeeds but never returns usable text.
#[derive(Debug)]
pub struct EmptyProvider {
    id: ProviderId,
    calls: AtomicUsize,
}

impl EmptyProvider {
    /// Create an empty-content provider.
    pub fn new(id: ProviderId) -> Self {
        Self {
            id,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of generate calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatProvider for EmptyProvider {
    async fn generate(
        &self,
        _prompt: &ComposedPrompt,
        _profile: &SeafarerProfile,
    ) -> Result<ProviderReply, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ProviderError::EmptyContent)
    }

    fn id(&self) -> ProviderId {
        self.id
    }

    fn name(&self) -> &str {
        "EmptyProvider"
    }
}

/// A provider that sleeps before answering, for timeout tests.
#[derive(Debug)]
pub struct SlowProvider {
    id: ProviderId,
    delay: Duration,
    reply: String,
}

impl SlowProvider {
    /// Create a provider that waits `delay` before replying.
    pub fn new(id: ProviderId, delay: Duration, reply: impl Into<String>) -> Self {
        Self {
            id,
            delay,
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl ChatProvider for SlowProvider {
    async fn generate(
        &self,
        _prompt: &ComposedPrompt,
        _profile: &SeafarerProfile,
    ) -> Result<ProviderReply, ProviderError> {
        tokio::time::sleep(self.delay).await;
        Ok(ProviderReply::text(self.reply.clone()))
    }

    fn id(&self) -> ProviderId {
        self.id
    }

    fn name(&self) -> &str {
        "SlowProvider"
    }
}
