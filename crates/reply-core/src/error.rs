//! Error types for provider calls and inbound requests.

use thiserror::Error;

/// Errors that can occur during a provider call.
///
/// Only [`ProviderError::ConfigurationMissing`] and [`ProviderError::Upstream`]
/// advance the orchestrator's fallback cascade. [`ProviderError::EmptyContent`]
/// is a distinct condition resolved locally with canned text.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No credential is configured for this provider.
    #[error("provider not configured: {0}")]
    ConfigurationMissing(String),

    /// The upstream call failed: network error, timeout, or non-success status.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The call succeeded but returned no usable text.
    #[error("upstream returned empty content")]
    EmptyContent,
}

impl ProviderError {
    /// Whether this failure should advance the fallback cascade.
    pub fn is_cascading(&self) -> bool {
        matches!(
            self,
            ProviderError::ConfigurationMissing(_) | ProviderError::Upstream(_)
        )
    }
}

/// Validation errors for an inbound [`crate::GenerationRequest`].
///
/// This is the only failure mode ever surfaced to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// The message text is empty.
    #[error("message text is required")]
    EmptyMessage,

    /// The requester profile carries no identity key.
    #[error("requester identity key is required")]
    EmptyRequesterKey,

    /// The question category is empty.
    #[error("category is required")]
    EmptyCategory,
}
