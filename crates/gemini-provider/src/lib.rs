//! Google Gemini provider adapter.
//!
//! Stateless generateContent backend. Gemini can legitimately return an
//! empty candidate list under content filtering, which surfaces as
//! [`reply_core::ProviderError::EmptyContent`] rather than a hard failure.

mod api_types;
mod config;
mod provider;

pub use config::{GeminiConfig, GeminiConfigBuilder};
pub use provider::GeminiProvider;
