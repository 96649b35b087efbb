//! Core trait and types for reply providers.
//!
//! This crate provides the shared interface for all generation backends in
//! the Bosun maritime assistant. It defines:
//!
//! - [`ChatProvider`] - The trait that all provider adapters must implement
//! - [`GenerationRequest`] / [`GenerationResult`] - Request and result types
//! - [`ProviderId`] - The closed set of backend identifiers and their rescue orders
//! - [`ProviderError`] - Error taxonomy for provider calls
//! - [`PromptComposer`] - The provider-agnostic instruction builder
//!
//! # Example
//!
//! ```rust
//! use reply_core::{async_trait, ChatProvider, ComposedPrompt, ProviderError,
//!                  ProviderId, ProviderReply, SeafarerProfile};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl ChatProvider for MyProvider {
//!     async fn generate(
//!         &self,
//!         _prompt: &ComposedPrompt,
//!         _profile: &SeafarerProfile,
//!     ) -> Result<ProviderReply, ProviderError> {
//!         Ok(ProviderReply::text("Check the oil pressure first."))
//!     }
//!
//!     fn id(&self) -> ProviderId {
//!         ProviderId::Groq
//!     }
//!
//!     fn name(&self) -> &str {
//!         "MyProvider"
//!     }
//! }
//! ```

mod error;
mod profile;
mod prompt;
mod provider;
mod provider_id;
mod request;

pub use error::{ProviderError, RequestError};
pub use profile::SeafarerProfile;
pub use prompt::{hash_prompt, ComposedPrompt, PromptComposer};
pub use provider::{ChatProvider, ProviderReply};
pub use provider_id::ProviderId;
pub use request::{ChatTurn, GenerationRequest, GenerationRequestBuilder, GenerationResult, Language, TurnRole};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
