//! Reply orchestrator for the Bosun maritime assistant.
//!
//! This crate provides the [`ReplyOrchestrator`] type which turns an inbound
//! [`GenerationRequest`] into a guaranteed [`GenerationResult`] by composing
//! a provider-agnostic prompt, walking a fallback cascade over the
//! configured backends, sanitizing the raw output, and applying the tier
//! policy.
//!
//! # Architecture
//!
//! ```text
//! GenerationRequest (from the app)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ORCHESTRATOR                           │
//! │                                                             │
//! │  1. Validate request (only caller-visible failure)          │
//! │         ↓                                                   │
//! │  2. Compose prompt, resolve tier                            │
//! │         ↓                                                   │
//! │  3. Select starting provider (preferred or default)         │
//! │         ↓                                                   │
//! │  4. Call provider with a bounded timeout                    │
//! │     • success        → sanitize → tier → result             │
//! │     • empty content  → canned micro-answer → result         │
//! │     • failure        → next provider in rescue order        │
//! │         ↓                                                   │
//! │  5. All providers exhausted → static canned response        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use orchestrator::ReplyOrchestrator;
//! use reply_core::{GenerationRequest, SeafarerProfile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orchestrator = ReplyOrchestrator::from_env();
//!
//!     let request = GenerationRequest::builder(
//!         "Why is the purifier vibrating?",
//!         "engine",
//!         SeafarerProfile::new("usr-1", "Third Engineer", "Oil Tanker"),
//!     )
//!     .build();
//!
//!     let result = orchestrator.process(request).await?;
//!     println!("[{}] {}", result.provider, result.content);
//!     Ok(())
//! }
//! ```

mod error;
mod fallback;
mod oracle;
mod orchestrator;
mod registry;
mod sanitizer;
mod selection;
mod tier;

// Public exports
pub use error::OrchestratorError;
pub use fallback::{
    empty_content_answer, static_fallback, EMPTY_CONTENT_ANSWERS, STATIC_FALLBACKS,
};
pub use oracle::{FailingOracle, HttpPremiumOracle, OracleError, PremiumOracle, StaticOracle};
pub use orchestrator::ReplyOrchestrator;
pub use registry::ProviderRegistry;
pub use sanitizer::{find_followup_start, sanitize, CONFIRM_LINE};
pub use selection::{FixedPriority, SelectionStrategy};
pub use tier::{count_words, enforce_word_budget, Tier, TierLimits, TierPolicy};

// Re-export commonly used types from dependencies
pub use reply_core::{GenerationRequest, GenerationResult, ProviderId, SeafarerProfile};
