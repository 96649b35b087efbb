//! Groq provider adapter.
//!
//! Stateless chat-completions backend. Each call carries the full composed
//! prompt and history; nothing is retained server-side.

mod api_types;
mod config;
mod provider;

pub use config::{GroqConfig, GroqConfigBuilder};
pub use provider::GroqProvider;
