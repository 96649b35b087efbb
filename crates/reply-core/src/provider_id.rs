//! Backend identifiers and their fallback orders.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for a generation backend.
///
/// Providers are symmetric in contract but asymmetric in capability:
/// [`ProviderId::OpenAi`] retains conversation state server-side, the others
/// are stateless per call. [`ProviderId::Fallback`] denotes the static canned
/// path and is never dispatched to a real backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// OpenAI conversations API. Supports durable multi-turn threads.
    OpenAi,
    /// Google Gemini generateContent API.
    Gemini,
    /// Groq chat completions API.
    Groq,
    /// Cohere chat API.
    Cohere,
    /// Static canned response, used when every backend has failed.
    Fallback,
}

impl ProviderId {
    /// The provider used when the caller expresses no preference.
    pub const DEFAULT: ProviderId = ProviderId::OpenAi;

    /// All dispatchable backends, in priority order.
    pub fn backends() -> &'static [ProviderId] {
        &[
            ProviderId::OpenAi,
            ProviderId::Gemini,
            ProviderId::Groq,
            ProviderId::Cohere,
        ]
    }

    /// The rescue order tried when a call to this provider fails.
    ///
    /// Each provider has its own preferred ordering; the orchestrator skips
    /// entries already attempted for the current request.
    pub fn fallback_order(&self) -> &'static [ProviderId] {
        match self {
            ProviderId::OpenAi => &[ProviderId::Gemini, ProviderId::Groq, ProviderId::Cohere],
            ProviderId::Gemini => &[ProviderId::OpenAi, ProviderId::Groq, ProviderId::Cohere],
            ProviderId::Groq => &[ProviderId::Gemini, ProviderId::OpenAi, ProviderId::Cohere],
            ProviderId::Cohere => &[ProviderId::Groq, ProviderId::Gemini, ProviderId::OpenAi],
            ProviderId::Fallback => &[],
        }
    }

    /// Stable lowercase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "openai",
            ProviderId::Gemini => "gemini",
            ProviderId::Groq => "groq",
            ProviderId::Cohere => "cohere",
            ProviderId::Fallback => "fallback",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
