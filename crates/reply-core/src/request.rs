//! Request and result types for reply generation.

use serde::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::profile::SeafarerProfile;
use crate::provider_id::ProviderId;

/// Target answer language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Default language.
    #[default]
    English,
    /// Alternate language for Turkish-speaking crews.
    Turkish,
}

impl Language {
    /// Instruction line appended to the composed prompt.
    pub fn instruction(&self) -> &'static str {
        match self {
            Language::English => "Answer in English.",
            Language::Turkish => "Answer in Turkish.",
        }
    }
}

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    /// Wire-format role string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

/// A single turn of prior conversation supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ChatTurn {
    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    /// Create an assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
        }
    }
}

/// An inbound generation request. Immutable once built.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRequest {
    /// The question text from the requester.
    pub message: String,
    /// Question category, e.g. "engine" or "navigation".
    pub category: String,
    /// Target answer language.
    #[serde(default)]
    pub language: Language,
    /// The requesting crew member.
    pub profile: SeafarerProfile,
    /// Optional dynamic rule text injected into the prompt.
    #[serde(default)]
    pub active_rules: Option<String>,
    /// Prior conversation turns, oldest first.
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    /// Provider the caller would like to start with, if configured.
    #[serde(default)]
    pub preferred: Option<ProviderId>,
}

impl GenerationRequest {
    /// Start building a request.
    pub fn builder(
        message: impl Into<String>,
        category: impl Into<String>,
        profile: SeafarerProfile,
    ) -> GenerationRequestBuilder {
        GenerationRequestBuilder {
            request: GenerationRequest {
                message: message.into(),
                category: category.into(),
                language: Language::default(),
                profile,
                active_rules: None,
                history: Vec::new(),
                preferred: None,
            },
        }
    }

    /// Check the required fields.
    ///
    /// This is the only condition the subsystem ever reports back to the
    /// caller as an error; everything downstream degrades to a canned result.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.message.trim().is_empty() {
            return Err(RequestError::EmptyMessage);
        }
        if self.profile.key.trim().is_empty() {
            return Err(RequestError::EmptyRequesterKey);
        }
        if self.category.trim().is_empty() {
            return Err(RequestError::EmptyCategory);
        }
        Ok(())
    }
}

/// Builder for [`GenerationRequest`].
#[derive(Debug)]
pub struct GenerationRequestBuilder {
    request: GenerationRequest,
}

impl GenerationRequestBuilder {
    /// Set the target language.
    pub fn language(mut self, language: Language) -> Self {
        self.request.language = language;
        self
    }

    /// Set the dynamic rule text.
    pub fn active_rules(mut self, rules: impl Into<String>) -> Self {
        self.request.active_rules = Some(rules.into());
        self
    }

    /// Set the prior conversation turns.
    pub fn history(mut self, history: Vec<ChatTurn>) -> Self {
        self.request.history = history;
        self
    }

    /// Set the preferred starting provider.
    pub fn preferred(mut self, provider: ProviderId) -> Self {
        self.request.preferred = Some(provider);
        self
    }

    /// Finish building.
    pub fn build(self) -> GenerationRequest {
        self.request
    }
}

/// The artifact returned to the caller. Always produced, never an error.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    /// Sanitized, tier-adjusted answer text.
    pub content: String,
    /// Provider that produced the content, or [`ProviderId::Fallback`].
    pub provider: ProviderId,
    /// Token usage reported by the winning provider, if any.
    pub tokens_used: Option<u32>,
    /// Wall-clock latency of the winning attempt.
    pub latency_ms: u64,
}
