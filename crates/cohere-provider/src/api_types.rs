//! Cohere API request and response types.

use serde::{Deserialize, Serialize};

/// A prior conversation turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatHistoryEntry {
    /// Role: "USER" or "CHATBOT"
    pub role: String,
    pub message: String,
}

impl ChatHistoryEntry {
    /// A user turn.
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            role: "USER".to_string(),
            message: message.into(),
        }
    }

    /// A chatbot turn.
    pub fn chatbot(message: impl Into<String>) -> Self {
        Self {
            role: "CHATBOT".to_string(),
            message: message.into(),
        }
    }
}

/// Chat request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub chat_history: Vec<ChatHistoryEntry>,
    pub preamble: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Chat response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub text: String,
    pub meta: Option<Meta>,
}

/// Response metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub billed_units: Option<BilledUnits>,
}

/// Billed token counts.
#[derive(Debug, Clone, Deserialize)]
pub struct BilledUnits {
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
}

/// API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: String,
}
