//! OpenAI API request and response types.

use serde::{Deserialize, Serialize};

/// Response to conversation creation.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationCreated {
    pub id: String,
}

/// Request body for a model response within a conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    pub model: String,
    /// System-level instruction block.
    pub instructions: String,
    /// The current user message.
    pub input: String,
    /// Durable conversation id; context is retained server-side.
    pub conversation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Response body for a model response.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponsesResponse {
    #[serde(default)]
    pub output: Vec<OutputItem>,
    pub usage: Option<Usage>,
}

/// One output item; message items carry content parts.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputItem {
    #[serde(default)]
    pub content: Vec<OutputContent>,
}

/// One content part; text parts carry the reply text.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputContent {
    pub text: Option<String>,
}

/// Token usage information.
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub total_tokens: u32,
}

/// API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetails,
}

/// API error details.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetails {
    pub message: String,
}
