//! GroqProvider implementation.

use reply_core::{
    async_trait, ChatProvider, ComposedPrompt, ProviderError, ProviderId, ProviderReply,
    SeafarerProfile,
};
use reqwest::Client;
use tracing::{debug, info};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::GroqConfig;

/// Stateless adapter over the Groq chat-completions API.
pub struct GroqProvider {
    client: Client,
    config: GroqConfig,
}

impl GroqProvider {
    /// Create a new GroqProvider with the given configuration.
    pub fn new(config: GroqConfig) -> Result<Self, ProviderError> {
        let client = Client::builder().build().map_err(|e| {
            ProviderError::ConfigurationMissing(format!("failed to create HTTP client: {}", e))
        })?;

        info!(model = %config.model, "GroqProvider initialized");

        Ok(Self { client, config })
    }

    /// Create a GroqProvider from environment variables.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(GroqConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GroqConfig {
        &self.config
    }

    fn build_messages(&self, prompt: &ComposedPrompt) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(prompt.history.len() + 2);
        messages.push(ChatMessage::system(prompt.instructions.clone()));
        for turn in &prompt.history {
            messages.push(ChatMessage {
                role: turn.role.as_str().to_string(),
                content: turn.text.clone(),
            });
        }
        messages.push(ChatMessage::user(prompt.message.clone()));
        messages
    }
}

#[async_trait]
impl ChatProvider for GroqProvider {
    async fn generate(
        &self,
        prompt: &ComposedPrompt,
        profile: &SeafarerProfile,
    ) -> Result<ProviderReply, ProviderError> {
        let url = format!("{}/v1/chat/completions", self.config.api_url);
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: self.build_messages(prompt),
            max_tokens: Some(self.config.token_ceiling(profile.is_privileged())),
            temperature: self.config.temperature,
        };

        debug!(requester = %profile.key, fingerprint = %prompt.fingerprint, "Calling Groq");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Upstream(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(ProviderError::Upstream(format!(
                    "API error ({}): {}",
                    status.as_u16(),
                    api_error.error.message
                )));
            }
            return Err(ProviderError::Upstream(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Upstream(format!("failed to parse response: {}", e)))?;

        let text = completion
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or(ProviderError::EmptyContent)?;

        let tokens_used = completion.usage.map(|u| u.total_tokens);

        debug!(chars = text.len(), ?tokens_used, "Groq reply received");

        Ok(ProviderReply { text, tokens_used })
    }

    fn id(&self) -> ProviderId {
        ProviderId::Groq
    }

    fn name(&self) -> &str {
        "GroqProvider"
    }
}
