//! CohereProvider implementation.

use reply_core::{
    async_trait, ChatProvider, ComposedPrompt, ProviderError, ProviderId, ProviderReply,
    SeafarerProfile, TurnRole,
};
use reqwest::Client;
use tracing::{debug, info};

use crate::api_types::{ApiError, ChatHistoryEntry, ChatRequest, ChatResponse};
use crate::config::CohereConfig;

/// Stateless adapter over the Cohere chat API.
pub struct CohereProvider {
    client: Client,
    config: CohereConfig,
}

impl CohereProvider {
    /// Create a new CohereProvider with the given configuration.
    pub fn new(config: CohereConfig) -> Result<Self, ProviderError> {
        let client = Client::builder().build().map_err(|e| {
            ProviderError::ConfigurationMissing(format!("failed to create HTTP client: {}", e))
        })?;

        info!(model = %config.model, "CohereProvider initialized");

        Ok(Self { client, config })
    }

    /// Create a CohereProvider from environment variables.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(CohereConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &CohereConfig {
        &self.config
    }

    fn build_history(&self, prompt: &ComposedPrompt) -> Vec<ChatHistoryEntry> {
        prompt
            .history
            .iter()
            .map(|turn| match turn.role {
                TurnRole::User => ChatHistoryEntry::user(turn.text.clone()),
                TurnRole::Assistant => ChatHistoryEntry::chatbot(turn.text.clone()),
            })
            .collect()
    }
}

#[async_trait]
impl ChatProvider for CohereProvider {
    async fn generate(
        &self,
        prompt: &ComposedPrompt,
        profile: &SeafarerProfile,
    ) -> Result<ProviderReply, ProviderError> {
        let url = format!("{}/v1/chat", self.config.api_url);
        let request = ChatRequest {
            model: self.config.model.clone(),
            message: prompt.message.clone(),
            chat_history: self.build_history(prompt),
            preamble: prompt.instructions.clone(),
            max_tokens: Some(self.config.token_ceiling(profile.is_privileged())),
            temperature: self.config.temperature,
        };

        debug!(requester = %profile.key, fingerprint = %prompt.fingerprint, "Calling Cohere");

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
                    api_error.message
                )));
            }
            return Err(ProviderError::Upstream(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Upstream(format!("failed to parse response: {}", e)))?;

        let text = body.text.trim().to_string();
        if text.is_empty() {
            return Err(ProviderError::EmptyContent);
        }

        let tokens_used = body
            .meta
            .and_then(|m| m.billed_units)
            .and_then(|u| match (u.input_tokens, u.output_tokens) {
                (Some(input), Some(output)) => Some(input + output),
                (Some(input), None) => Some(input),
                (None, Some(output)) => Some(output),
                (None, None) => None,
            });

        debug!(chars = text.len(), ?tokens_used, "Cohere reply received");

        Ok(ProviderReply { text, tokens_used })
    }

    fn id(&self) -> ProviderId {
        ProviderId::Cohere
    }

    fn name(&self) -> &str {
        "CohereProvider"
    }
}
