//! OpenAiProvider implementation.

use reply_core::{
    async_trait, ChatProvider, ComposedPrompt, ProviderError, ProviderId, ProviderReply,
    SeafarerProfile,
};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{
    ApiError, ConversationCreated, ResponsesRequest, ResponsesResponse,
};
use crate::config::OpenAiConfig;
use crate::store::{ConversationHandle, ConversationStore};

/// Outcome of a response call that distinguishes a rejected handle from
/// other upstream failures, so the handle can be recreated and retried once.
enum CallError {
    UnknownConversation(String),
    Provider(ProviderError),
}

/// Stateful adapter over the OpenAI conversations API.
///
/// Conversation context lives server-side under a durable conversation id,
/// so the inline history on the composed prompt is not resent; the store
/// maps each requester key to its id and recreates rejected ids
/// transparently, with a single local retry.
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
    store: ConversationStore,
}

impl OpenAiProvider {
    /// Create a new OpenAiProvider with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder().build().map_err(|e| {
            ProviderError::ConfigurationMissing(format!("failed to create HTTP client: {}", e))
        })?;

        let store = ConversationStore::new(config.max_requesters);

        info!(model = %config.model, "OpenAiProvider initialized");

        Ok(Self {
            client,
            config,
            store,
        })
    }

    /// Create an OpenAiProvider from environment variables.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(OpenAiConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Get the conversation store.
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    async fn create_conversation(&self) -> Result<String, ProviderError> {
        let url = format!("{}/v1/conversations", self.config.api_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| ProviderError::Upstream(format!("conversation create failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Upstream(format!(
                "conversation create failed ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let created: ConversationCreated = response.json().await.map_err(|e| {
            ProviderError::Upstream(format!("failed to parse conversation response: {}", e))
        })?;

        Ok(created.id)
    }

    async fn create_response(
        &self,
        handle: &ConversationHandle,
        prompt: &ComposedPrompt,
        profile: &SeafarerProfile,
    ) -> Result<ProviderReply, CallError> {
        let url = format!("{}/v1/responses", self.config.api_url);
        let request = ResponsesRequest {
            model: self.config.model.clone(),
            instructions: prompt.instructions.clone(),
            input: prompt.message.clone(),
            conversation: handle.conversation_id.clone(),
            max_output_tokens: Some(self.config.token_ceiling(profile.is_privileged())),
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| CallError::Provider(ProviderError::Upstream(format!("request failed: {}", e))))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);

            if status.as_u16() == 404 && message.to_lowercase().contains("conversation") {
                return Err(CallError::UnknownConversation(message));
            }

            return Err(CallError::Provider(ProviderError::Upstream(format!(
                "API error ({}): {}",
                status.as_u16(),
                message
            ))));
        }

        let body: ResponsesResponse = response.json().await.map_err(|e| {
            CallError::Provider(ProviderError::Upstream(format!(
                "failed to parse response: {}",
                e
            )))
        })?;

        let text = body
            .output
            .iter()
            .flat_map(|item| item.content.iter())
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("");
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(CallError::Provider(ProviderError::EmptyContent));
        }

        let tokens_used = body.usage.map(|u| u.total_tokens);

        Ok(ProviderReply { text, tokens_used })
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    async fn generate(
        &self,
        prompt: &ComposedPrompt,
        profile: &SeafarerProfile,
    ) -> Result<ProviderReply, ProviderError> {
        let handle = self
            .store
            .lookup_or_create(&profile.key, || self.create_conversation())
            .await?;

        debug!(
            requester = %profile.key,
            conversation = %handle.conversation_id,
            fingerprint = %prompt.fingerprint,
            "Calling OpenAI"
        );

        match self.create_response(&handle, prompt, profile).await {
            Ok(reply) => Ok(reply),
            Err(CallError::UnknownConversation(message)) => {
                // Handle expired or leaked server-side. Recreate and retry
                // once; this retry never counts against the fallback budget.
                warn!(
                    requester = %profile.key,
                    conversation = %handle.conversation_id,
                    %message,
                    "Conversation rejected, recreating"
                );
                self.store
                    .invalidate(&profile.key, &handle.conversation_id)
                    .await;

                let fresh = self
                    .store
                    .lookup_or_create(&profile.key, || self.create_conversation())
                    .await?;

                match self.create_response(&fresh, prompt, profile).await {
                    Ok(reply) => Ok(reply),
                    Err(CallError::UnknownConversation(message)) => Err(ProviderError::Upstream(
                        format!("conversation rejected twice: {}", message),
                    )),
                    Err(CallError::Provider(err)) => Err(err),
                }
            }
            Err(CallError::Provider(err)) => Err(err),
        }
    }

    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn name(&self) -> &str {
        "OpenAiProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_identity() {
        let provider = OpenAiProvider::new(OpenAiConfig::builder().api_key("k").build()).unwrap();
        assert_eq!(provider.id(), ProviderId::OpenAi);
        assert_eq!(provider.name(), "OpenAiProvider");
    }

    #[tokio::test]
    async fn test_store_starts_empty() {
        let provider = OpenAiProvider::new(OpenAiConfig::builder().api_key("k").build()).unwrap();
        assert_eq!(provider.store().requester_count().await, 0);
    }
}
