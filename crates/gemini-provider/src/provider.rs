//! GeminiProvider implementation.

use reply_core::{
    async_trait, ChatProvider, ComposedPrompt, ProviderError, ProviderId, ProviderReply,
    SeafarerProfile, TurnRole,
};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::config::GeminiConfig;

/// Stateless adapter over the Gemini generateContent API.
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a new GeminiProvider with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder().build().map_err(|e| {
            ProviderError::ConfigurationMissing(format!("failed to create HTTP client: {}", e))
        })?;

        info!(model = %config.model, "GeminiProvider initialized");

        Ok(Self { client, config })
    }

    /// Create a GeminiProvider from environment variables.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn build_contents(&self, prompt: &ComposedPrompt) -> Vec<Content> {
        let mut contents = Vec::with_capacity(prompt.history.len() + 1);
        for turn in &prompt.history {
            contents.push(match turn.role {
                TurnRole::User => Content::user(turn.text.clone()),
                TurnRole::Assistant => Content::model(turn.text.clone()),
            });
        }
        contents.push(Content::user(prompt.message.clone()));
        contents
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    async fn generate(
        &self,
        prompt: &ComposedPrompt,
        profile: &SeafarerProfile,
    ) -> Result<ProviderReply, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_url, self.config.model
        );

        let request = GenerateContentRequest {
            system_instruction: Content::system(prompt.instructions.clone()),
            contents: self.build_contents(prompt),
            generation_config: GenerationConfig {
                max_output_tokens: Some(self.config.token_ceiling(profile.is_privileged())),
                temperature: self.config.temperature,
            },
        };

        debug!(requester = %profile.key, fingerprint = %prompt.fingerprint, "Calling Gemini");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Upstream(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Upstream(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Upstream(format!("failed to parse response: {}", e)))?;

        // A blocked reply arrives as an empty candidate list or a candidate
        // with no parts; both are EmptyContent, not an upstream failure.
        let candidate = body.candidates.into_iter().next();
        if let Some(reason) = candidate
            .as_ref()
            .and_then(|c| c.finish_reason.as_deref())
            .filter(|r| *r == "SAFETY")
        {
            warn!(%reason, "Gemini blocked the reply");
            return Err(ProviderError::EmptyContent);
        }

        let text = candidate
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ProviderError::EmptyContent)?;

        let tokens_used = body.usage_metadata.map(|u| u.total_token_count);

        debug!(chars = text.len(), ?tokens_used, "Gemini reply received");

        Ok(ProviderReply { text, tokens_used })
    }

    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn name(&self) -> &str {
        "GeminiProvider"
    }
}
