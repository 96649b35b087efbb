//! Configuration for the OpenAI provider.

use std::env;

use reply_core::ProviderError;

/// Configuration for [`crate::OpenAiProvider`].
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// OpenAI API base URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Token ceiling for rate-limited requesters.
    pub max_tokens: u32,

    /// Token ceiling for premium/admin requesters.
    pub premium_max_tokens: u32,

    /// Temperature for generation.
    pub temperature: Option<f32>,

    /// Maximum number of requesters tracked in the conversation store.
    pub max_requesters: usize,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 512,
            premium_max_tokens: 1024,
            temperature: Some(0.6),
            max_requesters: 10000,
        }
    }
}

impl OpenAiConfig {
    /// Create configuration from environment variables.
    ///
    /// Required:
    /// - `OPENAI_API_KEY` - API key; absence means the provider is unconfigured
    ///
    /// Optional:
    /// - `OPENAI_API_URL` - API base URL (default: https://api.openai.com)
    /// - `OPENAI_MODEL` - Model name (default: gpt-4o-mini)
    /// - `OPENAI_MAX_TOKENS` - Free-tier token ceiling (default: 512)
    /// - `OPENAI_PREMIUM_MAX_TOKENS` - Premium token ceiling (default: 1024)
    /// - `OPENAI_TEMPERATURE` - Temperature (default: 0.6)
    /// - `OPENAI_MAX_REQUESTERS` - Conversation store bound (default: 10000)
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            ProviderError::ConfigurationMissing("OPENAI_API_KEY not set".to_string())
        })?;

        let defaults = Self::default();

        Ok(Self {
            api_url: env::var("OPENAI_API_URL").unwrap_or(defaults.api_url),
            api_key,
            model: env::var("OPENAI_MODEL").unwrap_or(defaults.model),
            max_tokens: env::var("OPENAI_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_tokens),
            premium_max_tokens: env::var("OPENAI_PREMIUM_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.premium_max_tokens),
            temperature: env::var("OPENAI_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .or(defaults.temperature),
            max_requesters: env::var("OPENAI_MAX_REQUESTERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_requesters),
        })
    }

    /// Create a new config builder.
    pub fn builder() -> OpenAiConfigBuilder {
        OpenAiConfigBuilder::default()
    }

    /// Token ceiling for a requester with the given privileged signal.
    pub fn token_ceiling(&self, privileged: bool) -> u32 {
        if privileged {
            self.premium_max_tokens
        } else {
            self.max_tokens
        }
    }
}

/// Builder for [`OpenAiConfig`].
#[derive(Debug, Default)]
pub struct OpenAiConfigBuilder {
    config: OpenAiConfig,
}

impl OpenAiConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API base URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the free-tier token ceiling.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = tokens;
        self
    }

    /// Set the premium token ceiling.
    pub fn premium_max_tokens(mut self, tokens: u32) -> Self {
        self.config.premium_max_tokens = tokens;
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the conversation store bound.
    pub fn max_requesters(mut self, max: usize) -> Self {
        self.config.max_requesters = max;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OpenAiConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OpenAiConfig::default();
        assert_eq!(config.api_url, "https://api.openai.com");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.premium_max_tokens, 1024);
        assert_eq!(config.max_requesters, 10000);
    }

    #[test]
    fn test_token_ceiling_by_tier() {
        let config = OpenAiConfig::builder()
            .api_key("k")
            .max_tokens(128)
            .premium_max_tokens(640)
            .build();
        assert_eq!(config.token_ceiling(false), 128);
        assert_eq!(config.token_ceiling(true), 640);
    }
}
