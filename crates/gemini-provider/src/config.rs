//! Configuration for the Gemini provider.

use std::env;

use reply_core::ProviderError;

/// Configuration for [`crate::GeminiProvider`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Gemini API base URL.
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
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            model: "gemini-2.0-flash".to_string(),
            max_tokens: 512,
            premium_max_tokens: 1024,
            temperature: Some(0.6),
        }
    }
}

impl GeminiConfig {
    /// Create configuration from environment variables.
    ///
    /// Required:
    /// - `GEMINI_API_KEY` - API key; absence means the provider is unconfigured
    ///
    /// Optional:
    /// - `GEMINI_API_URL` - API base URL
    /// - `GEMINI_MODEL` - Model name (default: gemini-2.0-flash)
    /// - `GEMINI_MAX_TOKENS` - Free-tier token ceiling (default: 512)
    /// - `GEMINI_PREMIUM_MAX_TOKENS` - Premium token ceiling (default: 1024)
    /// - `GEMINI_TEMPERATURE` - Temperature (default: 0.6)
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = env::var("GEMINI_API_KEY").map_err(|_| {
            ProviderError::ConfigurationMissing("GEMINI_API_KEY not set".to_string())
        })?;

        let defaults = Self::default();

        Ok(Self {
            api_url: env::var("GEMINI_API_URL").unwrap_or(defaults.api_url),
            api_key,
            model: env::var("GEMINI_MODEL").unwrap_or(defaults.model),
            max_tokens: env::var("GEMINI_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_tokens),
            premium_max_tokens: env::var("GEMINI_PREMIUM_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.premium_max_tokens),
            temperature: env::var("GEMINI_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .or(defaults.temperature),
        })
    }

    /// Create a new config builder.
    pub fn builder() -> GeminiConfigBuilder {
        GeminiConfigBuilder::default()
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

/// Builder for [`GeminiConfig`].
#[derive(Debug, Default)]
pub struct GeminiConfigBuilder {
    config: GeminiConfig,
}

impl GeminiConfigBuilder {
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

    /// Build the configuration.
    pub fn build(self) -> GeminiConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeminiConfig::default();
        assert_eq!(config.api_url, "https://generativelanguage.googleapis.com");
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.premium_max_tokens, 1024);
    }

    #[test]
    fn test_token_ceiling_by_tier() {
        let config = GeminiConfig::builder()
            .api_key("k")
            .max_tokens(200)
            .premium_max_tokens(800)
            .build();
        assert_eq!(config.token_ceiling(false), 200);
        assert_eq!(config.token_ceiling(true), 800);
    }
}
