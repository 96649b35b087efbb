//! Configuration for the Groq provider.

use std::env;

use reply_core::ProviderError;

/// Configuration for [`crate::GroqProvider`].
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// Groq API URL.
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

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.groq.com/openai".to_string(),
            api_key: String::new(),
            model: "llama-3.3-70b-versatile".to_string(),
            max_tokens: 512,
            premium_max_tokens: 1024,
            temperature: Some(0.6),
        }
    }
}

impl GroqConfig {
    /// Create configuration from environment variables.
    ///
    /// Required:
    /// - `GROQ_API_KEY` - API key; absence means the provider is unconfigured
    ///
    /// Optional:
    /// - `GROQ_API_URL` - API URL (default: https://api.groq.com/openai)
    /// - `GROQ_MODEL` - Model name (default: llama-3.3-70b-versatile)
    /// - `GROQ_MAX_TOKENS` - Free-tier token ceiling (default: 512)
    /// - `GROQ_PREMIUM_MAX_TOKENS` - Premium token ceiling (default: 1024)
    /// - `GROQ_TEMPERATURE` - Temperature (default: 0.6)
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = env::var("GROQ_API_KEY")
            .map_err(|_| ProviderError::ConfigurationMissing("GROQ_API_KEY not set".to_string()))?;

        let defaults = Self::default();

        Ok(Self {
            api_url: env::var("GROQ_API_URL").unwrap_or(defaults.api_url),
            api_key,
            model: env::var("GROQ_MODEL").unwrap_or(defaults.model),
            max_tokens: env::var("GROQ_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_tokens),
            premium_max_tokens: env::var("GROQ_PREMIUM_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.premium_max_tokens),
            temperature: env::var("GROQ_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .or(defaults.temperature),
        })
    }

    /// Create a new config builder.
    pub fn builder() -> GroqConfigBuilder {
        GroqConfigBuilder::default()
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

/// Builder for [`GroqConfig`].
#[derive(Debug, Default)]
pub struct GroqConfigBuilder {
    config: GroqConfig,
}

impl GroqConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
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
    pub fn build(self) -> GroqConfig {
        self.config
    }
}
