//! Premium status oracle.
//!
//! The billing service is consumed as a boolean oracle keyed by identity.
//! It is strictly best-effort: any failure here resolves to the rate-limited
//! tier rather than propagating, so content delivery never depends on a
//! billing check succeeding.

use std::collections::HashSet;
use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Failure talking to the premium oracle.
#[derive(Debug, Error)]
#[error("premium oracle error: {0}")]
pub struct OracleError(pub String);

/// Best-effort premium status lookup keyed by identity.
#[async_trait]
pub trait PremiumOracle: Send + Sync {
    /// `Some(true)` / `Some(false)` is a definite answer; `None` means the
    /// oracle does not know this identity.
    async fn is_premium(&self, key: &str) -> Result<Option<bool>, OracleError>;
}

#[derive(Debug, Deserialize)]
struct PremiumStatus {
    premium: bool,
}

/// HTTP client for the billing service's premium-status endpoint.
pub struct HttpPremiumOracle {
    client: Client,
    base_url: String,
}

impl HttpPremiumOracle {
    /// Create an oracle client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, OracleError> {
        let client = Client::builder()
            .build()
            .map_err(|e| OracleError(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Create an oracle client from the `PREMIUM_ORACLE_URL` environment
    /// variable. Absence means no oracle is configured.
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("PREMIUM_ORACLE_URL").ok()?;
        match Self::new(base_url) {
            Ok(oracle) => Some(oracle),
            Err(err) => {
                warn!(error = %err, "Premium oracle unavailable");
                None
            }
        }
    }
}

#[async_trait]
impl PremiumOracle for HttpPremiumOracle {
    async fn is_premium(&self, key: &str) -> Result<Option<bool>, OracleError> {
        let url = format!("{}/v1/premium/{}", self.base_url, key);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| OracleError(format!("request failed: {}", e)))?;

        let status = response.status();
        if status.as_u16() == 404 {
            // Unknown identity is indecisive, not an error.
            return Ok(None);
        }
        if !status.is_success() {
            return Err(OracleError(format!("status {}", status.as_u16())));
        }

        let body: PremiumStatus = response
            .json()
            .await
            .map_err(|e| OracleError(format!("failed to parse response: {}", e)))?;

        debug!(requester = %key, premium = body.premium, "Premium status resolved");
        Ok(Some(body.premium))
    }
}

/// Fixed-answer oracle for tests and local runs.
#[derive(Debug, Default)]
pub struct StaticOracle {
    premium: HashSet<String>,
}

impl StaticOracle {
    /// Create an oracle that reports the given keys as premium and every
    /// other key as definitely non-premium.
    pub fn new<I, S>(premium: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            premium: premium.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl PremiumOracle for StaticOracle {
    async fn is_premium(&self, key: &str) -> Result<Option<bool>, OracleError> {
        Ok(Some(self.premium.contains(key)))
    }
}

/// Oracle whose every call fails, for degraded-path tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingOracle;

#[async_trait]
impl PremiumOracle for FailingOracle {
    async fn is_premium(&self, _key: &str) -> Result<Option<bool>, OracleError> {
        Err(OracleError("scripted oracle failure".to_string()))
    }
}
