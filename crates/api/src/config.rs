//! Configuration for the API binary.

use std::env;
use std::net::SocketAddr;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP server on.
    pub addr: SocketAddr,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `BIND_ADDR` - listen address (default: 0.0.0.0:8080)
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()?;

        Ok(Self { addr })
    }
}
