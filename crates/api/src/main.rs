//! HTTP API for the Bosun reply orchestrator.
//!
//! Exposes a single generation endpoint plus a health check. Provider
//! failures never surface here; a non-2xx status is reserved for malformed
//! requests.

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use orchestrator::ReplyOrchestrator;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Build the provider registry and orchestrator once at startup
    let orchestrator = ReplyOrchestrator::from_env();
    let state = AppState::new(Arc::new(orchestrator));

    // Build router
    let app = routes::router().with_state(state);

    // Start server
    info!(addr = %config.addr, "Reply API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
