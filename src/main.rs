//! moodprint service binary
//!
//! Decodes uploaded audio, extracts spectral/timbral features, and asks a
//! configured Ollama-compatible endpoint for a genre/mood judgment.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use moodprint::config::Config;
use moodprint::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();

    info!("Starting moodprint (audio classification) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!(
        endpoint = %config.ollama_base_url,
        model = %config.ollama_model,
        "Classification endpoint configured"
    );

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config)?;
    let shutdown = state.shutdown.clone();

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on http://{bind_addr}");
    info!("Health check: http://{bind_addr}/health");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested, cancelling in-flight classification calls");
            shutdown.cancel();
        })
        .await?;

    Ok(())
}
