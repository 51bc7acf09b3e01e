//! moodprint — audio feature extraction and genre/mood classification service
//!
//! Ingests a raw audio file, computes a compact numeric fingerprint of its
//! timbral and spectral characteristics, and submits that fingerprint to an
//! Ollama-compatible text-generation endpoint for a structured genre/mood
//! judgment.

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use std::sync::Arc;
use std::time::Instant;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::services::{OllamaClient, ServiceError};

/// Application state shared across handlers
///
/// Holds only immutable shared pieces; every classification run owns its own
/// data, so concurrent runs need no locking.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub classifier: Arc<OllamaClient>,
    /// Service-wide cancellation; in-flight classification calls run on child
    /// tokens of this.
    pub shutdown: CancellationToken,
    /// Startup instant for uptime reporting
    pub startup_time: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ServiceError> {
        let classifier = OllamaClient::new(
            &config.ollama_base_url,
            &config.ollama_model,
            config.request_timeout,
        )?;

        Ok(Self {
            config: Arc::new(config),
            classifier: Arc::new(classifier),
            shutdown: CancellationToken::new(),
            startup_time: Instant::now(),
        })
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_audio_bytes;

    Router::new()
        .merge(api::classify_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
