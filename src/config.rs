//! Configuration resolution for moodprint
//!
//! Every knob resolves Environment → documented default. The classification
//! endpoint address and model identifier are configuration, never hardcoded
//! at call sites.

use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to (`MOODPRINT_BIND`).
    pub bind_addr: String,
    /// Base URL of the Ollama-compatible generation endpoint
    /// (`OLLAMA_BASE_URL`).
    pub ollama_base_url: String,
    /// Model identifier passed to the generation endpoint (`OLLAMA_MODEL`).
    pub ollama_model: String,
    /// Upper bound on one classification call, including connect time
    /// (`MOODPRINT_REQUEST_TIMEOUT_SECONDS`).
    pub request_timeout: Duration,
    /// Largest accepted audio upload in bytes (`MOODPRINT_MAX_AUDIO_BYTES`).
    pub max_audio_bytes: usize,
    /// Longest accepted decoded duration in seconds
    /// (`MOODPRINT_MAX_AUDIO_SECONDS`).
    pub max_audio_seconds: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5725".to_string(),
            ollama_base_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3.1".to_string(),
            request_timeout: Duration::from_secs(120),
            max_audio_bytes: 50 * 1024 * 1024,
            max_audio_seconds: 600.0,
        }
    }
}

impl Config {
    /// Resolve configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env_string("MOODPRINT_BIND", defaults.bind_addr),
            ollama_base_url: env_string("OLLAMA_BASE_URL", defaults.ollama_base_url),
            ollama_model: env_string("OLLAMA_MODEL", defaults.ollama_model),
            request_timeout: Duration::from_secs(env_parse(
                "MOODPRINT_REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout.as_secs(),
            )),
            max_audio_bytes: env_parse("MOODPRINT_MAX_AUDIO_BYTES", defaults.max_audio_bytes),
            max_audio_seconds: env_parse("MOODPRINT_MAX_AUDIO_SECONDS", defaults.max_audio_seconds),
        }
    }
}

fn env_string(key: &str, default: String) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, value = %raw, "Unparseable environment override, using default");
                default
            }
        },
        Err(_) => default,
    }
}
