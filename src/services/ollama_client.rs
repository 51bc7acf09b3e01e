//! Ollama generation client
//!
//! Builds the schema-constrained classification prompt and issues exactly one
//! POST to the configured `/api/generate` endpoint. No retry: invoking a
//! generative model is expensive and correctness does not depend on retrying.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::models::{ClassificationRequest, Summary};

const GENERATE_PATH: &str = "/api/generate";
/// Low-randomness decoding to maximize determinism of the judgment.
const TEMPERATURE: f64 = 0.1;
/// Bounded context size for the generation call.
const NUM_CTX: u32 = 8192;

const SYSTEM_PROMPT: &str = "You are a strict JSON music-genre classifier.\n\n\
    You will receive audio features computed from a track. Decide the genre from this shortlist: \
    rock, pop, hip hop, jazz, classical, electronic, metal, country, folk, blues, reggae, \
    r&b/soul, latin, bhangra, bollywood/filmi, indian classical, devotional, lo-fi, other. \
    Return a single JSON object with EXACTLY these keys: \
    {\"genre\": string, \"subgenres\": string[], \"confidence\": number, \"mood\": string[], \"keyFactors\": string[], \"reasoning\": string}. \
    - \"confidence\" is 0..1. \
    - Keep \"reasoning\" to <= 3 short sentences.";

/// Classification endpoint errors. Terminal per run.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Endpoint unreachable or transport-level failure
    #[error("Classification endpoint unreachable: {0}")]
    Network(String),

    /// Endpoint returned a non-success status; body kept for diagnostics
    #[error("Classification endpoint error {status}: {body}")]
    Api { status: u16, body: String },

    /// Endpoint answered 200 but not with the expected envelope
    #[error("Malformed classification endpoint response: {0}")]
    InvalidResponse(String),

    /// The call exceeded the configured timeout
    #[error("Classification request timed out after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the run
    #[error("Classification request cancelled")]
    Cancelled,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    /// Asks the service to constrain output to valid JSON.
    format: &'a str,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f64,
    num_ctx: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Serialized into the prompt after the system instruction.
#[derive(Debug, Serialize)]
struct PromptInput<'a> {
    filename: &'a str,
    features: &'a Summary,
}

/// Client for the Ollama-compatible text-generation endpoint.
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout,
        })
    }

    /// Build the single prompt: fixed system instruction, then the request's
    /// filename and summary as structured data.
    pub fn build_prompt(request: &ClassificationRequest) -> String {
        let input = PromptInput {
            filename: &request.filename,
            features: &request.summary,
        };
        // PromptInput serialization cannot fail: plain strings and floats.
        let input_json = serde_json::to_string(&input).unwrap_or_default();
        format!("{SYSTEM_PROMPT}\n\nINPUT:\n{input_json}")
    }

    /// Issue one classification call and return the raw generated text.
    ///
    /// The network call is the pipeline's only blocking point; it is raced
    /// against the caller-supplied cancellation token and bounded by the
    /// configured timeout.
    pub async fn classify(
        &self,
        request: &ClassificationRequest,
        cancel: &CancellationToken,
    ) -> Result<String, ServiceError> {
        let prompt = Self::build_prompt(request);
        let payload = GenerateRequest {
            model: &self.model,
            prompt: &prompt,
            stream: false,
            format: "json",
            options: GenerateOptions {
                temperature: TEMPERATURE,
                num_ctx: NUM_CTX,
            },
        };
        let url = format!("{}{}", self.base_url, GENERATE_PATH);

        tracing::debug!(
            url = %url,
            model = %self.model,
            filename = %request.filename,
            "Issuing classification request"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ServiceError::Cancelled),
            result = self.send(&url, &payload) => result,
        }
    }

    async fn send(
        &self,
        url: &str,
        payload: &GenerateRequest<'_>,
    ) -> Result<String, ServiceError> {
        let response = self
            .http
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ServiceError::Timeout(self.timeout)
                } else {
                    ServiceError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            response_len = envelope.response.len(),
            "Classification response received"
        );

        Ok(envelope.response)
    }
}
