//! Classification API handlers
//!
//! `POST /api/classify` — classify a precomputed summary.
//! `POST /api/analyze`  — run the full pipeline on raw audio bytes.
//!
//! A schema-invalid classification response is returned as
//! `200 {ok: true, result: {raw}}`; only decode/service failures are errors.

use axum::{
    body::Bytes,
    extract::{Query, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    analysis::{self, DecodeLimits},
    error::{ApiError, ApiResult},
    models::{ClassificationOutcome, ClassificationRequest, Summary},
    services::parse_classification,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub summary: Option<Summary>,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeParams {
    #[serde(default)]
    pub filename: Option<String>,
}

/// POST /api/classify
///
/// Body `{summary, filename}`. 400 when the summary is missing, 500 on
/// service failure, 200 otherwise.
pub async fn classify(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> ApiResult<Json<Value>> {
    let summary = request
        .summary
        .ok_or_else(|| ApiError::BadRequest("Missing summary".to_string()))?;
    let filename = request.filename.unwrap_or_default();

    let outcome = classify_summary(&state, filename, summary).await?;
    Ok(Json(json!({ "ok": true, "result": outcome })))
}

/// POST /api/analyze?filename=...
///
/// Raw audio bytes in the body. Decodes and extracts features on a blocking
/// task, then classifies the resulting summary.
pub async fn analyze(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeParams>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let filename = params.filename.unwrap_or_else(|| "upload".to_string());
    let limits = DecodeLimits {
        max_bytes: state.config.max_audio_bytes,
        max_seconds: state.config.max_audio_seconds,
    };

    tracing::info!(filename = %filename, size = body.len(), "Analyzing uploaded audio");

    let bytes = body.to_vec();
    let task_filename = filename.clone();
    let summary = tokio::task::spawn_blocking(move || {
        analysis::analyze_track(bytes, &task_filename, limits)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Analysis task failed: {e}")))??;

    let outcome = classify_summary(&state, filename, summary).await?;
    Ok(Json(json!({ "ok": true, "result": outcome, "summary": summary })))
}

async fn classify_summary(
    state: &AppState,
    filename: String,
    summary: Summary,
) -> Result<ClassificationOutcome, ApiError> {
    let request = ClassificationRequest { filename, summary };
    // Child of the service-wide token: shutdown cancels in-flight calls.
    let cancel = state.shutdown.child_token();
    let raw = state.classifier.classify(&request, &cancel).await?;
    Ok(parse_classification(&raw))
}

/// Build classification routes
pub fn classify_routes() -> Router<AppState> {
    Router::new()
        .route("/api/classify", post(classify))
        .route("/api/analyze", post(analyze))
}
