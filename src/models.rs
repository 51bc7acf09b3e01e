//! Data model for the classification pipeline
//!
//! Wire field names are camelCase (`mfccMean`, `keyFactors`, ...) to preserve
//! the published API contract between the service and its UI.

use serde::{Deserialize, Serialize};

/// Aggregate spectral/timbral summary of one track.
///
/// Each field is the mean of the corresponding per-frame feature across all
/// analysis frames, with non-finite frame values excluded. A field is 0.0 when
/// every frame value was excluded (zero frames, or an all-silent signal) —
/// that is a "no signal" default, not a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Mean over frames of each frame's own MFCC-vector mean (a mean of
    /// means — 13 coefficients collapse to one scalar per frame first).
    pub mfcc_mean: f64,
    /// Mean spectral centroid in Hz (perceived brightness).
    pub spectral_centroid: f64,
    /// Mean spectral flatness in [0, 1] (noise-like vs. tonal).
    pub spectral_flatness: f64,
    /// Mean zero-crossing rate, normalized per frame length.
    pub zcr: f64,
    /// Mean root-mean-square energy.
    pub rms: f64,
}

/// One classification request: advisory filename plus the track summary.
///
/// Immutable; constructed once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub filename: String,
    pub summary: Summary,
}

/// Well-formed judgment returned by the classification endpoint.
///
/// `genre` is drawn from a closed shortlist by instruction, but not enforced
/// structurally. `confidence` is requested as 0..1 but passed through
/// unclamped — out-of-range values are the caller's to interpret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub genre: String,
    #[serde(default)]
    pub subgenres: Vec<String>,
    pub confidence: f64,
    #[serde(default)]
    pub mood: Vec<String>,
    #[serde(default)]
    pub key_factors: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
}

/// Outcome of validating the raw classification text.
///
/// `Unparsed` is a degraded-but-successful outcome: generative responses
/// occasionally violate the requested schema, and the raw text is returned
/// for diagnostics instead of failing the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClassificationOutcome {
    Classified(ClassificationResult),
    Unparsed { raw: String },
}
