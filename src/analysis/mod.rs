//! Audio analysis pipeline
//!
//! Strictly forward dataflow for one track:
//! decode → downmix → frames → per-frame features → aggregate summary.
//! Every intermediate value is owned by the single run that created it.

pub mod aggregate;
pub mod decoder;
pub mod downmix;
pub mod features;
pub mod frames;

pub use decoder::{DecodeError, DecodeLimits, Signal};
pub use downmix::MonoSignal;
pub use features::{FeatureExtractor, FeatureVector};

use crate::models::Summary;

/// Default analysis window length in samples.
pub const DEFAULT_FRAME_LEN: usize = 1024;
/// Default hop between window start offsets.
pub const DEFAULT_HOP_LEN: usize = 512;

/// Run the full feature pipeline on one encoded audio buffer.
///
/// CPU-bound and synchronous; callers on an async runtime should wrap this in
/// `spawn_blocking`. A signal shorter than one frame yields zero frames and a
/// neutral all-zero summary — that is not an error.
pub fn analyze_track(
    bytes: Vec<u8>,
    filename: &str,
    limits: DecodeLimits,
) -> Result<Summary, DecodeError> {
    let signal = decoder::decode_bytes(bytes, filename, limits)?;
    let mono = downmix::downmix(&signal);
    drop(signal);

    let extractor = FeatureExtractor::new(DEFAULT_FRAME_LEN, mono.sample_rate);
    let features: Vec<FeatureVector> = frames::frames(&mono, DEFAULT_FRAME_LEN, DEFAULT_HOP_LEN)
        .map(|frame| extractor.extract(frame))
        .collect();

    tracing::debug!(
        filename,
        sample_rate = mono.sample_rate,
        frames = features.len(),
        "Feature extraction complete"
    );

    Ok(aggregate::summarize(&features))
}
