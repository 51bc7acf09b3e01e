//! Feature aggregation
//!
//! Reduces the per-frame feature sequence to one [`Summary`] by arithmetic
//! mean, excluding non-finite frame values per feature. A feature whose every
//! frame value was excluded aggregates to 0.0 — callers treat that as a
//! "no signal" default, not a measurement.

use super::features::FeatureVector;
use crate::models::Summary;

/// Aggregate the full (possibly empty) feature sequence of one track.
///
/// `mfcc_mean` first collapses each frame's MFCC vector to its own mean and
/// then averages that scalar across frames. This mean-of-means reduction is
/// part of the wire contract with the classification endpoint and must not be
/// replaced by a per-coefficient vector mean.
pub fn summarize(features: &[FeatureVector]) -> Summary {
    Summary {
        mfcc_mean: finite_mean(features.iter().map(|f| mean(&f.mfcc))),
        spectral_centroid: finite_mean(features.iter().map(|f| f.spectral_centroid)),
        spectral_flatness: finite_mean(features.iter().map(|f| f.spectral_flatness)),
        zcr: finite_mean(features.iter().map(|f| f.zcr)),
        rms: finite_mean(features.iter().map(|f| f.rms)),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean over the finite values of the iterator; 0.0 when none remain.
fn finite_mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .filter(|v| v.is_finite())
        .fold((0.0f64, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
