//! Per-frame feature extraction
//!
//! Computes the six feature families for one analysis frame: MFCC, chroma,
//! spectral centroid, spectral flatness, zero-crossing rate, and RMS energy.
//!
//! Spectral features are computed on the Hann-windowed frame (windowing keeps
//! centroid/flatness/chroma estimates stable against edge leakage); ZCR and
//! RMS are computed on the raw frame. Degenerate (silent) frames mark centroid
//! and flatness as NaN so the aggregator can exclude them — they are never
//! coerced to zero here.

use std::f64::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Retained MFCC coefficient count.
pub const MFCC_COEFFS: usize = 13;
/// Triangular filters in the mel filterbank.
pub const MEL_FILTERS: usize = 26;
/// Pitch classes in the chroma vector.
pub const PITCH_CLASSES: usize = 12;

/// Features of a single analysis frame.
#[derive(Debug, Clone)]
pub struct FeatureVector {
    /// First [`MFCC_COEFFS`] mel-frequency cepstral coefficients.
    pub mfcc: Vec<f64>,
    /// Spectral energy folded into the 12 equal-tempered pitch classes
    /// (index 0 = C).
    pub chroma: [f64; PITCH_CLASSES],
    /// Energy-weighted mean frequency in Hz; NaN for a silent frame.
    pub spectral_centroid: f64,
    /// Geometric/arithmetic magnitude mean ratio in [0, 1]; NaN for a silent
    /// frame.
    pub spectral_flatness: f64,
    /// Sign changes per sample over the raw frame.
    pub zcr: f64,
    /// Root-mean-square energy of the raw frame.
    pub rms: f64,
}

/// Frame-level feature extractor.
///
/// Holds the planned FFT, Hann window, mel filterbank, and chroma bin mapping
/// for one (frame length, sample rate) pair. Stateless across frames, so one
/// extractor can serve a whole track — or be shared across worker threads,
/// since extraction takes `&self`.
pub struct FeatureExtractor {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    mel: MelFilterbank,
    /// Pitch class per spectrum bin; None for bins below the audible floor.
    bin_pitch_class: Vec<Option<usize>>,
    bin_hz: f64,
    frame_len: usize,
}

impl FeatureExtractor {
    pub fn new(frame_len: usize, sample_rate: u32) -> Self {
        assert!(frame_len > 1, "frame length must exceed 1");
        assert!(sample_rate > 0, "sample rate must be positive");

        let fft = FftPlanner::new().plan_fft_forward(frame_len);

        // Periodic Hann window.
        let window = (0..frame_len)
            .map(|i| {
                let phase = 2.0 * PI * i as f64 / frame_len as f64;
                (0.5 * (1.0 - phase.cos())) as f32
            })
            .collect();

        let bin_hz = sample_rate as f64 / frame_len as f64;
        let spectrum_bins = frame_len / 2 + 1;

        let bin_pitch_class = (0..spectrum_bins)
            .map(|bin| {
                let freq = bin as f64 * bin_hz;
                if freq < 20.0 {
                    return None;
                }
                // Equal-tempered mapping, A4 = 440 Hz = MIDI 69.
                let midi = 69.0 + 12.0 * (freq / 440.0).log2();
                let pc = (midi.round() as i64).rem_euclid(PITCH_CLASSES as i64);
                Some(pc as usize)
            })
            .collect();

        Self {
            fft,
            window,
            mel: MelFilterbank::new(frame_len, sample_rate),
            bin_pitch_class,
            bin_hz,
            frame_len,
        }
    }

    /// Extract all six feature families from one frame.
    ///
    /// Never fails on a well-formed frame; `frame.len()` must equal the
    /// extractor's frame length.
    pub fn extract(&self, frame: &[f32]) -> FeatureVector {
        assert_eq!(frame.len(), self.frame_len, "frame length mismatch");

        // Time-domain features use the raw, unwindowed samples.
        let zcr = zero_crossing_rate(frame);
        let rms = root_mean_square(frame);

        // Windowed magnitude spectrum over bins 0..=N/2.
        let mut buffer: Vec<Complex<f32>> = frame
            .iter()
            .zip(&self.window)
            .map(|(&sample, &w)| Complex::new(sample * w, 0.0))
            .collect();
        self.fft.process(&mut buffer);

        let spectrum_bins = self.frame_len / 2 + 1;
        let magnitudes: Vec<f64> = buffer[..spectrum_bins]
            .iter()
            .map(|c| c.norm() as f64)
            .collect();

        let spectral_centroid = spectral_centroid(&magnitudes, self.bin_hz);
        let spectral_flatness = spectral_flatness(&magnitudes);

        let power: Vec<f64> = magnitudes.iter().map(|m| m * m).collect();

        let mel_energies = self.mel.apply(&power);
        let log_energies: Vec<f64> = mel_energies.iter().map(|e| (e + 1e-10).ln()).collect();
        let mfcc = dct_ii(&log_energies, MFCC_COEFFS);

        let mut chroma = [0.0f64; PITCH_CLASSES];
        for (bin, &p) in power.iter().enumerate() {
            if let Some(pc) = self.bin_pitch_class[bin] {
                chroma[pc] += p;
            }
        }

        FeatureVector {
            mfcc,
            chroma,
            spectral_centroid,
            spectral_flatness,
            zcr,
            rms,
        }
    }
}

/// Sign changes between consecutive raw samples, normalized by frame length.
fn zero_crossing_rate(frame: &[f32]) -> f64 {
    if frame.is_empty() {
        return 0.0;
    }
    let crossings = frame
        .windows(2)
        .filter(|pair| (pair[0] as f64) * (pair[1] as f64) < 0.0)
        .count();
    crossings as f64 / frame.len() as f64
}

fn root_mean_square(frame: &[f32]) -> f64 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = frame.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / frame.len() as f64).sqrt()
}

/// Energy-weighted mean bin frequency in Hz. NaN when the spectrum carries no
/// energy (the aggregator excludes non-finite values).
fn spectral_centroid(magnitudes: &[f64], bin_hz: f64) -> f64 {
    let total: f64 = magnitudes.iter().sum();
    if total <= 0.0 {
        return f64::NAN;
    }
    let weighted: f64 = magnitudes
        .iter()
        .enumerate()
        .map(|(bin, &m)| bin as f64 * bin_hz * m)
        .sum();
    weighted / total
}

/// Geometric mean over arithmetic mean of the magnitude spectrum. NaN when
/// the arithmetic mean is 0 — a silent frame is flagged invalid rather than
/// dividing by zero.
fn spectral_flatness(magnitudes: &[f64]) -> f64 {
    let arithmetic = magnitudes.iter().sum::<f64>() / magnitudes.len() as f64;
    if arithmetic <= 0.0 {
        return f64::NAN;
    }
    // exp(mean(ln m)); any zero magnitude drives the geometric mean to 0.
    let log_mean = magnitudes.iter().map(|&m| m.ln()).sum::<f64>() / magnitudes.len() as f64;
    log_mean.exp() / arithmetic
}

/// DCT-II of `input`, returning the first `count` coefficients.
fn dct_ii(input: &[f64], count: usize) -> Vec<f64> {
    let n = input.len() as f64;
    (0..count)
        .map(|k| {
            input
                .iter()
                .enumerate()
                .map(|(i, &v)| v * (PI * k as f64 * (i as f64 + 0.5) / n).cos())
                .sum()
        })
        .collect()
}

/// Triangular mel-spaced filterbank over the power spectrum, spanning
/// 0 Hz to Nyquist.
struct MelFilterbank {
    filters: Vec<MelFilter>,
}

struct MelFilter {
    first_bin: usize,
    weights: Vec<f64>,
}

impl MelFilterbank {
    fn new(frame_len: usize, sample_rate: u32) -> Self {
        let bin_hz = sample_rate as f64 / frame_len as f64;
        let num_bins = frame_len / 2 + 1;

        let mel_high = hz_to_mel(sample_rate as f64 / 2.0);
        // MEL_FILTERS filters need MEL_FILTERS + 2 edge points.
        let edges: Vec<f64> = (0..MEL_FILTERS + 2)
            .map(|i| mel_to_hz(mel_high * i as f64 / (MEL_FILTERS + 1) as f64))
            .collect();

        let filters = (0..MEL_FILTERS)
            .map(|f| {
                let (lower, center, upper) = (edges[f], edges[f + 1], edges[f + 2]);
                let first_bin = (lower / bin_hz).ceil() as usize;
                let last_bin = ((upper / bin_hz).floor() as usize).min(num_bins.saturating_sub(1));

                let weights = (first_bin..=last_bin)
                    .map(|bin| {
                        let freq = bin as f64 * bin_hz;
                        let w = if freq < center {
                            if center - lower > f64::EPSILON {
                                (freq - lower) / (center - lower)
                            } else {
                                1.0
                            }
                        } else if upper - center > f64::EPSILON {
                            (upper - freq) / (upper - center)
                        } else {
                            1.0
                        };
                        w.max(0.0)
                    })
                    .collect();

                MelFilter { first_bin, weights }
            })
            .collect();

        Self { filters }
    }

    /// Filterbank energies for one power spectrum.
    fn apply(&self, power: &[f64]) -> Vec<f64> {
        self.filters
            .iter()
            .map(|filter| {
                filter
                    .weights
                    .iter()
                    .enumerate()
                    .filter_map(|(i, &w)| power.get(filter.first_bin + i).map(|&p| p * w))
                    .sum()
            })
            .collect()
    }
}

fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0f64.powf(mel / 2595.0) - 1.0)
}
