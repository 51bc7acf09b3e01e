//! End-to-end analysis pipeline tests
//!
//! Uses hound-generated in-memory WAV fixtures to exercise decoding,
//! downmixing, and the full bytes-to-summary pipeline.

use std::f64::consts::PI;
use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

use moodprint::analysis::{self, decoder, downmix, DecodeError, DecodeLimits};

const SAMPLE_RATE: u32 = 44100;

fn default_limits() -> DecodeLimits {
    DecodeLimits {
        max_bytes: 50 * 1024 * 1024,
        max_seconds: 600.0,
    }
}

/// Interleaved f32 WAV bytes.
fn wav_bytes(channels: Vec<Vec<f32>>, sample_rate: u32) -> Vec<u8> {
    let spec = WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
        let frames = channels[0].len();
        for i in 0..frames {
            for channel in &channels {
                writer.write_sample(channel[i]).unwrap();
            }
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

fn sine(freq: f64, amplitude: f32, seconds: f64) -> Vec<f32> {
    let len = (seconds * SAMPLE_RATE as f64) as usize;
    (0..len)
        .map(|i| amplitude * (2.0 * PI * freq * i as f64 / SAMPLE_RATE as f64).sin() as f32)
        .collect()
}

#[test]
fn zero_byte_input_fails_with_decode_error() {
    let result = analysis::analyze_track(Vec::new(), "empty.wav", default_limits());
    assert!(matches!(result, Err(DecodeError::UnrecognizedFormat(_))));
}

#[test]
fn stereo_wav_decodes_with_original_layout() {
    let left = sine(440.0, 0.5, 0.25);
    let right = sine(880.0, 0.5, 0.25);
    let expected_len = left.len();
    let bytes = wav_bytes(vec![left, right], SAMPLE_RATE);

    let signal = decoder::decode_bytes(bytes, "tone.wav", default_limits()).unwrap();
    assert_eq!(signal.channel_count(), 2);
    assert_eq!(signal.sample_rate, SAMPLE_RATE);
    assert_eq!(signal.len(), expected_len);

    // Downmix output length equals input length, single channel by definition.
    let mono = downmix::downmix(&signal);
    assert_eq!(mono.samples.len(), expected_len);
    assert_eq!(mono.sample_rate, SAMPLE_RATE);
}

#[test]
fn duration_limit_rejects_long_audio() {
    let bytes = wav_bytes(vec![sine(440.0, 0.5, 2.0)], SAMPLE_RATE);
    let result = decoder::decode_bytes(
        bytes,
        "long.wav",
        DecodeLimits {
            max_bytes: 50 * 1024 * 1024,
            max_seconds: 0.5,
        },
    );
    assert!(matches!(result, Err(DecodeError::TooLong { .. })));
}

#[test]
fn tonal_track_summary_has_plausible_features() {
    let bytes = wav_bytes(vec![sine(440.0, 0.9, 2.0)], SAMPLE_RATE);
    let summary = analysis::analyze_track(bytes, "a440.wav", default_limits()).unwrap();

    // RMS of a 0.9 sine is ~0.636.
    assert!(summary.rms > 0.5 && summary.rms < 0.7, "rms = {}", summary.rms);
    // ~20 zero crossings per 1024-sample frame at 440 Hz / 44.1 kHz.
    assert!(summary.zcr > 0.015 && summary.zcr < 0.025, "zcr = {}", summary.zcr);
    // Centroid near the tone, allowing for window leakage.
    assert!(
        summary.spectral_centroid > 300.0 && summary.spectral_centroid < 700.0,
        "centroid = {}",
        summary.spectral_centroid
    );
    // A pure tone is strongly non-flat.
    assert!(
        summary.spectral_flatness >= 0.0 && summary.spectral_flatness < 0.2,
        "flatness = {}",
        summary.spectral_flatness
    );
}

#[test]
fn silent_track_uses_no_signal_defaults() {
    let bytes = wav_bytes(vec![vec![0.0; SAMPLE_RATE as usize]], SAMPLE_RATE);
    let summary = analysis::analyze_track(bytes, "silence.wav", default_limits()).unwrap();

    assert_eq!(summary.rms, 0.0);
    assert_eq!(summary.zcr, 0.0);
    // All-NaN flatness/centroid aggregate to the defined 0.0 fallback,
    // never to NaN.
    assert_eq!(summary.spectral_flatness, 0.0);
    assert_eq!(summary.spectral_centroid, 0.0);
}

#[test]
fn sub_frame_track_yields_neutral_summary() {
    // 441 samples is shorter than one 1024-sample frame: zero frames, no error.
    let bytes = wav_bytes(vec![sine(440.0, 0.9, 0.01)], SAMPLE_RATE);
    let summary = analysis::analyze_track(bytes, "tiny.wav", default_limits()).unwrap();

    assert_eq!(summary.rms, 0.0);
    assert_eq!(summary.spectral_centroid, 0.0);
    assert_eq!(summary.mfcc_mean, 0.0);
}

#[test]
fn stereo_and_mono_of_same_content_agree() {
    let tone = sine(440.0, 0.8, 1.0);
    let mono_bytes = wav_bytes(vec![tone.clone()], SAMPLE_RATE);
    let stereo_bytes = wav_bytes(vec![tone.clone(), tone], SAMPLE_RATE);

    let mono = analysis::analyze_track(mono_bytes, "m.wav", default_limits()).unwrap();
    let stereo = analysis::analyze_track(stereo_bytes, "s.wav", default_limits()).unwrap();

    // Identical channels downmix to the same mono signal.
    assert!((mono.rms - stereo.rms).abs() < 1e-6);
    assert!((mono.spectral_centroid - stereo.spectral_centroid).abs() < 1e-3);
    assert!((mono.zcr - stereo.zcr).abs() < 1e-9);
}
