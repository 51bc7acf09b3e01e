//! Audio decoding
//!
//! Decodes an in-memory audio byte buffer (MP3, FLAC, WAV, AAC, OGG, ... via
//! symphonia) into planar f32 PCM. The probe result and codec decoder live on
//! the stack of one call and are dropped on every exit path — there is no
//! process-wide decode context.

use std::io::Cursor;
use std::path::Path;

use symphonia::core::audio::{AudioBufferRef, Signal as AudioBufferSignal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

/// Decoding failures. Deterministic and terminal for the run — no retries.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Byte buffer is not a recognizable audio container
    #[error("Unrecognized or corrupt audio data: {0}")]
    UnrecognizedFormat(String),

    /// Container recognized but no decodable audio track inside
    #[error("No decodable audio track found")]
    NoAudioTrack,

    /// Track is missing a required stream parameter
    #[error("Audio stream is missing {0}")]
    MissingParameter(&'static str),

    /// Input exceeds the configured byte-size limit
    #[error("Audio file too large: {actual} bytes (limit {limit})")]
    TooLarge { actual: usize, limit: usize },

    /// Decoded audio exceeds the configured duration limit
    #[error("Audio too long: {actual:.1}s (limit {limit:.1}s)")]
    TooLong { actual: f64, limit: f64 },

    /// Stream ended mid-packet or a packet failed to decode
    #[error("Corrupt or truncated audio stream: {0}")]
    CorruptStream(String),
}

/// Decoded PCM signal: planar per-channel samples at a known rate.
///
/// Postcondition of [`decode_bytes`]: sample rate and channel count are both
/// positive. Immutable once created; owned by a single pipeline run.
#[derive(Debug)]
pub struct Signal {
    /// One sample buffer per channel, equal lengths.
    pub channels: Vec<Vec<f32>>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Signal {
    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.channels.iter().map(Vec::len).min().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decoded duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }
}

/// Resource limits enforced during decoding.
#[derive(Debug, Clone, Copy)]
pub struct DecodeLimits {
    pub max_bytes: usize,
    pub max_seconds: f64,
}

/// Decode an audio byte buffer into a planar f32 [`Signal`].
///
/// `filename` is advisory; its extension seeds the format probe hint.
pub fn decode_bytes(
    bytes: Vec<u8>,
    filename: &str,
    limits: DecodeLimits,
) -> Result<Signal, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::UnrecognizedFormat("empty input".to_string()));
    }
    if bytes.len() > limits.max_bytes {
        return Err(DecodeError::TooLarge {
            actual: bytes.len(),
            limit: limits.max_bytes,
        });
    }

    tracing::debug!(filename, size = bytes.len(), "Decoding audio buffer");

    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = Path::new(filename).extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| DecodeError::UnrecognizedFormat(e.to_string()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoAudioTrack)?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(DecodeError::MissingParameter("sample rate"))?;
    let channel_count = track
        .codec_params
        .channels
        .ok_or(DecodeError::MissingParameter("channel layout"))?
        .count();
    if sample_rate == 0 || channel_count == 0 {
        return Err(DecodeError::MissingParameter("a positive stream layout"));
    }

    // Declared length, when the container knows it, lets us reject early.
    if let Some(n_frames) = track.codec_params.n_frames {
        let declared = n_frames as f64 / sample_rate as f64;
        if declared > limits.max_seconds {
            return Err(DecodeError::TooLong {
                actual: declared,
                limit: limits.max_seconds,
            });
        }
    }

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::UnrecognizedFormat(e.to_string()))?;

    let mut channels: Vec<Vec<f32>> = vec![Vec::new(); channel_count];

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(DecodeError::CorruptStream(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| DecodeError::CorruptStream(e.to_string()))?;

        extend_planar(&decoded, &mut channels);

        let seconds = channels[0].len() as f64 / sample_rate as f64;
        if seconds > limits.max_seconds {
            return Err(DecodeError::TooLong {
                actual: seconds,
                limit: limits.max_seconds,
            });
        }
    }

    let signal = Signal {
        channels,
        sample_rate,
    };

    tracing::debug!(
        filename,
        sample_rate,
        channels = signal.channel_count(),
        samples = signal.len(),
        duration_seconds = format!("{:.2}", signal.duration_seconds()),
        "Audio decoding complete"
    );

    Ok(signal)
}

/// Append one decoded buffer to the planar accumulator, converting every
/// source sample format to f32 in [-1.0, 1.0].
fn extend_planar(decoded: &AudioBufferRef, channels: &mut [Vec<f32>]) {
    macro_rules! extend {
        ($buf:expr) => {{
            let buf = $buf;
            let available = buf.spec().channels.count().min(channels.len());
            for ch in 0..available {
                channels[ch].extend(buf.chan(ch).iter().map(|&s| f32::from_sample(s)));
            }
        }};
    }

    match decoded {
        AudioBufferRef::U8(buf) => extend!(buf),
        AudioBufferRef::U16(buf) => extend!(buf),
        AudioBufferRef::U24(buf) => extend!(buf),
        AudioBufferRef::U32(buf) => extend!(buf),
        AudioBufferRef::S8(buf) => extend!(buf),
        AudioBufferRef::S16(buf) => extend!(buf),
        AudioBufferRef::S24(buf) => extend!(buf),
        AudioBufferRef::S32(buf) => extend!(buf),
        AudioBufferRef::F32(buf) => extend!(buf),
        AudioBufferRef::F64(buf) => extend!(buf),
    }
}
