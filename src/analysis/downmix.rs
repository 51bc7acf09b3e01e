//! Mono downmixing
//!
//! Averages all channels of a [`Signal`] into a single mono signal. Never
//! fails: the decoder guarantees a positive channel count.

use super::decoder::Signal;

/// Single-channel PCM signal derived from a [`Signal`].
#[derive(Debug)]
pub struct MonoSignal {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Per-sample arithmetic mean across channels. A single-channel signal is a
/// plain copy.
pub fn downmix(signal: &Signal) -> MonoSignal {
    let len = signal.len();
    let channel_count = signal.channel_count();

    if channel_count == 1 {
        return MonoSignal {
            samples: signal.channels[0].clone(),
            sample_rate: signal.sample_rate,
        };
    }

    let scale = 1.0 / channel_count as f32;
    let mut samples = vec![0.0f32; len];
    for channel in &signal.channels {
        for (out, &sample) in samples.iter_mut().zip(channel.iter()) {
            *out += sample * scale;
        }
    }

    MonoSignal {
        samples,
        sample_rate: signal.sample_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_preserves_length() {
        let signal = Signal {
            channels: vec![vec![0.5; 441], vec![-0.5; 441]],
            sample_rate: 44100,
        };
        let mono = downmix(&signal);
        assert_eq!(mono.samples.len(), 441);
        assert_eq!(mono.sample_rate, 44100);
    }

    #[test]
    fn downmix_averages_channels() {
        let signal = Signal {
            channels: vec![vec![1.0, 0.0, -1.0], vec![0.0, 1.0, -1.0]],
            sample_rate: 8000,
        };
        let mono = downmix(&signal);
        assert_eq!(mono.samples, vec![0.5, 0.5, -1.0]);
    }

    #[test]
    fn mono_input_is_copied_verbatim() {
        let signal = Signal {
            channels: vec![vec![0.25, -0.25, 0.75]],
            sample_rate: 22050,
        };
        let mono = downmix(&signal);
        assert_eq!(mono.samples, signal.channels[0]);
    }
}
