//! Overlapping analysis frames
//!
//! Lazily slices a mono signal into fixed-length windows at offsets
//! 0, H, 2H, ... while `offset + L <= len`. The trailing partial window is
//! dropped — no zero-padding. Producing zero frames is not an error.

use super::downmix::MonoSignal;

/// Lazy iterator over overlapping frames of a mono signal.
///
/// Invariant (asserted at construction): `0 < hop <= frame_len`.
pub struct Frames<'a> {
    samples: &'a [f32],
    frame_len: usize,
    hop: usize,
    offset: usize,
}

/// Iterate frames of `frame_len` samples advancing by `hop`.
pub fn frames(signal: &MonoSignal, frame_len: usize, hop: usize) -> Frames<'_> {
    assert!(frame_len > 0, "frame length must be positive");
    assert!(hop > 0 && hop <= frame_len, "hop must be in 1..=frame_len");
    Frames {
        samples: &signal.samples,
        frame_len,
        hop,
        offset: 0,
    }
}

impl<'a> Frames<'a> {
    fn remaining(&self) -> usize {
        if self.offset + self.frame_len > self.samples.len() {
            0
        } else {
            (self.samples.len() - self.frame_len - self.offset) / self.hop + 1
        }
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a [f32];

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.offset.checked_add(self.frame_len)?;
        if end > self.samples.len() {
            return None;
        }
        let frame = &self.samples[self.offset..end];
        self.offset += self.hop;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Frames<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono(len: usize) -> MonoSignal {
        MonoSignal {
            samples: vec![0.0; len],
            sample_rate: 44100,
        }
    }

    #[test]
    fn frame_count_matches_formula() {
        // floor((S - L) / H) + 1 for S >= L
        for (s, l, h) in [
            (1024, 1024, 512),
            (1025, 1024, 512),
            (4096, 1024, 512),
            (44100, 1024, 512),
            (3000, 1000, 250),
        ] {
            let signal = mono(s);
            let expected = (s - l) / h + 1;
            assert_eq!(
                frames(&signal, l, h).count(),
                expected,
                "S={s} L={l} H={h}"
            );
            assert_eq!(frames(&signal, l, h).len(), expected);
        }
    }

    #[test]
    fn short_signal_yields_zero_frames() {
        let signal = mono(1023);
        assert_eq!(frames(&signal, 1024, 512).count(), 0);
        let empty = mono(0);
        assert_eq!(frames(&empty, 1024, 512).count(), 0);
    }

    #[test]
    fn frames_overlap_by_hop() {
        let signal = MonoSignal {
            samples: (0..8).map(|i| i as f32).collect(),
            sample_rate: 8,
        };
        let collected: Vec<&[f32]> = frames(&signal, 4, 2).collect();
        assert_eq!(collected.len(), 3);
        assert_eq!(collected[0], &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(collected[1], &[2.0, 3.0, 4.0, 5.0]);
        assert_eq!(collected[2], &[4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn iteration_is_restartable() {
        let signal = mono(4096);
        let first: usize = frames(&signal, 1024, 512).count();
        let second: usize = frames(&signal, 1024, 512).count();
        assert_eq!(first, second);
    }
}
