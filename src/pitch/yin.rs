//! YIN fundamental-frequency tracker: the default [`PitchTracker`].
//!
//! ## Algorithm
//!
//! For each centred frame:
//!
//! 1. Difference function `d(τ) = Σ (x[j] − x[j+τ])²` over the lag range
//!    `[sr / fmax, sr / fmin]`.
//! 2. Cumulative-mean normalisation `d'(τ) = d(τ) · τ / Σ_{k≤τ} d(k)`.
//! 3. The first lag whose `d'` dips below `threshold` is followed down to
//!    its local minimum.
//! 4. Parabolic interpolation refines the lag; `f0 = sr / τ`.
//!
//! Frames without a dip (noise, silence) are reported as unvoiced.

use crate::config::PitchConfig;
use crate::pitch::framing::{fill_centered, frame_count, frame_rms};
use crate::pitch::track::{FrameTrack, PitchError, PitchTracker};

// ---------------------------------------------------------------------------
// YinTracker
// ---------------------------------------------------------------------------

/// Frame-by-frame YIN pitch estimator.
///
/// # Example
///
/// ```rust
/// use tts2sv::pitch::{PitchTracker, YinTracker};
///
/// let sr = 16_000;
/// let tone: Vec<f32> = (0..sr)
///     .map(|i| (2.0 * std::f32::consts::PI * 220.0 * i as f32 / sr as f32).sin() * 0.5)
///     .collect();
///
/// let track = YinTracker::default().track(&tone, sr as u32).unwrap();
/// let mid = track.frequencies()[track.len() / 2].unwrap();
/// assert!((mid - 220.0).abs() < 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct YinTracker {
    frame_length: usize,
    hop_length: usize,
    fmin_hz: f32,
    fmax_hz: f32,
    threshold: f32,
}

impl Default for YinTracker {
    fn default() -> Self {
        Self::from_config(&PitchConfig::default())
    }
}

impl YinTracker {
    /// Build a tracker from the `[pitch]` settings section.
    pub fn from_config(config: &PitchConfig) -> Self {
        Self {
            frame_length: config.frame_length,
            hop_length: config.hop_length,
            fmin_hz: config.fmin_hz,
            fmax_hz: config.fmax_hz,
            threshold: config.threshold,
        }
    }

    /// Hop size in samples.
    pub fn hop_length(&self) -> usize {
        self.hop_length
    }

    /// Inclusive lag range `(tau_min, tau_max)` in samples for `sample_rate`.
    fn lag_range(&self, sample_rate: u32) -> Result<(usize, usize), PitchError> {
        if sample_rate == 0 {
            return Err(PitchError::ZeroSampleRate);
        }
        if self.hop_length == 0 || self.frame_length == 0 {
            return Err(PitchError::InvalidConfig(
                "frame_length and hop_length must be > 0".into(),
            ));
        }
        if !(self.fmin_hz > 0.0 && self.fmin_hz < self.fmax_hz) {
            return Err(PitchError::InvalidConfig(format!(
                "need 0 < fmin < fmax (got {} – {} Hz)",
                self.fmin_hz, self.fmax_hz
            )));
        }

        let sr = sample_rate as f32;
        let tau_min = ((sr / self.fmax_hz).floor() as usize).max(2);
        let tau_max = (sr / self.fmin_hz).ceil() as usize;
        if tau_min >= tau_max {
            return Err(PitchError::InvalidConfig(format!(
                "{} – {} Hz leaves no lag range at {sample_rate} Hz",
                self.fmin_hz, self.fmax_hz
            )));
        }
        Ok((tau_min, tau_max))
    }

    /// Analysis window for a lag range: the configured length, grown to the
    /// next power of two when it cannot hold two periods of `fmin`.
    fn frame_length_for(&self, tau_max: usize) -> usize {
        let needed = 2 * tau_max;
        if self.frame_length >= needed {
            self.frame_length
        } else {
            let grown = needed.next_power_of_two();
            log::debug!(
                "yin: frame of {} samples grown to {grown} for lag {tau_max}",
                self.frame_length
            );
            grown
        }
    }

    /// Estimate f0 for one frame, reusing `diff` as scratch space.
    fn estimate(
        &self,
        frame: &[f32],
        tau_min: usize,
        tau_max: usize,
        sample_rate: u32,
        diff: &mut [f32],
    ) -> Option<f32> {
        let window = frame.len() - tau_max;

        // 1. difference function
        diff[0] = 0.0;
        for tau in 1..=tau_max {
            diff[tau] = frame[..window]
                .iter()
                .zip(&frame[tau..tau + window])
                .map(|(a, b)| (a - b) * (a - b))
                .sum();
        }

        // 2. cumulative mean normalised difference (in place)
        diff[0] = 1.0;
        let mut running = 0.0_f32;
        for tau in 1..=tau_max {
            running += diff[tau];
            diff[tau] = if running > 0.0 {
                diff[tau] * tau as f32 / running
            } else {
                1.0
            };
        }

        // 3. absolute threshold + walk to the local minimum
        let mut tau = (tau_min..=tau_max).find(|&t| diff[t] < self.threshold)?;
        while tau < tau_max && diff[tau + 1] < diff[tau] {
            tau += 1;
        }

        // 4. parabolic interpolation
        let mut refined = tau as f32;
        if tau > 1 && tau < tau_max {
            let (s0, s1, s2) = (diff[tau - 1], diff[tau], diff[tau + 1]);
            let denom = s0 - 2.0 * s1 + s2;
            if denom.abs() > f32::EPSILON {
                refined += 0.5 * (s0 - s2) / denom;
            }
        }

        let f0 = sample_rate as f32 / refined;
        (self.fmin_hz..=self.fmax_hz).contains(&f0).then_some(f0)
    }
}

impl PitchTracker for YinTracker {
    fn track(&self, samples: &[f32], sample_rate: u32) -> Result<FrameTrack, PitchError> {
        let (tau_min, tau_max) = self.lag_range(sample_rate)?;
        let frame_length = self.frame_length_for(tau_max);
        let frame_duration = self.hop_length as f64 / sample_rate as f64;

        let mut frame = vec![0.0_f32; frame_length];
        let mut diff = vec![0.0_f32; tau_max + 1];
        let frequencies: Vec<Option<f32>> = (0..frame_count(samples.len(), self.hop_length))
            .map(|i| {
                fill_centered(samples, i * self.hop_length, &mut frame);
                self.estimate(&frame, tau_min, tau_max, sample_rate, &mut diff)
            })
            .collect();
        let energies = frame_rms(samples, frame_length, self.hop_length);

        log::debug!(
            "yin: {} frames, {} voiced (lags {tau_min}..={tau_max})",
            frequencies.len(),
            frequencies.iter().filter(|f| f.is_some()).count()
        );
        Ok(FrameTrack::new(frame_duration, frequencies, energies))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 16_000;

    fn sine(freq: f32, secs: f32, amplitude: f32) -> Vec<f32> {
        let n = (secs * SR as f32) as usize;
        (0..n)
            .map(|i| {
                (2.0 * std::f32::consts::PI * freq * i as f32 / SR as f32).sin() * amplitude
            })
            .collect()
    }

    #[test]
    fn detects_a4() {
        let track = YinTracker::default().track(&sine(440.0, 0.5, 0.3), SR).unwrap();
        let mid = track.frequencies()[track.len() / 2].expect("voiced");
        assert!((mid - 440.0).abs() < 3.0, "got {mid}");
    }

    #[test]
    fn silence_is_unvoiced() {
        let track = YinTracker::default().track(&vec![0.0; 8_000], SR).unwrap();
        assert!(track.frequencies().iter().all(Option::is_none));
        assert!(track.energies().iter().all(|&e| e == 0.0));
    }

    #[test]
    fn frame_layout_follows_hop() {
        let tracker = YinTracker::default();
        let track = tracker.track(&vec![0.0; 2_560], SR).unwrap();
        assert_eq!(track.len(), 1 + 2_560 / tracker.hop_length());
        assert!((track.frame_duration() - 256.0 / 16_000.0).abs() < 1e-12);
    }

    #[test]
    fn zero_sample_rate_rejected() {
        assert_eq!(
            YinTracker::default().track(&[0.0; 10], 0).unwrap_err(),
            PitchError::ZeroSampleRate
        );
    }

    #[test]
    fn short_frame_grows_to_hold_lowest_period() {
        let tracker = YinTracker::from_config(&PitchConfig {
            frame_length: 256,
            ..PitchConfig::default()
        });
        // 44.1 kHz / 65.4 Hz → 675-sample lag, window grows to 2048
        assert_eq!(tracker.frame_length_for(675), 2048);
        assert_eq!(YinTracker::default().frame_length_for(675), 2048);
    }

    #[test]
    fn high_sample_rate_tracks_with_default_frame() {
        let sr = 192_000;
        let tone: Vec<f32> = (0..sr / 5)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sr as f32).sin() * 0.3)
            .collect();
        let tracker = YinTracker::from_config(&PitchConfig {
            hop_length: 8_192,
            ..PitchConfig::default()
        });
        let track = tracker.track(&tone, sr as u32).unwrap();
        let mid = track.frequencies()[track.len() / 2].expect("voiced");
        assert!((mid - 440.0).abs() < 3.0, "got {mid}");
    }

    #[test]
    fn inverted_range_rejected() {
        let config = PitchConfig {
            fmin_hz: 500.0,
            fmax_hz: 100.0,
            ..PitchConfig::default()
        };
        let err = YinTracker::from_config(&config).track(&[0.0; 10], SR).unwrap_err();
        assert!(matches!(err, PitchError::InvalidConfig(_)), "{err}");
    }
}
