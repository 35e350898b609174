//! Per-frame analysis data and the [`PitchTracker`] capability.

use thiserror::Error;

// ---------------------------------------------------------------------------
// PitchError
// ---------------------------------------------------------------------------

/// Errors raised while building or running a pitch tracker.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PitchError {
    /// Tracker parameters are inconsistent (zero hop, fmin ≥ fmax, no lag range).
    #[error("invalid pitch tracker configuration: {0}")]
    InvalidConfig(String),

    /// Sample rate of zero.
    #[error("sample rate must be > 0")]
    ZeroSampleRate,
}

// ---------------------------------------------------------------------------
// FrameTrack
// ---------------------------------------------------------------------------

/// Parallel per-frame arrays produced by a [`PitchTracker`].
///
/// Frame `i` is centred at `i × frame_duration` seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameTrack {
    frame_duration: f64,
    frequencies: Vec<Option<f32>>,
    energies: Vec<f32>,
}

impl FrameTrack {
    /// Build a track.  If the two arrays differ in length the longer one is
    /// truncated so that they stay parallel.  Non-finite or non-positive
    /// frequencies are stored as `None` (unvoiced).
    pub fn new(
        frame_duration: f64,
        mut frequencies: Vec<Option<f32>>,
        mut energies: Vec<f32>,
    ) -> Self {
        for freq in &mut frequencies {
            if freq.is_some_and(|f| !is_defined_frequency(f)) {
                *freq = None;
            }
        }
        if frequencies.len() != energies.len() {
            log::warn!(
                "frame track length mismatch: {} frequencies, {} energies",
                frequencies.len(),
                energies.len()
            );
            let len = frequencies.len().min(energies.len());
            frequencies.truncate(len);
            energies.truncate(len);
        }
        Self {
            frame_duration,
            frequencies,
            energies,
        }
    }

    /// Seconds spanned by one hop.
    pub fn frame_duration(&self) -> f64 {
        self.frame_duration
    }

    /// Fundamental frequency per frame; `None` for unvoiced frames.
    pub fn frequencies(&self) -> &[Option<f32>] {
        &self.frequencies
    }

    /// RMS energy per frame.
    pub fn energies(&self) -> &[f32] {
        &self.energies
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Timestamp of frame `index` in seconds.
    pub fn time_of(&self, index: usize) -> f64 {
        index as f64 * self.frame_duration
    }
}

// ---------------------------------------------------------------------------
// PitchTracker trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for frame-level pitch estimators.
///
/// Implementations are selected when the pipeline is constructed and held
/// behind a `Box<dyn PitchTracker>`.
///
/// # Contract
///
/// - `samples` are mono `f32` PCM in `[-1, 1]`.
/// - The returned track has one frame per hop, with frequencies and energies
///   of equal length.
pub trait PitchTracker: Send + Sync {
    /// Estimate per-frame pitch and energy for `samples`.
    fn track(&self, samples: &[f32], sample_rate: u32) -> Result<FrameTrack, PitchError>;
}

// Compile-time assertion: Box<dyn PitchTracker> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn PitchTracker>) {}
};

/// `true` for a usable fundamental frequency: finite and above zero.
pub fn is_defined_frequency(hz: f32) -> bool {
    hz.is_finite() && hz > 0.0
}

/// Fractional MIDI note number for a frequency: `69 + 12·log2(hz / 440)`.
///
/// ```
/// use tts2sv::pitch::hz_to_midi;
///
/// assert!((hz_to_midi(440.0) - 69.0).abs() < 1e-6);
/// assert!((hz_to_midi(880.0) - 81.0).abs() < 1e-6);
/// ```
pub fn hz_to_midi(hz: f32) -> f32 {
    69.0 + 12.0 * (hz / 440.0).log2()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_arrays_are_truncated() {
        let track = FrameTrack::new(0.01, vec![Some(100.0); 5], vec![0.1; 3]);
        assert_eq!(track.len(), 3);
        assert_eq!(track.energies().len(), 3);
    }

    #[test]
    fn undefined_frequencies_become_unvoiced() {
        let track = FrameTrack::new(
            0.01,
            vec![Some(f32::NAN), Some(f32::INFINITY), Some(0.0), Some(-5.0), Some(220.0)],
            vec![0.5; 5],
        );
        assert_eq!(track.frequencies(), &[None, None, None, None, Some(220.0)]);
    }

    #[test]
    fn time_of_scales_with_frame_duration() {
        let track = FrameTrack::new(0.02, vec![None; 10], vec![0.0; 10]);
        assert!((track.time_of(5) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn c4_is_midi_60() {
        assert!((hz_to_midi(261.6256) - 60.0).abs() < 1e-3);
    }
}
