//! Seconds ↔ beats conversion and duration quantisation.
//!
//! One beat is one quarter note at the given tempo.  Durations are snapped to
//! a fixed grid of [`QUANTIZATION_STEP`] beats (a sixteenth note in 4/4).

use crate::error::MelodyError;

/// Quantisation grid in beats.
pub const QUANTIZATION_STEP: f64 = 0.25;

fn check_tempo(bpm: f64) -> Result<(), MelodyError> {
    if bpm.is_nan() || bpm <= 0.0 {
        return Err(MelodyError::InvalidTempo { bpm });
    }
    Ok(())
}

/// Reject a minimum note length that is not a finite, positive beat value.
pub fn check_min_note_beats(beats: f64) -> Result<(), MelodyError> {
    if !beats.is_finite() || beats <= 0.0 {
        return Err(MelodyError::InvalidNoteLength { beats });
    }
    Ok(())
}

/// Convert a duration in seconds to beats: `seconds × bpm / 60`.
///
/// ```
/// use tts2sv::melody::beats_from_seconds;
///
/// assert_eq!(beats_from_seconds(1.0, 120.0).unwrap(), 2.0);
/// assert!(beats_from_seconds(1.0, 0.0).is_err());
/// ```
pub fn beats_from_seconds(seconds: f64, bpm: f64) -> Result<f64, MelodyError> {
    check_tempo(bpm)?;
    Ok(seconds * bpm / 60.0)
}

/// Convert a duration in beats to seconds: `beats × 60 / bpm`.
pub fn seconds_from_beats(beats: f64, bpm: f64) -> Result<f64, MelodyError> {
    check_tempo(bpm)?;
    Ok(beats * 60.0 / bpm)
}

/// Snap `value` to the nearest multiple of [`QUANTIZATION_STEP`], never
/// returning less than `minimum`.
///
/// Non-positive input is treated as "shortest allowed note" and returns
/// `minimum` directly.  Halfway cases round away from zero.
///
/// ```
/// use tts2sv::melody::quantize_beats;
///
/// assert_eq!(quantize_beats(0.9, 0.25), 1.0);
/// assert_eq!(quantize_beats(0.0, 0.25), 0.25);
/// ```
pub fn quantize_beats(value: f64, minimum: f64) -> f64 {
    if value <= 0.0 {
        return minimum;
    }
    let quantized = (value / QUANTIZATION_STEP).round() * QUANTIZATION_STEP;
    if quantized < minimum {
        minimum
    } else {
        quantized
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
