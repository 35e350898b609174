//! The [`Note`] value type.
//!
//! Notes are immutable once built.  Every stage that changes a note (reflow,
//! splitting, lyric binding) constructs a fresh value through one of the
//! `with_*` / `split_in_half` helpers instead of mutating in place.

/// Highest valid MIDI note number.
pub const MAX_MIDI_PITCH: u8 = 127;

/// Pitch used for the synthetic note when no voiced segment survives.
pub const DEFAULT_MIDI_PITCH: u8 = 60;

// ---------------------------------------------------------------------------
// Note
// ---------------------------------------------------------------------------

/// One note of a monophonic melody.
///
/// Within a melody the array position is the authoritative order;
/// `start_sec` is derived from it by [`reflow`](crate::melody::reflow).
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    start_sec: f64,
    duration_beats: f64,
    midi_pitch: u8,
    lyric: Option<String>,
}

impl Note {
    /// Create a note without a lyric.  `midi_pitch` is clamped to `0..=127`.
    pub fn new(start_sec: f64, duration_beats: f64, midi_pitch: u8) -> Self {
        Self {
            start_sec: start_sec.max(0.0),
            duration_beats,
            midi_pitch: midi_pitch.min(MAX_MIDI_PITCH),
            lyric: None,
        }
    }

    /// Onset in absolute seconds.
    pub fn start_sec(&self) -> f64 {
        self.start_sec
    }

    /// Duration in beats (quarter notes).
    pub fn duration_beats(&self) -> f64 {
        self.duration_beats
    }

    /// MIDI note number.
    pub fn midi_pitch(&self) -> u8 {
        self.midi_pitch
    }

    /// Lyric bound by the aligner, if any.
    pub fn lyric(&self) -> Option<&str> {
        self.lyric.as_deref()
    }

    /// Copy of this note starting at `start_sec`.
    pub fn with_start(&self, start_sec: f64) -> Self {
        Self {
            start_sec: start_sec.max(0.0),
            ..self.clone()
        }
    }

    /// Copy of this note carrying `lyric`.
    pub fn with_lyric(&self, lyric: impl Into<String>) -> Self {
        Self {
            lyric: Some(lyric.into()),
            ..self.clone()
        }
    }

    /// Copy of this note without its lyric.
    pub fn without_lyric(&self) -> Self {
        Self {
            lyric: None,
            ..self.clone()
        }
    }

    /// Two notes of half the duration and the same pitch, both starting at
    /// zero until the melody is reflowed.
    pub fn split_in_half(&self) -> [Note; 2] {
        let half = self.duration_beats / 2.0;
        [
            Note::new(0.0, half, self.midi_pitch),
            Note::new(0.0, half, self.midi_pitch),
        ]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
