//! Core error taxonomy for melody extraction and syllable alignment.
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | [`MelodyError::InvalidTempo`] | a seconds ↔ beats conversion sees `bpm <= 0` |
//! | [`MelodyError::InvalidNoteLength`] | the minimum note length is not a positive number |
//! | [`MelodyError::EmptyInput`] | audio, frames, transcript, notes or syllables are empty |
//! | [`MelodyError::AlignmentInfeasible`] | syllables cannot be fitted onto the notes |
//!
//! Every failure is final: the computations are deterministic, so retrying
//! with the same input reproduces the same error.

use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// InputKind
// ---------------------------------------------------------------------------

/// Which input turned out to be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Audio,
    Frames,
    Transcript,
    Notes,
    Syllables,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InputKind::Audio => "audio buffer is empty",
            InputKind::Frames => "pitch track has no frames",
            InputKind::Transcript => "transcript is empty",
            InputKind::Notes => "no notes available for alignment",
            InputKind::Syllables => "no syllables extracted from text",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Infeasibility
// ---------------------------------------------------------------------------

/// Why the aligner could not give every syllable its own note.
#[derive(Debug, Clone, PartialEq)]
pub enum Infeasibility {
    /// Strict mode: the syllable surplus is above the allowed fraction of the
    /// note count.  No split was attempted.
    SyllableOverload {
        syllables: usize,
        notes: usize,
        overflow: f64,
    },
    /// Splitting stopped at the minimum note length before the note count
    /// reached the syllable count.
    InsufficientSplits { notes: usize, syllables: usize },
}

impl fmt::Display for Infeasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Infeasibility::SyllableOverload {
                syllables,
                notes,
                overflow,
            } => write!(
                f,
                "syllable overload: {syllables} syllables for {notes} notes \
                 ({:.0}% over, strict limit 30%)",
                overflow * 100.0
            ),
            Infeasibility::InsufficientSplits { notes, syllables } => write!(
                f,
                "cannot split enough notes to cover all syllables \
                 ({notes} notes after splitting, {syllables} syllables)"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// MelodyError
// ---------------------------------------------------------------------------

/// Errors raised by the melody and alignment stages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MelodyError {
    /// Tempo must be strictly positive.
    #[error("invalid tempo: {bpm} BPM (must be > 0)")]
    InvalidTempo { bpm: f64 },

    /// Minimum note length must be a finite, strictly positive beat value.
    #[error("invalid minimum note length: {beats} beats (must be > 0)")]
    InvalidNoteLength { beats: f64 },

    /// A required input sequence was empty.
    #[error("empty input: {0}")]
    EmptyInput(InputKind),

    /// Alignment cannot be satisfied.
    #[error("alignment infeasible: {0}")]
    AlignmentInfeasible(Infeasibility),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
