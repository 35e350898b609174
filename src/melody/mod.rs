//! Melody extraction: per-frame pitch track → quantised notes.
//!
//! # Pipeline
//!
//! ```text
//! FrameTrack → find_voiced_segments → extract_notes (median pitch, quantize_beats)
//!            → reflow → ExtractionSummary
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use tts2sv::melody::extract_notes;
//! use tts2sv::pitch::FrameTrack;
//!
//! // 20 frames of A4 at 50 ms per frame
//! let track = FrameTrack::new(0.05, vec![Some(440.0); 20], vec![0.3; 20]);
//! let summary = extract_notes(&track, 1.0, 120.0, 0.25).unwrap();
//! assert_eq!(summary.notes.len(), 1);
//! assert_eq!(summary.notes[0].midi_pitch(), 69);
//! assert_eq!(summary.notes[0].duration_beats(), 2.0);
//! ```

pub mod extract;
pub mod note;
pub mod reflow;
pub mod segments;
pub mod timing;

pub use extract::{extract_notes, nearest_midi_pitch, ExtractionSummary};
pub use note::{Note, DEFAULT_MIDI_PITCH, MAX_MIDI_PITCH};
pub use reflow::reflow;
pub use segments::{find_voiced_segments, noise_gate, VoicedSegment};
pub use timing::{
    beats_from_seconds, check_min_note_beats, quantize_beats, seconds_from_beats,
    QUANTIZATION_STEP,
};
