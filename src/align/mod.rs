//! Align module: binds one syllable to each note.
//!
//! The aligner reconciles the syllable count with the note count by halving
//! long notes or padding with [`FILLER_LYRIC`], then returns a freshly
//! reflowed melody in an [`AlignmentResult`].

pub mod aligner;

pub use aligner::{align, AlignmentResult, FILLER_LYRIC, STRICT_OVERFLOW_LIMIT};
