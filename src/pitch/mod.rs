//! Frame-level pitch and energy analysis.
//!
//! # Architecture
//!
//! ```text
//! mono f32 samples ──▶ PitchTracker (trait) ──▶ FrameTrack
//!                         │                       ├─ frequencies: Vec<Option<f32>>
//!                         └─ YinTracker (default) └─ energies:    Vec<f32> (RMS)
//! ```
//!
//! The tracker is chosen when the [`Pipeline`](crate::pipeline::Pipeline) is
//! built; any `Box<dyn PitchTracker>` can replace the YIN default.

pub mod framing;
pub mod track;
pub mod yin;

pub use framing::frame_rms;
pub use track::{hz_to_midi, is_defined_frequency, FrameTrack, PitchError, PitchTracker};
pub use yin::YinTracker;
