//! Pipeline module: recording + transcript → lyric-annotated melody.
//!
//! # Architecture
//!
//! ```text
//!  AudioClip ──▶ PitchTracker ──▶ FrameTrack ──▶ extract_notes ──┐
//!                                                                ├──▶ align ──▶ AlignmentResult
//!  transcript ──▶ TextSyllabifier ──▶ syllables ─────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tts2sv::audio::load_wav;
//! use tts2sv::config::AppConfig;
//! use tts2sv::export::export_all;
//! use tts2sv::pipeline::Pipeline;
//!
//! let config = AppConfig::default();
//! let clip = load_wav(Path::new("line.wav")).unwrap();
//! let output = Pipeline::from_config(&config).run(&clip, "Hello, world!").unwrap();
//! export_all(&output.alignment.notes, Path::new("tts_line"), config.melody.bpm, &config.export)
//!     .unwrap();
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{Pipeline, PipelineError, PipelineOutput};
pub use state::PipelineStage;
