//! Audio module: WAV file → mono, level-normalised sample buffer.
//!
//! # Pipeline
//!
//! ```text
//! WAV file → hound::WavReader → f32 interleaved → downmix_to_mono → normalize → AudioClip
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tts2sv::audio::load_wav;
//!
//! let clip = load_wav(Path::new("line.wav")).unwrap();
//! println!("{} samples @ {}Hz ({:.2}s)", clip.samples.len(), clip.sample_rate, clip.duration_secs());
//! ```

pub mod load;
pub mod mix;
pub mod normalize;

pub use load::{load_wav, AudioClip, AudioError};
pub use mix::downmix_to_mono;
pub use normalize::normalize;
