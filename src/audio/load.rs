//! WAV decoding via `hound`.
//!
//! [`load_wav`] reads integer PCM (8/16/24/32-bit) or 32-bit float files,
//! downmixes to mono and normalises the level, returning an [`AudioClip`].

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::audio::mix::downmix_to_mono;
use crate::audio::normalize::normalize;

// ---------------------------------------------------------------------------
// AudioError
// ---------------------------------------------------------------------------

/// Reason a recording could not be loaded.
#[derive(Debug, Error)]
pub enum AudioError {
    /// The path does not exist.
    #[error("audio file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// `hound` failed to read the file.
    #[error("failed to decode WAV: {0}")]
    Decode(#[from] hound::Error),

    /// Header describes a layout this loader does not handle.
    #[error("unsupported WAV format: {0}")]
    UnsupportedFormat(String),
}

// ---------------------------------------------------------------------------
// AudioClip
// ---------------------------------------------------------------------------

/// A decoded, mono, normalised recording.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioClip {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Length in seconds; zero when the sample rate is zero.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ---------------------------------------------------------------------------
// load_wav
// ---------------------------------------------------------------------------

/// Decode `path`, downmix to mono and normalise.
///
/// An empty data chunk is not an error here; the melody stage reports it as
/// empty audio.
pub fn load_wav(path: &Path) -> Result<AudioClip, AudioError> {
    if !path.exists() {
        return Err(AudioError::NotFound(path.to_path_buf()));
    }

    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(AudioError::UnsupportedFormat("zero channels".into()));
    }

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Float, 32) => reader.samples::<f32>().collect::<Result<_, _>>()?,
        (hound::SampleFormat::Int, bits @ 1..=32) => {
            let scale = (1_i64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
        (format, bits) => {
            return Err(AudioError::UnsupportedFormat(format!(
                "{bits}-bit {format:?}"
            )))
        }
    };

    let mut samples = downmix_to_mono(&interleaved, spec.channels);
    normalize(&mut samples);

    log::info!(
        "loaded {} ({} Hz, {} ch, {}-bit) → {} mono samples",
        path.display(),
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        samples.len()
    );
    Ok(AudioClip::new(samples, spec.sample_rate))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
