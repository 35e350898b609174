//! Pipeline runner: drives one recording through every melody stage.
//!
//! [`Pipeline`] owns the pitch tracker, the syllabifier and the melody
//! settings.  [`Pipeline::run`] is synchronous and returns either a complete
//! [`PipelineOutput`] or the first error; no partial result escapes.
//!
//! # Pipeline flow
//!
//! ```text
//! validate settings, transcript, audio
//!   └─▶ TextSyllabifier::syllabify      [Syllabify]
//!   └─▶ PitchTracker::track             [TrackPitch]
//!   └─▶ extract_notes                   [Extract]
//!   └─▶ align                           [Align]
//! ```
//!
//! Writing files is left to [`crate::export`]; the CLI reports export
//! failures under [`PipelineStage::Export`].

use std::fmt;
use std::sync::Arc;

use crate::align::{align, AlignmentResult};
use crate::audio::AudioClip;
use crate::config::{AppConfig, MelodyConfig};
use crate::error::{InputKind, MelodyError};
use crate::export::ExportError;
use crate::melody::{extract_notes, ExtractionSummary};
use crate::pitch::{PitchError, PitchTracker, YinTracker};
use crate::text::{HyphenationRegistry, TextError, TextSyllabifier};

use super::state::PipelineStage;

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Errors that can surface inside the pipeline.
///
/// Every variant except [`InvalidSettings`](Self::InvalidSettings) knows the
/// stage that raised it; see [`stage`](Self::stage).
#[derive(Debug)]
pub enum PipelineError {
    /// Tempo or minimum note length rejected before any work started.
    InvalidSettings(MelodyError),
    /// A melody-stage failure (empty input, bad tempo, infeasible alignment).
    Melody {
        stage: PipelineStage,
        source: MelodyError,
    },
    /// The syllabifier failed.
    Text(TextError),
    /// The pitch tracker failed.
    Pitch(PitchError),
    /// A writer failed.
    Export(ExportError),
}

impl PipelineError {
    /// Stage that raised the error, if it came from a stage.
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            PipelineError::InvalidSettings(_) => None,
            PipelineError::Melody { stage, .. } => Some(*stage),
            PipelineError::Text(_) => Some(PipelineStage::Syllabify),
            PipelineError::Pitch(_) => Some(PipelineStage::TrackPitch),
            PipelineError::Export(_) => Some(PipelineStage::Export),
        }
    }

    /// The melody error behind this failure, if any.
    pub fn melody_error(&self) -> Option<&MelodyError> {
        match self {
            PipelineError::InvalidSettings(e) | PipelineError::Melody { source: e, .. } => Some(e),
            _ => None,
        }
    }

    fn at(stage: PipelineStage) -> impl FnOnce(MelodyError) -> PipelineError {
        move |source| PipelineError::Melody { stage, source }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::InvalidSettings(e) => write!(f, "invalid settings: {e}"),
            PipelineError::Melody { stage, source } => write!(f, "{stage} failed: {source}"),
            PipelineError::Text(e) => write!(f, "{} failed: {e}", PipelineStage::Syllabify),
            PipelineError::Pitch(e) => write!(f, "{} failed: {e}", PipelineStage::TrackPitch),
            PipelineError::Export(e) => write!(f, "{} failed: {e}", PipelineStage::Export),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::InvalidSettings(e) | PipelineError::Melody { source: e, .. } => Some(e),
            PipelineError::Text(e) => Some(e),
            PipelineError::Pitch(e) => Some(e),
            PipelineError::Export(e) => Some(e),
        }
    }
}

impl From<TextError> for PipelineError {
    fn from(e: TextError) -> Self {
        PipelineError::Text(e)
    }
}

impl From<PitchError> for PipelineError {
    fn from(e: PitchError) -> Self {
        PipelineError::Pitch(e)
    }
}

impl From<ExportError> for PipelineError {
    fn from(e: ExportError) -> Self {
        PipelineError::Export(e)
    }
}

// ---------------------------------------------------------------------------
// PipelineOutput
// ---------------------------------------------------------------------------

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Syllable and punctuation tokens from the transcript.
    pub syllables: Vec<String>,
    /// Notes as extracted, before alignment.
    pub extraction: ExtractionSummary,
    /// Lyric-annotated notes plus split / filler counters.
    pub alignment: AlignmentResult,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Turns a recording and its transcript into a lyric-annotated melody.
///
/// ```rust,no_run
/// use std::path::Path;
/// use tts2sv::audio::load_wav;
/// use tts2sv::config::AppConfig;
/// use tts2sv::pipeline::Pipeline;
///
/// let config = AppConfig::default();
/// let pipeline = Pipeline::from_config(&config);
/// let clip = load_wav(Path::new("line.wav")).unwrap();
/// let output = pipeline.run(&clip, "Hello, world!").unwrap();
/// println!("{} notes", output.alignment.notes.len());
/// ```
pub struct Pipeline {
    tracker: Box<dyn PitchTracker>,
    syllabifier: TextSyllabifier,
    melody: MelodyConfig,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("syllabifier", &self.syllabifier)
            .field("melody", &self.melody)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Create a pipeline from explicit collaborators.
    pub fn new(
        tracker: Box<dyn PitchTracker>,
        syllabifier: TextSyllabifier,
        melody: MelodyConfig,
    ) -> Self {
        Self {
            tracker,
            syllabifier,
            melody,
        }
    }

    /// YIN tracker and dictionary-backed syllabifier built from `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Box::new(YinTracker::from_config(&config.pitch)),
            TextSyllabifier::from_config(&config.text),
            config.melody.clone(),
        )
    }

    /// Like [`from_config`](Self::from_config) but sharing `registry`.
    pub fn with_registry(config: &AppConfig, registry: Arc<HyphenationRegistry>) -> Self {
        Self::new(
            Box::new(YinTracker::from_config(&config.pitch)),
            TextSyllabifier::with_registry(&config.text, registry),
            config.melody.clone(),
        )
    }

    pub fn melody_config(&self) -> &MelodyConfig {
        &self.melody
    }

    /// Run every stage on `clip` and `text`.
    pub fn run(&self, clip: &AudioClip, text: &str) -> Result<PipelineOutput, PipelineError> {
        let MelodyConfig {
            bpm,
            min_note_beats,
            strict,
        } = self.melody;
        self.melody
            .validate()
            .map_err(PipelineError::InvalidSettings)?;

        if text.trim().is_empty() {
            return Err(PipelineError::at(PipelineStage::Syllabify)(
                MelodyError::EmptyInput(InputKind::Transcript),
            ));
        }
        if clip.is_empty() {
            return Err(PipelineError::at(PipelineStage::Extract)(
                MelodyError::EmptyInput(InputKind::Audio),
            ));
        }

        log::info!("{}: {} chars", PipelineStage::Syllabify, text.len());
        let syllables = self.syllabifier.syllabify(text)?;

        log::info!(
            "{}: {} samples @ {} Hz",
            PipelineStage::TrackPitch,
            clip.samples.len(),
            clip.sample_rate
        );
        let track = self.tracker.track(&clip.samples, clip.sample_rate)?;

        let extraction = extract_notes(&track, clip.duration_secs(), bpm, min_note_beats)
            .map_err(PipelineError::at(PipelineStage::Extract))?;
        log::info!(
            "{}: {} notes from {} frames",
            PipelineStage::Extract,
            extraction.notes.len(),
            track.len()
        );

        let alignment = align(&extraction.notes, &syllables, bpm, min_note_beats, strict)
            .map_err(PipelineError::at(PipelineStage::Align))?;
        log::info!(
            "{}: {} notes / {} syllables (splits: {}, filler notes: {})",
            PipelineStage::Align,
            alignment.notes.len(),
            syllables.len(),
            alignment.splits_applied,
            alignment.filler_notes
        );

        Ok(PipelineOutput {
            syllables,
            extraction,
            alignment,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
