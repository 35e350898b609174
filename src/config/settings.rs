//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files.  Every field has a
//! default, so a partial `settings.toml` only needs the keys it overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::error::MelodyError;
use crate::melody::{beats_from_seconds, check_min_note_beats};

// ---------------------------------------------------------------------------
// MelodyConfig
// ---------------------------------------------------------------------------

/// Tempo and quantisation settings shared by extraction and alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MelodyConfig {
    /// Tempo in beats per minute used for seconds ↔ beats conversion.
    pub bpm: f64,
    /// Shortest note produced by quantisation or splitting, in beats.
    pub min_note_beats: f64,
    /// Reject alignments whose syllable surplus exceeds 30% of the notes.
    pub strict: bool,
}

impl Default for MelodyConfig {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            min_note_beats: 0.125,
            strict: false,
        }
    }
}

impl MelodyConfig {
    /// Check tempo and minimum note length before any work is done.
    pub fn validate(&self) -> Result<(), MelodyError> {
        beats_from_seconds(0.0, self.bpm)?;
        check_min_note_beats(self.min_note_beats)
    }
}

// ---------------------------------------------------------------------------
// PitchConfig
// ---------------------------------------------------------------------------

/// YIN pitch tracker settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchConfig {
    /// Analysis window in samples; grown at high sample rates to hold two
    /// periods of `fmin_hz`.
    pub frame_length: usize,
    /// Hop between frame centres in samples.
    pub hop_length: usize,
    /// Lowest detectable frequency (C2).
    pub fmin_hz: f32,
    /// Highest detectable frequency (C7).
    pub fmax_hz: f32,
    /// Cumulative-mean-normalised difference threshold (0.0 – 1.0).
    /// Lower = stricter voicing decision.
    pub threshold: f32,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            frame_length: 2048,
            hop_length: 256,
            fmin_hz: 65.406,
            fmax_hz: 2093.005,
            threshold: 0.15,
        }
    }
}

// ---------------------------------------------------------------------------
// TextConfig
// ---------------------------------------------------------------------------

/// Heuristic used for words missing from the hyphenation dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStrategy {
    /// Consonant–vowel–consonant cluster scan (`"Hello"` → `Hel`, `lo`).
    VowelCluster,
    /// Each word is sung on a single note.
    WholeWord,
}

impl Default for FallbackStrategy {
    fn default() -> Self {
        Self::VowelCluster
    }
}

/// Transcript syllabification settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Language code selecting the hyphenation dictionary (e.g. `"en"`).
    pub language: String,
    /// Directory holding `<language>.json` dictionaries.  `None` means the
    /// platform data directory from [`AppPaths`].
    pub dictionary_dir: Option<PathBuf>,
    /// Heuristic for words the dictionary does not know.
    pub fallback: FallbackStrategy,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            language: "en".into(),
            dictionary_dir: None,
            fallback: FallbackStrategy::default(),
        }
    }
}

impl TextConfig {
    /// Dictionary directory to use, resolving `None` to the platform default.
    pub fn resolved_dictionary_dir(&self) -> PathBuf {
        self.dictionary_dir
            .clone()
            .unwrap_or_else(|| AppPaths::new().dictionaries_dir)
    }
}

// ---------------------------------------------------------------------------
// ExportConfig
// ---------------------------------------------------------------------------

/// Output document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// UTAU sequence text (`.ust`).
    Ust,
    /// Standard MIDI File (`.mid`).
    Midi,
    /// MusicXML score (`.musicxml`).
    Musicxml,
}

impl ExportFormat {
    /// File extension written for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Ust => "ust",
            ExportFormat::Midi => "mid",
            ExportFormat::Musicxml => "musicxml",
        }
    }
}

/// Settings for the file writers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Ticks per quarter note for UST and MIDI (also MusicXML divisions).
    pub timebase: u16,
    /// Project name written into the UST header.
    pub project_name: String,
    /// Formats written by the CLI.
    pub formats: Vec<ExportFormat>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            timebase: 480,
            project_name: "tts2sv".into(),
            formats: vec![ExportFormat::Musicxml, ExportFormat::Midi, ExportFormat::Ust],
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use tts2sv::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// let mut config = config;
/// config.melody.bpm = 96.0;
/// config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Tempo / quantisation / strictness.
    pub melody: MelodyConfig,
    /// Pitch tracker settings.
    pub pitch: PitchConfig,
    /// Syllabification settings.
    pub text: TextConfig,
    /// File writer settings.
    pub export: ExportConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests and `--config`).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original, loaded);
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.melody.bpm, 120.0);
        assert_eq!(cfg.melody.min_note_beats, 0.125);
        assert!(!cfg.melody.strict);
        assert_eq!(cfg.pitch.hop_length, 256);
        assert_eq!(cfg.pitch.frame_length, 2048);
        assert_eq!(cfg.text.language, "en");
        assert_eq!(cfg.text.fallback, FallbackStrategy::VowelCluster);
        assert_eq!(cfg.export.timebase, 480);
        assert_eq!(cfg.export.formats.len(), 3);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(
            &path,
            "[melody]\nbpm = 90.0\nstrict = true\n\n[text]\nfallback = \"whole_word\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load_from(&path).expect("load");
        assert_eq!(cfg.melody.bpm, 90.0);
        assert!(cfg.melody.strict);
        assert_eq!(cfg.melody.min_note_beats, 0.125);
        assert_eq!(cfg.text.fallback, FallbackStrategy::WholeWord);
        assert_eq!(cfg.text.language, "en");
        assert_eq!(cfg.export, ExportConfig::default());
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.melody.bpm = 96.0;
        cfg.text.language = "de".into();
        cfg.text.dictionary_dir = Some(PathBuf::from("/tmp/dicts"));
        cfg.export.timebase = 960;
        cfg.export.formats = vec![ExportFormat::Ust];

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.melody.bpm, 96.0);
        assert_eq!(loaded.text.language, "de");
        assert_eq!(loaded.text.dictionary_dir, Some(PathBuf::from("/tmp/dicts")));
        assert_eq!(loaded.export.timebase, 960);
        assert_eq!(loaded.export.formats, vec![ExportFormat::Ust]);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[melody\nbpm = ").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn validate_rejects_bad_tempo_and_length() {
        let mut cfg = MelodyConfig::default();
        assert!(cfg.validate().is_ok());

        cfg.bpm = 0.0;
        assert!(matches!(cfg.validate(), Err(MelodyError::InvalidTempo { .. })));

        cfg.bpm = 120.0;
        cfg.min_note_beats = -0.5;
        assert!(matches!(
            cfg.validate(),
            Err(MelodyError::InvalidNoteLength { .. })
        ));
    }
}
