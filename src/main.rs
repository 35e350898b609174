//! Command-line entry point.
//!
//! # Run sequence
//!
//! 1. Initialise logging.
//! 2. Parse arguments and load [`AppConfig`] (`--config`, or the platform
//!    settings file, falling back to defaults).
//! 3. Apply command-line overrides; with `--save-config`, write them back.
//! 4. Decode the WAV file.
//! 5. Run the [`Pipeline`]; nothing is written if any stage fails.
//! 6. Write every configured export format and print a one-line summary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tts2sv::{
    audio::load_wav,
    config::AppConfig,
    export::export_all,
    pipeline::{Pipeline, PipelineError},
};

/// Convert a spoken line into singing-synthesis project files.
#[derive(Parser, Debug)]
#[command(name = "tts2sv")]
#[command(version)]
struct Args {
    /// Path to the input WAV file
    #[arg(long)]
    wav: PathBuf,

    /// Exact text spoken in the recording
    #[arg(long)]
    text: String,

    /// Prefix for output files; each format replaces the extension
    #[arg(long, default_value = "./tts_line")]
    out_prefix: PathBuf,

    /// Tempo for quantisation, in beats per minute
    #[arg(long)]
    bpm: Option<f64>,

    /// Language code for syllabification
    #[arg(long)]
    lang: Option<String>,

    /// Minimum note duration in beats
    #[arg(long)]
    min_note_beats: Option<f64>,

    /// Ticks per quarter note for UST / MIDI / MusicXML
    #[arg(long)]
    timebase: Option<u16>,

    /// Fail when syllables outnumber notes by more than 30%
    #[arg(long)]
    strict: bool,

    /// Settings file to use instead of the platform default
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective settings (after overrides) back to the settings file
    #[arg(long)]
    save_config: bool,
}

impl Args {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(bpm) = self.bpm {
            config.melody.bpm = bpm;
        }
        if let Some(beats) = self.min_note_beats {
            config.melody.min_note_beats = beats;
        }
        if self.strict {
            config.melody.strict = true;
        }
        if let Some(lang) = &self.lang {
            config.text.language = lang.clone();
        }
        if let Some(timebase) = self.timebase {
            config.export.timebase = timebase;
        }
    }
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e}); using defaults");
            AppConfig::default()
        }),
    };
    args.apply_overrides(&mut config);
    Ok(config)
}

fn save_config(args: &Args, config: &AppConfig) -> Result<()> {
    match &args.config {
        Some(path) => config
            .save_to(path)
            .with_context(|| format!("saving settings to {}", path.display()))?,
        None => config.save().context("saving settings")?,
    }
    log::info!("settings saved");
    Ok(())
}

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2-3. Arguments and configuration
    let args = Args::parse();
    let config = load_config(&args)?;
    log::debug!("effective config: {config:?}");
    if args.save_config {
        save_config(&args, &config)?;
    }

    // 4. Audio
    let clip = load_wav(&args.wav).with_context(|| format!("loading {}", args.wav.display()))?;

    // 5. Melody + alignment
    let output = Pipeline::from_config(&config).run(&clip, &args.text)?;

    // 6. Export
    export_all(
        &output.alignment.notes,
        &args.out_prefix,
        config.melody.bpm,
        &config.export,
    )
    .map_err(PipelineError::from)?;

    println!(
        "Exported {} notes / {} syllables (splits: {}, filler notes: {}).",
        output.alignment.notes.len(),
        output.syllables.len(),
        output.alignment.splits_applied,
        output.alignment.filler_notes
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_config_untouched() {
        let args = Args::parse_from(["tts2sv", "--wav", "a.wav", "--text", "hi"]);
        assert_eq!(args.out_prefix, PathBuf::from("./tts_line"));

        let mut config = AppConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn save_config_writes_overridden_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        let args = Args::parse_from([
            "tts2sv",
            "--wav",
            "a.wav",
            "--text",
            "hi",
            "--bpm",
            "100",
            "--config",
            path.to_str().unwrap(),
            "--save-config",
        ]);
        assert!(args.save_config);

        let config = load_config(&args).unwrap();
        save_config(&args, &config).unwrap();

        let reloaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(reloaded.melody.bpm, 100.0);
        assert_eq!(reloaded, config);
    }

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from([
            "tts2sv",
            "--wav",
            "a.wav",
            "--text",
            "hi",
            "--bpm",
            "90",
            "--lang",
            "de",
            "--min-note-beats",
            "0.25",
            "--timebase",
            "960",
            "--strict",
        ]);
        let mut config = AppConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.melody.bpm, 90.0);
        assert_eq!(config.melody.min_note_beats, 0.25);
        assert!(config.melody.strict);
        assert_eq!(config.text.language, "de");
        assert_eq!(config.export.timebase, 960);
    }
}
