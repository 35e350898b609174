//! Export module: aligned melody → singing-synthesis documents.
//!
//! | Writer | Format | Extension |
//! |--------|--------|-----------|
//! | [`write_ust`] | UTAU sequence text | `.ust` |
//! | [`write_midi`] | Standard MIDI File, format 0, with lyric events | `.mid` |
//! | [`write_musicxml`] | MusicXML 4.0 partwise | `.musicxml` |
//!
//! All writers take the notes read-only and create missing parent
//! directories.  Note lengths are converted to ticks with
//! `max(round(beats × timebase), 1)` in every format.

pub mod midi;
pub mod musicxml;
pub mod ust;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{ExportConfig, ExportFormat};
use crate::melody::Note;

pub use midi::{build_smf, render_midi, write_midi};
pub use musicxml::{render_musicxml, write_musicxml};
pub use ust::{render_ust, write_ust};

/// Largest ticks-per-quarter value a metrical SMF header can carry.
pub const MAX_TIMEBASE: u16 = 0x7FFF;

// ---------------------------------------------------------------------------
// ExportError
// ---------------------------------------------------------------------------

/// Errors raised while writing output documents.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid timebase: {0} ticks per quarter (must be 1..=32767)")]
    InvalidTimebase(u16),

    #[error("invalid tempo: {0} BPM (must be > 0)")]
    InvalidTempo(f64),

    #[error("failed to encode document: {0}")]
    Encode(String),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

pub(crate) fn check_timebase(timebase: u16) -> Result<(), ExportError> {
    if timebase == 0 || timebase > MAX_TIMEBASE {
        return Err(ExportError::InvalidTimebase(timebase));
    }
    Ok(())
}

pub(crate) fn check_tempo(bpm: f64) -> Result<(), ExportError> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return Err(ExportError::InvalidTempo(bpm));
    }
    Ok(())
}

/// Length of a note in ticks, never less than one.
pub fn note_ticks(duration_beats: f64, timebase: u16) -> u32 {
    let ticks = (duration_beats * timebase as f64).round();
    if ticks < 1.0 {
        1
    } else {
        ticks as u32
    }
}

pub(crate) fn write_document(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, bytes).map_err(io_err)?;
    log::info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

// ---------------------------------------------------------------------------
// export_all
// ---------------------------------------------------------------------------

/// Output path for `format`: `prefix` with its extension replaced.
pub fn output_path(prefix: &Path, format: ExportFormat) -> PathBuf {
    prefix.with_extension(format.extension())
}

/// Write every format listed in `config`, returning the paths written.
pub fn export_all(
    notes: &[Note],
    prefix: &Path,
    bpm: f64,
    config: &ExportConfig,
) -> Result<Vec<PathBuf>, ExportError> {
    let mut written = Vec::with_capacity(config.formats.len());
    for &format in &config.formats {
        let path = output_path(prefix, format);
        match format {
            ExportFormat::Ust => {
                write_ust(notes, bpm, config.timebase, &config.project_name, &path)?
            }
            ExportFormat::Midi => {
                write_midi(notes, bpm, config.timebase, &config.project_name, &path)?
            }
            ExportFormat::Musicxml => {
                write_musicxml(notes, bpm, config.timebase, &config.project_name, &path)?
            }
        }
        written.push(path);
    }
    Ok(written)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
