//! UTAU sequence text (`.ust`) writer.
//!
//! ```text
//! [#SETTING]
//! ProjectName=tts2sv
//! ...
//! Tempo=120.0
//!
//! [#0000]
//! Lyric=la
//! NoteNum=60
//! Length=480
//! ...
//!
//! [#TRACKEND]
//! ```
//!
//! Lines are joined with `\n`; the document has no trailing newline.

use std::path::Path;

use crate::align::FILLER_LYRIC;
use crate::export::{check_timebase, note_ticks, write_document, ExportError};
use crate::melody::Note;

/// Lyric UTAU treats as "hold / no syllable".
const REST_LYRIC: &str = "-";

fn ust_lyric(lyric: Option<&str>) -> &str {
    match lyric.map(str::trim) {
        None | Some("") => REST_LYRIC,
        Some(l) if l == FILLER_LYRIC => REST_LYRIC,
        Some(l) => l,
    }
}

/// `120.0` stays `120.0`, `133.5` stays `133.5`.
fn format_tempo(bpm: f64) -> String {
    if bpm.fract() == 0.0 {
        format!("{bpm:.1}")
    } else {
        format!("{bpm}")
    }
}

/// Render `notes` as a UST document.
///
/// `out_file` is the stem used for the `OutFile=` header entry.
pub fn render_ust(
    notes: &[Note],
    bpm: f64,
    timebase: u16,
    project_name: &str,
    out_file: &str,
) -> Result<String, ExportError> {
    check_timebase(timebase)?;

    let mut lines: Vec<String> = vec![
        "[#SETTING]".into(),
        format!("ProjectName={project_name}"),
        "VoiceDir=".into(),
        format!("OutFile={out_file}"),
        "CacheDir=cache".into(),
        "Mode2=True".into(),
        format!("Tempo={}", format_tempo(bpm)),
        String::new(),
    ];

    for (idx, note) in notes.iter().enumerate() {
        lines.push(format!("[#{idx:04}]"));
        lines.push(format!("Lyric={}", ust_lyric(note.lyric())));
        lines.push(format!("NoteNum={}", note.midi_pitch()));
        lines.push(format!("Length={}", note_ticks(note.duration_beats(), timebase)));
        lines.extend(
            [
                "PreUtterance=",
                "VoiceOverlap=",
                "Intensity=100",
                "Modulation=0",
                "PBType=5",
                "",
            ]
            .map(String::from),
        );
    }
    lines.push("[#TRACKEND]".into());

    Ok(lines.join("\n"))
}

/// Render and write a UST file to `path`, creating parent directories.
pub fn write_ust(
    notes: &[Note],
    bpm: f64,
    timebase: u16,
    project_name: &str,
    path: &Path,
) -> Result<(), ExportError> {
    let out_file = path
        .with_extension("wav")
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let document = render_ust(notes, bpm, timebase, project_name, &out_file)?;
    write_document(path, document.as_bytes())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_notes() -> Vec<Note> {
        vec![
            Note::new(0.0, 1.5, 60).with_lyric("la"),
            Note::new(0.75, 0.5, 62).with_lyric(FILLER_LYRIC),
        ]
    }

    #[test]
    fn document_layout() {
        let text = render_ust(&sample_notes(), 120.0, 480, "demo", "demo.wav").unwrap();
        assert!(text.starts_with("[#SETTING]\nProjectName=demo\nVoiceDir=\nOutFile=demo.wav"));
        assert!(text.contains("Tempo=120.0\n"));
        assert!(text.contains("[#0000]\nLyric=la\nNoteNum=60\nLength=720\n"));
        assert!(text.contains("[#0001]\nLyric=-\nNoteNum=62\nLength=240\n"));
        assert!(text.ends_with("PBType=5\n\n[#TRACKEND]"));
    }

    #[test]
    fn missing_and_blank_lyrics_become_rest() {
        let notes = vec![Note::new(0.0, 1.0, 60), Note::new(0.0, 1.0, 60).with_lyric("  ")];
        let text = render_ust(&notes, 90.5, 480, "p", "p.wav").unwrap();
        assert_eq!(text.matches("Lyric=-\n").count(), 2);
        assert!(text.contains("Tempo=90.5\n"));
    }

    #[test]
    fn length_never_below_one_tick() {
        let notes = vec![Note::new(0.0, 0.0001, 60).with_lyric("a")];
        let text = render_ust(&notes, 120.0, 480, "p", "p.wav").unwrap();
        assert!(text.contains("Length=1\n"));
    }

    #[test]
    fn write_creates_parent_dirs() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("line.ust");
        write_ust(&sample_notes(), 120.0, 480, "tts2sv", &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("OutFile=line.wav"));
        assert!(text.trim_end().ends_with("[#TRACKEND]"));
    }

    #[test]
    fn zero_timebase_rejected() {
        assert!(matches!(
            render_ust(&sample_notes(), 120.0, 0, "p", "p.wav"),
            Err(ExportError::InvalidTimebase(0))
        ));
    }
}
