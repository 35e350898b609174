//! Sequential start-time recomputation.

use crate::error::MelodyError;
use crate::melody::note::Note;
use crate::melody::timing::seconds_from_beats;

/// Lay `notes` end to end from time zero.
///
/// Each note's `start_sec` becomes the summed duration of all preceding
/// notes, converted to seconds at `bpm`.  Durations, pitches and lyrics are
/// copied unchanged; the result has no gaps or overlaps.
pub fn reflow(notes: &[Note], bpm: f64) -> Result<Vec<Note>, MelodyError> {
    let mut cumulative_beats = 0.0;
    let mut reflowed = Vec::with_capacity(notes.len());
    for note in notes {
        reflowed.push(note.with_start(seconds_from_beats(cumulative_beats, bpm)?));
        cumulative_beats += note.duration_beats();
    }
    Ok(reflowed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_are_cumulative() {
        let notes = vec![
            Note::new(3.0, 1.0, 60),
            Note::new(0.0, 0.5, 62).with_lyric("la"),
            Note::new(9.0, 2.0, 64),
        ];
        let out = reflow(&notes, 120.0).unwrap();
        let starts: Vec<f64> = out.iter().map(Note::start_sec).collect();
        assert_eq!(starts, vec![0.0, 0.5, 0.75]);
        assert_eq!(out[1].lyric(), Some("la"));
        assert_eq!(out[2].duration_beats(), 2.0);
        assert_eq!(out[2].midi_pitch(), 64);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(reflow(&[], 120.0).unwrap().is_empty());
    }

    #[test]
    fn tempo_is_validated() {
        let notes = vec![Note::new(0.0, 1.0, 60)];
        assert!(matches!(
            reflow(&notes, -1.0),
            Err(MelodyError::InvalidTempo { .. })
        ));
    }
}
