//! Syllable → note alignment.
//!
//! ```text
//!  notes (N) ─┐
//!             ├─► S > N ? split longest ──► S < N ? pad with filler ──► bind ──► reflow
//!  sylls (S) ─┘        (strict: overflow ≤ 30%)
//! ```

use crate::error::{Infeasibility, InputKind, MelodyError};
use crate::melody::{check_min_note_beats, reflow, Note};

/// Lyric attached to surplus notes.
pub const FILLER_LYRIC: &str = "—";

/// Largest syllable surplus, as a fraction of the note count, accepted in
/// strict mode.
pub const STRICT_OVERFLOW_LIMIT: f64 = 0.30;

/// Lyric-annotated melody plus alignment diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentResult {
    pub notes: Vec<Note>,
    pub splits_applied: usize,
    pub filler_notes: usize,
}

/// Give every syllable its own note.
///
/// When there are more syllables than notes the longest note is halved
/// (lowest index on ties) until the counts match.  Surplus notes receive
/// [`FILLER_LYRIC`].  The result is reflowed from time zero at `bpm`.
///
/// # Errors
///
/// * [`MelodyError::EmptyInput`] for empty `notes` or `syllables`.
/// * [`MelodyError::InvalidNoteLength`] for a non-positive `min_note_beats`.
/// * [`MelodyError::AlignmentInfeasible`] when strict mode sees an overflow
///   above [`STRICT_OVERFLOW_LIMIT`], or when halving would go below
///   `min_note_beats` before every syllable has a note.
/// * [`MelodyError::InvalidTempo`] for a non-positive `bpm`.
///
/// ```rust
/// use tts2sv::align::{align, FILLER_LYRIC};
/// use tts2sv::melody::Note;
///
/// let notes = vec![Note::new(0.0, 1.0, 60), Note::new(0.0, 1.0, 62)];
/// let result = align(&notes, &["la"], 120.0, 0.25, false).unwrap();
/// assert_eq!(result.notes[1].lyric(), Some(FILLER_LYRIC));
/// assert_eq!(result.filler_notes, 1);
/// ```
pub fn align<S: AsRef<str>>(
    notes: &[Note],
    syllables: &[S],
    bpm: f64,
    min_note_beats: f64,
    strict: bool,
) -> Result<AlignmentResult, MelodyError> {
    if notes.is_empty() {
        return Err(MelodyError::EmptyInput(InputKind::Notes));
    }
    if syllables.is_empty() {
        return Err(MelodyError::EmptyInput(InputKind::Syllables));
    }
    check_min_note_beats(min_note_beats)?;

    let note_count = notes.len();
    let syllable_count = syllables.len();
    let mut working: Vec<Note> = notes.iter().map(Note::without_lyric).collect();
    let mut splits_applied = 0;

    if syllable_count > note_count {
        let overflow = (syllable_count - note_count) as f64 / note_count.max(1) as f64;
        if strict && overflow > STRICT_OVERFLOW_LIMIT {
            return Err(MelodyError::AlignmentInfeasible(
                Infeasibility::SyllableOverload {
                    syllables: syllable_count,
                    notes: note_count,
                    overflow,
                },
            ));
        }
        splits_applied = split_until(&mut working, syllable_count, min_note_beats);
    }

    if working.len() < syllable_count {
        return Err(MelodyError::AlignmentInfeasible(
            Infeasibility::InsufficientSplits {
                notes: working.len(),
                syllables: syllable_count,
            },
        ));
    }

    let filler_notes = working.len() - syllable_count;
    let lyrics = syllables
        .iter()
        .map(AsRef::as_ref)
        .chain(std::iter::repeat(FILLER_LYRIC).take(filler_notes));
    let bound: Vec<Note> = working
        .iter()
        .zip(lyrics)
        .map(|(note, lyric)| note.with_lyric(lyric))
        .collect();

    log::debug!(
        "aligned {syllable_count} syllables onto {} notes ({splits_applied} splits, {filler_notes} fillers)",
        bound.len()
    );

    Ok(AlignmentResult {
        notes: reflow(&bound, bpm)?,
        splits_applied,
        filler_notes,
    })
}

/// Index of the longest note; the first one wins ties.
fn longest_note(notes: &[Note]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, note) in notes.iter().enumerate() {
        match best {
            Some(b) if note.duration_beats() <= notes[b].duration_beats() => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Halve the longest note until `notes` holds `target` entries or the next
/// half would be shorter than `min_note_beats`.  Returns the split count.
fn split_until(notes: &mut Vec<Note>, target: usize, min_note_beats: f64) -> usize {
    let mut splits = 0;
    while notes.len() < target {
        let Some(idx) = longest_note(notes) else {
            break;
        };
        if notes[idx].duration_beats() / 2.0 < min_note_beats {
            break;
        }
        let halves = notes[idx].split_in_half();
        notes.splice(idx..=idx, halves);
        splits += 1;
    }
    splits
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
