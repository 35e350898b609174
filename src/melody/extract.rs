//! Note quantizer: voiced segments → discrete, grid-quantised notes.
//!
//! For each segment the representative pitch is the median of its defined
//! frequency estimates, rounded to the nearest semitone (halfway cases round
//! away from zero).  The duration covers the segment's frames, is converted
//! to beats and snapped to the grid by [`quantize_beats`].  Start times are
//! then recomputed from note order by [`reflow`].

use crate::error::{InputKind, MelodyError};
use crate::melody::note::{Note, DEFAULT_MIDI_PITCH, MAX_MIDI_PITCH};
use crate::melody::reflow::reflow;
use crate::melody::segments::{find_voiced_segments, VoicedSegment};
use crate::melody::timing::{beats_from_seconds, check_min_note_beats, quantize_beats};
use crate::pitch::{hz_to_midi, FrameTrack};

// ---------------------------------------------------------------------------
// ExtractionSummary
// ---------------------------------------------------------------------------

/// Notes extracted from one recording.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionSummary {
    /// Quantised notes, reflowed from zero.
    pub notes: Vec<Note>,
    /// Length of the source recording in seconds.
    pub total_duration_sec: f64,
}

// ---------------------------------------------------------------------------
// Pitch helpers
// ---------------------------------------------------------------------------

/// Median of `values`; the mean of the two middle values for even counts.
fn median(values: &mut [f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f32::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Nearest MIDI note for `hz`, clamped to `0..=127`.
pub fn nearest_midi_pitch(hz: f32) -> u8 {
    let midi = hz_to_midi(hz).round();
    midi.clamp(0.0, MAX_MIDI_PITCH as f32) as u8
}

/// Representative pitch of `segment`, or `None` if no frame in it has a
/// frequency estimate.
fn segment_pitch(track: &FrameTrack, segment: VoicedSegment) -> Option<u8> {
    let mut defined: Vec<f32> = track.frequencies()[segment.start..=segment.end]
        .iter()
        .flatten()
        .copied()
        .collect();
    median(&mut defined).map(nearest_midi_pitch)
}

// ---------------------------------------------------------------------------
// extract_notes
// ---------------------------------------------------------------------------

/// Turn a frame track into a quantised melody.
///
/// Never returns an empty melody: when no segment survives, a single note at
/// [`DEFAULT_MIDI_PITCH`] spanning the whole recording is emitted.
///
/// # Errors
///
/// - [`MelodyError::EmptyInput`]: `track` has no frames or the recording is
///   zero-length.
/// - [`MelodyError::InvalidTempo`]: `bpm <= 0`.
/// - [`MelodyError::InvalidNoteLength`]: `min_note_beats <= 0`.
pub fn extract_notes(
    track: &FrameTrack,
    total_duration_sec: f64,
    bpm: f64,
    min_note_beats: f64,
) -> Result<ExtractionSummary, MelodyError> {
    if total_duration_sec.is_nan() || total_duration_sec <= 0.0 {
        return Err(MelodyError::EmptyInput(InputKind::Audio));
    }
    if track.is_empty() {
        return Err(MelodyError::EmptyInput(InputKind::Frames));
    }
    check_min_note_beats(min_note_beats)?;

    let frame_duration = track.frame_duration();
    let mut notes = Vec::new();

    for segment in find_voiced_segments(track) {
        let Some(midi_pitch) = segment_pitch(track, segment) else {
            continue;
        };
        let start_time = track.time_of(segment.start);
        let end_time = track.time_of(segment.end) + frame_duration;
        let raw_duration = (end_time - start_time).max(frame_duration);
        let duration_beats =
            quantize_beats(beats_from_seconds(raw_duration, bpm)?, min_note_beats);

        notes.push(Note::new(start_time, duration_beats, midi_pitch));
    }

    if notes.is_empty() {
        log::debug!("no voiced segment survived; emitting a single default note");
        let duration_beats = quantize_beats(
            beats_from_seconds(total_duration_sec, bpm)?,
            min_note_beats,
        );
        notes.push(Note::new(0.0, duration_beats, DEFAULT_MIDI_PITCH));
    }

    let notes = reflow(&notes, bpm)?;
    log::debug!(
        "extracted {} notes from {} frames ({total_duration_sec:.2}s)",
        notes.len(),
        track.len()
    );

    Ok(ExtractionSummary {
        notes,
        total_duration_sec,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
