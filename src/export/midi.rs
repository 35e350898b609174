//! Standard MIDI File writer.
//!
//! One track (SMF format 0): track name, tempo, a voice program change, then
//! for every note a Lyric meta event, note-on and note-off. Ticks per quarter
//! note equal the export timebase, so note lengths match the UST writer.
//!
//! Uses the `midly` crate for encoding.

use std::path::Path;

use midly::{
    num::{u15, u24, u28, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};

use crate::export::{check_tempo, check_timebase, note_ticks, write_document, ExportError};
use crate::melody::Note;

/// General MIDI "Voice Oohs" (0-based).
const VOICE_PROGRAM: u8 = 53;

const CHANNEL: u8 = 0;
const VELOCITY: u8 = 90;

/// Largest value a u24 tempo can hold.
const MAX_TEMPO_MICROS: u32 = 0x00FF_FFFF;

/// Largest delta time a u28 can hold.
const MAX_DELTA: u32 = 0x0FFF_FFFF;

fn event(delta: u32, kind: TrackEventKind<'_>) -> TrackEvent<'_> {
    TrackEvent {
        delta: u28::new(delta.min(MAX_DELTA)),
        kind,
    }
}

/// Build the in-memory SMF for `notes`.  Lyric bytes borrow from `notes`.
pub fn build_smf<'a>(
    notes: &'a [Note],
    bpm: f64,
    timebase: u16,
    track_name: &'a str,
) -> Result<Smf<'a>, ExportError> {
    check_tempo(bpm)?;
    check_timebase(timebase)?;

    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(timebase)),
    ));

    let micros_per_quarter = ((60_000_000.0 / bpm).round() as u32).clamp(1, MAX_TEMPO_MICROS);
    let channel = u4::new(CHANNEL);

    let mut track: Track<'a> = Vec::with_capacity(notes.len() * 3 + 4);
    track.push(event(
        0,
        TrackEventKind::Meta(MetaMessage::TrackName(track_name.as_bytes())),
    ));
    track.push(event(
        0,
        TrackEventKind::Meta(MetaMessage::Tempo(u24::new(micros_per_quarter))),
    ));
    track.push(event(
        0,
        TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange {
                program: u7::new(VOICE_PROGRAM),
            },
        },
    ));

    for note in notes {
        let key = u7::new(note.midi_pitch());
        if let Some(lyric) = note.lyric() {
            track.push(event(
                0,
                TrackEventKind::Meta(MetaMessage::Lyric(lyric.as_bytes())),
            ));
        }
        track.push(event(
            0,
            TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn {
                    key,
                    vel: u7::new(VELOCITY),
                },
            },
        ));
        track.push(event(
            note_ticks(note.duration_beats(), timebase),
            TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff {
                    key,
                    vel: u7::new(0),
                },
            },
        ));
    }

    track.push(event(0, TrackEventKind::Meta(MetaMessage::EndOfTrack)));
    smf.tracks.push(track);
    Ok(smf)
}

/// Encode `notes` as SMF bytes.
pub fn render_midi(
    notes: &[Note],
    bpm: f64,
    timebase: u16,
    track_name: &str,
) -> Result<Vec<u8>, ExportError> {
    let smf = build_smf(notes, bpm, timebase, track_name)?;
    let mut buf = Vec::new();
    smf.write_std(&mut buf)
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Encode and write a MIDI file to `path`, creating parent directories.
pub fn write_midi(
    notes: &[Note],
    bpm: f64,
    timebase: u16,
    track_name: &str,
    path: &Path,
) -> Result<(), ExportError> {
    let bytes = render_midi(notes, bpm, timebase, track_name)?;
    write_document(path, &bytes)
}
