//! tts2sv: spoken line + transcript → quantised, lyric-annotated melody.
//!
//! | Module | Role |
//! |--------|------|
//! | [`audio`] | WAV decoding, downmix, level normalisation |
//! | [`pitch`] | per-frame pitch / energy tracking (YIN) |
//! | [`text`] | tokenisation and syllabification |
//! | [`melody`] | seconds ↔ beats, voiced segments, note quantisation, reflow |
//! | [`align`] | syllable ↔ note reconciliation |
//! | [`export`] | UST, MIDI and MusicXML writers |
//! | [`pipeline`] | runs the stages in order |
//! | [`config`] | TOML settings and platform paths |
//! | [`error`] | melody / alignment error taxonomy |

pub mod align;
pub mod audio;
pub mod config;
pub mod error;
pub mod export;
pub mod melody;
pub mod pipeline;
pub mod pitch;
pub mod text;
