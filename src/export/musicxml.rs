//! MusicXML 4.0 (partwise) writer.
//!
//! One voice part in 4/4 with a metronome mark.  `divisions` equals the
//! export timebase, so a note's `<duration>` is the same tick count used in
//! the UST and MIDI files.  Notes that cross a barline are split and tied;
//! the lyric sits on the first fragment.  The last measure is padded with a
//! rest.

use std::path::Path;

use crate::export::{check_tempo, check_timebase, note_ticks, write_document, ExportError};
use crate::melody::Note;

const BEATS_PER_MEASURE: u32 = 4;

/// Sharps-only spelling of the twelve pitch classes: (step, alter).
const PITCH_CLASSES: [(&str, i8); 12] = [
    ("C", 0),
    ("C", 1),
    ("D", 0),
    ("D", 1),
    ("E", 0),
    ("F", 0),
    ("F", 1),
    ("G", 0),
    ("G", 1),
    ("A", 0),
    ("A", 1),
    ("B", 0),
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Tie {
    None,
    Start,
    Stop,
    Both,
}

/// Render `notes` as a MusicXML document.
pub fn render_musicxml(
    notes: &[Note],
    bpm: f64,
    divisions: u16,
    title: &str,
) -> Result<String, ExportError> {
    check_tempo(bpm)?;
    check_timebase(divisions)?;

    let measure_len = BEATS_PER_MEASURE * divisions as u32;
    let mut xml = String::new();

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 4.0 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd">"#);
    xml.push('\n');
    xml.push_str(r#"<score-partwise version="4.0">"#);
    xml.push('\n');

    xml.push_str("  <work>\n");
    xml.push_str(&format!("    <work-title>{}</work-title>\n", escape_xml(title)));
    xml.push_str("  </work>\n");

    xml.push_str("  <part-list>\n");
    xml.push_str("    <score-part id=\"P1\">\n");
    xml.push_str("      <part-name>Voice</part-name>\n");
    xml.push_str("    </score-part>\n");
    xml.push_str("  </part-list>\n");

    xml.push_str("  <part id=\"P1\">\n");

    let mut measure_number = 1;
    let mut position = 0; // ticks into the current measure
    xml.push_str(&open_measure(measure_number, Some((divisions, bpm))));

    for note in notes {
        let mut remaining = note_ticks(note.duration_beats(), divisions);
        let mut first = true;
        while remaining > 0 {
            if position == measure_len {
                xml.push_str("    </measure>\n");
                measure_number += 1;
                position = 0;
                xml.push_str(&open_measure(measure_number, None));
            }
            let fragment = remaining.min(measure_len - position);
            remaining -= fragment;
            let tie = match (first, remaining > 0) {
                (true, false) => Tie::None,
                (true, true) => Tie::Start,
                (false, false) => Tie::Stop,
                (false, true) => Tie::Both,
            };
            let lyric = if first { note.lyric() } else { None };
            xml.push_str(&note_to_xml(note.midi_pitch(), fragment, tie, lyric));
            position += fragment;
            first = false;
        }
    }

    if position < measure_len {
        xml.push_str(&rest_to_xml(measure_len - position));
    }
    xml.push_str("    </measure>\n");
    xml.push_str("  </part>\n");
    xml.push_str("</score-partwise>\n");

    Ok(xml)
}

/// Render and write a MusicXML file to `path`, creating parent directories.
pub fn write_musicxml(
    notes: &[Note],
    bpm: f64,
    divisions: u16,
    title: &str,
    path: &Path,
) -> Result<(), ExportError> {
    let document = render_musicxml(notes, bpm, divisions, title)?;
    write_document(path, document.as_bytes())
}

fn open_measure(number: u32, attributes: Option<(u16, f64)>) -> String {
    let mut xml = format!("    <measure number=\"{number}\">\n");
    let Some((divisions, bpm)) = attributes else {
        return xml;
    };

    xml.push_str("      <attributes>\n");
    xml.push_str(&format!("        <divisions>{divisions}</divisions>\n"));
    xml.push_str("        <key>\n");
    xml.push_str("          <fifths>0</fifths>\n");
    xml.push_str("        </key>\n");
    xml.push_str("        <time>\n");
    xml.push_str(&format!("          <beats>{BEATS_PER_MEASURE}</beats>\n"));
    xml.push_str("          <beat-type>4</beat-type>\n");
    xml.push_str("        </time>\n");
    xml.push_str("        <clef>\n");
    xml.push_str("          <sign>G</sign>\n");
    xml.push_str("          <line>2</line>\n");
    xml.push_str("        </clef>\n");
    xml.push_str("      </attributes>\n");

    xml.push_str("      <direction placement=\"above\">\n");
    xml.push_str("        <direction-type>\n");
    xml.push_str("          <metronome>\n");
    xml.push_str("            <beat-unit>quarter</beat-unit>\n");
    xml.push_str(&format!("            <per-minute>{bpm}</per-minute>\n"));
    xml.push_str("          </metronome>\n");
    xml.push_str("        </direction-type>\n");
    xml.push_str(&format!("        <sound tempo=\"{bpm}\"/>\n"));
    xml.push_str("      </direction>\n");
    xml
}

fn note_to_xml(midi_pitch: u8, duration: u32, tie: Tie, lyric: Option<&str>) -> String {
    let (step, alter) = PITCH_CLASSES[(midi_pitch % 12) as usize];
    // MIDI 60 is C4
    let octave = (midi_pitch / 12) as i32 - 1;
    let mut xml = String::new();

    xml.push_str("      <note>\n");
    xml.push_str("        <pitch>\n");
    xml.push_str(&format!("          <step>{step}</step>\n"));
    if alter != 0 {
        xml.push_str(&format!("          <alter>{alter}</alter>\n"));
    }
    xml.push_str(&format!("          <octave>{octave}</octave>\n"));
    xml.push_str("        </pitch>\n");
    xml.push_str(&format!("        <duration>{duration}</duration>\n"));

    let (stop, start) = match tie {
        Tie::None => (false, false),
        Tie::Start => (false, true),
        Tie::Stop => (true, false),
        Tie::Both => (true, true),
    };
    if stop {
        xml.push_str("        <tie type=\"stop\"/>\n");
    }
    if start {
        xml.push_str("        <tie type=\"start\"/>\n");
    }
    xml.push_str("        <voice>1</voice>\n");
    if alter != 0 {
        xml.push_str("        <accidental>sharp</accidental>\n");
    }
    if stop || start {
        xml.push_str("        <notations>\n");
        if stop {
            xml.push_str("          <tied type=\"stop\"/>\n");
        }
        if start {
            xml.push_str("          <tied type=\"start\"/>\n");
        }
        xml.push_str("        </notations>\n");
    }
    if let Some(text) = lyric {
        xml.push_str("        <lyric number=\"1\">\n");
        xml.push_str("          <syllabic>single</syllabic>\n");
        xml.push_str(&format!("          <text>{}</text>\n", escape_xml(text)));
        xml.push_str("        </lyric>\n");
    }
    xml.push_str("      </note>\n");
    xml
}

fn rest_to_xml(duration: u32) -> String {
    let mut xml = String::new();
    xml.push_str("      <note>\n");
    xml.push_str("        <rest/>\n");
    xml.push_str(&format!("        <duration>{duration}</duration>\n"));
    xml.push_str("        <voice>1</voice>\n");
    xml.push_str("      </note>\n");
    xml
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn header_and_attributes() {
        let notes = vec![Note::new(0.0, 4.0, 60).with_lyric("la")];
        let xml = render_musicxml(&notes, 120.0, 480, "demo").unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(xml.contains("<score-partwise version=\"4.0\">"));
        assert!(xml.contains("<work-title>demo</work-title>"));
        assert!(xml.contains("<divisions>480</divisions>"));
        assert!(xml.contains("<per-minute>120</per-minute>"));
        assert!(xml.contains("<duration>1920</duration>"));
        assert!(xml.contains("<text>la</text>"));
        // a full measure needs no padding rest
        assert!(!xml.contains("<rest/>"));
        assert_eq!(xml.matches("<measure ").count(), 1);
    }

    #[test]
    fn sharps_and_octaves() {
        let notes = vec![Note::new(0.0, 1.0, 61), Note::new(0.0, 1.0, 69)];
        let xml = render_musicxml(&notes, 120.0, 480, "t").unwrap();
        assert!(xml.contains("<step>C</step>\n          <alter>1</alter>\n          <octave>4</octave>"));
        assert!(xml.contains("<step>A</step>\n          <octave>4</octave>"));
        assert_eq!(xml.matches("<accidental>sharp</accidental>").count(), 1);
    }

    #[test]
    fn note_across_barline_is_tied() {
        let notes = vec![
            Note::new(0.0, 3.0, 62).with_lyric("one"),
            Note::new(0.0, 2.0, 64).with_lyric("two"),
        ];
        let xml = render_musicxml(&notes, 100.0, 4, "t").unwrap();
        assert_eq!(xml.matches("<measure ").count(), 2);
        assert_eq!(xml.matches("<tie type=\"start\"/>").count(), 1);
        assert_eq!(xml.matches("<tie type=\"stop\"/>").count(), 1);
        // lyric only on the first fragment
        assert_eq!(xml.matches("<text>two</text>").count(), 1);
        // 4 + 4 ticks of fragments, then 12 ticks of rest fill measure 2
        assert!(xml.contains("<rest/>\n        <duration>12</duration>"));
    }

    #[test]
    fn lyric_text_is_escaped() {
        let notes = vec![Note::new(0.0, 1.0, 60).with_lyric("<&>")];
        let xml = render_musicxml(&notes, 120.0, 480, "a & b").unwrap();
        assert!(xml.contains("<text>&lt;&amp;&gt;</text>"));
        assert!(xml.contains("<work-title>a &amp; b</work-title>"));
    }

    #[test]
    fn empty_melody_is_one_rest_measure() {
        let xml = render_musicxml(&[], 120.0, 480, "t").unwrap();
        assert!(xml.contains("<rest/>\n        <duration>1920</duration>"));
    }

    #[test]
    fn writes_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("a").join("line.musicxml");
        write_musicxml(&[Note::new(0.0, 1.0, 60)], 120.0, 480, "line", &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().ends_with("</score-partwise>\n"));
    }
}
