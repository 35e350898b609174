//! Pipeline stages.
//!
//! [`PipelineStage`] names each step of a run.  It is attached to errors and
//! log lines so a failure can be traced to the step that raised it.
//!
//! ```text
//! Syllabify ──▶ TrackPitch ──▶ Extract ──▶ Align ──▶ Export
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// PipelineStage
// ---------------------------------------------------------------------------

/// Steps of a recording → melody run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Transcript → syllable tokens.
    Syllabify,
    /// Samples → per-frame pitch and energy.
    TrackPitch,
    /// Frames → quantised notes.
    Extract,
    /// Syllables + notes → lyric-annotated notes.
    Align,
    /// Notes → output documents.
    Export,
}

impl PipelineStage {
    /// All stages in execution order.
    pub const ALL: [PipelineStage; 5] = [
        PipelineStage::Syllabify,
        PipelineStage::TrackPitch,
        PipelineStage::Extract,
        PipelineStage::Align,
        PipelineStage::Export,
    ];

    /// Short human-readable label for logs and error messages.
    ///
    /// ```
    /// use tts2sv::pipeline::PipelineStage;
    ///
    /// assert_eq!(PipelineStage::TrackPitch.label(), "pitch tracking");
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            PipelineStage::Syllabify => "syllabification",
            PipelineStage::TrackPitch => "pitch tracking",
            PipelineStage::Extract => "note extraction",
            PipelineStage::Align => "alignment",
            PipelineStage::Export => "export",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_unique() {
        let mut labels: Vec<&str> = PipelineStage::ALL.iter().map(|s| s.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), PipelineStage::ALL.len());
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(PipelineStage::Align.to_string(), "alignment");
    }
}
