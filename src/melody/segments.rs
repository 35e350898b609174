//! Voiced segment detection over a per-frame pitch/energy track.
//!
//! ## Algorithm
//!
//! 1. Noise gate = 25th percentile of all strictly positive frame energies
//!    (linear interpolation between order statistics); `0.0` when there are
//!    none.
//! 2. A frame is *voiced* when it has a finite, positive frequency estimate
//!    and its energy is at or above the gate.
//! 3. Contiguous voiced runs become segments (inclusive frame ranges).
//! 4. Neighbouring segments separated by at most [`GAP_TOLERANCE_SEC`] of
//!    unvoiced frames are merged, bridging brief dips inside a syllable.
//! 5. Segments shorter than [`MIN_SEGMENT_FRAMES`] are dropped.

use crate::pitch::{is_defined_frequency, FrameTrack};

/// Largest unvoiced gap (seconds) bridged when merging segments.
pub const GAP_TOLERANCE_SEC: f64 = 0.05;

/// Segments with fewer frames than this are discarded as blips.
pub const MIN_SEGMENT_FRAMES: usize = 3;

// ---------------------------------------------------------------------------
// VoicedSegment
// ---------------------------------------------------------------------------

/// An inclusive range of frame indices judged to contain one note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoicedSegment {
    /// First frame of the segment.
    pub start: usize,
    /// Last frame of the segment (inclusive).
    pub end: usize,
}

impl VoicedSegment {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of frames covered, counting both ends.
    pub fn frame_count(&self) -> usize {
        self.end - self.start + 1
    }
}

// ---------------------------------------------------------------------------
// Gate and mask
// ---------------------------------------------------------------------------

/// 25th percentile of the strictly positive energies, or `0.0` if none.
pub fn noise_gate(energies: &[f32]) -> f32 {
    let mut positive: Vec<f32> = energies.iter().copied().filter(|&e| e > 0.0).collect();
    if positive.is_empty() {
        return 0.0;
    }
    positive.sort_by(f32::total_cmp);

    let rank = 0.25 * (positive.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = (rank - lower as f64) as f32;
    positive[lower] + (positive[upper] - positive[lower]) * frac
}

/// Per-frame voicing decision against `gate`.
pub fn voiced_mask(track: &FrameTrack, gate: f32) -> Vec<bool> {
    track
        .frequencies()
        .iter()
        .zip(track.energies())
        .map(|(freq, &energy)| freq.is_some_and(is_defined_frequency) && energy >= gate)
        .collect()
}

// ---------------------------------------------------------------------------
// Segmentation
// ---------------------------------------------------------------------------

/// Split `mask` into maximal runs of `true`.
fn voiced_runs(mask: &[bool]) -> Vec<VoicedSegment> {
    let mut segments = Vec::new();
    let mut open: Option<usize> = None;

    for (idx, &voiced) in mask.iter().enumerate() {
        match (voiced, open) {
            (true, None) => open = Some(idx),
            (false, Some(start)) => {
                segments.push(VoicedSegment::new(start, idx - 1));
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        segments.push(VoicedSegment::new(start, mask.len() - 1));
    }
    segments
}

/// Merge segments whose unvoiced gap is within [`GAP_TOLERANCE_SEC`].
fn merge_close(segments: Vec<VoicedSegment>, frame_duration: f64) -> Vec<VoicedSegment> {
    let mut merged: Vec<VoicedSegment> = Vec::with_capacity(segments.len());
    for segment in segments {
        match merged.last_mut() {
            Some(prev) => {
                let gap = (segment.start - prev.end - 1) as f64 * frame_duration;
                if gap <= GAP_TOLERANCE_SEC {
                    prev.end = segment.end;
                } else {
                    merged.push(segment);
                }
            }
            None => merged.push(segment),
        }
    }
    merged
}

/// Find the voiced segments of `track`, in chronological order.
///
/// An empty result means nothing survived; the note quantizer then falls
/// back to a single synthetic note.
pub fn find_voiced_segments(track: &FrameTrack) -> Vec<VoicedSegment> {
    let gate = noise_gate(track.energies());
    let mask = voiced_mask(track, gate);
    let runs = voiced_runs(&mask);
    let run_count = runs.len();

    let segments: Vec<VoicedSegment> = merge_close(runs, track.frame_duration())
        .into_iter()
        .filter(|s| s.frame_count() >= MIN_SEGMENT_FRAMES)
        .collect();

    log::debug!(
        "segments: gate={gate:.5}, voiced frames={}/{}, runs={run_count}, kept={}",
        mask.iter().filter(|&&v| v).count(),
        mask.len(),
        segments.len()
    );
    segments
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
