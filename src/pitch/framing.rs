//! Centred, zero-padded framing shared by the pitch and energy analysers.
//!
//! Frame `i` is centred on sample `i × hop`, so a clip of `n` samples yields
//! `1 + n / hop` frames.  Samples outside the clip read as silence.

/// Number of centred frames for a clip of `len` samples.
pub fn frame_count(len: usize, hop: usize) -> usize {
    if len == 0 || hop == 0 {
        return 0;
    }
    1 + len / hop
}

/// Copy the frame centred on `center` into `out`, zero-padding at the edges.
pub fn fill_centered(samples: &[f32], center: usize, out: &mut [f32]) {
    let half = out.len() / 2;
    for (offset, slot) in out.iter_mut().enumerate() {
        let pos = (center + offset).checked_sub(half);
        *slot = match pos {
            Some(p) if p < samples.len() => samples[p],
            _ => 0.0,
        };
    }
}

/// RMS of every centred frame.
///
/// ```rust
/// use tts2sv::pitch::frame_rms;
///
/// let rms = frame_rms(&vec![0.5_f32; 1024], 512, 256);
/// assert_eq!(rms.len(), 5);
/// assert!((rms[2] - 0.5).abs() < 1e-6);
/// ```
pub fn frame_rms(samples: &[f32], frame_length: usize, hop: usize) -> Vec<f32> {
    let mut frame = vec![0.0_f32; frame_length];
    (0..frame_count(samples.len(), hop))
        .map(|i| {
            fill_centered(samples, i * hop, &mut frame);
            let mean_sq = frame.iter().map(|s| s * s).sum::<f32>() / frame_length.max(1) as f32;
            mean_sq.sqrt()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_count_matches_centred_layout() {
        assert_eq!(frame_count(0, 256), 0);
        assert_eq!(frame_count(255, 256), 1);
        assert_eq!(frame_count(256, 256), 2);
        assert_eq!(frame_count(22_050, 256), 87);
    }

    #[test]
    fn first_frame_is_left_padded() {
        let samples = [1.0_f32, 2.0, 3.0, 4.0];
        let mut out = [9.0_f32; 4];
        fill_centered(&samples, 0, &mut out);
        assert_eq!(out, [0.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn last_frame_is_right_padded() {
        let samples = [1.0_f32, 2.0, 3.0, 4.0];
        let mut out = [9.0_f32; 4];
        fill_centered(&samples, 4, &mut out);
        assert_eq!(out, [3.0, 4.0, 0.0, 0.0]);
    }

    #[test]
    fn silence_has_zero_rms() {
        assert!(frame_rms(&[0.0; 2048], 512, 256).iter().all(|&r| r == 0.0));
    }
}
