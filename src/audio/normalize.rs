//! Loudness normalisation applied to every loaded clip.
//!
//! Two steps, in order:
//!
//! | Step | Target |
//! |------|--------|
//! | Peak | largest absolute sample becomes [`TARGET_PEAK`] |
//! | RMS  | RMS becomes [`TARGET_RMS`], then samples are clipped to `[-1, 1]` |
//!
//! Both divisions are guarded by [`EPSILON`], so silence stays silence.

/// Peak level after the first step.
pub const TARGET_PEAK: f32 = 0.99;

/// RMS level after the second step.
pub const TARGET_RMS: f32 = 0.1;

/// Added to the peak and mean square before dividing.
pub const EPSILON: f32 = 1e-9;

/// Normalise `samples` in place.
pub fn normalize(samples: &mut [f32]) {
    if samples.is_empty() {
        return;
    }

    let peak = samples.iter().fold(0.0_f32, |m, s| m.max(s.abs())) + EPSILON;
    let peak_gain = TARGET_PEAK / peak;
    samples.iter_mut().for_each(|s| *s *= peak_gain);

    let mean_square = samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32;
    let rms = (mean_square + EPSILON).sqrt();
    let rms_gain = TARGET_RMS / rms;
    samples
        .iter_mut()
        .for_each(|s| *s = (*s * rms_gain).clamp(-1.0, 1.0));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    #[test]
    fn quiet_sine_reaches_target_rms() {
        let mut samples: Vec<f32> = (0..16_000)
            .map(|i| 0.01 * (i as f32 * 0.05).sin())
            .collect();
        normalize(&mut samples);
        assert!((rms(&samples) - TARGET_RMS).abs() < 1e-3, "rms = {}", rms(&samples));
    }

    #[test]
    fn impulse_is_clipped() {
        // one loud sample in silence needs a huge RMS gain
        let mut samples = vec![0.0_f32; 1000];
        samples[500] = 0.5;
        normalize(&mut samples);
        assert_eq!(samples[500], 1.0);
        assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn silence_stays_silent() {
        let mut samples = vec![0.0_f32; 64];
        normalize(&mut samples);
        assert!(samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn empty_is_noop() {
        let mut samples: Vec<f32> = Vec::new();
        normalize(&mut samples);
        assert!(samples.is_empty());
    }
}
