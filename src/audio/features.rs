// Window feature extraction
// Computes the five time-domain statistics the touch model was trained on

use serde::{Deserialize, Serialize};

use crate::audio::ring_buffer::SampleRing;

/// Number of features per window, fixed by the model artifact
pub const FEATURE_COUNT: usize = 5;

/// Divisor that maps an i16 sample into [-1.0, 1.0)
pub const SAMPLE_SCALE: f64 = 32768.0;

/// Quantile used for the percentile feature
pub const PERCENTILE: f64 = 0.9;

/// Statistical features of one analysis window, computed on the
/// normalized, DC-removed signal.
///
/// Field order matches the feature indices used by the forest.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Root-mean-square amplitude
    pub rms: f64,

    /// max - min
    pub peak_to_peak: f64,

    /// Population standard deviation around the window's own mean
    pub std_dev: f64,

    /// 90th percentile of absolute amplitude
    pub percentile_90: f64,

    /// Mean absolute amplitude
    pub mean_abs: f64,
}

impl FeatureVector {
    /// Features in model index order
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.rms,
            self.peak_to_peak,
            self.std_dev,
            self.percentile_90,
            self.mean_abs,
        ]
    }
}

/// Reusable extractor. Scratch space is allocated once for the largest
/// window it will ever see, so extraction in the detection loop is
/// allocation-free.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    window: Vec<f64>,
    magnitudes: Vec<f64>,
}

impl FeatureExtractor {
    /// Create an extractor able to handle windows up to `max_window` samples
    pub fn with_capacity(max_window: usize) -> Self {
        FeatureExtractor {
            window: vec![0.0; max_window],
            magnitudes: vec![0.0; max_window],
        }
    }

    /// Largest window this extractor accepts
    pub fn max_window(&self) -> usize {
        self.window.len()
    }

    /// Extract features from the `window_len` most recent samples in `ring`.
    ///
    /// The caller guarantees `0 < window_len <= ring.len()` and
    /// `window_len <= self.max_window()`.
    pub fn extract(&mut self, ring: &SampleRing, window_len: usize) -> FeatureVector {
        debug_assert!(window_len > 0 && window_len <= ring.len());
        debug_assert!(window_len <= self.max_window());

        let window = &mut self.window[..window_len];
        for (slot, sample) in window.iter_mut().zip(ring.latest(window_len)) {
            *slot = sample as f64 / SAMPLE_SCALE;
        }

        compute_features(window, &mut self.magnitudes[..window_len])
    }
}

/// Extract features from a standalone block of samples (offline analysis).
/// Returns all-zero features for an empty block.
pub fn extract_features(samples: &[i16]) -> FeatureVector {
    if samples.is_empty() {
        return FeatureVector::default();
    }

    let mut window: Vec<f64> = samples.iter().map(|&s| s as f64 / SAMPLE_SCALE).collect();
    let mut magnitudes = vec![0.0; samples.len()];
    compute_features(&mut window, &mut magnitudes)
}

/// Core statistics. `window` holds normalized samples and is DC-corrected
/// in place; `magnitudes` is scratch of the same length.
///
/// RMS and standard deviation are computed separately even though they
/// coincide after DC removal; the trained model expects both definitions.
fn compute_features(window: &mut [f64], magnitudes: &mut [f64]) -> FeatureVector {
    let n = window.len();
    let len = n as f64;

    // DC offset removal
    let mean = window.iter().sum::<f64>() / len;
    for value in window.iter_mut() {
        *value -= mean;
    }

    let sum_sq: f64 = window.iter().map(|v| v * v).sum();
    let rms = (sum_sq / len).sqrt();

    let mut min = window[0];
    let mut max = window[0];
    for &value in window[1..].iter() {
        if value < min {
            min = value;
        }
        if value > max {
            max = value;
        }
    }
    let peak_to_peak = max - min;

    let centered_mean = window.iter().sum::<f64>() / len;
    let sum_dev: f64 = window
        .iter()
        .map(|v| {
            let diff = v - centered_mean;
            diff * diff
        })
        .sum();
    let std_dev = (sum_dev / len).sqrt();

    for (magnitude, value) in magnitudes.iter_mut().zip(window.iter()) {
        *magnitude = value.abs();
    }
    let mean_abs = magnitudes.iter().sum::<f64>() / len;

    // Selection yields the same element a full ascending sort would put at this index
    let index = ((PERCENTILE * len) as usize).min(n - 1);
    let (_, percentile_90, _) = magnitudes.select_nth_unstable_by(index, f64::total_cmp);

    FeatureVector {
        rms,
        peak_to_peak,
        std_dev,
        percentile_90: *percentile_90,
        mean_abs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(amplitude: f64, freq: f64, sample_rate: f64, len: usize) -> Vec<i16> {
        (0..len)
            .map(|i| {
                let phase = 2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate;
                (amplitude * phase.sin()).round() as i16
            })
            .collect()
    }

    #[test]
    fn test_dc_signal_has_zero_energy() {
        for offset in [1i16, 5000, -12000, i16::MAX] {
            let features = extract_features(&vec![offset; 4000]);
            assert!(features.rms.abs() < 1e-12);
            assert!(features.peak_to_peak.abs() < 1e-12);
            assert!(features.std_dev.abs() < 1e-12);
            assert!(features.percentile_90.abs() < 1e-12);
            assert!(features.mean_abs.abs() < 1e-12);
        }
    }

    #[test]
    fn test_empty_block_is_zero() {
        assert_eq!(extract_features(&[]), FeatureVector::default());
    }

    #[test]
    fn test_sine_features_match_closed_form() {
        // 200 whole periods of a 100 Hz tone at 10 kHz
        let amplitude = 3277.0;
        let samples = sine(amplitude, 100.0, 10000.0, 20000);
        let features = extract_features(&samples);

        let a = amplitude / SAMPLE_SCALE;
        assert!((features.rms - a / 2f64.sqrt()).abs() < 1e-4);
        assert!((features.std_dev - features.rms).abs() < 1e-12);
        assert!((features.peak_to_peak - 2.0 * a).abs() < 1e-4);
        assert!((features.mean_abs - 2.0 * a / std::f64::consts::PI).abs() < 1e-3);
        assert!(features.percentile_90 <= a + 1e-9);
        assert!(features.percentile_90 > 0.95 * a);
    }

    #[test]
    fn test_sine_golden_values() {
        let samples = sine(3277.0, 100.0, 10000.0, 20000);
        let features = extract_features(&samples);

        assert!((features.rms - 0.07071681272147423).abs() < 1e-9);
        assert!((features.peak_to_peak - 0.20001220703125).abs() < 1e-12);
        assert!((features.percentile_90 - 0.099212646484375).abs() < 1e-12);
        assert!((features.mean_abs - 0.0636468505859375).abs() < 1e-9);
    }

    #[test]
    fn test_percentile_index_uses_floor() {
        // Zero-mean block with magnitudes 1,1,2,2,..,10,10: index 18 holds 10
        // (an interpolating percentile would give 9.1)
        let samples: Vec<i16> = (-10..=10).filter(|&v| v != 0).collect();
        let features = extract_features(&samples);
        assert!((features.percentile_90 - 10.0 / SAMPLE_SCALE).abs() < 1e-12);
    }

    #[test]
    fn test_single_sample_window() {
        let features = extract_features(&[1234]);
        assert_eq!(features.rms, 0.0);
        assert_eq!(features.percentile_90, 0.0);
    }

    #[test]
    fn test_extractor_reads_latest_window() {
        let mut ring = SampleRing::new(64);
        ring.push(&vec![20000; 40]);
        ring.push(&[-100, 100, -100, 100]);

        let mut extractor = FeatureExtractor::with_capacity(64);
        let features = extractor.extract(&ring, 4);

        let expected = extract_features(&[-100, 100, -100, 100]);
        assert_eq!(features, expected);
        assert!((features.peak_to_peak - 200.0 / SAMPLE_SCALE).abs() < 1e-12);
    }

    #[test]
    fn test_extractor_matches_offline_across_wrap() {
        let mut ring = SampleRing::new(50);
        let samples = sine(8000.0, 3.0, 100.0, 130);
        ring.push(&samples);

        let mut extractor = FeatureExtractor::with_capacity(50);
        let features = extractor.extract(&ring, 50);
        assert_eq!(features, extract_features(&samples[80..]));
    }
}
