// Feature standardization
// Z-score transform with per-feature parameters fitted at training time

use crate::audio::features::FEATURE_COUNT;

/// Per-feature mean and scale, in model feature order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaler {
    pub mean: [f64; FEATURE_COUNT],
    pub scale: [f64; FEATURE_COUNT],
}

impl Scaler {
    /// `scaled[i] = (raw[i] - mean[i]) / scale[i]`
    #[inline]
    pub fn transform(&self, raw: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut scaled = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            scaled[i] = (raw[i] - self.mean[i]) / self.scale[i];
        }
        scaled
    }
}
