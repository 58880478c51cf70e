// Touch detector
// Rolling sample buffer -> window features -> forest probability -> debounced touch flag

use serde::Serialize;

use crate::audio::features::{FeatureExtractor, FeatureVector};
use crate::audio::ring_buffer::SampleRing;
use crate::detector::config::{DetectorConfig, DEFAULT_COOLDOWN_SECONDS, DEFAULT_THRESHOLD};
use crate::model::{ForestModel, TOUCH_MODEL};

/// Samples retained by the detector: 6 seconds at 10 kHz
pub const BUFFER_CAPACITY: usize = 60_000;

/// Time between predictions. Independent of the model's window duration.
pub const HOP_SECONDS: f64 = 0.5;

/// Point-in-time view of the detector for hosts that poll once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetectionSnapshot {
    pub detected: bool,
    pub probability: f32,
    pub threshold: f32,
    pub enough_data: bool,
    pub enabled: bool,

    /// Features behind `probability`, if a prediction has run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureVector>,
}

/// Streaming touch / no-touch classifier for one signal channel.
///
/// Feed raw samples with [`push_samples`](Self::push_samples) and call
/// [`update`](Self::update) from the same tick; a prediction runs at most
/// once per hop (half a second of samples). A new detection requires the
/// probability to exceed the threshold *and* the cooldown to have elapsed
/// since the previous one; the flag clears as soon as a prediction falls
/// to or below the threshold.
///
/// All storage is allocated at construction. Calls on one instance must be
/// serialized by the owner; separate instances share only the static model.
pub struct TouchDetector {
    model: &'static ForestModel,
    ring: SampleRing,
    extractor: FeatureExtractor,

    buffer_filled: bool,
    touch_detected: bool,
    new_touch: bool,
    touch_probability: f32,
    last_features: Option<FeatureVector>,

    threshold: f32,
    cooldown_seconds: f32,
    enabled: bool,

    samples_since_last_prediction: u64,
    samples_since_last_detection: u64,
    hop_samples: u64,
}

impl TouchDetector {
    /// Detector backed by the embedded touch model
    pub fn new() -> Self {
        Self::with_model(&TOUCH_MODEL)
    }

    /// Detector backed by a specific model artifact
    pub fn with_model(model: &'static ForestModel) -> Self {
        TouchDetector {
            model,
            ring: SampleRing::new(BUFFER_CAPACITY),
            extractor: FeatureExtractor::with_capacity(BUFFER_CAPACITY),
            buffer_filled: false,
            touch_detected: false,
            new_touch: false,
            touch_probability: 0.0,
            last_features: None,
            threshold: DEFAULT_THRESHOLD,
            cooldown_seconds: DEFAULT_COOLDOWN_SECONDS,
            enabled: false,
            samples_since_last_prediction: 0,
            samples_since_last_detection: 0,
            hop_samples: 0,
        }
    }

    /// Embedded model with settings taken from `config`
    pub fn from_config(config: &DetectorConfig) -> Self {
        let mut detector = Self::new();
        detector.apply_config(config);
        detector
    }

    /// Append raw samples. Never runs a prediction.
    pub fn push_samples(&mut self, samples: &[i16]) {
        self.ring.push(samples);
        let count = samples.len() as u64;
        self.samples_since_last_prediction = self.samples_since_last_prediction.saturating_add(count);
        self.samples_since_last_detection = self.samples_since_last_detection.saturating_add(count);
    }

    /// Run a prediction if a full window is buffered and a hop has elapsed.
    /// Returns true iff a new probability was computed by this call.
    pub fn update(&mut self, sample_rate: u32) -> bool {
        if sample_rate == 0 {
            return false;
        }

        let window = self.window_samples(sample_rate);
        if self.ring.len() < window {
            self.buffer_filled = false;
            return false;
        }
        self.buffer_filled = true;

        self.hop_samples = (sample_rate as f64 * HOP_SECONDS) as u64;
        if self.samples_since_last_prediction < self.hop_samples {
            return false;
        }
        self.samples_since_last_prediction = 0;

        let features = self.extractor.extract(&self.ring, window);
        let probability = self.model.probability(&features);
        self.touch_probability = probability as f32;
        self.last_features = Some(features);

        // Cooldown gates new detections only; clearing is unconditional
        let cooldown_samples = (self.cooldown_seconds * sample_rate as f32) as u64;
        let above = probability > self.threshold as f64;
        self.new_touch = above && self.samples_since_last_detection > cooldown_samples;
        if self.new_touch {
            self.touch_detected = true;
            self.samples_since_last_detection = 0;
            log::debug!("Touch detected (p = {:.3})", probability);
        } else if !above {
            self.touch_detected = false;
        }

        log::trace!(
            "Prediction p = {:.4}, detected = {}",
            probability,
            self.touch_detected
        );
        true
    }

    /// Window length for `sample_rate`, clamped to the buffer
    pub fn window_samples(&self, sample_rate: u32) -> usize {
        let samples = (self.model.window_seconds * sample_rate as f64) as usize;
        samples.clamp(1, self.ring.capacity())
    }

    pub fn is_touch_detected(&self) -> bool {
        self.touch_detected
    }

    /// Whether the most recent prediction started a new detection
    /// (a rising edge that passed the cooldown)
    pub fn is_new_touch(&self) -> bool {
        self.new_touch
    }

    pub fn touch_probability(&self) -> f32 {
        self.touch_probability
    }

    /// The model is linked in at build time, so this holds for any
    /// non-empty artifact
    pub fn is_model_loaded(&self) -> bool {
        self.model.n_trees() > 0
    }

    /// Whether the last valid `update` found a full window buffered
    pub fn has_enough_data(&self) -> bool {
        self.buffer_filled
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    pub fn cooldown_seconds(&self) -> f32 {
        self.cooldown_seconds
    }

    pub fn set_cooldown_seconds(&mut self, seconds: f32) {
        self.cooldown_seconds = seconds;
    }

    /// Samples between predictions as of the last valid `update` (0 before any)
    pub fn hop_samples(&self) -> u64 {
        self.hop_samples
    }

    /// Samples currently held in the rolling buffer
    pub fn buffered_samples(&self) -> usize {
        self.ring.len()
    }

    pub fn last_features(&self) -> Option<&FeatureVector> {
        self.last_features.as_ref()
    }

    pub fn model(&self) -> &'static ForestModel {
        self.model
    }

    /// Replace the tunable settings
    pub fn apply_config(&mut self, config: &DetectorConfig) {
        self.enabled = config.enabled;
        self.threshold = config.threshold;
        self.cooldown_seconds = config.cooldown_seconds;
        log::info!(
            "Touch detector configured: enabled = {}, threshold = {}, cooldown = {}s",
            config.enabled,
            config.threshold,
            config.cooldown_seconds
        );
    }

    /// Current settings as a persistable config
    pub fn config(&self) -> DetectorConfig {
        DetectorConfig {
            enabled: self.enabled,
            threshold: self.threshold,
            cooldown_seconds: self.cooldown_seconds,
        }
    }

    pub fn snapshot(&self) -> DetectionSnapshot {
        DetectionSnapshot {
            detected: self.touch_detected,
            probability: self.touch_probability,
            threshold: self.threshold,
            enough_data: self.buffer_filled,
            enabled: self.enabled,
            features: self.last_features,
        }
    }
}

impl Default for TouchDetector {
    fn default() -> Self {
        Self::new()
    }
}
