// Touch Detector - real-time touch classification on a streamed biosignal
// Module declarations and public surface
//
// Typical host loop, once per acquisition tick:
//
//     detector.push_samples(&block);
//     detector.update(sample_rate);
//     let touching = detector.is_touch_detected();

pub mod audio;
pub mod detector;
pub mod ffi;
pub mod model;
pub mod pipeline;

pub use audio::{FeatureVector, Recording};
pub use detector::{DetectionSnapshot, DetectorConfig, TouchDetector};
pub use model::{ForestModel, TOUCH_MODEL};
pub use pipeline::{replay_recording, run_replay, ReplayReport, TouchEvent};
