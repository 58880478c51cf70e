// Detection module
// Streaming touch detector state machine and its persistent configuration

pub mod config;
pub mod touch;

pub use config::{ConfigError, DetectorConfig, DEFAULT_COOLDOWN_SECONDS, DEFAULT_THRESHOLD};
pub use touch::{DetectionSnapshot, TouchDetector, BUFFER_CAPACITY, HOP_SECONDS};
