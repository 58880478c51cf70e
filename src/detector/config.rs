// Detector configuration
// User-tunable knobs, persisted as JSON alongside the host application's settings

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Probability cutoff used when no configuration is supplied
pub const DEFAULT_THRESHOLD: f32 = 0.7;

/// Minimum time between two positive detections
pub const DEFAULT_COOLDOWN_SECONDS: f32 = 2.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f32),

    #[error("Cooldown must be a non-negative number of seconds, got {0}")]
    InvalidCooldown(f32),
}

/// Persistent detector settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Advisory flag for the host; the detector does not gate itself on it
    pub enabled: bool,

    /// Ensemble probability above which a touch is reported
    pub threshold: f32,

    /// Seconds that must pass after a detection before the next one
    pub cooldown_seconds: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            enabled: false,
            threshold: DEFAULT_THRESHOLD,
            cooldown_seconds: DEFAULT_COOLDOWN_SECONDS,
        }
    }
}

impl DetectorConfig {
    /// Check that values are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        if !self.cooldown_seconds.is_finite() || self.cooldown_seconds < 0.0 {
            return Err(ConfigError::InvalidCooldown(self.cooldown_seconds));
        }
        Ok(())
    }

    /// Serialize config to JSON bytes
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Deserialize and validate config from JSON bytes.
    /// Missing fields take their default values.
    pub fn from_json_bytes(data: &[u8]) -> Result<Self, ConfigError> {
        let config: DetectorConfig = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read(path)?;
        Self::from_json_bytes(&data)
    }

    /// Write config to a JSON file, replacing any existing one
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        std::fs::write(path, self.to_json_bytes()?)?;
        Ok(())
    }
}
