// Offline replay
// Streams a recorded signal through a detector tick by tick, as live acquisition would

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::audio::ingest::Recording;
use crate::detector::TouchDetector;
use crate::pipeline::trace::{PredictionRecord, TraceError, TraceWriter};

/// Samples per simulated acquisition tick (0.1 s at 10 kHz)
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Recording has no sample rate")]
    InvalidSampleRate,

    #[error("Chunk size must be non-zero")]
    InvalidChunkSize,

    #[error("Trace write failed: {0}")]
    TraceError(#[from] TraceError),
}

/// A new detection found during replay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TouchEvent {
    pub id: Uuid,

    /// Samples pushed when the detection fired
    pub sample_offset: u64,

    /// `sample_offset` converted to milliseconds from the start of the recording
    pub timestamp_ms: f64,

    pub probability: f32,
}

impl TouchEvent {
    pub fn new(sample_offset: u64, sample_rate: u32, probability: f32) -> Self {
        TouchEvent {
            id: Uuid::new_v4(),
            sample_offset,
            timestamp_ms: sample_offset as f64 * 1000.0 / sample_rate as f64,
            probability,
        }
    }
}

/// Summary of one replay run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayReport {
    pub sample_rate: u32,
    pub samples_processed: u64,

    /// Number of `update` calls that produced a prediction
    pub predictions: usize,

    pub touches: Vec<TouchEvent>,
    pub max_probability: f32,
}

/// Feed `recording` into `detector` in `chunk_size` blocks, pushing then
/// updating once per block. Every prediction is appended to `trace` when given.
pub fn run_replay(
    recording: &Recording,
    detector: &mut TouchDetector,
    chunk_size: usize,
    trace: Option<&TraceWriter>,
) -> Result<ReplayReport, ReplayError> {
    if recording.sample_rate == 0 {
        return Err(ReplayError::InvalidSampleRate);
    }
    if chunk_size == 0 {
        return Err(ReplayError::InvalidChunkSize);
    }

    let mut report = ReplayReport {
        sample_rate: recording.sample_rate,
        samples_processed: 0,
        predictions: 0,
        touches: Vec::new(),
        max_probability: 0.0,
    };

    for chunk in recording.samples.chunks(chunk_size) {
        detector.push_samples(chunk);
        report.samples_processed += chunk.len() as u64;

        if !detector.update(recording.sample_rate) {
            continue;
        }
        report.predictions += 1;

        let probability = detector.touch_probability();
        report.max_probability = report.max_probability.max(probability);

        if detector.is_new_touch() {
            report.touches.push(TouchEvent::new(
                report.samples_processed,
                recording.sample_rate,
                probability,
            ));
        }

        if let Some(writer) = trace {
            if let Some(record) = PredictionRecord::from_detector(detector, report.samples_processed) {
                writer.write(&record)?;
            }
        }
    }

    log::info!(
        "Replayed {} samples: {} predictions, {} touches",
        report.samples_processed,
        report.predictions,
        report.touches.len()
    );

    Ok(report)
}

/// Replay through a fresh detector using the embedded model and default settings
pub fn replay_recording(recording: &Recording) -> Result<ReplayReport, ReplayError> {
    let mut detector = TouchDetector::new();
    run_replay(recording, &mut detector, DEFAULT_CHUNK_SIZE, None)
}
