// Prediction tracing
// Append-only JSONL log of detector predictions for offline inspection

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::audio::features::FeatureVector;
use crate::detector::TouchDetector;

/// Errors that can occur during trace operations
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// One prediction as recorded in the trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// ISO 8601 wall-clock time the record was created
    pub timestamp: String,

    /// Total samples pushed into the detector when the prediction ran
    pub sample_offset: u64,

    pub probability: f32,
    pub threshold: f32,
    pub detected: bool,

    /// True when this prediction started a new detection
    pub rising_edge: bool,

    pub features: FeatureVector,
}

impl PredictionRecord {
    /// Capture the detector's latest prediction.
    /// Returns None if no prediction has run yet.
    pub fn from_detector(detector: &TouchDetector, sample_offset: u64) -> Option<Self> {
        let features = *detector.last_features()?;
        Some(PredictionRecord {
            timestamp: Utc::now().to_rfc3339(),
            sample_offset,
            probability: detector.touch_probability(),
            threshold: detector.threshold(),
            detected: detector.is_touch_detected(),
            rising_edge: detector.is_new_touch(),
            features,
        })
    }

    /// Serialize to JSON line (with newline)
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{}\n", json))
    }
}

/// Prediction trace writer
/// Manages append-only JSONL trace file
pub struct TraceWriter {
    file_path: PathBuf,
}

impl TraceWriter {
    pub fn new(file_path: PathBuf) -> Self {
        TraceWriter { file_path }
    }

    /// Append a record, creating the file if it doesn't exist
    pub fn write(&self, record: &PredictionRecord) -> Result<(), TraceError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;

        file.write_all(record.to_json_line()?.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    /// Write multiple records with a single open
    pub fn write_batch(&self, records: &[PredictionRecord]) -> Result<(), TraceError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;

        for record in records {
            file.write_all(record.to_json_line()?.as_bytes())?;
        }

        file.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

/// Read prediction records from a JSONL file
pub fn read_trace_file(path: &Path) -> Result<Vec<PredictionRecord>, TraceError> {
    let contents = std::fs::read_to_string(path)?;
    let mut records = Vec::new();

    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let record: PredictionRecord = serde_json::from_str(line)?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn record(sample_offset: u64, probability: f32, detected: bool) -> PredictionRecord {
        PredictionRecord {
            timestamp: Utc::now().to_rfc3339(),
            sample_offset,
            probability,
            threshold: 0.7,
            detected,
            rising_edge: detected,
            features: FeatureVector::default(),
        }
    }

    #[test]
    fn test_record_requires_prediction() {
        let detector = TouchDetector::new();
        assert!(PredictionRecord::from_detector(&detector, 0).is_none());
    }

    #[test]
    fn test_record_from_detector() {
        let mut detector = TouchDetector::new();
        detector.push_samples(&vec![0; 20_000]);
        assert!(detector.update(10_000));

        let record = PredictionRecord::from_detector(&detector, 20_000).unwrap();
        assert_eq!(record.sample_offset, 20_000);
        assert!(!record.detected);
        assert!(!record.rising_edge);
        assert!((record.probability - 0.0235).abs() < 1e-6);
        assert_eq!(record.features, FeatureVector::default());
    }

    #[test]
    fn test_trace_writer() {
        let temp_dir = TempDir::new().unwrap();
        let trace_path = temp_dir.path().join("trace.jsonl");

        let writer = TraceWriter::new(trace_path.clone());
        writer.write(&record(5000, 0.2, false)).unwrap();
        writer.write(&record(10000, 0.9, true)).unwrap();

        let records = read_trace_file(&trace_path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sample_offset, 5000);
        assert!(!records[0].detected);
        assert!(records[1].rising_edge);
        assert_eq!(writer.path(), trace_path.as_path());
    }

    #[test]
    fn test_trace_writer_batch_appends() {
        let temp_dir = TempDir::new().unwrap();
        let trace_path = temp_dir.path().join("trace.jsonl");
        let writer = TraceWriter::new(trace_path.clone());

        writer.write(&record(0, 0.1, false)).unwrap();
        let batch = vec![record(1, 0.1, false), record(2, 0.8, true), record(3, 0.3, false)];
        writer.write_batch(&batch).unwrap();

        let records = read_trace_file(&trace_path).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[3].sample_offset, 3);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let trace_path = temp_dir.path().join("trace.jsonl");

        let line = record(7, 0.5, false).to_json_line().unwrap();
        fs::write(&trace_path, format!("{}\n\n{}", line, line)).unwrap();

        let records = read_trace_file(&trace_path).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_corrupt_line_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let trace_path = temp_dir.path().join("trace.jsonl");
        fs::write(&trace_path, "{\"sample_offset\": }\n").unwrap();

        let result = read_trace_file(&trace_path);
        assert!(matches!(result, Err(TraceError::SerializationError(_))));
    }

    #[test]
    fn test_json_line_format() {
        let json_line = record(1, 0.5, false).to_json_line().unwrap();
        assert!(json_line.ends_with('\n'));

        let parsed: PredictionRecord = serde_json::from_str(json_line.trim()).unwrap();
        assert_eq!(parsed.sample_offset, 1);
    }
}
