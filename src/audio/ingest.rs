// Recording ingestion
// Reads recorded signal WAV files into the raw i16 stream the detector consumes

use hound::{SampleFormat, WavReader};
use std::io::{Cursor, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Failed to read WAV file: {0}")]
    WavReadError(#[from] hound::Error),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid audio data")]
    InvalidData,
}

/// A recorded signal, downmixed to mono
#[derive(Debug, Clone)]
pub struct Recording {
    /// Raw 16-bit samples, one per frame
    pub samples: Vec<i16>,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Channel count of the source file
    pub channels: u16,
}

impl Recording {
    /// Duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 * 1000.0 / self.sample_rate as f64
    }
}

/// Ingest a WAV file from raw bytes
pub fn ingest_wav(data: &[u8]) -> Result<Recording, AudioError> {
    read_recording(WavReader::new(Cursor::new(data))?)
}

/// Ingest a WAV file from disk
pub fn read_wav_file(path: &Path) -> Result<Recording, AudioError> {
    read_recording(WavReader::open(path)?)
}

fn read_recording<R: Read>(mut reader: WavReader<R>) -> Result<Recording, AudioError> {
    let spec = reader.spec();

    // The detector's feature scaling assumes 16-bit integer PCM
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(AudioError::UnsupportedFormat(format!(
            "{:?} {}-bit audio",
            spec.sample_format, spec.bits_per_sample
        )));
    }
    if spec.channels == 0 || spec.sample_rate == 0 {
        return Err(AudioError::InvalidData);
    }

    let interleaved = reader
        .samples::<i16>()
        .collect::<Result<Vec<_>, _>>()?;

    let samples = if spec.channels == 1 {
        interleaved
    } else {
        // Average channels
        interleaved
            .chunks_exact(spec.channels as usize)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / frame.len() as i32) as i16
            })
            .collect()
    };

    Ok(Recording {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}
