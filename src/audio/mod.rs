// Audio processing module
// Sample buffering, window feature extraction and recording ingestion

pub mod features;
pub mod ingest;
pub mod ring_buffer;

pub use features::{extract_features, FeatureExtractor, FeatureVector, FEATURE_COUNT};
pub use ingest::{ingest_wav, read_wav_file, AudioError, Recording};
pub use ring_buffer::SampleRing;
