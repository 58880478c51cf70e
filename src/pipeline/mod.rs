// Pipeline module
// Offline replay of recorded signals and prediction tracing

pub mod replay;
pub mod trace;

pub use replay::{replay_recording, run_replay, ReplayError, ReplayReport, TouchEvent, DEFAULT_CHUNK_SIZE};
pub use trace::{read_trace_file, PredictionRecord, TraceError, TraceWriter};
