//! Chunked processing for large manuscripts.
//!
//! Splits arbitrarily large text into paragraph-respecting chunks bounded
//! by a word budget, runs a caller-supplied processor over them with
//! bounded concurrency, merges per-chunk analysis results, and offers a
//! streaming variant for inputs too large to chunk in memory at once.
//!
//! The analysis crates are deliberately not dependencies: processors are
//! injected as async callbacks, and result merging is generic over the
//! caller's classification key.

mod chunker;
mod engine;
mod merge;
mod stream;

pub use chunker::{chunk_text, Chunk};
pub use engine::{BatchReport, ChunkError, ChunkProcessor, ProcessSummary, Progress};
pub use merge::{merge_analysis, merge_text, ChunkAnalysis, MergedAnalysis, Tagged};
pub use stream::ChunkStream;
