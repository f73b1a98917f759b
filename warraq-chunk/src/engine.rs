//! Bounded-concurrency chunk processing.
//!
//! Chunks run in fixed-size batches: up to `concurrency` processor
//! futures are in flight at once, and a new batch never starts before the
//! previous one has fully settled. Within a batch, futures settle
//! independently, so one chunk's failure never aborts its siblings and
//! progress is reported as each chunk finishes.

use std::future::Future;

use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};

use crate::chunker::Chunk;

/// Failure at the chunk boundary.
#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    /// The injected processor returned an error for one chunk.
    #[error("chunk {index} failed: {source}")]
    Processor {
        index: usize,
        #[source]
        source: anyhow::Error,
    },

    /// The underlying stream could not be read.
    #[error("read failed before chunk {index}: {source}")]
    Read {
        index: usize,
        #[source]
        source: std::io::Error,
    },
}

impl ChunkError {
    /// Index of the chunk this failure belongs to.
    pub fn index(&self) -> usize {
        match self {
            ChunkError::Processor { index, .. } | ChunkError::Read { index, .. } => *index,
        }
    }
}

/// Cumulative progress, reported after every chunk settles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: usize,
    pub failed: usize,
    pub total: usize,
    pub percent: f32,
}

/// Run summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessSummary {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    /// completed / total × 100
    pub success_rate: f32,
}

/// Outcome of one batch run.
///
/// `results` holds successful values in chunk order; failed chunks are
/// excluded from it but recorded in `failures` and counted in `summary`.
#[derive(Debug)]
pub struct BatchReport<T> {
    pub results: Vec<T>,
    pub failures: Vec<ChunkError>,
    pub summary: ProcessSummary,
}

/// Batch executor for chunk processing.
#[derive(Debug, Clone)]
pub struct ChunkProcessor {
    concurrency: usize,
}

impl Default for ChunkProcessor {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

impl ChunkProcessor {
    /// Create an executor with the given concurrency bound.
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    /// Concurrency bound.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Process all chunks, discarding progress events.
    pub async fn process<T, F, Fut>(&self, chunks: Vec<Chunk>, processor: F) -> BatchReport<T>
    where
        F: Fn(Chunk) -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        self.process_with_progress(chunks, processor, |_| {}).await
    }

    /// Process all chunks, invoking `on_progress` after every settle.
    pub async fn process_with_progress<T, F, Fut, P>(
        &self,
        chunks: Vec<Chunk>,
        processor: F,
        mut on_progress: P,
    ) -> BatchReport<T>
    where
        F: Fn(Chunk) -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
        P: FnMut(&Progress),
    {
        let total = chunks.len();
        let mut slots: Vec<Option<T>> = (0..total).map(|_| None).collect();
        let mut failures: Vec<ChunkError> = Vec::new();
        let mut completed = 0;
        let mut failed = 0;

        for (batch_number, batch) in chunks.chunks(self.concurrency).enumerate() {
            tracing::debug!(batch = batch_number, size = batch.len(), "dispatching chunk batch");

            // All futures of the batch are created up front and settle in
            // any order; the loop below drains every one of them before
            // the next batch is dispatched.
            let mut in_flight: FuturesUnordered<_> = batch
                .iter()
                .enumerate()
                .map(|(offset, chunk)| {
                    let index = batch_number * self.concurrency + offset;
                    let work = processor(chunk.clone());
                    async move { (index, work.await) }
                })
                .collect();

            while let Some((index, outcome)) = in_flight.next().await {
                match outcome {
                    Ok(value) => {
                        completed += 1;
                        slots[index] = Some(value);
                    }
                    Err(source) => {
                        failed += 1;
                        tracing::warn!(chunk = index, error = %source, "chunk processing failed");
                        failures.push(ChunkError::Processor { index, source });
                    }
                }
                on_progress(&Progress {
                    completed,
                    failed,
                    total,
                    percent: (completed + failed) as f32 / total as f32 * 100.0,
                });
            }
        }

        failures.sort_by_key(ChunkError::index);
        BatchReport {
            results: slots.into_iter().flatten().collect(),
            failures,
            summary: ProcessSummary {
                total,
                completed,
                failed,
                success_rate: if total == 0 {
                    0.0
                } else {
                    completed as f32 / total as f32 * 100.0
                },
            },
        }
    }
}
