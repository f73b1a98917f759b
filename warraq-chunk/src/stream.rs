//! Streaming chunk processing.
//!
//! Pull-based variant of the batch engine for inputs too large to chunk
//! fully in memory: text is read line by line, accumulated into a word
//! buffer, and one processed result is yielded per buffer-full plus a
//! final one for the remainder. Cancellation is caller-driven: dropping
//! the stream stops all work.

use std::future::Future;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use warraq_text::TextAnalyzer;

use crate::chunker::Chunk;
use crate::engine::ChunkError;

/// Lazy chunk-by-chunk processor over an async reader.
///
/// ```ignore
/// let mut stream = ChunkStream::new(reader, 10_000, |chunk| async move {
///     Ok(analyze(&chunk.text))
/// });
/// while let Some(result) = stream.next().await {
///     let analysis = result?;
/// }
/// ```
pub struct ChunkStream<R, F> {
    reader: R,
    processor: F,
    max_words: usize,
    buffer: String,
    words: usize,
    next_index: usize,
    done: bool,
}

impl<R, F, Fut, T> ChunkStream<R, F>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(Chunk) -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    /// Create a stream yielding one result per `max_words`-word buffer.
    pub fn new(reader: R, max_words: usize, processor: F) -> Self {
        Self {
            reader,
            processor,
            max_words: max_words.max(1),
            buffer: String::new(),
            words: 0,
            next_index: 0,
            done: false,
        }
    }

    /// Read until the buffer fills or the input ends, then process it.
    ///
    /// Returns `None` once the input is exhausted. A read error ends the
    /// stream; a processor error does not, so the caller can keep pulling
    /// past a failed chunk.
    pub async fn next(&mut self) -> Option<Result<T, ChunkError>> {
        if self.done {
            return None;
        }

        loop {
            let mut line = String::new();
            match self.reader.read_line(&mut line).await {
                Err(source) => {
                    self.done = true;
                    return Some(Err(ChunkError::Read {
                        index: self.next_index,
                        source,
                    }));
                }
                Ok(0) => {
                    self.done = true;
                    if self.words == 0 {
                        return None;
                    }
                    return Some(self.emit().await);
                }
                Ok(_) => {
                    self.words += line.split_whitespace().count();
                    self.buffer.push_str(&line);
                    if self.words >= self.max_words {
                        return Some(self.emit().await);
                    }
                }
            }
        }
    }

    async fn emit(&mut self) -> Result<T, ChunkError> {
        let analyzer = TextAnalyzer::new();
        let text = std::mem::take(&mut self.buffer);
        let chunk = Chunk {
            index: self.next_index,
            words: self.words,
            paragraphs: analyzer.split_paragraphs(&text).len(),
            text,
        };
        self.words = 0;
        let index = self.next_index;
        self.next_index += 1;

        tracing::debug!(chunk = index, words = chunk.words, "processing streamed chunk");
        (self.processor)(chunk)
            .await
            .map_err(|source| ChunkError::Processor { index, source })
    }
}
