//! The chunked upsert writer.
//!
//! Partitions a record slice into fixed-size chunks and issues one
//! idempotent store call per chunk. Two failure modes: [`write_chunks`]
//! aborts on the first failed chunk (list/detail flows), while
//! [`write_chunks_lossy`] logs and continues (batch catalog flows). Either
//! way a failed chunk leaves the chunks before it committed; there is no
//! compensating rollback.

use std::future::Future;

use thiserror::Error;

/// A chunk write failure, carrying the index of the chunk that failed and
/// the underlying storage error.
#[derive(Debug, Error)]
#[error("chunk {chunk_index} failed: {source}")]
pub struct ChunkError<E: std::error::Error> {
  pub chunk_index: usize,
  #[source]
  pub source:      E,
}

/// What a log-and-continue pass got done.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ChunkReport {
  pub written:       usize,
  pub failed_chunks: Vec<usize>,
}

/// Write `records` in chunks of `chunk_size`, aborting on the first failed
/// chunk. Returns the number of records written. A `chunk_size` of zero is
/// clamped to one.
pub async fn write_chunks<T, E, F, Fut>(
  records: &[T],
  chunk_size: usize,
  mut write: F,
) -> Result<usize, ChunkError<E>>
where
  T: Clone,
  E: std::error::Error,
  F: FnMut(Vec<T>) -> Fut,
  Fut: Future<Output = Result<usize, E>>,
{
  let chunk_size = chunk_size.max(1);
  let mut written = 0;

  for (chunk_index, chunk) in records.chunks(chunk_size).enumerate() {
    match write(chunk.to_vec()).await {
      Ok(n) => written += n,
      Err(source) => return Err(ChunkError { chunk_index, source }),
    }
  }

  Ok(written)
}

/// Like [`write_chunks`], but a failed chunk is logged and skipped rather
/// than aborting the pass.
pub async fn write_chunks_lossy<T, E, F, Fut>(
  records: &[T],
  chunk_size: usize,
  mut write: F,
) -> ChunkReport
where
  T: Clone,
  E: std::error::Error,
  F: FnMut(Vec<T>) -> Fut,
  Fut: Future<Output = Result<usize, E>>,
{
  let chunk_size = chunk_size.max(1);
  let mut report = ChunkReport::default();

  for (chunk_index, chunk) in records.chunks(chunk_size).enumerate() {
    match write(chunk.to_vec()).await {
      Ok(n) => report.written += n,
      Err(e) => {
        tracing::warn!(chunk_index, error = %e, "chunk write failed, continuing");
        report.failed_chunks.push(chunk_index);
      }
    }
  }

  report
}
