//! Error type for `banzuke-sync`.

use banzuke_core::source::SourceError;
use thiserror::Error;

use crate::chunk::ChunkError;

/// A fatal error surfaced by the orchestrator. Transient source failures are
/// absorbed by the fetcher's soft-stop policy and never appear here; what
/// does appear halts the current run.
#[derive(Debug, Error)]
pub enum SyncError {
  /// A chunked write failed; prior chunks stay committed.
  #[error("chunk {chunk_index} failed: {source}")]
  Chunk {
    chunk_index: usize,
    source:      Box<dyn std::error::Error + Send + Sync>,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("source error: {0}")]
  Source(#[from] SourceError),

  /// Pagination soft-stopped without yielding a single record.
  #[error("source unavailable: no records after {failures} failed attempts")]
  Unavailable { failures: u32 },

  /// A fan-out worker task panicked or was cancelled.
  #[error("detail task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

impl SyncError {
  pub fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
    Self::Store(Box::new(e))
  }

  /// True when the underlying cause is a definitive upstream miss.
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::Source(e) if e.is_not_found())
  }
}

impl<E: std::error::Error + Send + Sync + 'static> From<ChunkError<E>> for SyncError {
  fn from(e: ChunkError<E>) -> Self {
    Self::Chunk {
      chunk_index: e.chunk_index,
      source:      Box::new(e.source),
    }
  }
}
