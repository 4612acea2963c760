//! Error types for `banzuke-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed basho id: {0:?}")]
  BadBashoId(String),

  #[error("basho month out of range in {0:?}")]
  BashoMonthOutOfRange(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
