//! The `SumoSource` trait — the upstream paginated data source.
//!
//! Implemented by `banzuke-client` over HTTP; the sync pipeline and its
//! tests depend only on this abstraction.

use std::future::Future;

use thiserror::Error;

use crate::raw::{Page, RawKimarite, RawRikishi};

// ─── Inclusion flags ─────────────────────────────────────────────────────────

/// Which history categories a rikishi fetch should carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncludeFlags {
  pub measurements: bool,
  pub ranks:        bool,
  pub shikonas:     bool,
}

impl IncludeFlags {
  /// Request every history category.
  pub fn all() -> Self {
    Self { measurements: true, ranks: true, shikonas: true }
  }

  /// True when at least one category is requested.
  pub fn any(&self) -> bool {
    self.measurements || self.ranks || self.shikonas
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// What went wrong talking to the source. Transport, status, and decode
/// failures are all transient from the fetcher's point of view; `NotFound`
/// is definitive.
#[derive(Debug, Error)]
pub enum SourceError {
  #[error("transport error: {0}")]
  Transport(String),

  #[error("{endpoint} returned status {code}")]
  Status { endpoint: String, code: u16 },

  #[error("malformed payload from {endpoint}: {message}")]
  Decode { endpoint: String, message: String },

  #[error("not found: {0}")]
  NotFound(String),
}

impl SourceError {
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound(_))
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the upstream sports-statistics API.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (tokio with axum) and inside spawned
/// fan-out tasks.
pub trait SumoSource: Send + Sync {
  /// Fetch one page of the rikishi listing at `skip`/`limit`.
  fn fetch_rikishi_page(
    &self,
    skip: u64,
    limit: usize,
    include: IncludeFlags,
  ) -> impl Future<Output = Result<Page<RawRikishi>, SourceError>> + Send + '_;

  /// Fetch a single rikishi by ID, with the requested history categories.
  fn fetch_rikishi_detail(
    &self,
    id: i64,
    include: IncludeFlags,
  ) -> impl Future<Output = Result<RawRikishi, SourceError>> + Send + '_;

  /// Fetch one page of the kimarite catalog.
  fn fetch_kimarite_page(
    &self,
    skip: u64,
    limit: usize,
  ) -> impl Future<Output = Result<Page<RawKimarite>, SourceError>> + Send + '_;
}
