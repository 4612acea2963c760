//! The `SyncStore` trait — the idempotent upsert sink.
//!
//! Implemented by storage backends (e.g. `banzuke-store-sqlite`). Higher
//! layers depend on this abstraction, not on any concrete backend.
//!
//! Every `upsert_*` method is keyed by the entity's natural unique key and
//! must be idempotent: replaying the same slice yields the same stored set.
//! The run log is append-only.

use std::future::Future;

use crate::{
  basho::Basho,
  history::{Measurement, RankChange, Shikona},
  kimarite::Kimarite,
  rikishi::Rikishi,
  run_log::{NewRunLog, RunLog},
};

/// Abstraction over the relational store the sync pipeline writes into.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait SyncStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Upserts (idempotent, natural-key conflict resolution) ─────────────

  /// Upsert rikishi by `id`. Returns the number of records written.
  fn upsert_rikishi<'a>(
    &'a self,
    records: &'a [Rikishi],
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// Upsert bashos by `id`. Must be called before any history record that
  /// references them.
  fn upsert_bashos<'a>(
    &'a self,
    records: &'a [Basho],
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  fn upsert_measurements<'a>(
    &'a self,
    records: &'a [Measurement],
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  fn upsert_ranks<'a>(
    &'a self,
    records: &'a [RankChange],
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  fn upsert_shikonas<'a>(
    &'a self,
    records: &'a [Shikona],
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  // ── Kimarite catalog (full mirror) ─────────────────────────────────────

  /// Delete the whole catalog. Issued once per catalog run, before the
  /// chunked reinsert.
  fn clear_kimarite(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Upsert techniques by `name`.
  fn upsert_kimarite<'a>(
    &'a self,
    records: &'a [Kimarite],
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  // ── Reads ──────────────────────────────────────────────────────────────

  /// Page through stored rikishi IDs in ascending order.
  fn list_rikishi_ids(
    &self,
    limit: usize,
    offset: u64,
  ) -> impl Future<Output = Result<Vec<i64>, Self::Error>> + Send + '_;

  /// Retrieve a rikishi by ID. Returns `None` if not found.
  fn get_rikishi(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Rikishi>, Self::Error>> + Send + '_;

  // ── Run log (append-only) ──────────────────────────────────────────────

  /// Append a provenance entry and return the persisted row.
  fn append_run_log(
    &self,
    entry: NewRunLog,
  ) -> impl Future<Output = Result<RunLog, Self::Error>> + Send + '_;
}
