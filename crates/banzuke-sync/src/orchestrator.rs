//! The run orchestrator.
//!
//! Sequences a synchronization pass through its stages:
//!
//! ```text
//! FetchList → TransformList → WriteList → ListIds → FetchDetails → Done
//! ```
//!
//! with `Error` reachable from any stage. Three initiation modes: a bounded
//! continuation step (caller supplies an offset and gets back the next
//! offset plus a completion flag), a bulk run to completion, and the
//! kimarite catalog mirror. Every attempt appends a run-log entry; on
//! failure the entry is written before the error surfaces, and a failure to
//! write it is swallowed so the original error is never masked.

use banzuke_core::{
  kimarite::Kimarite,
  rikishi::Rikishi,
  run_log::NewRunLog,
  source::{IncludeFlags, SumoSource},
  store::SyncStore,
  transform,
};
use serde_json::json;

use crate::{
  audit,
  chunk::{write_chunks, write_chunks_lossy},
  fanout::{fan_out_details, import_detail, DetailCounts, FanoutPolicy, FanoutReport},
  fetch::{fetch_all_pages, FetchPolicy},
  SyncError,
};

// ─── Stages ──────────────────────────────────────────────────────────────────

/// Where a run is (or was, when it failed). The string form lands in the
/// run-log detail payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  FetchList,
  TransformList,
  WriteList,
  ListIds,
  FetchDetails,
  Done,
  Error,
}

impl Stage {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::FetchList => "fetch_list",
      Self::TransformList => "transform_list",
      Self::WriteList => "write_list",
      Self::ListIds => "list_ids",
      Self::FetchDetails => "fetch_details",
      Self::Done => "done",
      Self::Error => "error",
    }
  }
}

// ─── Options ─────────────────────────────────────────────────────────────────

/// Everything a run needs decided up front. Constructed by the HTTP layer
/// from query parameters, or from defaults.
#[derive(Debug, Clone)]
pub struct SyncOptions {
  pub fetch:       FetchPolicy,
  /// Chunk size for primary-entity and catalog writes.
  pub chunk_size:  usize,
  pub fanout:      FanoutPolicy,
  /// Optional cap on records processed in one run.
  pub max_records: Option<usize>,
  /// Shrink batches and short-circuit after one chunk, for inspection.
  pub debug:       bool,
}

impl Default for SyncOptions {
  fn default() -> Self {
    Self {
      fetch:       FetchPolicy::default(),
      chunk_size:  100,
      fanout:      FanoutPolicy::default(),
      max_records: None,
      debug:       false,
    }
  }
}

impl SyncOptions {
  /// The options a run actually executes with. Debug mode clamps chunk
  /// sizes to at most five records, fetches a single page, and caps the run
  /// at one chunk.
  fn effective(&self) -> Self {
    if !self.debug {
      return self.clone();
    }
    let mut opts = self.clone();
    opts.chunk_size = opts.chunk_size.min(5);
    opts.fanout.chunk_size = opts.fanout.chunk_size.min(5);
    opts.fetch.max_pages = 1;
    opts.max_records = Some(opts.chunk_size);
    opts
  }
}

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Result of one continuation step.
#[derive(Debug)]
pub struct StepOutcome {
  /// Primary entities written this step.
  pub processed: usize,
  /// Offset to supply to the next step.
  pub next_skip: u64,
  /// True when pagination is exhausted and no further step is needed.
  pub done:      bool,
  pub details:   FanoutReport,
}

/// Result of a bulk run.
#[derive(Debug)]
pub struct RunSummary {
  pub rikishi_written: usize,
  pub pages_fetched:   usize,
  pub declared_total:  Option<u64>,
  /// False when pagination stopped at the page cap or the failure
  /// threshold rather than cleanly.
  pub complete:        bool,
  pub details:         FanoutReport,
}

/// Result of a catalog mirror run.
#[derive(Debug)]
pub struct KimariteSummary {
  pub fetched:       usize,
  pub written:       usize,
  pub failed_chunks: Vec<usize>,
}

// ─── Runner ──────────────────────────────────────────────────────────────────

/// Drives full synchronization passes over a source/store pair.
#[derive(Clone)]
pub struct SyncRunner<Src, St> {
  source:  Src,
  store:   St,
  options: SyncOptions,
}

impl<Src, St> SyncRunner<Src, St>
where
  Src: SumoSource + Clone + Send + Sync + 'static,
  St: SyncStore + Clone + Send + Sync + 'static,
{
  pub fn new(source: Src, store: St, options: SyncOptions) -> Self {
    Self { source, store, options }
  }

  // ── Continuation mode ──────────────────────────────────────────────────

  /// Process one page starting at `skip`: fetch, transform, chunked write,
  /// detail fan-out for that page's IDs. Returns the next offset and
  /// whether the listing is exhausted.
  pub async fn run_step(&self, skip: u64) -> Result<StepOutcome, SyncError> {
    let opts = self.options.effective();

    match self.step_inner(&opts, skip).await {
      Ok(outcome) => {
        self
          .log_success(
            "rikishi",
            outcome.processed,
            json!({
              "stage": Stage::Done.as_str(),
              "skip": skip,
              "next_skip": outcome.next_skip,
              "done": outcome.done,
              "details_succeeded": outcome.details.succeeded,
              "details_failed": outcome.details.failed,
            }),
          )
          .await;
        Ok(outcome)
      }
      Err((stage, e)) => Err(self.log_failure("rikishi", stage, e).await),
    }
  }

  async fn step_inner(
    &self,
    opts: &SyncOptions,
    skip: u64,
  ) -> Result<StepOutcome, (Stage, SyncError)> {
    // One page per step; the retry/backoff policy still applies to it.
    let mut fetch_policy = opts.fetch.clone();
    fetch_policy.max_pages = 1;

    let haul = fetch_all_pages(&fetch_policy, skip, |s, l| {
      self.source.fetch_rikishi_page(s, l, IncludeFlags::default())
    })
    .await;

    let mut rikishi: Vec<Rikishi> =
      haul.records.iter().map(transform::rikishi_from_raw).collect();
    if let Some(max) = opts.max_records {
      rikishi.truncate(max);
    }

    let processed = write_chunks(&rikishi, opts.chunk_size, |c| async move {
      self.store.upsert_rikishi(&c).await
    })
    .await
    .map_err(|e| (Stage::WriteList, e.into()))?;

    let ids: Vec<i64> = rikishi.iter().map(|r| r.id).collect();
    let details =
      fan_out_details(&self.source, &self.store, &ids, &opts.fanout).await;

    // Soft-stopped with nothing fetched: there is no offset to advance to,
    // so report the listing as finished rather than looping in place.
    let done = haul.complete || rikishi.is_empty();

    Ok(StepOutcome { processed, next_skip: haul.next_skip, done, details })
  }

  // ── Bulk mode ──────────────────────────────────────────────────────────

  /// Run every stage to completion, optionally capped by `max_records`.
  pub async fn run_full(&self) -> Result<RunSummary, SyncError> {
    let opts = self.options.effective();

    match self.full_inner(&opts).await {
      Ok(summary) => {
        self
          .log_success(
            "rikishi",
            summary.rikishi_written,
            json!({
              "stage": Stage::Done.as_str(),
              "pages": summary.pages_fetched,
              "declared_total": summary.declared_total,
              "complete": summary.complete,
              "details_succeeded": summary.details.succeeded,
              "details_failed": summary.details.failed,
            }),
          )
          .await;
        Ok(summary)
      }
      Err((stage, e)) => Err(self.log_failure("rikishi", stage, e).await),
    }
  }

  async fn full_inner(
    &self,
    opts: &SyncOptions,
  ) -> Result<RunSummary, (Stage, SyncError)> {
    let haul = fetch_all_pages(&opts.fetch, 0, |s, l| {
      self.source.fetch_rikishi_page(s, l, IncludeFlags::default())
    })
    .await;

    let mut rikishi: Vec<Rikishi> =
      haul.records.iter().map(transform::rikishi_from_raw).collect();
    if let Some(max) = opts.max_records {
      rikishi.truncate(max);
    }

    let rikishi_written = write_chunks(&rikishi, opts.chunk_size, |c| async move {
      self.store.upsert_rikishi(&c).await
    })
    .await
    .map_err(|e| (Stage::WriteList, e.into()))?;

    // Fan out over every ID the store knows, not just this fetch: details
    // for previously-imported entities get refreshed too.
    let mut ids: Vec<i64> = Vec::new();
    loop {
      let page = self
        .store
        .list_rikishi_ids(1000, ids.len() as u64)
        .await
        .map_err(|e| (Stage::ListIds, SyncError::store(e)))?;
      if page.is_empty() {
        break;
      }
      ids.extend(page);
    }
    if let Some(max) = opts.max_records {
      ids.truncate(max);
    }

    let details =
      fan_out_details(&self.source, &self.store, &ids, &opts.fanout).await;

    Ok(RunSummary {
      rikishi_written,
      pages_fetched: haul.pages_fetched,
      declared_total: haul.declared_total,
      complete: haul.complete,
      details,
    })
  }

  // ── Catalog mode ───────────────────────────────────────────────────────

  /// Mirror the kimarite catalog: full clear, then chunked reinsert.
  /// Failed chunks are logged and skipped; the catalog is small and the
  /// next run replaces it wholesale anyway. If the fetch yields nothing
  /// without terminating cleanly, the existing catalog is left in place
  /// and the run fails.
  pub async fn run_kimarite(&self) -> Result<KimariteSummary, SyncError> {
    let opts = self.options.effective();

    let haul = fetch_all_pages(&opts.fetch, 0, |s, l| {
      self.source.fetch_kimarite_page(s, l)
    })
    .await;

    // A soft-stopped haul with nothing in it means the upstream is down,
    // not that the catalog is empty. Clearing now would wipe the existing
    // rows and reinsert nothing, so the mirror is skipped entirely.
    if haul.records.is_empty() && !haul.complete {
      return Err(
        self
          .log_failure(
            "kimarite",
            Stage::FetchList,
            SyncError::Unavailable { failures: haul.failures },
          )
          .await,
      );
    }

    let mut catalog: Vec<Kimarite> =
      haul.records.iter().map(transform::kimarite_from_raw).collect();
    if let Some(max) = opts.max_records {
      catalog.truncate(max);
    }

    if let Err(e) = self.store.clear_kimarite().await {
      return Err(
        self
          .log_failure("kimarite", Stage::WriteList, SyncError::store(e))
          .await,
      );
    }

    let report = write_chunks_lossy(&catalog, opts.chunk_size, |c| async move {
      self.store.upsert_kimarite(&c).await
    })
    .await;

    let summary = KimariteSummary {
      fetched:       catalog.len(),
      written:       report.written,
      failed_chunks: report.failed_chunks,
    };

    self
      .log_success(
        "kimarite",
        summary.written,
        json!({
          "stage": Stage::Done.as_str(),
          "fetched": summary.fetched,
          "failed_chunks": summary.failed_chunks.clone(),
        }),
      )
      .await;

    Ok(summary)
  }

  // ── Single-entity mode ─────────────────────────────────────────────────

  /// Import one rikishi's detail record, with run-log provenance.
  pub async fn run_detail(&self, id: i64) -> Result<DetailCounts, SyncError> {
    let opts = self.options.effective();

    match import_detail(
      &self.source,
      &self.store,
      id,
      opts.fanout.include,
      opts.fanout.chunk_size,
    )
    .await
    {
      Ok(counts) => {
        self
          .log_success(
            "rikishi_detail",
            1,
            json!({
              "stage": Stage::Done.as_str(),
              "rikishi_id": id,
              "bashos": counts.bashos,
              "measurements": counts.measurements,
              "ranks": counts.ranks,
              "shikonas": counts.shikonas,
            }),
          )
          .await;
        Ok(counts)
      }
      Err(e) => Err(self.log_failure("rikishi_detail", Stage::FetchDetails, e).await),
    }
  }

  // ── Audit helpers ──────────────────────────────────────────────────────

  async fn log_success(&self, source: &str, processed: usize, detail: serde_json::Value) {
    audit::record_run(
      &self.store,
      NewRunLog {
        source:            source.to_owned(),
        records_processed: processed as i64,
        success:           true,
        detail,
      },
    )
    .await;
  }

  /// Enter the `Error` terminal state: write the failure entry (swallowing
  /// audit failures), then hand the original error back.
  async fn log_failure(&self, source: &str, stage: Stage, e: SyncError) -> SyncError {
    tracing::error!(source, stage = stage.as_str(), error = %e, "run failed");
    audit::record_run(
      &self.store,
      NewRunLog {
        source:            source.to_owned(),
        records_processed: 0,
        success:           false,
        detail:            json!({
          "stage": Stage::Error.as_str(),
          "failed_at": stage.as_str(),
          "error": e.to_string(),
        }),
      },
    )
    .await;
    e
  }
}
