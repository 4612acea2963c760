//! Handlers for the `/sync` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/sync/rikishi` | One continuation step; `?skip=` resumes |
//! | `POST` | `/sync/rikishi/full` | Bulk run to completion |
//! | `POST` | `/sync/kimarite` | Catalog mirror |
//! | `POST` | `/sync/rikishi/:id` | Single-entity detail import, 404 if unknown upstream |
//! | `OPTIONS` | any of the above | Bare `200` pre-flight |
//!
//! Tuning query parameters are shared across routes: `limit` (page size),
//! `chunk` (upsert batch size), `group` (fan-out concurrency),
//! `measurements`/`ranks`/`shikonas` (history categories, default all),
//! `max_records`, `max_pages`, `debug`.

use axum::{
  Json,
  extract::{Path, Query, State, rejection::PathRejection},
  http::StatusCode,
};
use banzuke_core::{source::SumoSource, store::SyncStore};
use banzuke_sync::{SyncOptions, SyncRunner};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{AppState, error::ApiError};

// ─── Query parameters ─────────────────────────────────────────────────────────

/// Per-request tuning knobs. Anything omitted falls back to the
/// [`SyncOptions`] defaults.
#[derive(Debug, Default, Deserialize)]
pub struct SyncParams {
  pub skip:         Option<u64>,
  pub limit:        Option<usize>,
  pub chunk:        Option<usize>,
  pub group:        Option<usize>,
  pub measurements: Option<bool>,
  pub ranks:        Option<bool>,
  pub shikonas:     Option<bool>,
  pub max_records:  Option<usize>,
  pub max_pages:    Option<usize>,
  pub debug:        Option<bool>,
}

impl SyncParams {
  fn options(&self) -> SyncOptions {
    let mut opts = SyncOptions::default();
    if let Some(limit) = self.limit {
      opts.fetch.page_limit = limit.clamp(1, 1000);
    }
    if let Some(pages) = self.max_pages {
      opts.fetch.max_pages = pages.max(1);
    }
    if let Some(chunk) = self.chunk {
      opts.chunk_size = chunk.max(1);
      opts.fanout.chunk_size = chunk.max(1);
    }
    if let Some(group) = self.group {
      opts.fanout.group_size = group.max(1);
    }
    if let Some(m) = self.measurements {
      opts.fanout.include.measurements = m;
    }
    if let Some(r) = self.ranks {
      opts.fanout.include.ranks = r;
    }
    if let Some(s) = self.shikonas {
      opts.fanout.include.shikonas = s;
    }
    opts.max_records = self.max_records;
    opts.debug = self.debug.unwrap_or(false);
    opts
  }
}

// ─── Envelope ─────────────────────────────────────────────────────────────────

fn envelope(message: &str, mut fields: Value) -> Json<Value> {
  fields["message"] = json!(message);
  fields["timestamp"] = json!(Utc::now().to_rfc3339());
  Json(fields)
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

/// `OPTIONS` pre-flight on any sync path.
pub async fn preflight() -> StatusCode {
  StatusCode::OK
}

/// `POST /sync/rikishi[?skip=N&...]`
pub async fn step<Src, St>(
  State(state): State<AppState<Src, St>>,
  Query(params): Query<SyncParams>,
) -> Result<Json<Value>, ApiError>
where
  Src: SumoSource + Clone + Send + Sync + 'static,
  St: SyncStore + Clone + Send + Sync + 'static,
{
  let skip = params.skip.unwrap_or(0);
  let runner = SyncRunner::new(state.source.clone(), state.store.clone(), params.options());
  let outcome = runner.run_step(skip).await?;

  Ok(envelope(
    "rikishi sync step complete",
    json!({
      "processed": outcome.processed,
      "next_skip": outcome.next_skip,
      "done": outcome.done,
      "details_succeeded": outcome.details.succeeded,
      "details_failed": outcome.details.failed,
      "bashos": outcome.details.bashos,
      "measurements": outcome.details.measurements,
      "ranks": outcome.details.ranks,
      "shikonas": outcome.details.shikonas,
    }),
  ))
}

/// `POST /sync/rikishi/full[?max_records=N&...]`
pub async fn full<Src, St>(
  State(state): State<AppState<Src, St>>,
  Query(params): Query<SyncParams>,
) -> Result<Json<Value>, ApiError>
where
  Src: SumoSource + Clone + Send + Sync + 'static,
  St: SyncStore + Clone + Send + Sync + 'static,
{
  let runner = SyncRunner::new(state.source.clone(), state.store.clone(), params.options());
  let summary = runner.run_full().await?;

  Ok(envelope(
    "rikishi sync complete",
    json!({
      "processed": summary.rikishi_written,
      "pages": summary.pages_fetched,
      "declared_total": summary.declared_total,
      "done": summary.complete,
      "details_succeeded": summary.details.succeeded,
      "details_failed": summary.details.failed,
      "bashos": summary.details.bashos,
      "measurements": summary.details.measurements,
      "ranks": summary.details.ranks,
      "shikonas": summary.details.shikonas,
    }),
  ))
}

/// `POST /sync/kimarite`
pub async fn kimarite<Src, St>(
  State(state): State<AppState<Src, St>>,
  Query(params): Query<SyncParams>,
) -> Result<Json<Value>, ApiError>
where
  Src: SumoSource + Clone + Send + Sync + 'static,
  St: SyncStore + Clone + Send + Sync + 'static,
{
  let runner = SyncRunner::new(state.source.clone(), state.store.clone(), params.options());
  let summary = runner.run_kimarite().await?;

  Ok(envelope(
    "kimarite sync complete",
    json!({
      "fetched": summary.fetched,
      "written": summary.written,
      "failed_chunks": summary.failed_chunks,
    }),
  ))
}

/// `POST /sync/rikishi/:id` — a malformed ID is a `400` in the standard
/// error envelope, not a bare extractor rejection.
pub async fn detail<Src, St>(
  State(state): State<AppState<Src, St>>,
  id: Result<Path<i64>, PathRejection>,
  Query(params): Query<SyncParams>,
) -> Result<Json<Value>, ApiError>
where
  Src: SumoSource + Clone + Send + Sync + 'static,
  St: SyncStore + Clone + Send + Sync + 'static,
{
  let Path(id) = id.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let runner = SyncRunner::new(state.source.clone(), state.store.clone(), params.options());
  let counts = runner.run_detail(id).await?;

  Ok(envelope(
    "rikishi detail import complete",
    json!({
      "rikishi_id": id,
      "bashos": counts.bashos,
      "measurements": counts.measurements,
      "ranks": counts.ranks,
      "shikonas": counts.shikonas,
    }),
  ))
}
