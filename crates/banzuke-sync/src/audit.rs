//! Run-log call-through.
//!
//! Provenance is best-effort: a failure to write the audit entry is logged
//! and swallowed so it can never mask the run's primary result.

use banzuke_core::{run_log::NewRunLog, store::SyncStore};

/// Append a run-log entry, swallowing any sink failure.
pub async fn record_run<St: SyncStore>(store: &St, entry: NewRunLog) {
  let source = entry.source.clone();
  if let Err(e) = store.append_run_log(entry).await {
    tracing::warn!(source, error = %e, "failed to write run log entry");
  }
}
