//! Run-log entries — append-only provenance, one per orchestration attempt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted run-log row. Never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLog {
  /// Store-assigned rowid.
  pub id:                i64,
  pub source:            String,
  pub records_processed: i64,
  pub success:           bool,
  /// Free-form diagnostic payload (stage name, counts, error text).
  pub detail:            serde_json::Value,
  /// Store-assigned timestamp.
  pub created_at:        DateTime<Utc>,
}

/// Input to [`crate::store::SyncStore::append_run_log`].
/// `id` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewRunLog {
  pub source:            String,
  pub records_processed: i64,
  pub success:           bool,
  pub detail:            serde_json::Value,
}

impl NewRunLog {
  /// Convenience constructor with an empty detail payload.
  pub fn new(source: impl Into<String>, records_processed: i64, success: bool) -> Self {
    Self {
      source: source.into(),
      records_processed,
      success,
      detail: serde_json::Value::Null,
    }
  }
}
