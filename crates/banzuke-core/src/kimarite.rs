//! Kimarite — the winning-technique reference catalog.
//!
//! The catalog is small and authoritative each run, so it is mirrored
//! wholesale: cleared and reinserted rather than merged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// When a technique was last used. The upstream token is compact
/// (`"202305-7"`, basho plus day); anything unparsable resolves to the
/// explicit `Unknown` marker rather than a malformed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum UsageDate {
  Date(NaiveDate),
  Unknown,
}

/// A winning technique, keyed by its natural-language name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kimarite {
  pub name:       String,
  /// Total recorded uses across all bouts known to the source.
  pub count:      i64,
  pub last_usage: UsageDate,
}
