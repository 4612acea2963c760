//! Raw data-transfer types for the upstream JSON API.
//!
//! Field names mirror the source's camelCase wire format. These types are
//! validated at the ingestion boundary (serde deserialisation) and converted
//! to persisted shapes by [`crate::transform`]; nothing downstream touches
//! them.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One page of a paginated listing. The source sometimes omits `total`, and
/// `records` may be `null` instead of an empty array.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
  #[serde(default)]
  pub total:   Option<u64>,
  #[serde(default = "Option::default")]
  pub records: Option<Vec<T>>,
}

impl<T> Page<T> {
  /// The page's records, treating an absent/null array as empty.
  pub fn into_records(self) -> Vec<T> {
    self.records.unwrap_or_default()
  }

  pub fn len(&self) -> usize {
    self.records.as_ref().map_or(0, Vec::len)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

// ─── Rikishi ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRikishi {
  pub id:                  i64,
  #[serde(default)]
  pub sumodb_id:           Option<i64>,
  #[serde(default)]
  pub nsk_id:              Option<i64>,
  pub shikona_en:          String,
  #[serde(default)]
  pub shikona_jp:          Option<String>,
  #[serde(default)]
  pub current_rank:        Option<String>,
  #[serde(default)]
  pub heya:                Option<String>,
  #[serde(default)]
  pub birth_date:          Option<DateTime<Utc>>,
  #[serde(default)]
  pub shusshin:            Option<String>,
  #[serde(default)]
  pub height:              Option<f64>,
  #[serde(default)]
  pub weight:              Option<f64>,
  #[serde(default)]
  pub debut:               Option<String>,
  #[serde(default)]
  pub intai:               Option<DateTime<Utc>>,
  #[serde(default)]
  pub updated_at:          Option<DateTime<Utc>>,
  // History arrays are only present when the matching inclusion flag was set
  // on the request.
  #[serde(default)]
  pub measurement_history: Option<Vec<RawMeasurement>>,
  #[serde(default)]
  pub rank_history:        Option<Vec<RawRank>>,
  #[serde(default)]
  pub shikona_history:     Option<Vec<RawShikona>>,
}

// ─── History ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMeasurement {
  pub id:         String,
  pub basho_id:   String,
  pub rikishi_id: i64,
  #[serde(default)]
  pub height:     Option<f64>,
  #[serde(default)]
  pub weight:     Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRank {
  pub id:         String,
  pub basho_id:   String,
  pub rikishi_id: i64,
  pub rank:       String,
  #[serde(default)]
  pub rank_value: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawShikona {
  pub id:         String,
  pub basho_id:   String,
  pub rikishi_id: i64,
  pub shikona_en: String,
  #[serde(default)]
  pub shikona_jp: Option<String>,
}

// ─── Kimarite ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawKimarite {
  pub kimarite:   String,
  pub count:      i64,
  /// Compact usage token, `"YYYYMM-D"` (basho plus day of tournament).
  #[serde(default)]
  pub last_usage: Option<String>,
}
