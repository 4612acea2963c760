//! Rikishi — the primary synchronized entity.
//!
//! A rikishi is identified by the stable integer ID assigned by the upstream
//! source. IDs are globally unique and never reassigned; upsert-on-conflict
//! is the only mutation path.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A wrestler record in its persisted shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rikishi {
  pub id:           i64,
  pub sumodb_id:    Option<i64>,
  pub nsk_id:       Option<i64>,
  /// Ring name, romanised. Always present upstream.
  pub shikona_en:   String,
  pub shikona_jp:   Option<String>,
  pub current_rank: Option<String>,
  /// Training stable.
  pub heya:         Option<String>,
  pub birth_date:   Option<NaiveDate>,
  /// Place of origin.
  pub shusshin:     Option<String>,
  pub height:       Option<f64>,
  pub weight:       Option<f64>,
  /// Debut basho token, `"YYYYMM"`.
  pub debut:        Option<String>,
  /// Retirement date, if retired.
  pub intai:        Option<NaiveDate>,
  pub updated_at:   Option<DateTime<Utc>>,
}
