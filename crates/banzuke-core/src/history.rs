//! History sub-records — per-basho events attached to a rikishi.
//!
//! Each record carries its own external ID and is foreign-keyed to both a
//! rikishi and a basho. Semantics are insert-or-replace by ID; history is
//! never deleted.

use serde::{Deserialize, Serialize};

/// A height/weight measurement taken at a basho.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
  pub id:         String,
  pub basho_id:   String,
  pub rikishi_id: i64,
  pub height:     Option<f64>,
  pub weight:     Option<f64>,
}

/// The rank held at a basho.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankChange {
  pub id:         String,
  pub basho_id:   String,
  pub rikishi_id: i64,
  pub rank:       String,
  /// Numeric ordering key assigned by the source; lower is higher-ranked.
  pub rank_value: Option<i64>,
}

/// The ring name used at a basho.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shikona {
  pub id:         String,
  pub basho_id:   String,
  pub rikishi_id: i64,
  pub shikona_en: String,
  pub shikona_jp: Option<String>,
}
