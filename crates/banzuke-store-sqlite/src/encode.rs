//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as ISO 8601
//! (`YYYY-MM-DD`), and the run-log detail payload as compact JSON. An
//! unknown usage date is stored as NULL.

use banzuke_core::{kimarite::UsageDate, rikishi::Rikishi};
use chrono::{DateTime, NaiveDate, Utc};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String {
  d.format("%Y-%m-%d").to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── UsageDate ───────────────────────────────────────────────────────────────

pub fn encode_usage(u: UsageDate) -> Option<String> {
  match u {
    UsageDate::Date(d) => Some(encode_date(d)),
    UsageDate::Unknown => None,
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw column values read directly from a `rikishi` row.
pub struct RawRikishiRow {
  pub id:           i64,
  pub sumodb_id:    Option<i64>,
  pub nsk_id:       Option<i64>,
  pub shikona_en:   String,
  pub shikona_jp:   Option<String>,
  pub current_rank: Option<String>,
  pub heya:         Option<String>,
  pub birth_date:   Option<String>,
  pub shusshin:     Option<String>,
  pub height:       Option<f64>,
  pub weight:       Option<f64>,
  pub debut:        Option<String>,
  pub intai:        Option<String>,
  pub updated_at:   Option<String>,
}

impl RawRikishiRow {
  pub fn into_rikishi(self) -> Result<Rikishi> {
    Ok(Rikishi {
      id:           self.id,
      sumodb_id:    self.sumodb_id,
      nsk_id:       self.nsk_id,
      shikona_en:   self.shikona_en,
      shikona_jp:   self.shikona_jp,
      current_rank: self.current_rank,
      heya:         self.heya,
      birth_date:   self.birth_date.as_deref().map(decode_date).transpose()?,
      shusshin:     self.shusshin,
      height:       self.height,
      weight:       self.weight,
      debut:        self.debut,
      intai:        self.intai.as_deref().map(decode_date).transpose()?,
      updated_at:   self.updated_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}
