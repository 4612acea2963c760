//! The record transformer: raw wire shapes to persisted shapes.
//!
//! Everything here is a pure function of its input — no I/O, deterministic.
//! Malformed derived values (basho IDs, usage dates) resolve to a warning
//! plus an explicit fallback rather than an error, so one bad token never
//! sinks a whole page.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::{
  basho::Basho,
  history::{Measurement, RankChange, Shikona},
  kimarite::{Kimarite, UsageDate},
  raw::{RawKimarite, RawMeasurement, RawRank, RawRikishi, RawShikona},
  rikishi::Rikishi,
  Error, Result,
};

// ─── Basho decomposition ─────────────────────────────────────────────────────

/// Decompose a `"YYYYMM"` basho ID into a [`Basho`].
pub fn basho_from_id(id: &str) -> Result<Basho> {
  if id.len() != 6 || !id.bytes().all(|b| b.is_ascii_digit()) {
    return Err(Error::BadBashoId(id.to_owned()));
  }

  // Both slices are all-digit and short, so parsing cannot fail.
  let year: i32 = id[..4].parse().map_err(|_| Error::BadBashoId(id.to_owned()))?;
  let month: u32 = id[4..].parse().map_err(|_| Error::BadBashoId(id.to_owned()))?;

  if !(1..=12).contains(&month) {
    return Err(Error::BashoMonthOutOfRange(id.to_owned()));
  }

  Ok(Basho { id: id.to_owned(), year, month })
}

/// Collect the distinct bashos referenced by a rikishi's history arrays,
/// sorted by ID. Malformed references are skipped with a warning.
pub fn bashos_from_histories(raw: &RawRikishi) -> Vec<Basho> {
  let mut ids: BTreeSet<&str> = BTreeSet::new();

  for m in raw.measurement_history.iter().flatten() {
    ids.insert(&m.basho_id);
  }
  for r in raw.rank_history.iter().flatten() {
    ids.insert(&r.basho_id);
  }
  for s in raw.shikona_history.iter().flatten() {
    ids.insert(&s.basho_id);
  }

  ids
    .into_iter()
    .filter_map(|id| match basho_from_id(id) {
      Ok(basho) => Some(basho),
      Err(e) => {
        tracing::warn!(basho_id = id, error = %e, "skipping malformed basho reference");
        None
      }
    })
    .collect()
}

// ─── Usage dates ─────────────────────────────────────────────────────────────

/// Normalise a compact `"YYYYMM-D"` usage token to a calendar date.
///
/// `"202305-7"` becomes `2023-05-07`. Any token that does not parse — wrong
/// shape, bad digits, impossible calendar date — resolves to
/// [`UsageDate::Unknown`].
pub fn usage_date(token: &str) -> UsageDate {
  let parsed = token.split_once('-').and_then(|(basho_id, day)| {
    let basho = basho_from_id(basho_id).ok()?;
    let day: u32 = day.parse().ok()?;
    NaiveDate::from_ymd_opt(basho.year, basho.month, day)
  });

  match parsed {
    Some(date) => UsageDate::Date(date),
    None => {
      tracing::warn!(token, "unparsable usage date, recording as unknown");
      UsageDate::Unknown
    }
  }
}

// ─── Per-entity conversions ──────────────────────────────────────────────────

/// Map a raw rikishi record to its persisted shape. History arrays are not
/// carried over; they convert separately via the `*_from_raw` helpers.
pub fn rikishi_from_raw(raw: &RawRikishi) -> Rikishi {
  Rikishi {
    id:           raw.id,
    sumodb_id:    raw.sumodb_id,
    nsk_id:       raw.nsk_id,
    shikona_en:   raw.shikona_en.clone(),
    shikona_jp:   raw.shikona_jp.clone(),
    current_rank: raw.current_rank.clone(),
    heya:         raw.heya.clone(),
    birth_date:   raw.birth_date.map(|dt| dt.date_naive()),
    shusshin:     raw.shusshin.clone(),
    height:       raw.height,
    weight:       raw.weight,
    debut:        raw.debut.clone(),
    intai:        raw.intai.map(|dt| dt.date_naive()),
    updated_at:   raw.updated_at,
  }
}

pub fn measurement_from_raw(raw: &RawMeasurement) -> Measurement {
  Measurement {
    id:         raw.id.clone(),
    basho_id:   raw.basho_id.clone(),
    rikishi_id: raw.rikishi_id,
    height:     raw.height,
    weight:     raw.weight,
  }
}

pub fn rank_from_raw(raw: &RawRank) -> RankChange {
  RankChange {
    id:         raw.id.clone(),
    basho_id:   raw.basho_id.clone(),
    rikishi_id: raw.rikishi_id,
    rank:       raw.rank.clone(),
    rank_value: raw.rank_value,
  }
}

pub fn shikona_from_raw(raw: &RawShikona) -> Shikona {
  Shikona {
    id:         raw.id.clone(),
    basho_id:   raw.basho_id.clone(),
    rikishi_id: raw.rikishi_id,
    shikona_en: raw.shikona_en.clone(),
    shikona_jp: raw.shikona_jp.clone(),
  }
}

pub fn kimarite_from_raw(raw: &RawKimarite) -> Kimarite {
  Kimarite {
    name:       raw.kimarite.clone(),
    count:      raw.count,
    last_usage: raw
      .last_usage
      .as_deref()
      .map_or(UsageDate::Unknown, usage_date),
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn raw_rikishi_with_histories() -> RawRikishi {
    RawRikishi {
      id:                  42,
      sumodb_id:           None,
      nsk_id:              None,
      shikona_en:          "Testnoumi".to_owned(),
      shikona_jp:          None,
      current_rank:        Some("Maegashira 3 East".to_owned()),
      heya:                None,
      birth_date:          None,
      shusshin:            None,
      height:              Some(184.0),
      weight:              Some(152.5),
      debut:               Some("201503".to_owned()),
      intai:               None,
      updated_at:          None,
      measurement_history: Some(vec![
        RawMeasurement {
          id:         "202301-42".to_owned(),
          basho_id:   "202301".to_owned(),
          rikishi_id: 42,
          height:     Some(184.0),
          weight:     Some(150.0),
        },
        RawMeasurement {
          id:         "202303-42".to_owned(),
          basho_id:   "202303".to_owned(),
          rikishi_id: 42,
          height:     Some(184.0),
          weight:     Some(152.5),
        },
      ]),
      rank_history:        Some(vec![RawRank {
        id:         "202301-42".to_owned(),
        basho_id:   "202301".to_owned(),
        rikishi_id: 42,
        rank:       "Maegashira 5 West".to_owned(),
        rank_value: Some(505),
      }]),
      shikona_history:     None,
    }
  }

  // ── Basho decomposition ─────────────────────────────────────────────────

  #[test]
  fn basho_id_decomposes_to_year_and_month() {
    let basho = basho_from_id("202305").unwrap();
    assert_eq!(basho.year, 2023);
    assert_eq!(basho.month, 5);
    assert_eq!(basho.id, "202305");
  }

  #[test]
  fn basho_id_rejects_wrong_shape() {
    assert!(matches!(basho_from_id("2023"), Err(Error::BadBashoId(_))));
    assert!(matches!(basho_from_id("20230x"), Err(Error::BadBashoId(_))));
    assert!(matches!(basho_from_id(""), Err(Error::BadBashoId(_))));
  }

  #[test]
  fn basho_id_rejects_month_out_of_range() {
    assert!(matches!(
      basho_from_id("202300"),
      Err(Error::BashoMonthOutOfRange(_))
    ));
    assert!(matches!(
      basho_from_id("202313"),
      Err(Error::BashoMonthOutOfRange(_))
    ));
  }

  #[test]
  fn histories_yield_distinct_sorted_bashos() {
    // Three references across two categories, one duplicated: exactly two
    // distinct bashos come back.
    let bashos = bashos_from_histories(&raw_rikishi_with_histories());
    assert_eq!(bashos.len(), 2);
    assert_eq!(bashos[0].id, "202301");
    assert_eq!((bashos[0].year, bashos[0].month), (2023, 1));
    assert_eq!(bashos[1].id, "202303");
    assert_eq!((bashos[1].year, bashos[1].month), (2023, 3));
  }

  #[test]
  fn malformed_basho_references_are_skipped() {
    let mut raw = raw_rikishi_with_histories();
    raw
      .measurement_history
      .as_mut()
      .unwrap()
      .push(RawMeasurement {
        id:         "bogus".to_owned(),
        basho_id:   "not-a-basho".to_owned(),
        rikishi_id: 42,
        height:     None,
        weight:     None,
      });

    let bashos = bashos_from_histories(&raw);
    assert_eq!(bashos.len(), 2);
  }

  // ── Usage dates ─────────────────────────────────────────────────────────

  #[test]
  fn usage_token_normalises_to_calendar_date() {
    assert_eq!(
      usage_date("202305-7"),
      UsageDate::Date(NaiveDate::from_ymd_opt(2023, 5, 7).unwrap())
    );
    assert_eq!(
      usage_date("202211-15"),
      UsageDate::Date(NaiveDate::from_ymd_opt(2022, 11, 15).unwrap())
    );
  }

  #[test]
  fn unparsable_usage_token_is_unknown_not_an_error() {
    assert_eq!(usage_date("abc-1"), UsageDate::Unknown);
    assert_eq!(usage_date("202305"), UsageDate::Unknown);
    assert_eq!(usage_date("202302-31"), UsageDate::Unknown);
    assert_eq!(usage_date(""), UsageDate::Unknown);
  }

  // ── Rikishi conversion ──────────────────────────────────────────────────

  #[test]
  fn rikishi_conversion_keeps_scalars_and_drops_histories() {
    let raw = raw_rikishi_with_histories();
    let rikishi = rikishi_from_raw(&raw);

    assert_eq!(rikishi.id, 42);
    assert_eq!(rikishi.shikona_en, "Testnoumi");
    assert_eq!(rikishi.current_rank.as_deref(), Some("Maegashira 3 East"));
    assert_eq!(rikishi.weight, Some(152.5));
    assert_eq!(rikishi.debut.as_deref(), Some("201503"));
  }

  #[test]
  fn kimarite_without_usage_token_is_unknown() {
    let kimarite = kimarite_from_raw(&RawKimarite {
      kimarite:   "yorikiri".to_owned(),
      count:      12345,
      last_usage: None,
    });
    assert_eq!(kimarite.name, "yorikiri");
    assert_eq!(kimarite.last_usage, UsageDate::Unknown);
  }
}
