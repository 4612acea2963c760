//! Integration tests for `SqliteStore` against an in-memory database.

use banzuke_core::{
  basho::Basho,
  history::{Measurement, RankChange, Shikona},
  kimarite::{Kimarite, UsageDate},
  rikishi::Rikishi,
  run_log::NewRunLog,
  store::SyncStore,
};
use chrono::NaiveDate;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn rikishi(id: i64, shikona: &str) -> Rikishi {
  Rikishi {
    id,
    sumodb_id:    Some(id * 10),
    nsk_id:       None,
    shikona_en:   shikona.to_owned(),
    shikona_jp:   None,
    current_rank: Some("Maegashira 1 East".to_owned()),
    heya:         Some("Miyagino".to_owned()),
    birth_date:   NaiveDate::from_ymd_opt(1995, 3, 1),
    shusshin:     None,
    height:       Some(186.0),
    weight:       Some(155.0),
    debut:        Some("201301".to_owned()),
    intai:        None,
    updated_at:   None,
  }
}

fn basho(id: &str, year: i32, month: u32) -> Basho {
  Basho { id: id.to_owned(), year, month }
}

// ─── Rikishi upserts ─────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_and_get_rikishi() {
  let s = store().await;

  let written = s.upsert_rikishi(&[rikishi(1, "Hakuho")]).await.unwrap();
  assert_eq!(written, 1);

  let fetched = s.get_rikishi(1).await.unwrap().unwrap();
  assert_eq!(fetched.shikona_en, "Hakuho");
  assert_eq!(fetched.birth_date, NaiveDate::from_ymd_opt(1995, 3, 1));
  assert_eq!(fetched.height, Some(186.0));
}

#[tokio::test]
async fn get_rikishi_missing_returns_none() {
  let s = store().await;
  assert!(s.get_rikishi(999).await.unwrap().is_none());
}

#[tokio::test]
async fn upsert_rikishi_is_idempotent_by_id() {
  let s = store().await;

  s.upsert_rikishi(&[rikishi(1, "Hakuho"), rikishi(2, "Kakuryu")])
    .await
    .unwrap();
  // Replay with one record changed: no duplicates, fields updated.
  let mut updated = rikishi(1, "Hakuho");
  updated.current_rank = Some("Yokozuna 1 East".to_owned());
  s.upsert_rikishi(&[updated, rikishi(2, "Kakuryu")])
    .await
    .unwrap();

  assert_eq!(s.count("rikishi").await.unwrap(), 2);
  let one = s.get_rikishi(1).await.unwrap().unwrap();
  assert_eq!(one.current_rank.as_deref(), Some("Yokozuna 1 East"));
}

#[tokio::test]
async fn list_rikishi_ids_pages_in_order() {
  let s = store().await;
  s.upsert_rikishi(&[rikishi(3, "c"), rikishi(1, "a"), rikishi(2, "b")])
    .await
    .unwrap();

  let first = s.list_rikishi_ids(2, 0).await.unwrap();
  assert_eq!(first, vec![1, 2]);
  let rest = s.list_rikishi_ids(2, 2).await.unwrap();
  assert_eq!(rest, vec![3]);
}

// ─── Basho and history ───────────────────────────────────────────────────────

#[tokio::test]
async fn history_insert_or_replace_by_id() {
  let s = store().await;
  s.upsert_rikishi(&[rikishi(1, "Hakuho")]).await.unwrap();
  s.upsert_bashos(&[basho("202301", 2023, 1)]).await.unwrap();

  let m = Measurement {
    id:         "202301-1".to_owned(),
    basho_id:   "202301".to_owned(),
    rikishi_id: 1,
    height:     Some(186.0),
    weight:     Some(150.0),
  };
  s.upsert_measurements(&[m.clone()]).await.unwrap();

  // Replayed with a corrected weight: still one row.
  let corrected = Measurement { weight: Some(151.5), ..m };
  s.upsert_measurements(&[corrected]).await.unwrap();
  assert_eq!(s.count("measurements").await.unwrap(), 1);

  s.upsert_ranks(&[RankChange {
    id:         "202301-1".to_owned(),
    basho_id:   "202301".to_owned(),
    rikishi_id: 1,
    rank:       "Yokozuna 1 East".to_owned(),
    rank_value: Some(101),
  }])
  .await
  .unwrap();

  s.upsert_shikonas(&[Shikona {
    id:         "202301-1".to_owned(),
    basho_id:   "202301".to_owned(),
    rikishi_id: 1,
    shikona_en: "Hakuho".to_owned(),
    shikona_jp: Some("白鵬".to_owned()),
  }])
  .await
  .unwrap();

  assert_eq!(s.count("ranks").await.unwrap(), 1);
  assert_eq!(s.count("shikonas").await.unwrap(), 1);
}

#[tokio::test]
async fn basho_upsert_is_idempotent() {
  let s = store().await;
  s.upsert_bashos(&[basho("202301", 2023, 1), basho("202303", 2023, 3)])
    .await
    .unwrap();
  s.upsert_bashos(&[basho("202301", 2023, 1)]).await.unwrap();
  assert_eq!(s.count("basho").await.unwrap(), 2);
}

// ─── Kimarite mirror ─────────────────────────────────────────────────────────

#[tokio::test]
async fn kimarite_clear_then_reinsert_replaces_stale_rows() {
  let s = store().await;

  s.upsert_kimarite(&[
    Kimarite {
      name:       "yorikiri".to_owned(),
      count:      100,
      last_usage: UsageDate::Date(NaiveDate::from_ymd_opt(2023, 5, 7).unwrap()),
    },
    Kimarite {
      name:       "stale-technique".to_owned(),
      count:      1,
      last_usage: UsageDate::Unknown,
    },
  ])
  .await
  .unwrap();

  // A fresh mirror run: clear first, then reinsert the authoritative set.
  s.clear_kimarite().await.unwrap();
  s.upsert_kimarite(&[Kimarite {
    name:       "yorikiri".to_owned(),
    count:      101,
    last_usage: UsageDate::Unknown,
  }])
  .await
  .unwrap();

  assert_eq!(s.count("kimarite").await.unwrap(), 1);
}

// ─── Run log ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn run_log_appends_and_assigns_ids() {
  let s = store().await;

  let first = s
    .append_run_log(NewRunLog::new("rikishi", 100, true))
    .await
    .unwrap();
  let second = s
    .append_run_log(NewRunLog {
      source:            "rikishi".to_owned(),
      records_processed: 0,
      success:           false,
      detail:            serde_json::json!({ "stage": "write_list", "error": "boom" }),
    })
    .await
    .unwrap();

  assert!(second.id > first.id);
  assert_eq!(s.count("run_log").await.unwrap(), 2);
  assert_eq!(second.detail["stage"], "write_list");
}
