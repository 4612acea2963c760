use std::{
  collections::{BTreeMap, VecDeque},
  sync::{Arc, Mutex},
};

use axum::{
  body::Body,
  http::{Request, StatusCode},
};
use banzuke_core::{
  raw::{Page, RawKimarite, RawMeasurement, RawRikishi},
  source::{IncludeFlags, SourceError, SumoSource},
};
use banzuke_store_sqlite::SqliteStore;
use tower::ServiceExt as _;

use crate::{AppState, router};

// ─── Doubles ─────────────────────────────────────────────────────────────────

/// Scripted upstream: listing pages pop in order, details come from a map.
#[derive(Clone, Default)]
struct ScriptedSource {
  rikishi_pages:  Arc<Mutex<VecDeque<Page<RawRikishi>>>>,
  kimarite_pages: Arc<Mutex<VecDeque<Page<RawKimarite>>>>,
  details:        Arc<Mutex<BTreeMap<i64, RawRikishi>>>,
}

impl SumoSource for ScriptedSource {
  async fn fetch_rikishi_page(
    &self,
    _skip: u64,
    _limit: usize,
    _include: IncludeFlags,
  ) -> Result<Page<RawRikishi>, SourceError> {
    Ok(
      self
        .rikishi_pages
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or(Page { total: None, records: Some(vec![]) }),
    )
  }

  async fn fetch_rikishi_detail(
    &self,
    id: i64,
    _include: IncludeFlags,
  ) -> Result<RawRikishi, SourceError> {
    self
      .details
      .lock()
      .unwrap()
      .get(&id)
      .cloned()
      .ok_or_else(|| SourceError::NotFound(format!("rikishi {id}")))
  }

  async fn fetch_kimarite_page(
    &self,
    _skip: u64,
    _limit: usize,
  ) -> Result<Page<RawKimarite>, SourceError> {
    Ok(
      self
        .kimarite_pages
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or(Page { total: None, records: Some(vec![]) }),
    )
  }
}

fn raw_rikishi(id: i64) -> RawRikishi {
  RawRikishi {
    id,
    sumodb_id: None,
    nsk_id: None,
    shikona_en: format!("Wrestler {id}"),
    shikona_jp: None,
    current_rank: None,
    heya: None,
    birth_date: None,
    shusshin: None,
    height: None,
    weight: None,
    debut: None,
    intai: None,
    updated_at: None,
    measurement_history: Some(vec![RawMeasurement {
      id:         format!("202301-{id}"),
      basho_id:   "202301".into(),
      rikishi_id: id,
      height:     Some(180.0),
      weight:     Some(140.0),
    }]),
    rank_history: None,
    shikona_history: None,
  }
}

async fn make_app(source: ScriptedSource) -> (axum::Router, SqliteStore) {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let app = router(AppState { source, store: store.clone() });
  (app, store)
}

async fn send(app: axum::Router, method: &str, uri: &str) -> axum::response::Response {
  let req = Request::builder()
    .method(method)
    .uri(uri)
    .body(Body::empty())
    .unwrap();
  app.oneshot(req).await.unwrap()
}

async fn json_body(resp: axum::response::Response) -> serde_json::Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

// ─── OPTIONS ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn options_preflight_returns_200() {
  let (app, _store) = make_app(ScriptedSource::default()).await;
  let resp = send(app, "OPTIONS", "/sync/kimarite").await;
  assert_eq!(resp.status(), StatusCode::OK);
}

// ─── Step ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn step_returns_success_envelope() {
  let source = ScriptedSource::default();
  source
    .rikishi_pages
    .lock()
    .unwrap()
    .push_back(Page { total: Some(1), records: Some(vec![raw_rikishi(1)]) });
  source.details.lock().unwrap().insert(1, raw_rikishi(1));
  let (app, store) = make_app(source).await;

  let resp = send(app, "POST", "/sync/rikishi?limit=2").await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body = json_body(resp).await;
  assert_eq!(body["message"], "rikishi sync step complete");
  assert_eq!(body["processed"], 1);
  assert_eq!(body["next_skip"], 1);
  assert_eq!(body["done"], true);
  assert_eq!(body["details_succeeded"], 1);
  assert!(body["timestamp"].is_string());

  assert_eq!(store.count("rikishi").await.unwrap(), 1);
  assert_eq!(store.count("measurements").await.unwrap(), 1);
  assert_eq!(store.count("run_log").await.unwrap(), 1);
}

// ─── Detail ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn detail_missing_upstream_returns_404() {
  let (app, store) = make_app(ScriptedSource::default()).await;

  let resp = send(app, "POST", "/sync/rikishi/99").await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let body = json_body(resp).await;
  assert!(body["error"].as_str().unwrap().contains("not found"));
  assert!(body["timestamp"].is_string());

  // The failed attempt still leaves provenance behind.
  assert_eq!(store.count("run_log").await.unwrap(), 1);
}

#[tokio::test]
async fn detail_malformed_id_returns_400_envelope() {
  let (app, _store) = make_app(ScriptedSource::default()).await;

  let resp = send(app, "POST", "/sync/rikishi/not-a-number").await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let body = json_body(resp).await;
  assert!(!body["error"].as_str().unwrap().is_empty());
  assert!(body["timestamp"].is_string());
}

// ─── Kimarite ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn kimarite_route_mirrors_catalog() {
  let source = ScriptedSource::default();
  source.kimarite_pages.lock().unwrap().push_back(Page {
    total:   Some(1),
    records: Some(vec![RawKimarite {
      kimarite:   "yorikiri".into(),
      count:      24894,
      last_usage: Some("202305-7".into()),
    }]),
  });
  let (app, store) = make_app(source).await;

  let resp = send(app, "POST", "/sync/kimarite").await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body = json_body(resp).await;
  assert_eq!(body["message"], "kimarite sync complete");
  assert_eq!(body["fetched"], 1);
  assert_eq!(body["written"], 1);

  assert_eq!(store.count("kimarite").await.unwrap(), 1);
}
