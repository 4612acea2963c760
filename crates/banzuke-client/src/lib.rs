//! Async HTTP client for the upstream sumo-statistics JSON API.
//!
//! Implements [`SumoSource`] over `reqwest`. Each method is a thin
//! per-endpoint wrapper; pagination, retry, and backoff live upstream in
//! `banzuke-sync`, which drives any `SumoSource`.

use std::time::Duration;

use banzuke_core::{
  raw::{Page, RawKimarite, RawRikishi},
  source::{IncludeFlags, SourceError, SumoSource},
};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

/// Connection settings for the upstream API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  pub base_url: String,
  /// Optional API key, sent as `X-API-Key` when present.
  pub api_key:  Option<String>,
}

/// Async client for the upstream JSON API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct SumoApiClient {
  client: Client,
  config: ClientConfig,
}

impl SumoApiClient {
  pub fn new(config: ClientConfig) -> Result<Self, SourceError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(|e| SourceError::Transport(format!("failed to build HTTP client: {e}")))?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, SourceError> {
    tracing::debug!(%url, "GET");
    let mut req = self.client.get(&url);
    if let Some(key) = &self.config.api_key {
      req = req.header("X-API-Key", key);
    }

    let resp = req
      .send()
      .await
      .map_err(|e| SourceError::Transport(e.to_string()))?;

    match resp.status() {
      StatusCode::NOT_FOUND => Err(SourceError::NotFound(url)),
      status if !status.is_success() => Err(SourceError::Status {
        endpoint: url,
        code:     status.as_u16(),
      }),
      _ => resp.json::<T>().await.map_err(|e| SourceError::Decode {
        endpoint: url,
        message:  e.to_string(),
      }),
    }
  }
}

/// The history inclusion parameters the source understands.
fn include_params(include: IncludeFlags) -> Vec<&'static str> {
  let mut params = Vec::new();
  if include.measurements {
    params.push("measurements=true");
  }
  if include.ranks {
    params.push("ranks=true");
  }
  if include.shikonas {
    params.push("shikonas=true");
  }
  params
}

impl SumoSource for SumoApiClient {
  /// `GET /api/rikishis?skip=&limit=[&measurements=...]`
  async fn fetch_rikishi_page(
    &self,
    skip: u64,
    limit: usize,
    include: IncludeFlags,
  ) -> Result<Page<RawRikishi>, SourceError> {
    let mut url = format!("{}?skip={skip}&limit={limit}", self.url("/rikishis"));
    for param in include_params(include) {
      url.push('&');
      url.push_str(param);
    }
    self.get_json(url).await
  }

  /// `GET /api/rikishi/{id}[?measurements=...]`
  async fn fetch_rikishi_detail(
    &self,
    id: i64,
    include: IncludeFlags,
  ) -> Result<RawRikishi, SourceError> {
    let mut url = self.url(&format!("/rikishi/{id}"));
    let params = include_params(include);
    if !params.is_empty() {
      url.push('?');
      url.push_str(&params.join("&"));
    }
    self.get_json(url).await
  }

  /// `GET /api/kimarite?skip=&limit=`
  async fn fetch_kimarite_page(
    &self,
    skip: u64,
    limit: usize,
  ) -> Result<Page<RawKimarite>, SourceError> {
    let url = format!("{}?skip={skip}&limit={limit}", self.url("/kimarite"));
    self.get_json(url).await
  }
}
