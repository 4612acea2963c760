//! HTTP entry points for banzuke.
//!
//! Exposes an axum [`Router`] whose handlers drive [`banzuke_sync::SyncRunner`]
//! over any [`SumoSource`]/[`SyncStore`] pair. Auth, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! [`SumoSource`]: banzuke_core::source::SumoSource
//! [`SyncStore`]: banzuke_core::store::SyncStore

pub mod error;
pub mod sync;

use std::path::PathBuf;

use axum::{Router, routing::post};
use banzuke_core::{source::SumoSource, store::SyncStore};
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` (or the
/// `BANZUKE_*` environment).
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:         String,
  #[serde(default = "default_port")]
  pub port:         u16,
  /// Base URL of the upstream statistics API.
  #[serde(default = "default_upstream")]
  pub upstream_url: String,
  /// Optional upstream API key.
  #[serde(default)]
  pub api_key:      Option<String>,
  pub store_path:   PathBuf,
}

fn default_host() -> String {
  "0.0.0.0".to_string()
}

fn default_port() -> u16 {
  8080
}

fn default_upstream() -> String {
  "https://sumo-api.com".to_string()
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<Src, St> {
  pub source: Src,
  pub store:  St,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the `/sync` router for a source/store pair.
pub fn router<Src, St>(state: AppState<Src, St>) -> Router
where
  Src: SumoSource + Clone + Send + Sync + 'static,
  St: SyncStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route(
      "/sync/rikishi",
      post(sync::step::<Src, St>).options(sync::preflight),
    )
    .route(
      "/sync/rikishi/full",
      post(sync::full::<Src, St>).options(sync::preflight),
    )
    .route(
      "/sync/kimarite",
      post(sync::kimarite::<Src, St>).options(sync::preflight),
    )
    .route(
      "/sync/rikishi/{id}",
      post(sync::detail::<Src, St>).options(sync::preflight),
    )
    .with_state(state)
}

#[cfg(test)]
mod tests;
