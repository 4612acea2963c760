//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use banzuke_sync::SyncError;
use chrono::Utc;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler. Serialised as
/// `{ "error", "trace"?, "timestamp" }`.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("sync failed: {0}")]
  Sync(#[source] SyncError),
}

impl From<SyncError> for ApiError {
  fn from(e: SyncError) -> Self {
    // A definitive upstream miss is the caller's 404, not our 500.
    if e.is_not_found() {
      Self::NotFound(e.to_string())
    } else {
      Self::Sync(e)
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Sync(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    let mut body = json!({
      "error": message,
      "timestamp": Utc::now().to_rfc3339(),
    });
    if let ApiError::Sync(e) = &self {
      body["trace"] = json!(format!("{e:?}"));
    }

    (status, Json(body)).into_response()
  }
}
