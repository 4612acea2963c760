//! The ingestion/orchestration core of banzuke.
//!
//! Everything here is generic over the [`SumoSource`] and [`SyncStore`]
//! traits from `banzuke-core`, so the whole pipeline runs unchanged against
//! the HTTP client and SQLite store in production and against doubles in
//! tests.
//!
//! Layering, leaves first:
//! - [`fetch`] — paginated retrieval with a consecutive-failure soft-stop.
//! - [`chunk`] — bounded-size idempotent upsert batches.
//! - [`fanout`] — bounded-concurrency per-entity detail import.
//! - [`orchestrator`] — the stage machine tying the above together.
//! - [`audit`] — run-log call-through that never escalates sink failures.
//!
//! [`SumoSource`]: banzuke_core::source::SumoSource
//! [`SyncStore`]: banzuke_core::store::SyncStore

pub mod audit;
pub mod chunk;
pub mod error;
pub mod fanout;
pub mod fetch;
pub mod orchestrator;

pub use error::SyncError;
pub use orchestrator::{SyncOptions, SyncRunner};
