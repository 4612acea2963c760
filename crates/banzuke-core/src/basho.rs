//! Basho — the derived parent entity for all history records.
//!
//! A basho has no independent source of truth: one is created implicitly
//! whenever any history record references its ID. The ID embeds the
//! tournament's year and month (`"202305"` is May 2023).

use serde::{Deserialize, Serialize};

/// A tournament period, keyed by its `"YYYYMM"` ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basho {
  pub id:    String,
  pub year:  i32,
  pub month: u32,
}
