//! The detail fan-out processor.
//!
//! For each rikishi ID, fetches the detail record (with the requested
//! history categories) and persists it: the rikishi row first, then every
//! referenced basho, then each history category through the chunked writer.
//! IDs are processed in fixed-size groups; within a group the imports run
//! concurrently and independently, and tallies are merged only after the
//! whole group has settled.

use std::{collections::HashMap, time::Duration};

use banzuke_core::{
  source::{IncludeFlags, SumoSource},
  store::SyncStore,
  transform,
};
use tokio::task::JoinSet;

use crate::{chunk::write_chunks, SyncError};

// ─── Policy ──────────────────────────────────────────────────────────────────

/// Knobs for one fan-out pass.
#[derive(Debug, Clone)]
pub struct FanoutPolicy {
  /// Detail fetches running concurrently per group.
  pub group_size:  usize,
  /// Courtesy pause between groups.
  pub group_delay: Duration,
  /// History categories to request on each detail fetch.
  pub include:     IncludeFlags,
  /// Chunk size for history writes.
  pub chunk_size:  usize,
}

impl Default for FanoutPolicy {
  fn default() -> Self {
    Self {
      group_size:  3,
      group_delay: Duration::from_secs(1),
      include:     IncludeFlags::all(),
      chunk_size:  50,
    }
  }
}

// ─── Tallies ─────────────────────────────────────────────────────────────────

/// Sub-record counts from one entity's detail import.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetailCounts {
  pub bashos:       usize,
  pub measurements: usize,
  pub ranks:        usize,
  pub shikonas:     usize,
}

/// Aggregate outcome of a fan-out pass.
#[derive(Debug, Default)]
pub struct FanoutReport {
  pub succeeded:    usize,
  pub failed:       usize,
  pub bashos:       usize,
  pub measurements: usize,
  pub ranks:        usize,
  pub shikonas:     usize,
  /// Per-entity failures: (rikishi ID, error message).
  pub failures:     Vec<(i64, String)>,
}

impl FanoutReport {
  fn absorb(&mut self, counts: DetailCounts) {
    self.succeeded += 1;
    self.bashos += counts.bashos;
    self.measurements += counts.measurements;
    self.ranks += counts.ranks;
    self.shikonas += counts.shikonas;
  }

  fn record_failure(&mut self, id: i64, message: String) {
    tracing::warn!(rikishi_id = id, error = %message, "detail import failed");
    self.failed += 1;
    self.failures.push((id, message));
  }
}

// ─── Single-entity import ────────────────────────────────────────────────────

/// Fetch and persist one rikishi's detail record.
///
/// Bashos are upserted before any history record that references them; the
/// rikishi row itself is upserted first so history foreign keys always
/// resolve.
pub async fn import_detail<Src, St>(
  source: &Src,
  store: &St,
  id: i64,
  include: IncludeFlags,
  chunk_size: usize,
) -> Result<DetailCounts, SyncError>
where
  Src: SumoSource,
  St: SyncStore,
{
  let raw = source.fetch_rikishi_detail(id, include).await?;

  let rikishi = transform::rikishi_from_raw(&raw);
  store
    .upsert_rikishi(&[rikishi])
    .await
    .map_err(SyncError::store)?;

  let bashos = transform::bashos_from_histories(&raw);
  store
    .upsert_bashos(&bashos)
    .await
    .map_err(SyncError::store)?;

  let measurements: Vec<_> = raw
    .measurement_history
    .iter()
    .flatten()
    .map(transform::measurement_from_raw)
    .collect();
  let ranks: Vec<_> = raw
    .rank_history
    .iter()
    .flatten()
    .map(transform::rank_from_raw)
    .collect();
  let shikonas: Vec<_> = raw
    .shikona_history
    .iter()
    .flatten()
    .map(transform::shikona_from_raw)
    .collect();

  let measurements_written =
    write_chunks(&measurements, chunk_size, |c| async move {
      store.upsert_measurements(&c).await
    })
    .await?;
  let ranks_written = write_chunks(&ranks, chunk_size, |c| async move {
    store.upsert_ranks(&c).await
  })
  .await?;
  let shikonas_written = write_chunks(&shikonas, chunk_size, |c| async move {
    store.upsert_shikonas(&c).await
  })
  .await?;

  Ok(DetailCounts {
    bashos:       bashos.len(),
    measurements: measurements_written,
    ranks:        ranks_written,
    shikonas:     shikonas_written,
  })
}

// ─── Fan-out loop ────────────────────────────────────────────────────────────

/// Import details for `ids` in bounded-concurrency groups.
///
/// A failure on one entity is recorded in the report and never aborts its
/// siblings; counters are merged join-then-merge, after every member of the
/// group has settled.
pub async fn fan_out_details<Src, St>(
  source: &Src,
  store: &St,
  ids: &[i64],
  policy: &FanoutPolicy,
) -> FanoutReport
where
  Src: SumoSource + Clone + Send + Sync + 'static,
  St: SyncStore + Clone + Send + Sync + 'static,
{
  let mut report = FanoutReport::default();
  let group_size = policy.group_size.max(1);
  let mut groups = ids.chunks(group_size).peekable();

  while let Some(group) = groups.next() {
    let mut set: JoinSet<Result<DetailCounts, SyncError>> = JoinSet::new();
    // Maps each spawned task back to its rikishi ID, so a panicked or
    // cancelled worker is still attributed to the right entity.
    let mut task_ids: HashMap<tokio::task::Id, i64> = HashMap::new();

    for &id in group {
      let source = source.clone();
      let store = store.clone();
      let include = policy.include;
      let chunk_size = policy.chunk_size;
      let handle = set.spawn(async move {
        import_detail(&source, &store, id, include, chunk_size).await
      });
      task_ids.insert(handle.id(), id);
    }

    // Join every member before touching the shared tallies.
    let mut settled: Vec<(i64, Result<DetailCounts, SyncError>)> = Vec::new();
    while let Some(joined) = set.join_next_with_id().await {
      let (task_id, result) = match joined {
        Ok((task_id, result)) => (task_id, result),
        Err(e) => {
          let task_id = e.id();
          (task_id, Err(SyncError::Join(e)))
        }
      };
      // Every task ID was recorded at spawn time.
      if let Some(&id) = task_ids.get(&task_id) {
        settled.push((id, result));
      }
    }
    for (id, result) in settled {
      match result {
        Ok(counts) => report.absorb(counts),
        Err(e) => report.record_failure(id, e.to_string()),
      }
    }

    if groups.peek().is_some() {
      tokio::time::sleep(policy.group_delay).await;
    }
  }

  report
}
