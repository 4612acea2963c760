//! The paginated fetcher.
//!
//! Drives any page-returning closure (normally a [`SumoSource`] endpoint)
//! from a starting offset until the source is exhausted, a declared total is
//! satisfied, or the hard page cap fires. Transient failures are absorbed:
//! past the consecutive-failure threshold the fetcher soft-stops and hands
//! back everything accumulated so far — it never raises.
//!
//! [`SumoSource`]: banzuke_core::source::SumoSource

use std::{future::Future, time::Duration};

use banzuke_core::{raw::Page, source::SourceError};

// ─── Policy ──────────────────────────────────────────────────────────────────

/// Knobs for one pagination pass. The page cap applies unconditionally, even
/// when the source declares no total and never returns a short page, so a
/// misbehaving source cannot produce a runaway loop.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
  /// Records requested per page.
  pub page_limit:               usize,
  /// Hard cap on pages fetched in one pass.
  pub max_pages:                usize,
  /// Consecutive empty-page/transport failures tolerated before soft-stop.
  pub max_consecutive_failures: u32,
  /// Courtesy pause between successful page fetches.
  pub page_delay:               Duration,
  /// Longer pause before retrying the same offset after a failure.
  pub retry_delay:              Duration,
}

impl Default for FetchPolicy {
  fn default() -> Self {
    Self {
      page_limit:               100,
      max_pages:                50,
      max_consecutive_failures: 3,
      page_delay:               Duration::from_secs(1),
      retry_delay:              Duration::from_secs(2),
    }
  }
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// Everything one pagination pass accumulated.
#[derive(Debug)]
pub struct PageHaul<T> {
  pub records:        Vec<T>,
  /// Pages that actually contributed records.
  pub pages_fetched:  usize,
  /// The total the source declared on the first page seen, if any.
  pub declared_total: Option<u64>,
  /// Total failed fetch attempts (transport, decode, or empty page).
  pub failures:       u32,
  /// The offset one past the last record fetched.
  pub next_skip:      u64,
  /// True when pagination terminated cleanly (short page or total
  /// satisfied) rather than by cap or soft-stop.
  pub complete:       bool,
}

// ─── Fetch loop ──────────────────────────────────────────────────────────────

/// Fetch pages from `start_skip` until a termination condition holds.
///
/// `fetch(skip, limit)` is called once per attempt; a successful non-empty
/// page resets the consecutive-failure counter and advances the offset by
/// the number of records received.
pub async fn fetch_all_pages<T, F, Fut>(
  policy: &FetchPolicy,
  start_skip: u64,
  mut fetch: F,
) -> PageHaul<T>
where
  F: FnMut(u64, usize) -> Fut,
  Fut: Future<Output = Result<Page<T>, SourceError>>,
{
  let mut records: Vec<T> = Vec::new();
  let mut skip = start_skip;
  let mut pages_fetched = 0usize;
  let mut failures = 0u32;
  let mut consecutive_failures = 0u32;
  let mut declared_total: Option<u64> = None;
  let mut complete = false;

  while pages_fetched < policy.max_pages {
    let page = match fetch(skip, policy.page_limit).await {
      Ok(page) => page,
      Err(e) => {
        failures += 1;
        consecutive_failures += 1;
        tracing::warn!(
          skip,
          consecutive_failures,
          error = %e,
          "page fetch failed"
        );
        if consecutive_failures >= policy.max_consecutive_failures {
          tracing::warn!(skip, "failure threshold reached, stopping pagination");
          break;
        }
        tokio::time::sleep(policy.retry_delay).await;
        continue;
      }
    };

    if declared_total.is_none() {
      declared_total = page.total;
    }

    let got = page.len();
    if got == 0 {
      // The source occasionally returns empty bodies transiently; treat an
      // empty page like a failed attempt and retry the same offset.
      failures += 1;
      consecutive_failures += 1;
      if consecutive_failures >= policy.max_consecutive_failures {
        tracing::warn!(skip, "failure threshold reached, stopping pagination");
        break;
      }
      tokio::time::sleep(policy.retry_delay).await;
      continue;
    }

    consecutive_failures = 0;
    pages_fetched += 1;
    skip += got as u64;
    records.extend(page.into_records());

    if got < policy.page_limit {
      complete = true;
      break;
    }
    if let Some(total) = declared_total
      && skip >= total
    {
      complete = true;
      break;
    }

    tokio::time::sleep(policy.page_delay).await;
  }

  if !complete && pages_fetched >= policy.max_pages {
    tracing::warn!(
      pages = pages_fetched,
      "page cap reached before the source was exhausted"
    );
  }

  PageHaul {
    records,
    pages_fetched,
    declared_total,
    failures,
    next_skip: skip,
    complete,
  }
}
