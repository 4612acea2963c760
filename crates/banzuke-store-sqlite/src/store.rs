//! [`SqliteStore`] — the SQLite implementation of [`SyncStore`].

use std::path::Path;

use banzuke_core::{
  basho::Basho,
  history::{Measurement, RankChange, Shikona},
  kimarite::Kimarite,
  rikishi::Rikishi,
  run_log::{NewRunLog, RunLog},
  store::SyncStore,
};
use chrono::Utc;
use rusqlite::OptionalExtension as _;

use crate::{
  encode::{encode_date, encode_dt, encode_usage, RawRikishiRow},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A banzuke sync store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Every
/// `upsert_*` call runs inside one transaction, so a batch is all-or-nothing.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Row count for a table. Table names come from our own code, never from
  /// user input.
  pub async fn count(&self, table: &str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    let n = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, [], |r| r.get(0))?))
      .await?;
    Ok(n)
  }
}

// ─── SyncStore impl ──────────────────────────────────────────────────────────

impl SyncStore for SqliteStore {
  type Error = Error;

  // ── Upserts ────────────────────────────────────────────────────────────

  async fn upsert_rikishi(&self, records: &[Rikishi]) -> Result<usize> {
    if records.is_empty() {
      return Ok(0);
    }
    let rows = records.to_vec();
    let count = rows.len();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare_cached(
            "INSERT INTO rikishi (
               id, sumodb_id, nsk_id, shikona_en, shikona_jp, current_rank,
               heya, birth_date, shusshin, height, weight, debut, intai,
               updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
             ON CONFLICT(id) DO UPDATE SET
               sumodb_id    = excluded.sumodb_id,
               nsk_id       = excluded.nsk_id,
               shikona_en   = excluded.shikona_en,
               shikona_jp   = excluded.shikona_jp,
               current_rank = excluded.current_rank,
               heya         = excluded.heya,
               birth_date   = excluded.birth_date,
               shusshin     = excluded.shusshin,
               height       = excluded.height,
               weight       = excluded.weight,
               debut        = excluded.debut,
               intai        = excluded.intai,
               updated_at   = excluded.updated_at",
          )?;
          for r in &rows {
            stmt.execute(rusqlite::params![
              r.id,
              r.sumodb_id,
              r.nsk_id,
              r.shikona_en,
              r.shikona_jp,
              r.current_rank,
              r.heya,
              r.birth_date.map(encode_date),
              r.shusshin,
              r.height,
              r.weight,
              r.debut,
              r.intai.map(encode_date),
              r.updated_at.map(encode_dt),
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(count)
  }

  async fn upsert_bashos(&self, records: &[Basho]) -> Result<usize> {
    if records.is_empty() {
      return Ok(0);
    }
    let rows = records.to_vec();
    let count = rows.len();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare_cached(
            "INSERT INTO basho (id, year, month) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
               year  = excluded.year,
               month = excluded.month",
          )?;
          for b in &rows {
            stmt.execute(rusqlite::params![b.id, b.year, b.month])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(count)
  }

  async fn upsert_measurements(&self, records: &[Measurement]) -> Result<usize> {
    if records.is_empty() {
      return Ok(0);
    }
    let rows = records.to_vec();
    let count = rows.len();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare_cached(
            "INSERT OR REPLACE INTO measurements
               (id, basho_id, rikishi_id, height, weight)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for m in &rows {
            stmt.execute(rusqlite::params![
              m.id, m.basho_id, m.rikishi_id, m.height, m.weight,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(count)
  }

  async fn upsert_ranks(&self, records: &[RankChange]) -> Result<usize> {
    if records.is_empty() {
      return Ok(0);
    }
    let rows = records.to_vec();
    let count = rows.len();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare_cached(
            "INSERT OR REPLACE INTO ranks
               (id, basho_id, rikishi_id, rank, rank_value)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for r in &rows {
            stmt.execute(rusqlite::params![
              r.id, r.basho_id, r.rikishi_id, r.rank, r.rank_value,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(count)
  }

  async fn upsert_shikonas(&self, records: &[Shikona]) -> Result<usize> {
    if records.is_empty() {
      return Ok(0);
    }
    let rows = records.to_vec();
    let count = rows.len();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare_cached(
            "INSERT OR REPLACE INTO shikonas
               (id, basho_id, rikishi_id, shikona_en, shikona_jp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for s in &rows {
            stmt.execute(rusqlite::params![
              s.id, s.basho_id, s.rikishi_id, s.shikona_en, s.shikona_jp,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(count)
  }

  // ── Kimarite catalog ───────────────────────────────────────────────────

  async fn clear_kimarite(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute("DELETE FROM kimarite", [])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn upsert_kimarite(&self, records: &[Kimarite]) -> Result<usize> {
    if records.is_empty() {
      return Ok(0);
    }
    let rows = records.to_vec();
    let count = rows.len();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare_cached(
            "INSERT INTO kimarite (name, count, last_usage)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET
               count      = excluded.count,
               last_usage = excluded.last_usage",
          )?;
          for k in &rows {
            stmt.execute(rusqlite::params![
              k.name,
              k.count,
              encode_usage(k.last_usage),
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(count)
  }

  // ── Reads ──────────────────────────────────────────────────────────────

  async fn list_rikishi_ids(&self, limit: usize, offset: u64) -> Result<Vec<i64>> {
    let limit = limit as i64;
    let offset = offset as i64;

    let ids = self
      .conn
      .call(move |conn| {
        let mut stmt = conn
          .prepare("SELECT id FROM rikishi ORDER BY id LIMIT ?1 OFFSET ?2")?;
        let rows = stmt
          .query_map(rusqlite::params![limit, offset], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(ids)
  }

  async fn get_rikishi(&self, id: i64) -> Result<Option<Rikishi>> {
    let raw: Option<RawRikishiRow> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, sumodb_id, nsk_id, shikona_en, shikona_jp,
                      current_rank, heya, birth_date, shusshin, height,
                      weight, debut, intai, updated_at
               FROM rikishi WHERE id = ?1",
              rusqlite::params![id],
              |row| {
                Ok(RawRikishiRow {
                  id:           row.get(0)?,
                  sumodb_id:    row.get(1)?,
                  nsk_id:       row.get(2)?,
                  shikona_en:   row.get(3)?,
                  shikona_jp:   row.get(4)?,
                  current_rank: row.get(5)?,
                  heya:         row.get(6)?,
                  birth_date:   row.get(7)?,
                  shusshin:     row.get(8)?,
                  height:       row.get(9)?,
                  weight:       row.get(10)?,
                  debut:        row.get(11)?,
                  intai:        row.get(12)?,
                  updated_at:   row.get(13)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRikishiRow::into_rikishi).transpose()
  }

  // ── Run log ────────────────────────────────────────────────────────────

  async fn append_run_log(&self, entry: NewRunLog) -> Result<RunLog> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let detail_str = serde_json::to_string(&entry.detail)?;

    let source = entry.source.clone();
    let records_processed = entry.records_processed;
    let success = entry.success;

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO run_log (source, records_processed, success, detail, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![source, records_processed, success, detail_str, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(RunLog {
      id,
      source: entry.source,
      records_processed: entry.records_processed,
      success: entry.success,
      detail: entry.detail,
      created_at,
    })
  }
}
