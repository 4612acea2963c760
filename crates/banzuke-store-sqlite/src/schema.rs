//! SQL schema for the banzuke SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS rikishi (
    id           INTEGER PRIMARY KEY,  -- stable upstream ID, never reassigned
    sumodb_id    INTEGER,
    nsk_id       INTEGER,
    shikona_en   TEXT NOT NULL,
    shikona_jp   TEXT,
    current_rank TEXT,
    heya         TEXT,
    birth_date   TEXT,                 -- ISO 8601 calendar date
    shusshin     TEXT,
    height       REAL,
    weight       REAL,
    debut        TEXT,                 -- 'YYYYMM' basho token
    intai        TEXT,                 -- ISO 8601 calendar date
    updated_at   TEXT                  -- RFC 3339
);

-- Bashos are derived purely from history references; there is no
-- independent source of truth for them.
CREATE TABLE IF NOT EXISTS basho (
    id    TEXT PRIMARY KEY,            -- 'YYYYMM'
    year  INTEGER NOT NULL,
    month INTEGER NOT NULL
);

-- History tables are insert-or-replace by ID; rows are never deleted.
CREATE TABLE IF NOT EXISTS measurements (
    id         TEXT PRIMARY KEY,
    basho_id   TEXT NOT NULL REFERENCES basho(id),
    rikishi_id INTEGER NOT NULL REFERENCES rikishi(id),
    height     REAL,
    weight     REAL
);

CREATE TABLE IF NOT EXISTS ranks (
    id         TEXT PRIMARY KEY,
    basho_id   TEXT NOT NULL REFERENCES basho(id),
    rikishi_id INTEGER NOT NULL REFERENCES rikishi(id),
    rank       TEXT NOT NULL,
    rank_value INTEGER
);

CREATE TABLE IF NOT EXISTS shikonas (
    id         TEXT PRIMARY KEY,
    basho_id   TEXT NOT NULL REFERENCES basho(id),
    rikishi_id INTEGER NOT NULL REFERENCES rikishi(id),
    shikona_en TEXT NOT NULL,
    shikona_jp TEXT
);

-- The kimarite catalog is mirrored wholesale each run (cleared, then
-- reinserted); no foreign keys depend on it.
CREATE TABLE IF NOT EXISTS kimarite (
    name       TEXT PRIMARY KEY,
    count      INTEGER NOT NULL,
    last_usage TEXT                    -- ISO 8601 calendar date, NULL if unknown
);

-- Strictly append-only. No UPDATE or DELETE is ever issued here.
CREATE TABLE IF NOT EXISTS run_log (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    source            TEXT NOT NULL,
    records_processed INTEGER NOT NULL,
    success           INTEGER NOT NULL,
    detail            TEXT NOT NULL DEFAULT 'null',  -- JSON payload
    created_at        TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS measurements_rikishi_idx ON measurements(rikishi_id);
CREATE INDEX IF NOT EXISTS ranks_rikishi_idx        ON ranks(rikishi_id);
CREATE INDEX IF NOT EXISTS shikonas_rikishi_idx     ON shikonas(rikishi_id);
CREATE INDEX IF NOT EXISTS run_log_source_idx       ON run_log(source);

PRAGMA user_version = 1;
";
