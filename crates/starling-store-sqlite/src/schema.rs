//! SQL schema for the Starling SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS categories (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    description TEXT
);

-- The revision log is append-only. The only UPDATE ever issued against it
-- is the enrichment back-fill of tone/sentiment/updated_at; no DELETE ever.
CREATE TABLE IF NOT EXISTS review_history (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    review_id   TEXT NOT NULL,       -- logical key shared across revisions
    text        TEXT NOT NULL,
    stars       INTEGER NOT NULL,
    category_id INTEGER REFERENCES categories(id),
    tone        TEXT,
    sentiment   TEXT,
    created_at  TEXT NOT NULL,       -- ISO 8601 UTC; server-assigned
    updated_at  TEXT NOT NULL
);

-- Write-only request log, populated by the fire-and-forget access logger.
-- Never read by the engine.
CREATE TABLE IF NOT EXISTS access_log (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    text       TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS review_history_review_idx
    ON review_history(review_id);
CREATE INDEX IF NOT EXISTS review_history_category_idx
    ON review_history(category_id);
CREATE INDEX IF NOT EXISTS review_history_created_idx
    ON review_history(created_at);

PRAGMA user_version = 1;
";
