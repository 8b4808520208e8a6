//! SQL schema for the Tally SQLite store.
//!
//! Applied by [`SqliteStore::init`](crate::SqliteStore) on every start. The
//! table DDL is idempotent; columns introduced after the first release are
//! listed in [`ADDED_COLUMNS`] and added to older databases in place.

/// Version written to `PRAGMA user_version` once initialisation succeeds.
pub const SCHEMA_VERSION: u32 = 2;

pub const JOURNAL: &str = "PRAGMA journal_mode = WAL;";

/// Base tables; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const TABLES: &str = "
-- AUTOINCREMENT so ids of purged rows are never handed out again.
CREATE TABLE IF NOT EXISTS records (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT    NOT NULL,
    amount      REAL    NOT NULL,
    kind        TEXT    NOT NULL,   -- 'income' | 'expense'
    created_at  TEXT    NOT NULL,   -- RFC 3339 UTC, fixed microsecond width
    deleted     INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS settings (
    key    TEXT PRIMARY KEY,
    value  TEXT NOT NULL
);
";

/// Indexes that may reference added columns, so they run after the upgrade.
pub const INDEXES: &str = "
CREATE INDEX IF NOT EXISTS records_listing_idx ON records(deleted, created_at);
";

/// A column that did not exist in every released version of a table.
pub struct AddedColumn {
  pub table:      &'static str,
  pub column:     &'static str,
  pub definition: &'static str,
}

/// Schema version 2 introduced soft deletion.
pub const ADDED_COLUMNS: &[AddedColumn] = &[AddedColumn {
  table:      "records",
  column:     "deleted",
  definition: "INTEGER NOT NULL DEFAULT 0",
}];
