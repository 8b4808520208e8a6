//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`] and
//! [`SettingsStore`].

use std::path::Path;

use chrono::{DateTime, SubsecRound as _, Utc};
use rusqlite::OptionalExtension as _;
use tally_core::{
  lifecycle::Lifecycle,
  record::{Record, RecordId, RecordInput, RecordKind},
  store::{RecordQuery, RecordStore, SettingsStore},
};

use crate::{
  Error, Result,
  encode::{RECORD_COLUMNS, RawRecord, encode_dt, encode_kind},
  schema::{ADDED_COLUMNS, INDEXES, JOURNAL, SCHEMA_VERSION, TABLES},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tally ledger backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Opening does
/// not touch the schema; call [`RecordStore::init`] before first use.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) the database file at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Ok(Self { conn })
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Ok(Self { conn })
  }

  /// Close the underlying connection. Clones of this store fail afterwards.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  /// Validate and persist a new active record with an explicit creation
  /// timestamp. [`RecordStore::add`] calls this with the current time.
  pub async fn add_at(&self, input: RecordInput, created_at: DateTime<Utc>) -> Result<Record> {
    input.validate()?;

    // Stored at microsecond precision; return exactly what a read gives back.
    let created_at = created_at.trunc_subsecs(6);

    let title    = input.title.clone();
    let kind_str = encode_kind(input.kind);
    let at_str   = encode_dt(created_at);
    let amount   = input.amount;

    let id: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "INSERT INTO records (title, amount, kind, created_at, deleted)
           VALUES (?1, ?2, ?3, ?4, 0)
           RETURNING id",
          rusqlite::params![title, amount, kind_str, at_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    tracing::debug!(id, kind = kind_str, "record added");

    Ok(Record {
      id: RecordId(id),
      title: input.title,
      amount: input.amount,
      kind: input.kind,
      created_at,
      deleted: false,
    })
  }

  /// Records in one lifecycle state, newest first, optionally of one kind.
  async fn list_by(&self, lifecycle: Lifecycle, kind: Option<RecordKind>) -> Result<Vec<Record>> {
    let deleted  = lifecycle.deleted_flag();
    let kind_str = kind.map(encode_kind);

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RECORD_COLUMNS} FROM records
           WHERE deleted = ?1 AND (?2 IS NULL OR kind = ?2)
           ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![deleted, kind_str], RawRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }

  async fn set_deleted(&self, id: RecordId, deleted: bool) -> Result<()> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE records SET deleted = ?1 WHERE id = ?2",
          rusqlite::params![deleted, id.0],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::RecordNotFound(id));
    }
    tracing::debug!(%id, deleted, "record lifecycle changed");
    Ok(())
  }
}

/// Whether `table` currently has a column called `column`.
fn has_column(conn: &rusqlite::Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
  let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
  let names = stmt
    .query_map([], |row| row.get::<_, String>(1))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(names.iter().any(|name| name == column))
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  async fn init(&self) -> Result<()> {
    let upgraded: Vec<&'static str> = self
      .conn
      .call(|conn| {
        // journal_mode cannot change inside a transaction.
        conn.execute_batch(JOURNAL)?;

        let tx = conn.transaction()?;
        tx.execute_batch(TABLES)?;

        let mut upgraded = Vec::new();
        for added in ADDED_COLUMNS {
          if !has_column(&tx, added.table, added.column)? {
            tx.execute_batch(&format!(
              "ALTER TABLE {} ADD COLUMN {} {};",
              added.table, added.column, added.definition
            ))?;
            upgraded.push(added.column);
          }
        }

        tx.execute_batch(INDEXES)?;
        tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        tx.commit()?;
        Ok(upgraded)
      })
      .await?;

    for column in upgraded {
      tracing::info!(column, "added missing column to existing schema");
    }
    Ok(())
  }

  async fn add(&self, input: RecordInput) -> Result<Record> {
    self.add_at(input, Utc::now()).await
  }

  async fn get(&self, id: RecordId) -> Result<Option<Record>> {
    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {RECORD_COLUMNS} FROM records WHERE id = ?1"),
            rusqlite::params![id.0],
            RawRecord::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn update(&self, id: RecordId, input: RecordInput) -> Result<()> {
    input.validate()?;

    let RecordInput { title, amount, kind } = input;
    let kind_str = encode_kind(kind);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE records SET title = ?1, amount = ?2, kind = ?3 WHERE id = ?4",
          rusqlite::params![title, amount, kind_str, id.0],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::RecordNotFound(id));
    }
    tracing::debug!(%id, "record updated");
    Ok(())
  }

  async fn list_active(&self) -> Result<Vec<Record>> {
    self.list_by(Lifecycle::Active, None).await
  }

  async fn list_trashed(&self) -> Result<Vec<Record>> {
    self.list_by(Lifecycle::Trashed, None).await
  }

  async fn search(&self, query: &RecordQuery) -> Result<Vec<Record>> {
    // Lifecycle and kind narrow in SQL; free text needs the same amount
    // formatting the presentation uses, so it is matched here.
    let mut records = self.list_by(query.lifecycle, query.kind).await?;
    records.retain(|r| query.matches(r));
    Ok(query.paginate(records))
  }

  async fn soft_delete(&self, id: RecordId) -> Result<()> {
    self.set_deleted(id, true).await
  }

  async fn restore(&self, id: RecordId) -> Result<()> {
    self.set_deleted(id, false).await
  }

  async fn purge(&self, id: RecordId) -> Result<()> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM records WHERE id = ?1", rusqlite::params![id.0])?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::RecordNotFound(id));
    }
    tracing::debug!(%id, "record purged");
    Ok(())
  }
}

// ─── SettingsStore impl ──────────────────────────────────────────────────────

impl SettingsStore for SqliteStore {
  type Error = Error;

  async fn get_setting(&self, key: &str) -> Result<Option<String>> {
    let key = key.to_owned();

    let value = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            rusqlite::params![key],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    Ok(value)
  }

  async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
    let key   = key.to_owned();
    let value = value.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO settings (key, value) VALUES (?1, ?2)
           ON CONFLICT (key) DO UPDATE SET value = excluded.value",
          rusqlite::params![key, value],
        )?;
        Ok(())
      })
      .await?;

    Ok(())
  }
}
