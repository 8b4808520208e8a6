//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with a fixed microsecond
//! width, so lexical order in SQL equals chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use tally_core::record::{Record, RecordId, RecordKind};

use crate::{Error, Result};

/// Column list matching [`RawRecord::from_row`].
pub const RECORD_COLUMNS: &str = "id, title, amount, kind, created_at, deleted";

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

// ─── RecordKind
// ───────────────────────────────────────────────────────────────

pub fn encode_kind(k: RecordKind) -> &'static str { k.as_str() }

pub fn decode_kind(s: &str) -> Result<RecordKind> {
  RecordKind::parse(s).map_err(|_| Error::Decode(format!("unknown record kind: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `records` row.
pub struct RawRecord {
  pub id:         i64,
  pub title:      String,
  pub amount:     f64,
  pub kind:       String,
  pub created_at: String,
  pub deleted:    bool,
}

impl RawRecord {
  /// Read a row selected with [`RECORD_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      title:      row.get(1)?,
      amount:     row.get(2)?,
      kind:       row.get(3)?,
      created_at: row.get(4)?,
      deleted:    row.get(5)?,
    })
  }

  pub fn into_record(self) -> Result<Record> {
    Ok(Record {
      id:         RecordId(self.id),
      title:      self.title,
      amount:     self.amount,
      kind:       decode_kind(&self.kind)?,
      created_at: decode_dt(&self.created_at)?,
      deleted:    self.deleted,
    })
  }
}
