//! JSON shapes exchanged with the remote collection.
//!
//! `{ "id": "1", "title": "Lunch", "amount": 50000, "type": "expense",
//!    "createdAt": "2025-11-01T08:30:00.000Z" }`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tally_core::record::{Record, RecordKind};

/// A record as stored by the remote server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRecord {
  /// Server-assigned. Some servers hand out numbers, some strings.
  #[serde(deserialize_with = "string_or_number")]
  pub id:         String,
  pub title:      String,
  pub amount:     f64,
  #[serde(rename = "type")]
  pub kind:       RecordKind,
  #[serde(with = "iso_millis")]
  pub created_at: DateTime<Utc>,
}

/// Just the id of a remote record. Every other field is ignored, so records
/// this client could not fully decode can still be addressed for deletion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteId {
  #[serde(deserialize_with = "string_or_number")]
  pub id: String,
}

/// Body of a create request; the server assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRemoteRecord {
  pub title:      String,
  pub amount:     f64,
  #[serde(rename = "type")]
  pub kind:       RecordKind,
  #[serde(with = "iso_millis")]
  pub created_at: DateTime<Utc>,
}

impl From<&Record> for NewRemoteRecord {
  fn from(record: &Record) -> Self {
    Self {
      title:      record.title.clone(),
      amount:     record.amount,
      kind:       record.kind,
      created_at: record.created_at,
    }
  }
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Id {
    Text(String),
    Number(i64),
  }

  Ok(match Id::deserialize(d)? {
    Id::Text(s) => s,
    Id::Number(n) => n.to_string(),
  })
}

/// ISO-8601 UTC with millisecond precision and a `Z` suffix.
mod iso_millis {
  use chrono::{DateTime, SecondsFormat, Utc};
  use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

  pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(d)?;
    DateTime::parse_from_rfc3339(&raw)
      .map(|dt| dt.with_timezone(&Utc))
      .map_err(D::Error::custom)
  }
}
