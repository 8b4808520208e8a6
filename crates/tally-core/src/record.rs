//! Record types — the single persisted entity of the ledger.
//!
//! A record is one income or expense entry. Its identity and creation
//! timestamp are assigned by the store and never change; only the title,
//! amount and kind are editable in place.

use std::{fmt, num::ParseIntError, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, lifecycle::Lifecycle};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Store-assigned record identifier. Never reused once allocated.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

impl FromStr for RecordId {
  type Err = ParseIntError;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    s.trim().parse().map(Self)
  }
}

// ─── Kind ────────────────────────────────────────────────────────────────────

/// Whether money came in or went out.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RecordKind {
  Income,
  Expense,
}

impl RecordKind {
  /// Parse the textual form (`income` / `expense`, any ASCII case).
  pub fn parse(s: &str) -> Result<Self> {
    s.trim()
      .parse()
      .map_err(|_| Error::UnknownKind(s.to_owned()))
  }

  pub fn as_str(self) -> &'static str { self.into() }
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// The caller-editable part of a record, used for both `add` and `update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordInput {
  pub title:  String,
  pub amount: f64,
  pub kind:   RecordKind,
}

impl RecordInput {
  /// Build a validated input. Surrounding whitespace is trimmed from `title`.
  pub fn new(title: impl Into<String>, amount: f64, kind: RecordKind) -> Result<Self> {
    let title = title.into();
    let input = Self {
      title: title.trim().to_owned(),
      amount,
      kind,
    };
    input.validate()?;
    Ok(input)
  }

  /// Check the title is non-blank and the amount is finite and positive.
  pub fn validate(&self) -> Result<()> {
    if self.title.trim().is_empty() {
      return Err(Error::BlankTitle);
    }
    if !self.amount.is_finite() || self.amount <= 0.0 {
      return Err(Error::InvalidAmount(self.amount));
    }
    Ok(())
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A persisted ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
  pub id:         RecordId,
  pub title:      String,
  pub amount:     f64,
  pub kind:       RecordKind,
  /// Assigned by the store at creation; the default ordering key.
  pub created_at: DateTime<Utc>,
  /// Soft-delete flag. `true` means the record sits in the trash.
  pub deleted:    bool,
}

impl Record {
  pub fn lifecycle(&self) -> Lifecycle { Lifecycle::from_deleted(self.deleted) }

  pub fn is_active(&self) -> bool { !self.deleted }

  /// Amount with the sign of its effect on the balance.
  pub fn signed_amount(&self) -> f64 {
    match self.kind {
      RecordKind::Income => self.amount,
      RecordKind::Expense => -self.amount,
    }
  }
}
