//! Monthly income/expense rollups derived from the active record set.
//!
//! Nothing here is persisted; statistics are recomputed on every request.

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  record::{Record, RecordKind},
  store::RecordStore,
};

/// Number of most recent months kept in [`Summary::months`].
pub const MONTH_WINDOW: usize = 6;

// ─── Types ───────────────────────────────────────────────────────────────────

/// A calendar month. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
  pub year:  i32,
  /// 1-based.
  pub month: u32,
}

impl MonthKey {
  /// The month `at` falls in when viewed from time zone `tz`.
  pub fn of<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> Self {
    let local = at.with_timezone(tz);
    Self {
      year:  local.year(),
      month: local.month(),
    }
  }
}

impl fmt::Display for MonthKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.month, self.year)
  }
}

/// Income and expense sums over some set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
  pub income:  f64,
  pub expense: f64,
}

impl Totals {
  pub fn balance(&self) -> f64 { self.income - self.expense }

  fn add(&mut self, record: &Record) {
    match record.kind {
      RecordKind::Income => self.income += record.amount,
      RecordKind::Expense => self.expense += record.amount,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
  pub month:  MonthKey,
  pub totals: Totals,
}

/// Rollup over a non-empty active record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
  /// The most recent months that have records, oldest first.
  pub months: Vec<MonthlyTotals>,
  /// Grand totals over every active record, not just the month window.
  pub totals: Totals,
}

/// Result of an aggregation. An empty ledger is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Statistics {
  Empty,
  Summary(Summary),
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// Group the active records in `records` by month in `tz` and keep the
/// `window` most recent months. Trashed records are ignored.
pub fn aggregate<Tz: TimeZone>(records: &[Record], tz: &Tz, window: usize) -> Statistics {
  let mut by_month: BTreeMap<MonthKey, Totals> = BTreeMap::new();
  let mut totals = Totals::default();
  let mut seen = false;

  for record in records.iter().filter(|r| r.is_active()) {
    seen = true;
    totals.add(record);
    by_month
      .entry(MonthKey::of(&record.created_at, tz))
      .or_default()
      .add(record);
  }

  if !seen {
    return Statistics::Empty;
  }

  let mut months: Vec<MonthlyTotals> = by_month
    .into_iter()
    .rev()
    .take(window)
    .map(|(month, totals)| MonthlyTotals { month, totals })
    .collect();
  months.reverse();

  Statistics::Summary(Summary { months, totals })
}

/// Aggregate the store's active records in the local time zone.
pub async fn load_statistics<S: RecordStore>(store: &S) -> Result<Statistics, S::Error> {
  let records = store.list_active().await?;
  Ok(aggregate(&records, &Local, MONTH_WINDOW))
}
