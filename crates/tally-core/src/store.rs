//! The `RecordStore` and `SettingsStore` traits and supporting query types.
//!
//! The traits are implemented by storage backends (e.g. `tally-store-sqlite`).
//! Higher layers (`tally-mirror`, `tally-cli`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  lifecycle::Lifecycle,
  record::{Record, RecordId, RecordInput, RecordKind},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`RecordStore::search`].
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
  /// Which listing to search: the normal one or the trash.
  pub lifecycle: Lifecycle,
  /// Restrict to one kind.
  pub kind:      Option<RecordKind>,
  /// Free-text filter over title, amount and kind label. Case-insensitive;
  /// blank text matches everything.
  pub text:      Option<String>,
  pub limit:     Option<usize>,
  pub offset:    Option<usize>,
}

impl RecordQuery {
  pub fn active() -> Self { Self::default() }

  pub fn trashed() -> Self {
    Self {
      lifecycle: Lifecycle::Trashed,
      ..Self::default()
    }
  }

  pub fn with_text(mut self, text: impl Into<String>) -> Self {
    self.text = Some(text.into());
    self
  }

  pub fn with_kind(mut self, kind: RecordKind) -> Self {
    self.kind = Some(kind);
    self
  }

  /// Whether `record` satisfies every filter in this query. Paging is not
  /// considered.
  pub fn matches(&self, record: &Record) -> bool {
    if record.lifecycle() != self.lifecycle {
      return false;
    }
    if self.kind.is_some_and(|k| k != record.kind) {
      return false;
    }

    let needle = match self.text.as_deref().map(str::trim) {
      None | Some("") => return true,
      Some(t) => t.to_lowercase(),
    };

    record.title.to_lowercase().contains(&needle)
      || record.amount.to_string().contains(&needle)
      || record.kind.as_str().contains(&needle)
  }

  /// Apply `offset` and `limit` to an already-filtered, ordered listing.
  pub fn paginate(&self, records: Vec<Record>) -> Vec<Record> {
    records
      .into_iter()
      .skip(self.offset.unwrap_or(0))
      .take(self.limit.unwrap_or(usize::MAX))
      .collect()
  }
}

// ─── Record store ────────────────────────────────────────────────────────────

/// Abstraction over a Tally record store backend.
///
/// Listings are ordered by `created_at` descending (newest first). Every
/// method taking an id fails with a not-found error if no such record exists,
/// whatever its lifecycle state.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes.
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create the schema if missing and apply additive upgrades. Safe to call
  /// on every start.
  fn init(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Validate and persist a new active record timestamped now.
  fn add(
    &self,
    input: RecordInput,
  ) -> impl Future<Output = Result<Record, Self::Error>> + Send + '_;

  /// Retrieve a record by id in any lifecycle state. Returns `None` if absent.
  fn get(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + '_;

  /// Replace title, amount and kind. `created_at` and `deleted` are untouched.
  fn update(
    &self,
    id: RecordId,
    input: RecordInput,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All records that are not soft-deleted.
  fn list_active(&self) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + '_;

  /// All soft-deleted records.
  fn list_trashed(&self) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + '_;

  /// Filtered, paged listing of one lifecycle state.
  fn search<'a>(
    &'a self,
    query: &'a RecordQuery,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + 'a;

  /// Move a record to the trash. Idempotent.
  fn soft_delete(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Bring a record back from the trash. Idempotent.
  fn restore(&self, id: RecordId) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove a record permanently, whatever its state.
  fn purge(&self, id: RecordId) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Settings store ──────────────────────────────────────────────────────────

/// Minimal persistent key-value store for local configuration.
pub trait SettingsStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn get_setting<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;

  /// Insert or overwrite `key`.
  fn set_setting<'a>(
    &'a self,
    key: &'a str,
    value: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
