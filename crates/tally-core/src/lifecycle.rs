//! Record lifecycle states.
//!
//! Soft deletion is a flag on the record itself rather than a move to a
//! separate table, so a record keeps its id across trash and restore.

use serde::{Deserialize, Serialize};

/// The two states a stored record can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
  /// Visible in normal listings.
  #[default]
  Active,
  /// Soft-deleted; visible only in the trash and recoverable.
  Trashed,
}

impl Lifecycle {
  pub fn from_deleted(deleted: bool) -> Self {
    if deleted { Self::Trashed } else { Self::Active }
  }

  /// Value of the stored `deleted` flag for this state.
  pub fn deleted_flag(self) -> bool { matches!(self, Self::Trashed) }
}
