//! Error type for `tally-store-sqlite`.

use tally_core::record::RecordId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The caller supplied an out-of-contract record.
  #[error("invalid record: {0}")]
  Invalid(#[from] tally_core::Error),

  #[error("record not found: {0}")]
  RecordNotFound(RecordId),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A stored column could not be turned back into a domain value.
  #[error("could not decode stored value: {0}")]
  Decode(String),
}

impl Error {
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::RecordNotFound(_))
  }

  pub fn is_validation(&self) -> bool {
    matches!(self, Self::Invalid(e) if e.is_validation())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
