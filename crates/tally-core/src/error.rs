//! Error types for `tally-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("title must not be blank")]
  BlankTitle,

  #[error("amount must be a positive number, got {0}")]
  InvalidAmount(f64),

  #[error("unknown record kind: {0:?}")]
  UnknownKind(String),
}

impl Error {
  /// `true` for errors caused by out-of-contract caller input.
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      Self::BlankTitle | Self::InvalidAmount(_) | Self::UnknownKind(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
