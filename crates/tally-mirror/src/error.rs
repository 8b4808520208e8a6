//! Error type for `tally-mirror`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The endpoint text is not an absolute `http`/`https` URL.
  #[error("invalid endpoint {url:?}: {reason}")]
  InvalidEndpoint { url: String, reason: String },

  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("{method} {url} failed: {source}")]
  Transport {
    method: &'static str,
    url:    String,
    #[source]
    source: reqwest::Error,
  },

  #[error("{method} {url} → {status}")]
  Status {
    method: &'static str,
    url:    String,
    status: reqwest::StatusCode,
  },

  #[error("decoding response from {url}: {source}")]
  Decode {
    url:    String,
    #[source]
    source: reqwest::Error,
  },

  #[error("settings store error: {0}")]
  Settings(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// `true` for failures talking to the remote server.
  pub fn is_remote(&self) -> bool {
    matches!(
      self,
      Self::Transport { .. } | Self::Status { .. } | Self::Decode { .. }
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
