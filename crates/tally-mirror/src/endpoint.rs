//! Where the remote mirror lives.
//!
//! The endpoint URL is persisted in a [`SettingsStore`] under
//! [`ENDPOINT_KEY`]. When nothing usable is stored the built-in
//! [`DEFAULT_ENDPOINT`] applies.

use reqwest::Url;
use tally_core::store::SettingsStore;

use crate::{Error, Result};

/// Endpoint used until the user configures one.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/records";

/// Settings key holding the configured endpoint.
pub const ENDPOINT_KEY: &str = "mirror.endpoint";

/// Parse `raw` (surrounding whitespace ignored) as an absolute `http` or
/// `https` URL.
pub fn parse_endpoint(raw: &str) -> Result<Url> {
  let trimmed = raw.trim();
  let invalid = |reason: String| Error::InvalidEndpoint {
    url: trimmed.to_owned(),
    reason,
  };

  let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
  match url.scheme() {
    "http" | "https" => Ok(url),
    other => Err(invalid(format!("unsupported scheme {other:?}"))),
  }
}

/// The persisted endpoint, or the default if none is set.
///
/// A stored value that no longer parses, or a failing settings read, is
/// logged and treated as unset.
pub async fn configured_endpoint<S: SettingsStore>(settings: &S) -> Result<Url> {
  match settings.get_setting(ENDPOINT_KEY).await {
    Ok(Some(raw)) => match parse_endpoint(&raw) {
      Ok(url) => return Ok(url),
      Err(e) => tracing::warn!(error = %e, "ignoring stored mirror endpoint"),
    },
    Ok(None) => {}
    Err(e) => tracing::warn!(error = %e, "could not read mirror endpoint setting"),
  }
  parse_endpoint(DEFAULT_ENDPOINT)
}

/// Validate `raw` and persist it for future calls. Nothing is written if
/// validation fails.
pub async fn set_endpoint<S: SettingsStore>(settings: &S, raw: &str) -> Result<Url> {
  let url = parse_endpoint(raw)?;
  settings
    .set_setting(ENDPOINT_KEY, url.as_str())
    .await
    .map_err(|e| Error::Settings(Box::new(e)))?;
  tracing::info!(endpoint = %url, "mirror endpoint saved");
  Ok(url)
}
