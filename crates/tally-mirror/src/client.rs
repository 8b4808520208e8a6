//! Async HTTP client wrapping the remote mirror collection.

use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::{
  Error, Result,
  wire::{NewRemoteRecord, RemoteId, RemoteRecord},
};

/// Async HTTP client for one remote collection endpoint.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based. No timeout
/// or retry policy is layered on top of reqwest's defaults.
#[derive(Clone)]
pub struct MirrorClient {
  client:   Client,
  endpoint: Url,
}

impl MirrorClient {
  pub fn new(endpoint: Url) -> Result<Self> {
    let client = Client::builder().build().map_err(Error::Client)?;
    Ok(Self { client, endpoint })
  }

  pub fn endpoint(&self) -> &Url { &self.endpoint }

  /// `<endpoint>/<id>`, with `id` percent-encoded as one path segment.
  fn record_url(&self, id: &str) -> Result<Url> {
    let mut url = self.endpoint.clone();
    url
      .path_segments_mut()
      .map_err(|()| Error::InvalidEndpoint {
        url:    self.endpoint.to_string(),
        reason: "cannot append a path segment".into(),
      })?
      .pop_if_empty()
      .push(id);
    Ok(url)
  }

  /// Send `req` and require a 2xx status.
  async fn send(&self, req: RequestBuilder, method: &'static str, url: &Url) -> Result<Response> {
    let resp = req.send().await.map_err(|source| Error::Transport {
      method,
      url: url.to_string(),
      source,
    })?;

    if !resp.status().is_success() {
      return Err(Error::Status {
        method,
        url: url.to_string(),
        status: resp.status(),
      });
    }
    Ok(resp)
  }

  // ── Probe ─────────────────────────────────────────────────────────────────

  /// `GET <url>` — `true` iff the server answers with a 2xx status.
  ///
  /// Never fails: an unparsable URL or a transport error yields `false`.
  pub async fn test_connection(&self, url: &str) -> bool {
    let url = match crate::endpoint::parse_endpoint(url) {
      Ok(url) => url,
      Err(e) => {
        tracing::warn!(error = %e, "connection test skipped");
        return false;
      }
    };

    match self.send(self.client.get(url.clone()), "GET", &url).await {
      Ok(_) => true,
      Err(e) => {
        tracing::warn!(error = %e, "connection test failed");
        false
      }
    }
  }

  // ── Collection ────────────────────────────────────────────────────────────

  /// `GET <endpoint>`
  pub async fn fetch_all(&self) -> Result<Vec<RemoteRecord>> { self.get_collection().await }

  /// `GET <endpoint>`, decoding only each element's `id`.
  pub async fn fetch_ids(&self) -> Result<Vec<RemoteId>> { self.get_collection().await }

  async fn get_collection<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
    let url = &self.endpoint;
    let resp = self.send(self.client.get(url.clone()), "GET", url).await?;
    resp.json().await.map_err(|source| Error::Decode {
      url: url.to_string(),
      source,
    })
  }

  /// `POST <endpoint>` — returns the stored record with its server id.
  pub async fn create(&self, record: &NewRemoteRecord) -> Result<RemoteRecord> {
    let url = &self.endpoint;
    let resp = self
      .send(self.client.post(url.clone()).json(record), "POST", url)
      .await?;
    resp.json().await.map_err(|source| Error::Decode {
      url: url.to_string(),
      source,
    })
  }

  /// `DELETE <endpoint>/<id>`
  pub async fn delete(&self, id: &str) -> Result<()> {
    let url = self.record_url(id)?;
    self.send(self.client.delete(url.clone()), "DELETE", &url).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn client(endpoint: &str) -> MirrorClient {
    MirrorClient::new(Url::parse(endpoint).unwrap()).unwrap()
  }

  #[test]
  fn record_url_appends_one_segment() {
    let c = client("https://example.com/api/records");
    assert_eq!(c.record_url("42").unwrap().as_str(), "https://example.com/api/records/42");

    let c = client("https://example.com/api/records/");
    assert_eq!(c.record_url("42").unwrap().as_str(), "https://example.com/api/records/42");
  }

  #[test]
  fn record_url_escapes_id() {
    let c = client("https://example.com/records");
    assert_eq!(
      c.record_url("a/b c").unwrap().as_str(),
      "https://example.com/records/a%2Fb%20c"
    );
  }
}
