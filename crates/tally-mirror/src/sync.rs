//! One-way, full-replace synchronisation from the local store to the mirror.
//!
//! The remote collection is emptied and then refilled with every active local
//! record. Deletes all finish before any create starts; within a phase the
//! requests run concurrently in no particular order. The first failure ends
//! the sync. Requests still in flight keep running detached and nothing is
//! rolled back, so a failed sync can leave the remote half-replaced.

use tally_core::{record::RecordId, store::RecordStore};
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};

use crate::{MirrorClient, wire::NewRemoteRecord};

/// Counts of remote operations performed by a successful sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
  pub deleted:  usize,
  pub uploaded: usize,
}

#[derive(Debug, Error)]
pub enum SyncError {
  #[error("reading local records failed: {0}")]
  LocalRead(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("fetching remote records failed: {0}")]
  Fetch(#[source] crate::Error),

  #[error("deleting remote record {id} failed: {source}")]
  Delete {
    id:     String,
    #[source]
    source: crate::Error,
  },

  #[error("uploading record {id} failed: {source}")]
  Upload {
    id:     RecordId,
    #[source]
    source: crate::Error,
  },

  #[error("sync task did not complete: {0}")]
  Task(#[from] JoinError),
}

impl SyncError {
  /// Remediation text suitable for showing next to the error.
  pub fn hint(&self) -> &'static str {
    "Check your network connection and the configured endpoint, then sync again."
  }
}

/// Replace the remote collection with the store's active records.
pub async fn sync_to_remote<S: RecordStore>(
  store: &S,
  client: &MirrorClient,
) -> Result<SyncReport, SyncError> {
  let local = store
    .list_active()
    .await
    .map_err(|e| SyncError::LocalRead(Box::new(e)))?;
  // Only ids are needed to empty the remote; other fields may be in any shape.
  let remote = client.fetch_ids().await.map_err(SyncError::Fetch)?;

  tracing::info!(
    endpoint = %client.endpoint(),
    remote = remote.len(),
    local = local.len(),
    "sync started"
  );

  let mut deletes = JoinSet::new();
  for record in remote {
    let client = client.clone();
    let id = record.id;
    deletes.spawn(async move {
      let result = client.delete(&id).await;
      result.map_err(|source| SyncError::Delete { id, source })
    });
  }
  let deleted = join_phase("delete", deletes).await?;

  let mut uploads = JoinSet::new();
  for record in &local {
    let client = client.clone();
    let id = record.id;
    let body = NewRemoteRecord::from(record);
    uploads.spawn(async move {
      client
        .create(&body)
        .await
        .map(drop)
        .map_err(|source| SyncError::Upload { id, source })
    });
  }
  let uploaded = join_phase("upload", uploads).await?;

  tracing::info!(deleted, uploaded, "sync finished");
  Ok(SyncReport { deleted, uploaded })
}

/// Wait for every task in `tasks`. On the first failure the rest are
/// detached and the failure is returned.
async fn join_phase(
  phase: &'static str,
  mut tasks: JoinSet<Result<(), SyncError>>,
) -> Result<usize, SyncError> {
  let mut completed = 0;
  while let Some(joined) = tasks.join_next().await {
    let outcome = match joined {
      Ok(result) => result,
      Err(e) => Err(SyncError::from(e)),
    };
    if let Err(e) = outcome {
      tracing::warn!(phase, error = %e, in_flight = tasks.len(), "sync phase failed");
      tasks.detach_all();
      return Err(e);
    }
    completed += 1;
  }
  Ok(completed)
}
