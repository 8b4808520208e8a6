use anyhow::{Context, Result, anyhow};
use tally_core::{
  record::RecordInput,
  stats::load_statistics,
  store::{RecordQuery, RecordStore},
};
use tally_mirror::{
  MirrorClient,
  endpoint::{configured_endpoint, set_endpoint},
  sync_to_remote,
};
use tally_store_sqlite::SqliteStore;

use crate::{
  Command, EndpointAction,
  display::{print_record, print_records, print_statistics},
};

// ─── App ──────────────────────────────────────────────────────────────────────

/// Runs one command against the local store and, for the mirror commands,
/// the configured remote.
pub struct App {
  /// Opened store; initialised by [`App::init`] before any command runs.
  store: SqliteStore,
}

impl App {
  pub fn new(store: SqliteStore) -> Self { Self { store } }

  pub async fn init(&self) -> Result<()> {
    self.store.init().await.context("failed to initialise store")
  }

  pub async fn close(self) -> Result<()> {
    self.store.close().await.context("failed to close store")
  }

  pub async fn run(&self, command: Command) -> Result<()> {
    match command {
      Command::Add {
        title,
        amount,
        kind,
      } => {
        let input = RecordInput::new(title, amount, kind)?;
        let record = self.store.add(input).await.context("failed to add record")?;
        println!("added #{}", record.id);
      }

      Command::Edit {
        id,
        title,
        amount,
        kind,
      } => {
        let input = RecordInput::new(title, amount, kind)?;
        self
          .store
          .update(id, input)
          .await
          .with_context(|| format!("failed to update record #{id}"))?;
        println!("updated #{id}");
      }

      Command::Show { id } => {
        let record = self
          .store
          .get(id)
          .await
          .with_context(|| format!("failed to load record #{id}"))?
          .ok_or_else(|| anyhow!("no record #{id}"))?;
        print_record(&record);
      }

      Command::List {
        trash,
        kind,
        search,
        limit,
      } => {
        let base = if trash {
          RecordQuery::trashed()
        } else {
          RecordQuery::active()
        };
        let query = RecordQuery {
          kind,
          text: search,
          limit,
          ..base
        };
        let records = self
          .store
          .search(&query)
          .await
          .context("failed to list records")?;
        print_records(&records);
      }

      Command::Trash { id } => {
        self
          .store
          .soft_delete(id)
          .await
          .with_context(|| format!("failed to trash record #{id}"))?;
        println!("moved #{id} to the trash");
      }

      Command::Restore { id } => {
        self
          .store
          .restore(id)
          .await
          .with_context(|| format!("failed to restore record #{id}"))?;
        println!("restored #{id}");
      }

      Command::Purge { id } => {
        self
          .store
          .purge(id)
          .await
          .with_context(|| format!("failed to purge record #{id}"))?;
        println!("deleted #{id} permanently");
      }

      Command::Stats => {
        let stats = load_statistics(&self.store)
          .await
          .context("failed to load statistics")?;
        print_statistics(&stats);
      }

      Command::Endpoint { action } => self.endpoint(action).await?,

      Command::Sync => self.sync().await?,
    }
    Ok(())
  }

  // ── Mirror ────────────────────────────────────────────────────────────────

  async fn endpoint(&self, action: EndpointAction) -> Result<()> {
    match action {
      EndpointAction::Show => {
        let url = configured_endpoint(&self.store).await?;
        println!("{url}");
      }
      EndpointAction::Set { url } => {
        let url = set_endpoint(&self.store, &url)
          .await
          .context("failed to save endpoint")?;
        println!("endpoint set to {url}");
      }
      EndpointAction::Test { url } => {
        let endpoint = configured_endpoint(&self.store).await?;
        let target = url.unwrap_or_else(|| endpoint.to_string());
        let client = MirrorClient::new(endpoint)?;
        if client.test_connection(&target).await {
          println!("{target}: reachable");
        } else {
          println!("{target}: unreachable");
        }
      }
    }
    Ok(())
  }

  async fn sync(&self) -> Result<()> {
    let endpoint = configured_endpoint(&self.store).await?;
    let client = MirrorClient::new(endpoint)?;

    match sync_to_remote(&self.store, &client).await {
      Ok(report) => {
        println!(
          "synced to {}: removed {} remote, uploaded {}",
          client.endpoint(),
          report.deleted,
          report.uploaded
        );
        Ok(())
      }
      Err(e) => {
        let hint = e.hint();
        Err(anyhow::Error::new(e).context(format!("sync failed. {hint}")))
      }
    }
  }
}
