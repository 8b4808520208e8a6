//! `tally` — command-line driver for the Tally ledger.
//!
//! # Usage
//!
//! ```text
//! tally add "Lunch" 50000 --kind expense
//! tally list --search lunch
//! tally trash 3 && tally list --trash
//! tally endpoint set https://example.com/api/records
//! tally sync
//! ```

mod app;
mod display;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tally_core::record::{RecordId, RecordKind};
use tally_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Track income and expenses")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "tally.toml")]
  config: PathBuf,

  /// SQLite database file (overrides the config file and TALLY_STORE_PATH).
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Record a new entry.
  Add {
    title:  String,
    amount: f64,
    /// `income` or `expense`.
    #[arg(short, long, default_value = "expense")]
    kind:   RecordKind,
  },
  /// Change the title, amount and kind of an entry.
  Edit {
    id:     RecordId,
    title:  String,
    amount: f64,
    #[arg(short, long)]
    kind:   RecordKind,
  },
  /// Show one entry, trashed or not.
  Show { id: RecordId },
  /// List entries, newest first.
  List {
    /// List the trash instead of active entries.
    #[arg(long)]
    trash:  bool,
    #[arg(short, long)]
    kind:   Option<RecordKind>,
    /// Case-insensitive match on title, amount or kind.
    #[arg(short, long)]
    search: Option<String>,
    #[arg(long)]
    limit:  Option<usize>,
  },
  /// Move an entry to the trash.
  Trash { id: RecordId },
  /// Bring an entry back from the trash.
  Restore { id: RecordId },
  /// Delete an entry permanently.
  Purge { id: RecordId },
  /// Monthly income and expense for the last six months with entries.
  Stats,
  /// Show, change or probe the remote mirror endpoint.
  Endpoint {
    #[command(subcommand)]
    action: EndpointAction,
  },
  /// Replace the remote mirror's contents with all active entries.
  Sync,
}

#[derive(Subcommand, Debug)]
pub enum EndpointAction {
  Show,
  Set { url: String },
  /// Probe a URL (the configured endpoint if omitted).
  Test { url: Option<String> },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Settings read from the config file and `TALLY_*` environment variables.
#[derive(Deserialize, Debug)]
struct CliConfig {
  store_path: PathBuf,
}

fn load_config(path: &Path) -> Result<CliConfig> {
  let settings = config::Config::builder()
    .set_default("store_path", default_store_path().to_string_lossy().into_owned())
    .context("setting config defaults")?
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("TALLY"))
    .build()
    .context("failed to read config file")?;

  settings
    .try_deserialize()
    .context("failed to deserialise config")
}

fn default_store_path() -> PathBuf {
  match std::env::var("HOME") {
    Ok(home) => PathBuf::from(home).join(".local/share/tally/tally.db"),
    Err(_) => PathBuf::from("tally.db"),
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let cfg = load_config(&args.config)?;

  let store_path = expand_tilde(&args.store.unwrap_or(cfg.store_path));
  if let Some(dir) = store_path.parent().filter(|d| !d.as_os_str().is_empty()) {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("creating data directory {}", dir.display()))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let app = App::new(store);
  app.init().await?;

  // Close the store even when the command fails.
  let result = app.run(args.command).await;
  app.close().await?;
  result
}
