//! SQLite storage for the Tally ledger.
//!
//! [`SqliteStore`] implements both [`tally_core::store::RecordStore`] and
//! [`tally_core::store::SettingsStore`] on one database file. Queries run on
//! the `tokio-rusqlite` worker thread so callers never block the runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
