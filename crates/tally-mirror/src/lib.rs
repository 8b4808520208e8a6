//! Remote mirror for the Tally ledger.
//!
//! A mirror is a plain JSON collection resource on some HTTP server. This
//! crate talks to it ([`MirrorClient`]), remembers where it lives
//! ([`endpoint`]), and pushes a full copy of the local active records to it
//! ([`sync::sync_to_remote`]).

pub mod client;
pub mod endpoint;
pub mod error;
pub mod sync;
pub mod wire;

pub use client::MirrorClient;
pub use error::{Error, Result};
pub use sync::{SyncError, SyncReport, sync_to_remote};

#[cfg(test)]
mod fake_remote;
#[cfg(test)]
mod tests;
