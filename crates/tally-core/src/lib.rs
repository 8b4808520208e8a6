//! Record model, validation, store traits and statistics for the Tally
//! ledger.
//!
//! No HTTP or database code lives here. Storage backends implement
//! [`store::RecordStore`]; the mirror and the CLI are written against it.

// Trait methods are declared as `impl Future + Send`; backends implement
// them with plain `async fn`.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod lifecycle;
pub mod record;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
