//! Domain types and the enrichment pipeline for the ENOE labor-market panel.
//!
//! This crate is deliberately free of file, HTTP and logging dependencies.
//! The loader feeds it typed tables; it produces an immutable [`Snapshot`]
//! that every request handler reads from.

pub mod error;
pub mod geo;
pub mod legend;
pub mod metrics;
pub mod names;
pub mod period;
pub mod record;
pub mod snapshot;
pub mod variables;

pub use error::{Error, Result};
pub use period::Period;
pub use snapshot::Snapshot;

#[cfg(test)]
mod tests;
