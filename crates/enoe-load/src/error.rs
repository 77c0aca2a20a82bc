//! Error type for `enoe-load`.
//!
//! Every variant is fatal: a dataset that fails to load is never served.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("cannot read {}: {error}", .path.display())]
  Io {
    path:  PathBuf,
    #[source]
    error: std::io::Error,
  },

  #[error("{source_name}: csv error: {error}")]
  Csv {
    source_name: String,
    #[source]
    error:       csv::Error,
  },

  #[error("{source_name}: json error: {error}")]
  Json {
    source_name: String,
    #[source]
    error:       serde_json::Error,
  },

  #[error("{source_name}: missing required column {column:?}")]
  MissingColumn {
    source_name: String,
    column:      &'static str,
  },

  #[error("{source_name}, line {line}: invalid value {value:?} in column {column:?}")]
  InvalidValue {
    source_name: String,
    line:        u64,
    column:      String,
    value:       String,
  },

  #[error("{source_name}, line {line}: duplicate row for {key}")]
  DuplicateRow {
    source_name: String,
    line:        u64,
    key:         String,
  },

  #[error("{source_name}: expected a GeoJSON FeatureCollection, found type {found:?}")]
  NotAFeatureCollection {
    source_name: String,
    found:       String,
  },

  #[error("core error: {0}")]
  Core(#[from] enoe_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
