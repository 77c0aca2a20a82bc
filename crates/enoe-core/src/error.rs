//! Error types for `enoe-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("state table has no rows; the latest period is undefined")]
  EmptyStateTable,

  #[error("quantile legend needs at least 2 observations, found {found}")]
  InsufficientObservations { found: usize },

  #[error("unknown variable: {0:?}")]
  UnknownVariable(String),

  #[error("unknown entity: {0:?}")]
  UnknownEntity(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
