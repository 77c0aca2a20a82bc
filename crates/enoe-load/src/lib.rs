//! File decoding for the ENOE panel.
//!
//! Turns the two CSV tables and the boundary GeoJSON into the typed inputs
//! of [`enoe_core::Snapshot::build`]. Any malformed input aborts the load.

mod boundaries;
mod national;
mod state;
mod table;

pub mod error;

use std::path::PathBuf;

use enoe_core::{
  Snapshot,
  geo::BoundarySet,
  record::{NationalTable, StateTable},
};
use serde::Deserialize;

pub use boundaries::{load_boundaries, read_boundaries};
pub use error::{Error, Result};
pub use national::{load_national, read_national};
pub use state::{load_states, read_states};

/// Locations of the three input files.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
  pub national_csv: PathBuf,
  pub states_csv:   PathBuf,
  pub boundaries:   PathBuf,
}

impl Default for DataPaths {
  fn default() -> Self {
    Self {
      national_csv: "database/Nacional_deflactado.csv".into(),
      states_csv:   "database/20251031_Estados.csv".into(),
      boundaries:   "static/data/mexico_estados.json".into(),
    }
  }
}

/// The decoded inputs, before enrichment.
#[derive(Debug, Clone)]
pub struct Dataset {
  pub national:   NationalTable,
  pub states:     StateTable,
  pub boundaries: BoundarySet,
}

impl Dataset {
  /// Run the enrichment pipeline over the decoded tables.
  pub fn into_snapshot(self) -> Result<Snapshot> {
    Ok(Snapshot::build(self.national, self.states, self.boundaries)?)
  }
}

/// Read all three inputs.
pub fn load_dataset(paths: &DataPaths) -> Result<Dataset> {
  Ok(Dataset {
    national:   load_national(&paths.national_csv)?,
    states:     load_states(&paths.states_csv)?,
    boundaries: load_boundaries(&paths.boundaries)?,
  })
}
