//! Handler for the choropleth boundaries.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/estados/geojson` | FeatureCollection with latest-period metrics |

use std::sync::Arc;

use axum::{Json, extract::State};
use enoe_core::Snapshot;
use serde::{Serialize, Serializer};

/// Serializes the snapshot's boundary set in place.
pub struct Boundaries(Arc<Snapshot>);

impl Serialize for Boundaries {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    self.0.boundaries().serialize(serializer)
  }
}

/// `GET /estados/geojson`
pub async fn geojson(State(snapshot): State<Arc<Snapshot>>) -> Json<Boundaries> {
  Json(Boundaries(snapshot))
}
