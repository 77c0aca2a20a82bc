//! Handlers for national-scope charts.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/nacional/series` | Optional `?seleccion=<group>` or `?seleccion=<id,id,...>` |
//! | `GET`  | `/nacional/all` | Every chart group, keyed by group id |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use enoe_core::{
  Snapshot,
  snapshot::{NationalGallery, NationalSeries},
};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SeriesParams {
  pub seleccion: Option<String>,
}

/// `GET /nacional/series[?seleccion=<group or ids>]`
pub async fn series(
  State(snapshot): State<Arc<Snapshot>>,
  Query(params): Query<SeriesParams>,
) -> Result<Json<NationalSeries>, ApiError> {
  let selection = params.seleccion.as_deref().filter(|s| !s.trim().is_empty());
  Ok(Json(snapshot.national_series(selection)?))
}

/// `GET /nacional/all`
pub async fn all(State(snapshot): State<Arc<Snapshot>>) -> Json<NationalGallery> {
  Json(snapshot.national_groups())
}
