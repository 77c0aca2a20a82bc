//! Handlers for per-entity endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/estado/{ent_code}/series` | 404 if the code matches no row |
//! | `GET`  | `/estatal/latest` | Required `?variable=<id>` |
//! | `GET`  | `/estatal/timeseries` | Required `?variable=<id>`, optional `&estados=<a,b,...>` |
//! | `GET`  | `/estatal/variables` | Numeric variable catalog |
//! | `GET`  | `/estatal/legend` | Optional `?variable=<id>`, defaults to monthly income |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use enoe_core::{
  Snapshot,
  legend::LegendBreak,
  snapshot::{EntityLatest, EntitySeries, EntityTimeseries},
  variables::VariableInfo,
};
use serde::Deserialize;

use crate::error::ApiError;

fn required(variable: Option<String>) -> Result<String, ApiError> {
  variable
    .filter(|v| !v.trim().is_empty())
    .ok_or_else(|| ApiError::BadRequest("missing query parameter `variable`".into()))
}

// ─── Series ───────────────────────────────────────────────────────────────────

/// `GET /estado/{ent_code}/series`
pub async fn series(
  State(snapshot): State<Arc<Snapshot>>,
  Path(ent_code): Path<u32>,
) -> Result<Json<EntitySeries>, ApiError> {
  snapshot
    .entity_series(ent_code)
    .map(Json)
    .ok_or_else(|| ApiError::NotFound("Estado no encontrado".into()))
}

// ─── Latest ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VariableParams {
  pub variable: Option<String>,
}

/// `GET /estatal/latest?variable=<id>`
pub async fn latest(
  State(snapshot): State<Arc<Snapshot>>,
  Query(params): Query<VariableParams>,
) -> Result<Json<EntityLatest>, ApiError> {
  let variable = required(params.variable)?;
  Ok(Json(snapshot.entity_latest(variable.trim())?))
}

// ─── Timeseries ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TimeseriesParams {
  pub variable: Option<String>,
  /// Comma-separated entity names.
  pub estados:  Option<String>,
}

/// `GET /estatal/timeseries?variable=<id>&estados=<a,b,...>`
pub async fn timeseries(
  State(snapshot): State<Arc<Snapshot>>,
  Query(params): Query<TimeseriesParams>,
) -> Result<Json<EntityTimeseries>, ApiError> {
  let variable = required(params.variable)?;
  let names: Vec<&str> = params
    .estados
    .as_deref()
    .unwrap_or_default()
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .collect();
  Ok(Json(snapshot.entity_timeseries(variable.trim(), &names)?))
}

// ─── Catalog ──────────────────────────────────────────────────────────────────

/// `GET /estatal/variables`
pub async fn variables(State(snapshot): State<Arc<Snapshot>>) -> Json<Vec<VariableInfo>> {
  Json(snapshot.numeric_variables())
}

/// `GET /estatal/legend[?variable=<id>]`
pub async fn legend(
  State(snapshot): State<Arc<Snapshot>>,
  Query(params): Query<VariableParams>,
) -> Result<Json<Vec<LegendBreak>>, ApiError> {
  let breaks = match params.variable.as_deref().map(str::trim) {
    None | Some("") => snapshot.legend().to_vec(),
    Some(variable) => snapshot.legend_for(variable)?,
  };
  Ok(Json(breaks))
}
