//! HTTP front of the ENOE panel: HTML views, static assets and the JSON API
//! mounted under `/api`.

pub mod error;
pub mod views;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Json, Router, extract::State, routing::get};
use enoe_core::{Snapshot, snapshot::Summary};
use enoe_load::DataPaths;
use serde::{Deserialize, Serialize};
use tower_http::{services::ServeDir, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ENOE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:         String,
  pub port:         u16,
  pub national_csv: PathBuf,
  pub states_csv:   PathBuf,
  pub boundaries:   PathBuf,
  pub static_dir:   PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    let data = DataPaths::default();
    Self {
      host:         "127.0.0.1".to_string(),
      port:         5000,
      national_csv: data.national_csv,
      states_csv:   data.states_csv,
      boundaries:   data.boundaries,
      static_dir:   PathBuf::from("static"),
    }
  }
}

impl ServerConfig {
  pub fn data_paths(&self) -> DataPaths {
    DataPaths {
      national_csv: self.national_csv.clone(),
      states_csv:   self.states_csv.clone(),
      boundaries:   self.boundaries.clone(),
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the HTML handlers.
#[derive(Clone)]
pub struct AppState {
  pub snapshot: Arc<Snapshot>,
  pub config:   Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router(state: AppState) -> Router {
  let static_files = ServeDir::new(&state.config.static_dir);
  let api = enoe_api::api_router(state.snapshot.clone());
  Router::new()
    .route("/", get(views::index))
    .route("/estadisticas", get(views::estadisticas))
    .route("/healthz", get(healthz))
    .with_state(state)
    .nest("/api", api)
    .nest_service("/static", static_files)
    .layer(TraceLayer::new_for_http())
}

#[derive(Serialize)]
struct Health {
  status:  &'static str,
  #[serde(flatten)]
  summary: Summary,
}

/// `GET /healthz`
async fn healthz(State(state): State<AppState>) -> Json<Health> {
  Json(Health { status: "ok", summary: state.snapshot.summary() })
}

// ─── Startup report ───────────────────────────────────────────────────────────

/// Log what the startup build produced: latest period, income legend and
/// every boundary feature the join could not resolve.
pub fn log_snapshot(snapshot: &Snapshot) {
  let summary = snapshot.summary();
  let report = snapshot.join_report();
  tracing::info!(
    latest_period = %summary.latest_period,
    national_rows = summary.national_rows,
    state_rows = summary.state_rows,
    entities = summary.entities,
    by_alias = report.by_alias,
    by_normalized = report.by_normalized,
    "snapshot built"
  );
  for b in snapshot.legend() {
    tracing::info!(color = b.color, min = b.min, max = b.max, "income legend bucket");
  }
  for name in &report.unmatched {
    tracing::warn!(
      shape_name = name.as_deref().unwrap_or("<missing>"),
      "boundary feature matches no entity"
    );
  }
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests;
