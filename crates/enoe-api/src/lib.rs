//! JSON REST API for the ENOE panel.
//!
//! Exposes an axum [`Router`] over an immutable [`Snapshot`]. Every handler
//! is a pure read; nothing here touches the filesystem.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", enoe_api::api_router(snapshot.clone()))
//! ```

pub mod boundaries;
pub mod error;
pub mod national;
pub mod states;

use std::sync::Arc;

use axum::{Router, routing::get};
use enoe_core::Snapshot;

pub use error::ApiError;

/// Build a fully-materialised API router over `snapshot`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router(snapshot: Arc<Snapshot>) -> Router<()> {
  Router::new()
    // Map
    .route("/estados/geojson", get(boundaries::geojson))
    // Entities
    .route("/estado/{ent_code}/series", get(states::series))
    .route("/estatal/latest", get(states::latest))
    .route("/estatal/timeseries", get(states::timeseries))
    .route("/estatal/variables", get(states::variables))
    .route("/estatal/legend", get(states::legend))
    // National
    .route("/nacional/series", get(national::series))
    .route("/nacional/all", get(national::all))
    .with_state(snapshot)
}
