//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The request is well formed but the data cannot answer it, e.g. a
  /// legend over a variable with fewer than two observations.
  #[error("unprocessable: {0}")]
  Unprocessable(String),
}

impl From<enoe_core::Error> for ApiError {
  fn from(e: enoe_core::Error) -> Self {
    use enoe_core::Error as E;
    match e {
      E::UnknownVariable(_) => ApiError::BadRequest(e.to_string()),
      E::UnknownEntity(_) => ApiError::NotFound(e.to_string()),
      E::InsufficientObservations { .. } | E::EmptyStateTable => {
        ApiError::Unprocessable(e.to_string())
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
