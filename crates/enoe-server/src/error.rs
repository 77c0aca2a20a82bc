//! Error types and axum `IntoResponse` implementation for the HTML views.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("template error: {0}")]
  Template(#[from] askama::Error),
  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
  #[error("core error: {0}")]
  Core(#[from] enoe_core::Error),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    tracing::error!(error = %self, "view failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
  }
}
