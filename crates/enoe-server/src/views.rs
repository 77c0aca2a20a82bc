//! Server-rendered HTML pages.

use askama::Template;
use axum::{
  extract::State,
  response::{Html, Redirect},
};
use enoe_core::snapshot::NationalGroup;

use crate::{AppState, Error};

#[derive(Template)]
#[template(path = "estadisticas.html")]
pub struct EstadisticasTemplate {
  pub latest_period:  String,
  /// Chart axis labels, as a JSON array.
  pub labels_json:    String,
  /// Default percent variables of the national chart, as a JSON array.
  pub variables_json: String,
  pub groups:         Vec<NationalGroup>,
}

/// `GET /`
pub async fn index() -> Redirect { Redirect::to("/estadisticas") }

/// `GET /estadisticas`
pub async fn estadisticas(State(state): State<AppState>) -> Result<Html<String>, Error> {
  let snapshot = &state.snapshot;
  let series = snapshot.national_series(None)?;
  let template = EstadisticasTemplate {
    latest_period:  snapshot.latest_period().label(),
    labels_json:    script_json(&series.labels)?,
    variables_json: script_json(&series.variables)?,
    groups:         snapshot.national_groups().0,
  };
  Ok(Html(template.render()?))
}

/// JSON safe to inline inside a `<script>` element.
fn script_json<T: serde::Serialize>(value: &T) -> Result<String, Error> {
  Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}
