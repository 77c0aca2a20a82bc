use std::{fs, path::Path, sync::Arc};

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use enoe_core::{
  Period, Snapshot,
  geo::{BoundaryFeature, BoundarySet},
  record::{NationalRecord, NationalTable, StateRecord, StateTable},
};
use serde_json::{Map, Value, json};
use tower::ServiceExt as _;

use super::*;

fn state_row(code: u32, name: &str, unemployed: f64, income: f64) -> StateRecord {
  let period = Period::new(2025, 2).unwrap();
  StateRecord {
    ent_code: code,
    ent_nombre: name.into(),
    period,
    periodo: period.label(),
    pea_total: Some(1_000_000.0),
    desocupada_total: Some(unemployed),
    ing_prom_mes_total: Some(income),
    ..StateRecord::default()
  }
}

fn snapshot() -> Snapshot {
  let states = StateTable::from_rows(
    vec![
      state_row(9, "Ciudad de México", 50_000.0, 11_250.0),
      state_row(5, "Coahuila", 38_000.0, 9_300.0),
    ],
    vec![],
  );
  let mut n = NationalRecord::new(Period::new(2025, 2).unwrap());
  n.pob_15_y_mas = Some(100_000.0);
  n.ocupada_total = Some(60_000.0);
  n.ocupacion_formal = Some(27_000.0);
  n.ocupacion_informal = Some(33_000.0);
  let mut props = Map::new();
  props.insert("shapeName".into(), json!("Atlántida"));
  let boundaries = BoundarySet {
    members:  Map::new(),
    features: vec![BoundaryFeature::new(Some("Atlántida".into()), None, props, Value::Null)],
  };
  Snapshot::build(NationalTable::from_rows(vec![n]), states, boundaries).unwrap()
}

fn make_state(static_dir: &Path) -> AppState {
  AppState {
    snapshot: Arc::new(snapshot()),
    config:   Arc::new(ServerConfig {
      static_dir: static_dir.to_path_buf(),
      ..ServerConfig::default()
    }),
  }
}

async fn oneshot(state: AppState, uri: &str) -> axum::response::Response {
  let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
  router(state).oneshot(req).await.unwrap()
}

async fn body_string(resp: axum::response::Response) -> String {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  String::from_utf8(bytes.to_vec()).unwrap()
}

// ── Views ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn root_redirects_to_estadisticas() {
  let dir = tempfile::tempdir().unwrap();
  let resp = oneshot(make_state(dir.path()), "/").await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(resp.headers()[header::LOCATION], "/estadisticas");
}

#[tokio::test]
async fn estadisticas_embeds_national_rates() {
  let dir = tempfile::tempdir().unwrap();
  let resp = oneshot(make_state(dir.path()), "/estadisticas").await;
  assert_eq!(resp.status(), StatusCode::OK);
  let html = body_string(resp).await;
  assert!(html.contains(r#"window.NACIONAL_LABELS = ["2025 T2"];"#), "labels missing: {html}");
  assert!(html.contains(r#""id":"ocupacion_formal_pct""#));
  assert!(html.contains("data-grupo=\"ingresos\""));
  assert!(html.contains("Último periodo: 2025 T2"));
  // Element ids the client script binds to.
  for id in ["map", "galeria-nacional", "variable-select", "map-legend", "chartModal"] {
    assert!(html.contains(&format!(r#"id="{id}""#)), "missing #{id}");
  }
}

// ── Health, API, static ──────────────────────────────────────────────────────

#[tokio::test]
async fn healthz_reports_counts() {
  let dir = tempfile::tempdir().unwrap();
  let resp = oneshot(make_state(dir.path()), "/healthz").await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
  assert_eq!(body["status"], "ok");
  assert_eq!(body["state_rows"], 2);
  assert_eq!(body["unmatched"], 1);
  assert_eq!(body["latest_period"], "2025 T2");
}

#[tokio::test]
async fn api_is_mounted_under_prefix() {
  let dir = tempfile::tempdir().unwrap();
  let resp = oneshot(make_state(dir.path()), "/api/estado/9/series").await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = oneshot(make_state(dir.path()), "/api/estado/1/series").await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
  assert_eq!(body["error"], "Estado no encontrado");
}

#[tokio::test]
async fn static_files_are_served() {
  let dir = tempfile::tempdir().unwrap();
  fs::create_dir_all(dir.path().join("js")).unwrap();
  fs::write(dir.path().join("js/main.js"), "console.log('panel');").unwrap();

  let resp = oneshot(make_state(dir.path()), "/static/js/main.js").await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body_string(resp).await, "console.log('panel');");

  let resp = oneshot(make_state(dir.path()), "/static/nope.js").await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ── Configuration ────────────────────────────────────────────────────────────

#[test]
fn config_defaults_fill_missing_keys() {
  let settings = config::Config::builder()
    .set_override("port", 8080)
    .unwrap()
    .build()
    .unwrap();
  let cfg: ServerConfig = settings.try_deserialize().unwrap();
  assert_eq!(cfg.port, 8080);
  assert_eq!(cfg.host, "127.0.0.1");
  assert_eq!(cfg.states_csv, Path::new("database/20251031_Estados.csv"));
  assert_eq!(cfg.address(), "127.0.0.1:8080");
}
