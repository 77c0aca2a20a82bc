//! End-to-end tests of the enrichment pipeline over small in-memory tables.

use serde_json::{Map, json};

use crate::{
  Error, Period, Snapshot,
  geo::{BoundaryFeature, BoundarySet},
  record::{NationalRecord, NationalTable, StateRecord, StateTable},
};

fn p(year: i32, quarter: u8) -> Period { Period::new(year, quarter).unwrap() }

fn state(code: u32, name: &str, period: Period, unemployed: f64, labor_force: f64, income: f64) -> StateRecord {
  StateRecord {
    ent_code: code,
    ent_nombre: name.into(),
    period,
    periodo: period.label(),
    pea_total: Some(labor_force),
    ocupada_total: Some(labor_force - unemployed),
    desocupada_total: Some(unemployed),
    ing_prom_mes_total: Some(income),
    ing_prom_hora_total: Some(income / 160.0),
    ..StateRecord::default()
  }
}

fn states() -> StateTable {
  let mut rows = vec![
    // Deliberately out of order.
    state(9, "Ciudad de México", p(2025, 2), 50_000.0, 1_000_000.0, 11_250.4),
    state(5, "Coahuila", p(2025, 1), 40_000.0, 1_500_000.0, 9_100.0),
    state(9, "Ciudad de México", p(2024, 4), 52_000.0, 990_000.0, 10_980.0),
    state(5, "Coahuila", p(2025, 2), 38_000.0, 1_510_000.0, 9_300.0),
    state(16, "Michoacán", p(2025, 2), 60_000.0, 2_000_000.0, 7_050.55),
    state(31, "Yucatán", p(2025, 2), 0.0, 0.0, 8_400.0),
    state(9, "Ciudad de México", p(2025, 1), 51_000.0, 1_000_000.0, 11_100.0),
  ];
  rows[4].ocupada_total = Some(1_940_000.4);
  StateTable::from_rows(rows, vec![])
}

fn national() -> NationalTable {
  let row = |year, quarter, employed: f64, pop: f64, formal: f64| {
    let mut r = NationalRecord::new(p(year, quarter));
    r.pob_15_y_mas = Some(pop);
    r.ocupada_total = Some(employed);
    r.ocupacion_formal = Some(formal);
    r.ocupacion_informal = Some(employed - formal);
    r.pea_total = Some(employed + 1_000.0);
    r.desocupada_total = Some(1_000.0);
    r
  };
  NationalTable::from_rows(vec![
    row(2025, 1, 60_000.0, 100_000.0, 27_000.0),
    row(2024, 4, 59_000.0, 99_000.0, 26_000.0),
    row(2025, 2, 0.0, 100_000.0, 0.0),
  ])
}

fn boundaries() -> BoundarySet {
  let feature = |name: &str| {
    let mut props = Map::new();
    props.insert("shapeName".into(), json!(name));
    BoundaryFeature::new(Some(name.into()), None, props, json!({"type": "Polygon", "coordinates": []}))
  };
  BoundarySet {
    members:  Map::new(),
    features: vec![
      feature("Distrito Federal"),
      feature("Coahuila de Zaragoza"),
      feature("Michoacan De Ocampo "),
      feature("Yucatan"),
      feature("Atlántida"),
    ],
  }
}

fn snapshot() -> Snapshot { Snapshot::build(national(), states(), boundaries()).unwrap() }

// ─── Build ───────────────────────────────────────────────────────────────────

#[test]
fn latest_period_drives_boundary_metrics() {
  let s = snapshot();
  assert_eq!(s.latest_period(), p(2025, 2));

  let f = &s.boundaries().features;
  assert_eq!(f[0].ent_code(), Some(9));
  assert_eq!(f[0].tasa_desocupacion, Some(5.0));
  assert_eq!(f[0].ing_prom_mes_total, Some(11_250.4));
  assert_eq!(f[1].ent_nombre(), Some("Coahuila"));
  assert_eq!(f[2].ent_code(), Some(16));
  // Zero labor force stays null all the way to the map.
  assert_eq!(f[3].ent_code(), Some(31));
  assert_eq!(f[3].tasa_desocupacion, None);
  assert_eq!(f[4].resolution, None);
  assert_eq!(s.join_report().unmatched, vec![Some("Atlántida".to_string())]);
}

#[test]
fn boundary_identity_is_all_or_nothing() {
  for f in &snapshot().boundaries().features {
    assert_eq!(f.ent_code().is_some(), f.ent_nombre().is_some());
  }
}

#[test]
fn empty_state_table_is_rejected() {
  let err = Snapshot::build(national(), StateTable::default(), boundaries()).unwrap_err();
  assert!(matches!(err, Error::EmptyStateTable));
}

#[test]
fn single_income_observation_is_rejected() {
  let table = StateTable::from_rows(vec![state(1, "Aguascalientes", p(2025, 1), 1.0, 10.0, 9_000.0)], vec![]);
  let err = Snapshot::build(national(), table, BoundarySet::default()).unwrap_err();
  assert!(matches!(err, Error::InsufficientObservations { found: 1 }));
}

#[test]
fn income_legend_covers_latest_values() {
  let s = snapshot();
  let legend = s.legend();
  assert_eq!(legend.len(), 5);
  for w in legend.windows(2) {
    assert_eq!(w[0].max, w[1].min);
  }
  for r in s.states().rows_at(s.latest_period()) {
    let v = r.ing_prom_mes_total.unwrap();
    assert!(legend[0].min <= v && v <= legend[4].max);
  }
}

// ─── Entity series ───────────────────────────────────────────────────────────

#[test]
fn entity_series_is_ordered_and_unique() {
  let series = snapshot().entity_series(9).unwrap();
  assert_eq!(series.ent_nombre, "Ciudad de México");
  assert_eq!(series.labels, vec!["2024 T4", "2025 T1", "2025 T2"]);
  assert_eq!(series.series.tasa_desocupacion, vec![Some(5.25), Some(5.1), Some(5.0)]);
  assert_eq!(series.series.desocupada_total, vec![Some(52_000), Some(51_000), Some(50_000)]);
}

#[test]
fn entity_series_rounds_counts_and_money() {
  let series = snapshot().entity_series(16).unwrap();
  assert_eq!(series.series.ocupada_total, vec![Some(1_940_000)]);
  assert_eq!(series.series.ing_prom_mes_total, vec![Some(7_050.55)]);
  assert_eq!(series.series.ing_prom_hora_total, vec![Some(44.07)]);
}

#[test]
fn entity_series_for_unknown_code_is_not_found() {
  assert!(snapshot().entity_series(99).is_none());
}

// ─── Latest / timeseries / catalog ───────────────────────────────────────────

#[test]
fn entity_latest_lists_every_entity() {
  let latest = snapshot().entity_latest("tasa_desocupacion").unwrap();
  let names: Vec<_> = latest.values.iter().map(|(n, _)| n.as_str()).collect();
  assert_eq!(names, vec!["Coahuila", "Ciudad de México", "Michoacán", "Yucatán"]);
  assert_eq!(latest.values[1].1, Some(5.0));
  assert_eq!(latest.values[3].1, None);

  let json = serde_json::to_value(&latest).unwrap();
  assert_eq!(json["Ciudad de México"], 5.0);
  assert!(json["Yucatán"].is_null());
}

#[test]
fn entity_latest_rejects_identifier_columns() {
  assert!(matches!(
    snapshot().entity_latest("ent_code"),
    Err(Error::UnknownVariable(_))
  ));
}

#[test]
fn timeseries_aligns_every_dataset_to_global_labels() {
  let ts = snapshot()
    .entity_timeseries("ing_prom_mes_total", &["Michoacan", "Ciudad de México"])
    .unwrap();
  assert_eq!(ts.labels, vec!["2024-10-01", "2025-01-01", "2025-04-01"]);
  for d in &ts.datasets {
    assert_eq!(d.data.len(), ts.labels.len());
  }
  assert_eq!(ts.datasets[0].label, "Michoacán");
  assert_eq!(ts.datasets[0].data, vec![None, None, Some(7_050.55)]);
  assert_eq!(ts.datasets[1].data, vec![Some(10_980.0), Some(11_100.0), Some(11_250.4)]);
}

#[test]
fn timeseries_rejects_unknown_entities() {
  let err = snapshot()
    .entity_timeseries("pea_total", &["Narnia"])
    .unwrap_err();
  assert!(matches!(err, Error::UnknownEntity(name) if name == "Narnia"));
}

#[test]
fn catalog_lists_populated_numeric_columns() {
  let ids: Vec<_> = snapshot().numeric_variables().into_iter().map(|v| v.id).collect();
  assert_eq!(
    ids,
    vec![
      "pea_total",
      "ocupada_total",
      "desocupada_total",
      "ing_prom_mes_total",
      "ing_prom_hora_total",
      "tasa_desocupacion",
    ]
  );
}

// ─── National ────────────────────────────────────────────────────────────────

#[test]
fn national_default_group_is_the_rate_chart() {
  let series = snapshot().national_series(None).unwrap();
  assert_eq!(series.labels, vec!["2024 T4", "2025 T1", "2025 T2"]);
  let formal = series.variables.iter().find(|v| v.id == "ocupacion_formal_pct").unwrap();
  assert_eq!(formal.data, vec![Some(44.07), Some(45.0), None]);
  assert!(formal.checked);
  let occupation = series.variables.iter().find(|v| v.id == "tasa_ocupacion").unwrap();
  assert_eq!(occupation.data, vec![Some(59.6), Some(60.0), Some(0.0)]);
}

#[test]
fn national_selection_by_ids() {
  let series = snapshot().national_series(Some("ocupada_total, tasa_desocupacion")).unwrap();
  let ids: Vec<_> = series.variables.iter().map(|v| v.id).collect();
  assert_eq!(ids, vec!["ocupada_total", "tasa_desocupacion"]);
  assert_eq!(series.variables[0].data, vec![Some(59_000.0), Some(60_000.0), Some(0.0)]);

  assert!(matches!(
    snapshot().national_series(Some("nope")),
    Err(Error::UnknownVariable(id)) if id == "nope"
  ));
}

#[test]
fn national_gallery_is_keyed_by_group() {
  let json = serde_json::to_value(snapshot().national_groups()).unwrap();
  assert_eq!(json["tasas"]["title"], "Tasas de ocupación");
  assert_eq!(json["ingresos"]["labels"].as_array().unwrap().len(), 3);
  // Null cells chart as nulls.
  assert!(json["ingresos"]["variables"][0]["data"][0].is_null());
}

#[test]
fn national_gallery_carries_chart_datasets() {
  let json = serde_json::to_value(snapshot().national_groups()).unwrap();
  let datasets = json["tasas"]["datasets"].as_array().unwrap();
  assert_eq!(datasets.len(), json["tasas"]["variables"].as_array().unwrap().len());
  assert_eq!(datasets[0]["type"], "line");
  assert_eq!(datasets[0]["label"], "Tasa de ocupación nacional");
  assert_eq!(datasets[0]["borderColor"], "#0d6efd");
  assert_eq!(datasets[0]["data"], json["tasas"]["variables"][0]["data"]);
  assert_eq!(datasets[0]["hidden"], false);
  let informal = datasets.iter().find(|d| d["label"] == "Ocupación informal / Población ocupada").unwrap();
  assert_eq!(informal["hidden"], true);
}
