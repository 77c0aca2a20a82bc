//! Boundary features and the name join against the state table.
//!
//! Resolution runs in two tiers. The alias tier looks the raw shape name up
//! in [`names::ALIASES`]; the normalized tier compares [`normalize_key`]s
//! against every canonical name and alias surface form known to the index.
//! A feature that neither tier resolves keeps null identity and metrics.

use std::collections::HashMap;

use serde::{
  Serialize, Serializer,
  ser::{SerializeMap, SerializeStruct},
};
use serde_json::{Map, Value};

use crate::{
  Period,
  metrics::round_opt,
  names::{self, normalize_key},
  record::StateTable,
};

// ─── Types ───────────────────────────────────────────────────────────────────

/// Which tier of the join produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
  Alias,
  Normalized,
}

/// The entity a boundary feature was matched to. Code and name travel
/// together, so a feature never carries one without the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
  pub ent_code:   u32,
  pub ent_nombre: String,
  pub tier:       MatchTier,
}

/// One state polygon from the boundary file.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
  /// Raw shape name as written in the boundary file.
  pub shape_name:         Option<String>,
  pub id:                 Option<Value>,
  /// Source properties, passed through untouched.
  pub properties:         Map<String, Value>,
  pub geometry:           Value,
  pub resolution:         Option<Resolution>,
  /// Unemployment rate at the latest period, two decimals.
  pub tasa_desocupacion:  Option<f64>,
  /// Mean monthly income at the latest period, two decimals.
  pub ing_prom_mes_total: Option<f64>,
}

impl BoundaryFeature {
  pub fn new(
    shape_name: Option<String>,
    id: Option<Value>,
    properties: Map<String, Value>,
    geometry: Value,
  ) -> Self {
    Self {
      shape_name,
      id,
      properties,
      geometry,
      resolution: None,
      tasa_desocupacion: None,
      ing_prom_mes_total: None,
    }
  }

  pub fn ent_code(&self) -> Option<u32> { self.resolution.as_ref().map(|r| r.ent_code) }

  pub fn ent_nombre(&self) -> Option<&str> {
    self.resolution.as_ref().map(|r| r.ent_nombre.as_str())
  }
}

/// A GeoJSON `FeatureCollection` of boundary features. Foreign top-level
/// members (`crs`, `bbox`, ...) are kept and written back out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundarySet {
  pub members:  Map<String, Value>,
  pub features: Vec<BoundaryFeature>,
}

// ─── Name index ──────────────────────────────────────────────────────────────

/// Lookup tables built from the canonical names in the state table.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
  /// canonical name → entity code
  codes: HashMap<String, u32>,
  /// normalized key → canonical name
  keys:  HashMap<String, String>,
}

impl NameIndex {
  pub fn from_table(table: &StateTable) -> Self {
    let mut codes = HashMap::new();
    for row in table.rows() {
      codes.entry(row.ent_nombre.clone()).or_insert(row.ent_code);
    }

    let mut keys = HashMap::new();
    for name in codes.keys() {
      keys.insert(normalize_key(name), name.clone());
    }
    // Alias surface forms never shadow a canonical name's own key.
    for (alias, canonical) in names::ALIASES {
      if codes.contains_key(*canonical) {
        keys
          .entry(normalize_key(alias))
          .or_insert_with(|| (*canonical).to_string());
      }
    }

    Self { codes, keys }
  }

  pub fn code_of(&self, canonical: &str) -> Option<u32> { self.codes.get(canonical).copied() }

  /// Resolve a raw name: alias table first, then normalized-key match of the
  /// alias-resolved name and of the raw name.
  pub fn resolve(&self, raw: &str) -> Option<Resolution> {
    let partial: Option<&str> = names::resolve_alias(raw);
    if let Some(canonical) = partial
      && let Some(code) = self.code_of(canonical)
    {
      return Some(Resolution {
        ent_code:   code,
        ent_nombre: canonical.to_string(),
        tier:       MatchTier::Alias,
      });
    }

    partial
      .into_iter()
      .chain(std::iter::once(raw))
      .find_map(|name| self.keys.get(&normalize_key(name)))
      .and_then(|canonical| {
        self.code_of(canonical).map(|code| Resolution {
          ent_code:   code,
          ent_nombre: canonical.clone(),
          tier:       MatchTier::Normalized,
        })
      })
  }

  /// Resolve a name a caller typed: exact canonical spelling first, then
  /// the same tiers as [`NameIndex::resolve`].
  pub fn lookup(&self, name: &str) -> Option<(u32, &str)> {
    if let Some((canonical, code)) = self.codes.get_key_value(name) {
      return Some((*code, canonical.as_str()));
    }
    let resolution = self.resolve(name)?;
    self
      .codes
      .get_key_value(resolution.ent_nombre.as_str())
      .map(|(canonical, code)| (*code, canonical.as_str()))
  }
}

// ─── Join ────────────────────────────────────────────────────────────────────

/// Outcome of [`join_boundaries`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinReport {
  pub by_alias:      usize,
  pub by_normalized: usize,
  /// Raw shape names neither tier could resolve (`None` for features with
  /// no name at all).
  pub unmatched:     Vec<Option<String>>,
}

/// Resolve every feature's entity and attach its metrics at `latest`.
pub fn join_boundaries(
  features: &mut [BoundaryFeature],
  index: &NameIndex,
  table: &StateTable,
  latest: Period,
) -> JoinReport {
  let metrics: HashMap<u32, (Option<f64>, Option<f64>)> = table
    .rows_at(latest)
    .map(|r| (r.ent_code, (r.unemployment_rate(), round_opt(r.ing_prom_mes_total, 2))))
    .collect();

  let mut report = JoinReport::default();
  for feature in features.iter_mut() {
    let resolution = feature.shape_name.as_deref().and_then(|raw| index.resolve(raw));
    match &resolution {
      Some(r) if r.tier == MatchTier::Alias => report.by_alias += 1,
      Some(_) => report.by_normalized += 1,
      None => report.unmatched.push(feature.shape_name.clone()),
    }

    let (tasa, ingreso) = resolution
      .as_ref()
      .and_then(|r| metrics.get(&r.ent_code).copied())
      .unwrap_or((None, None));
    feature.resolution = resolution;
    feature.tasa_desocupacion = tasa;
    feature.ing_prom_mes_total = ingreso;
  }
  report
}

// ─── GeoJSON output ──────────────────────────────────────────────────────────

const ENRICHED_KEYS: [&str; 4] =
  ["ent_code", "ent_nombre", "tasa_desocupacion", "ing_prom_mes_total"];

struct EnrichedProperties<'a>(&'a BoundaryFeature);

impl Serialize for EnrichedProperties<'_> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let f = self.0;
    let mut map = serializer.serialize_map(None)?;
    for (k, v) in &f.properties {
      if !ENRICHED_KEYS.contains(&k.as_str()) {
        map.serialize_entry(k, v)?;
      }
    }
    map.serialize_entry("ent_code", &f.ent_code())?;
    map.serialize_entry("ent_nombre", &f.ent_nombre())?;
    map.serialize_entry("tasa_desocupacion", &f.tasa_desocupacion)?;
    map.serialize_entry("ing_prom_mes_total", &f.ing_prom_mes_total)?;
    map.end()
  }
}

impl Serialize for BoundaryFeature {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let len = if self.id.is_some() { 4 } else { 3 };
    let mut s = serializer.serialize_struct("Feature", len)?;
    s.serialize_field("type", "Feature")?;
    if let Some(id) = &self.id {
      s.serialize_field("id", id)?;
    }
    s.serialize_field("properties", &EnrichedProperties(self))?;
    s.serialize_field("geometry", &self.geometry)?;
    s.end()
  }
}

impl Serialize for BoundarySet {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(None)?;
    map.serialize_entry("type", "FeatureCollection")?;
    for (k, v) in &self.members {
      if k != "type" && k != "features" {
        map.serialize_entry(k, v)?;
      }
    }
    map.serialize_entry("features", &self.features)?;
    map.end()
  }
}
