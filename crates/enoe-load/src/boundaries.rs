//! Decoding of the state boundary GeoJSON.

use std::{io, path::Path};

use enoe_core::geo::{BoundaryFeature, BoundarySet};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{Error, Result, table};

#[derive(Deserialize)]
struct RawCollection {
  #[serde(rename = "type")]
  kind:     String,
  #[serde(default)]
  features: Vec<RawFeature>,
  #[serde(flatten)]
  members:  Map<String, Value>,
}

#[derive(Deserialize)]
struct RawFeature {
  #[serde(default)]
  id:         Option<Value>,
  #[serde(default)]
  properties: Option<Map<String, Value>>,
  #[serde(default)]
  geometry:   Value,
}

/// Load the boundary FeatureCollection from a file.
pub fn load_boundaries(path: &Path) -> Result<BoundarySet> {
  let file = table::open(path)?;
  read_boundaries(io::BufReader::new(file), &path.display().to_string())
}

/// Decode a GeoJSON FeatureCollection. Each feature's shape name comes from
/// its `shapeName` property, or `name` when that is absent.
pub fn read_boundaries<R: io::Read>(reader: R, source_name: &str) -> Result<BoundarySet> {
  let raw: RawCollection = serde_json::from_reader(reader).map_err(|error| Error::Json {
    source_name: source_name.to_string(),
    error,
  })?;
  if raw.kind != "FeatureCollection" {
    return Err(Error::NotAFeatureCollection {
      source_name: source_name.to_string(),
      found:       raw.kind,
    });
  }

  let features: Vec<_> = raw
    .features
    .into_iter()
    .map(|f| {
      let properties = f.properties.unwrap_or_default();
      let shape_name = ["shapeName", "name"]
        .iter()
        .find_map(|key| properties.get(*key).and_then(Value::as_str))
        .map(str::to_string);
      BoundaryFeature::new(shape_name, f.id, properties, f.geometry)
    })
    .collect();

  tracing::info!(source = source_name, features = features.len(), "loaded boundaries");
  Ok(BoundarySet { members: raw.members, features })
}
