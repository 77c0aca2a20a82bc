//! The frozen, enriched dataset and every read-only query over it.
//!
//! [`Snapshot::build`] runs the whole enrichment once. Afterwards nothing
//! mutates it; handlers share it behind an `Arc` and call the query methods
//! below concurrently.

use std::collections::HashMap;

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
  Error, Period, Result,
  geo::{BoundarySet, JoinReport, NameIndex, join_boundaries},
  legend::{LegendBreak, quantile_breaks},
  metrics::{latest_period, round_count, round_opt},
  record::{NationalRecord, NationalTable, StateRecord, StateTable},
  variables::{
    DEFAULT_NATIONAL_GROUP, NATIONAL_GROUPS, NationalGroupDef, NationalRate, NationalSource,
    NationalVariableDef, StateMeasure, TASA_DESOCUPACION, VariableInfo, humanize, national_group,
    national_variable,
  },
};

// ─── Response shapes ─────────────────────────────────────────────────────────

/// Time series of one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySeries {
  pub ent_code:   u32,
  pub ent_nombre: String,
  pub labels:     Vec<String>,
  pub series:     EntitySeriesData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySeriesData {
  pub ocupada_total:       Vec<Option<i64>>,
  pub desocupada_total:    Vec<Option<i64>>,
  pub ing_prom_mes_total:  Vec<Option<f64>>,
  pub ing_prom_hora_total: Vec<Option<f64>>,
  pub tasa_desocupacion:   Vec<Option<f64>>,
}

/// One national series plus its chart metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NationalVariable {
  pub id:      &'static str,
  pub label:   &'static str,
  pub color:   &'static str,
  pub data:    Vec<Option<f64>>,
  pub checked: bool,
}

/// National series aligned to a shared label sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NationalSeries {
  pub labels:    Vec<String>,
  pub variables: Vec<NationalVariable>,
}

/// A Chart.js line dataset, as the gallery cards consume it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
  #[serde(rename = "type")]
  pub kind:             &'static str,
  pub label:            &'static str,
  pub data:             Vec<Option<f64>>,
  pub border_color:     &'static str,
  pub background_color: &'static str,
  pub fill:             bool,
  /// Unchecked variables start hidden.
  pub hidden:           bool,
}

impl From<&NationalVariable> for ChartDataset {
  fn from(v: &NationalVariable) -> Self {
    Self {
      kind:             "line",
      label:            v.label,
      data:             v.data.clone(),
      border_color:     v.color,
      background_color: v.color,
      fill:             false,
      hidden:           !v.checked,
    }
  }
}

/// A themed chart of the national gallery. `datasets` carries the same
/// series as `variables`, shaped for the chart client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NationalGroup {
  #[serde(skip)]
  pub id:          &'static str,
  pub title:       &'static str,
  pub description: &'static str,
  pub labels:      Vec<String>,
  pub variables:   Vec<NationalVariable>,
  pub datasets:    Vec<ChartDataset>,
}

/// Every national group, serialized as an object keyed by group id.
#[derive(Debug, Clone, PartialEq)]
pub struct NationalGallery(pub Vec<NationalGroup>);

impl Serialize for NationalGallery {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.0.len()))?;
    for group in &self.0 {
      map.serialize_entry(group.id, group)?;
    }
    map.end()
  }
}

/// Latest-period value per entity name, serialized as
/// `{"Aguascalientes": 3.1, ...}` in entity-code order.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityLatest {
  pub period: Period,
  pub values: Vec<(String, Option<f64>)>,
}

impl Serialize for EntityLatest {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.values.len()))?;
    for (name, value) in &self.values {
      map.serialize_entry(name, value)?;
    }
    map.end()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
  pub label: String,
  pub data:  Vec<Option<f64>>,
}

/// Several entities' series for one variable, aligned to the global period
/// sequence of the state table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityTimeseries {
  /// ISO start date of each period.
  pub labels:   Vec<String>,
  pub datasets: Vec<Dataset>,
}

/// Row counts and join outcome, for startup logs and health checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
  pub national_rows: usize,
  pub state_rows:    usize,
  pub entities:      usize,
  pub boundaries:    usize,
  pub unmatched:     usize,
  pub latest_period: String,
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// The immutable product of the startup build.
#[derive(Debug, Clone)]
pub struct Snapshot {
  national:   NationalTable,
  states:     StateTable,
  boundaries: BoundarySet,
  index:      NameIndex,
  join:       JoinReport,
  latest:     Period,
  periods:    Vec<Period>,
  legend:     Vec<LegendBreak>,
}

impl Snapshot {
  /// Join the boundaries against the state table, attach latest-period
  /// metrics and build the income legend.
  ///
  /// Fails when the state table is empty or the latest period has fewer
  /// than two income observations.
  pub fn build(
    national: NationalTable,
    states: StateTable,
    mut boundaries: BoundarySet,
  ) -> Result<Self> {
    let latest = latest_period(&states).ok_or(Error::EmptyStateTable)?;
    let index = NameIndex::from_table(&states);
    let join = join_boundaries(&mut boundaries.features, &index, &states, latest);
    let legend = quantile_breaks(states.rows_at(latest).map(|r| r.ing_prom_mes_total))?;
    let periods = states.periods();

    Ok(Self { national, states, boundaries, index, join, latest, periods, legend })
  }

  pub fn national(&self) -> &NationalTable { &self.national }

  pub fn states(&self) -> &StateTable { &self.states }

  pub fn latest_period(&self) -> Period { self.latest }

  pub fn join_report(&self) -> &JoinReport { &self.join }

  pub fn names(&self) -> &NameIndex { &self.index }

  pub fn summary(&self) -> Summary {
    Summary {
      national_rows: self.national.rows().len(),
      state_rows:    self.states.rows().len(),
      entities:      self.states.entities().len(),
      boundaries:    self.boundaries.features.len(),
      unmatched:     self.join.unmatched.len(),
      latest_period: self.latest.label(),
    }
  }

  // ── Boundaries ────────────────────────────────────────────────────────

  /// The enriched boundary collection, in source feature order.
  pub fn boundaries(&self) -> &BoundarySet { &self.boundaries }

  // ── Legend ────────────────────────────────────────────────────────────

  /// Quantile legend over latest-period mean monthly income.
  pub fn legend(&self) -> &[LegendBreak] { &self.legend }

  /// Quantile legend over the latest-period values of any state variable.
  pub fn legend_for(&self, variable: &str) -> Result<Vec<LegendBreak>> {
    let var = self.states.variable(variable)?;
    quantile_breaks(self.states.rows_at(self.latest).map(|r| var.value(r)))
  }

  // ── Entity queries ────────────────────────────────────────────────────

  /// Every row of one entity, ordered by period. `None` when the code
  /// matches no row.
  pub fn entity_series(&self, ent_code: u32) -> Option<EntitySeries> {
    let rows: Vec<&StateRecord> = self.states.rows_for(ent_code).collect();
    let first = rows.first()?;

    let floats = |m: StateMeasure| -> Vec<Option<f64>> {
      rows.iter().map(|r| round_opt(r.get(m), 2)).collect()
    };
    let counts = |m: StateMeasure| -> Vec<Option<i64>> {
      rows.iter().map(|r| round_count(r.get(m))).collect()
    };

    Some(EntitySeries {
      ent_code,
      ent_nombre: first.ent_nombre.clone(),
      labels: rows.iter().map(|r| r.periodo.clone()).collect(),
      series: EntitySeriesData {
        ocupada_total:       counts(StateMeasure::OcupadaTotal),
        desocupada_total:    counts(StateMeasure::DesocupadaTotal),
        ing_prom_mes_total:  floats(StateMeasure::IngPromMesTotal),
        ing_prom_hora_total: floats(StateMeasure::IngPromHoraTotal),
        tasa_desocupacion:   rows.iter().map(|r| r.unemployment_rate()).collect(),
      },
    })
  }

  /// `variable` at the latest period for every entity in the table; null
  /// for entities with no row or no value there.
  pub fn entity_latest(&self, variable: &str) -> Result<EntityLatest> {
    let var = self.states.variable(variable)?;
    let at_latest: HashMap<u32, &StateRecord> =
      self.states.rows_at(self.latest).map(|r| (r.ent_code, r)).collect();

    let values = self
      .states
      .entities()
      .into_iter()
      .map(|(code, name)| {
        let value = at_latest.get(&code).and_then(|r| round_opt(var.value(r), 2));
        (name.to_string(), value)
      })
      .collect();
    Ok(EntityLatest { period: self.latest, values })
  }

  /// `variable` over time for each named entity. Names resolve through the
  /// name index, so legacy and unaccented spellings are accepted.
  pub fn entity_timeseries<S: AsRef<str>>(
    &self,
    variable: &str,
    names: &[S],
  ) -> Result<EntityTimeseries> {
    let var = self.states.variable(variable)?;

    let mut datasets = Vec::with_capacity(names.len());
    for name in names {
      let name = name.as_ref();
      let (code, canonical) = self
        .index
        .lookup(name)
        .ok_or_else(|| Error::UnknownEntity(name.to_string()))?;
      let by_period: HashMap<Period, Option<f64>> = self
        .states
        .rows_for(code)
        .map(|r| (r.period, round_opt(var.value(r), 2)))
        .collect();
      datasets.push(Dataset {
        label: canonical.to_string(),
        data:  self
          .periods
          .iter()
          .map(|p| by_period.get(p).copied().flatten())
          .collect(),
      });
    }

    let labels = self
      .periods
      .iter()
      .map(|p| p.start_date().map_or_else(|| p.label(), |d| d.to_string()))
      .collect();
    Ok(EntityTimeseries { labels, datasets })
  }

  /// Every numeric, non-identifier variable of the state table: known
  /// measures with at least one value, the derived unemployment rate, then
  /// extra numeric columns.
  pub fn numeric_variables(&self) -> Vec<VariableInfo> {
    let rows = self.states.rows();
    let mut out: Vec<VariableInfo> = StateMeasure::ALL
      .into_iter()
      .filter(|m| rows.iter().any(|r| r.get(*m).is_some()))
      .map(|m| VariableInfo {
        id:           m.column().to_string(),
        display_name: m.display_name().to_string(),
      })
      .collect();
    out.push(VariableInfo {
      id:           TASA_DESOCUPACION.to_string(),
      display_name: "Tasa de desocupación".to_string(),
    });
    out.extend(self.states.extra_columns().iter().map(|c| VariableInfo {
      id:           c.clone(),
      display_name: humanize(c),
    }));
    out
  }

  // ── National queries ──────────────────────────────────────────────────

  /// National series for a selection: a group id, or a comma-separated list
  /// of variable ids. `None` selects the default group.
  pub fn national_series(&self, selection: Option<&str>) -> Result<NationalSeries> {
    let selection = selection.map(str::trim).unwrap_or(DEFAULT_NATIONAL_GROUP);
    let defs: Vec<&NationalVariableDef> = match national_group(selection) {
      Some(group) => group.variables.iter().collect(),
      None => selection
        .split(',')
        .map(str::trim)
        .map(|id| national_variable(id).ok_or_else(|| Error::UnknownVariable(id.to_string())))
        .collect::<Result<_>>()?,
    };

    Ok(NationalSeries {
      labels:    self.national.labels(),
      variables: defs.into_iter().map(|s| self.national_variable(s)).collect(),
    })
  }

  /// Every themed group of the national gallery.
  pub fn national_groups(&self) -> NationalGallery {
    NationalGallery(NATIONAL_GROUPS.iter().map(|g| self.national_group(g)).collect())
  }

  fn national_group(&self, def: &NationalGroupDef) -> NationalGroup {
    let variables: Vec<NationalVariable> =
      def.variables.iter().map(|v| self.national_variable(v)).collect();
    NationalGroup {
      id:          def.id,
      title:       def.title,
      description: def.description,
      labels:      self.national.labels(),
      datasets:    variables.iter().map(ChartDataset::from).collect(),
      variables,
    }
  }

  fn national_variable(&self, def: &NationalVariableDef) -> NationalVariable {
    let value = |r: &NationalRecord| match def.source {
      NationalSource::Measure(m) => r.get(m),
      NationalSource::Rate(NationalRate::Ocupacion) => r.occupation_rate(),
      NationalSource::Rate(NationalRate::Desocupacion) => r.unemployment_rate(),
      NationalSource::Rate(NationalRate::FormalPct) => r.formal_pct(),
      NationalSource::Rate(NationalRate::InformalPct) => r.informal_pct(),
    };
    NationalVariable {
      id:      def.id,
      label:   def.label,
      color:   def.color,
      data:    self
        .national
        .rows()
        .iter()
        .map(|r| round_opt(value(r), def.precision))
        .collect(),
      checked: def.checked,
    }
  }
}
