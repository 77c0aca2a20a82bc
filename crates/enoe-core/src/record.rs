//! Typed rows of the national and state tables.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
  Error, Period, Result, metrics,
  variables::{NationalMeasure, STATE_IDENTIFIER_COLUMNS, StateMeasure, TASA_DESOCUPACION},
};

// ─── National ────────────────────────────────────────────────────────────────

/// One national-scope row. Measures are `None` when the cell was empty or
/// the column is absent from the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NationalRecord {
  pub period:                  Period,
  pub pob_total:               Option<f64>,
  pub pob_15_y_mas:            Option<f64>,
  pub pea_total:               Option<f64>,
  pub ocupada_total:           Option<f64>,
  pub desocupada_total:        Option<f64>,
  pub ocupacion_formal:        Option<f64>,
  pub ocupacion_informal:      Option<f64>,
  pub ocupacion_no_remunerada: Option<f64>,
  pub ocupada_hombres:         Option<f64>,
  pub ocupada_mujeres:         Option<f64>,
  pub ing_prom_mes_total:      Option<f64>,
  pub ing_prom_hora_total:     Option<f64>,
  pub ing_prom_mes_real:       Option<f64>,
  pub ing_prom_hora_real:      Option<f64>,
  pub deflactor:               Option<f64>,
}

impl NationalRecord {
  pub fn new(period: Period) -> Self { Self { period, ..Self::default() } }

  pub fn get(&self, measure: NationalMeasure) -> Option<f64> {
    match measure {
      NationalMeasure::PobTotal => self.pob_total,
      NationalMeasure::Pob15YMas => self.pob_15_y_mas,
      NationalMeasure::PeaTotal => self.pea_total,
      NationalMeasure::OcupadaTotal => self.ocupada_total,
      NationalMeasure::DesocupadaTotal => self.desocupada_total,
      NationalMeasure::OcupacionFormal => self.ocupacion_formal,
      NationalMeasure::OcupacionInformal => self.ocupacion_informal,
      NationalMeasure::OcupacionNoRemunerada => self.ocupacion_no_remunerada,
      NationalMeasure::OcupadaHombres => self.ocupada_hombres,
      NationalMeasure::OcupadaMujeres => self.ocupada_mujeres,
      NationalMeasure::IngPromMesTotal => self.ing_prom_mes_total,
      NationalMeasure::IngPromHoraTotal => self.ing_prom_hora_total,
      NationalMeasure::IngPromMesReal => self.ing_prom_mes_real,
      NationalMeasure::IngPromHoraReal => self.ing_prom_hora_real,
      NationalMeasure::Deflactor => self.deflactor,
    }
  }

  pub fn slot_mut(&mut self, measure: NationalMeasure) -> &mut Option<f64> {
    match measure {
      NationalMeasure::PobTotal => &mut self.pob_total,
      NationalMeasure::Pob15YMas => &mut self.pob_15_y_mas,
      NationalMeasure::PeaTotal => &mut self.pea_total,
      NationalMeasure::OcupadaTotal => &mut self.ocupada_total,
      NationalMeasure::DesocupadaTotal => &mut self.desocupada_total,
      NationalMeasure::OcupacionFormal => &mut self.ocupacion_formal,
      NationalMeasure::OcupacionInformal => &mut self.ocupacion_informal,
      NationalMeasure::OcupacionNoRemunerada => &mut self.ocupacion_no_remunerada,
      NationalMeasure::OcupadaHombres => &mut self.ocupada_hombres,
      NationalMeasure::OcupadaMujeres => &mut self.ocupada_mujeres,
      NationalMeasure::IngPromMesTotal => &mut self.ing_prom_mes_total,
      NationalMeasure::IngPromHoraTotal => &mut self.ing_prom_hora_total,
      NationalMeasure::IngPromMesReal => &mut self.ing_prom_mes_real,
      NationalMeasure::IngPromHoraReal => &mut self.ing_prom_hora_real,
      NationalMeasure::Deflactor => &mut self.deflactor,
    }
  }

  /// ocupada_total / pob_15_y_mas, in percent.
  pub fn occupation_rate(&self) -> Option<f64> {
    metrics::ratio_pct(self.ocupada_total, self.pob_15_y_mas)
  }

  pub fn unemployment_rate(&self) -> Option<f64> {
    metrics::ratio_pct(self.desocupada_total, self.pea_total)
  }

  pub fn formal_pct(&self) -> Option<f64> {
    metrics::ratio_pct(self.ocupacion_formal, self.ocupada_total)
  }

  pub fn informal_pct(&self) -> Option<f64> {
    metrics::ratio_pct(self.ocupacion_informal, self.ocupada_total)
  }
}

/// The national table, ordered by period.
#[derive(Debug, Clone, Default)]
pub struct NationalTable {
  rows: Vec<NationalRecord>,
}

impl NationalTable {
  /// Stable-sorts `rows` by period.
  pub fn from_rows(mut rows: Vec<NationalRecord>) -> Self {
    rows.sort_by_key(|r| r.period);
    Self { rows }
  }

  pub fn rows(&self) -> &[NationalRecord] { &self.rows }

  pub fn labels(&self) -> Vec<String> {
    self.rows.iter().map(|r| r.period.label()).collect()
  }
}

// ─── State ───────────────────────────────────────────────────────────────────

/// One (period, entity) row of the state table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateRecord {
  pub ent_code:            u32,
  /// Canonical entity name, after alias substitution.
  pub ent_nombre:          String,
  pub period:              Period,
  /// Period label as written in the source.
  pub periodo:             String,
  pub pob_15_y_mas:        Option<f64>,
  pub pea_total:           Option<f64>,
  pub ocupada_total:       Option<f64>,
  pub desocupada_total:    Option<f64>,
  pub ocupacion_formal:    Option<f64>,
  pub ocupacion_informal:  Option<f64>,
  pub ing_prom_mes_total:  Option<f64>,
  pub ing_prom_hora_total: Option<f64>,
  /// Non-null values of the table's extra numeric columns.
  pub extra:               BTreeMap<String, f64>,
}

impl StateRecord {
  pub fn get(&self, measure: StateMeasure) -> Option<f64> {
    match measure {
      StateMeasure::Pob15YMas => self.pob_15_y_mas,
      StateMeasure::PeaTotal => self.pea_total,
      StateMeasure::OcupadaTotal => self.ocupada_total,
      StateMeasure::DesocupadaTotal => self.desocupada_total,
      StateMeasure::OcupacionFormal => self.ocupacion_formal,
      StateMeasure::OcupacionInformal => self.ocupacion_informal,
      StateMeasure::IngPromMesTotal => self.ing_prom_mes_total,
      StateMeasure::IngPromHoraTotal => self.ing_prom_hora_total,
    }
  }

  pub fn slot_mut(&mut self, measure: StateMeasure) -> &mut Option<f64> {
    match measure {
      StateMeasure::Pob15YMas => &mut self.pob_15_y_mas,
      StateMeasure::PeaTotal => &mut self.pea_total,
      StateMeasure::OcupadaTotal => &mut self.ocupada_total,
      StateMeasure::DesocupadaTotal => &mut self.desocupada_total,
      StateMeasure::OcupacionFormal => &mut self.ocupacion_formal,
      StateMeasure::OcupacionInformal => &mut self.ocupacion_informal,
      StateMeasure::IngPromMesTotal => &mut self.ing_prom_mes_total,
      StateMeasure::IngPromHoraTotal => &mut self.ing_prom_hora_total,
    }
  }

  /// desocupada_total / pea_total, in percent, two decimals.
  pub fn unemployment_rate(&self) -> Option<f64> {
    metrics::unemployment_rate(self.desocupada_total, self.pea_total)
  }
}

/// A numeric state variable addressable by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateVariable<'a> {
  Measure(StateMeasure),
  /// The per-row unemployment rate.
  UnemploymentRate,
  /// An extra numeric column of the source file.
  Extra(&'a str),
}

impl StateVariable<'_> {
  pub fn value(&self, row: &StateRecord) -> Option<f64> {
    match self {
      Self::Measure(m) => row.get(*m),
      Self::UnemploymentRate => row.unemployment_rate(),
      Self::Extra(column) => row.extra.get(*column).copied(),
    }
  }
}

/// The state table, ordered by period.
#[derive(Debug, Clone, Default)]
pub struct StateTable {
  rows:          Vec<StateRecord>,
  extra_columns: Vec<String>,
}

impl StateTable {
  /// Stable-sorts `rows` by period. `extra_columns` lists the numeric
  /// columns beyond the known measures, in source order.
  pub fn from_rows(mut rows: Vec<StateRecord>, extra_columns: Vec<String>) -> Self {
    rows.sort_by_key(|r| r.period);
    Self { rows, extra_columns }
  }

  pub fn rows(&self) -> &[StateRecord] { &self.rows }

  pub fn extra_columns(&self) -> &[String] { &self.extra_columns }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  /// Every distinct period in the table, ascending.
  pub fn periods(&self) -> Vec<Period> {
    self
      .rows
      .iter()
      .map(|r| r.period)
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect()
  }

  /// Distinct entities as `(code, name)`, ordered by code. The first row
  /// seen for a code supplies its name.
  pub fn entities(&self) -> Vec<(u32, &str)> {
    let mut seen: BTreeMap<u32, &str> = BTreeMap::new();
    for row in &self.rows {
      seen.entry(row.ent_code).or_insert(row.ent_nombre.as_str());
    }
    seen.into_iter().collect()
  }

  pub fn rows_for(&self, ent_code: u32) -> impl Iterator<Item = &StateRecord> {
    self.rows.iter().filter(move |r| r.ent_code == ent_code)
  }

  pub fn rows_at(&self, period: Period) -> impl Iterator<Item = &StateRecord> {
    self.rows.iter().filter(move |r| r.period == period)
  }

  /// Resolve a variable id. Identifier columns are not variables.
  pub fn variable<'a>(&'a self, id: &str) -> Result<StateVariable<'a>> {
    if id == TASA_DESOCUPACION {
      return Ok(StateVariable::UnemploymentRate);
    }
    if let Some(m) = StateMeasure::from_column(id) {
      return Ok(StateVariable::Measure(m));
    }
    self
      .extra_columns
      .iter()
      .find(|c| c.as_str() == id && !STATE_IDENTIFIER_COLUMNS.contains(&id))
      .map(|c| StateVariable::Extra(c.as_str()))
      .ok_or_else(|| Error::UnknownVariable(id.to_string()))
  }
}
