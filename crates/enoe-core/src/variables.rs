//! Column catalogs and display metadata for the national and state tables.
//!
//! Every measure a record can carry is named here once, together with the
//! CSV column it is read from. The chart metadata (labels, colors, rounding)
//! for the national gallery lives here too.

use serde::Serialize;

// ─── National measures ───────────────────────────────────────────────────────

/// A raw numeric column of the national table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NationalMeasure {
  PobTotal,
  Pob15YMas,
  PeaTotal,
  OcupadaTotal,
  DesocupadaTotal,
  OcupacionFormal,
  OcupacionInformal,
  OcupacionNoRemunerada,
  OcupadaHombres,
  OcupadaMujeres,
  IngPromMesTotal,
  IngPromHoraTotal,
  IngPromMesReal,
  IngPromHoraReal,
  Deflactor,
}

impl NationalMeasure {
  pub const ALL: [Self; 15] = [
    Self::PobTotal,
    Self::Pob15YMas,
    Self::PeaTotal,
    Self::OcupadaTotal,
    Self::DesocupadaTotal,
    Self::OcupacionFormal,
    Self::OcupacionInformal,
    Self::OcupacionNoRemunerada,
    Self::OcupadaHombres,
    Self::OcupadaMujeres,
    Self::IngPromMesTotal,
    Self::IngPromHoraTotal,
    Self::IngPromMesReal,
    Self::IngPromHoraReal,
    Self::Deflactor,
  ];

  pub fn column(self) -> &'static str {
    match self {
      Self::PobTotal => "pob_total",
      Self::Pob15YMas => "pob_15_y_mas",
      Self::PeaTotal => "pea_total",
      Self::OcupadaTotal => "ocupada_total",
      Self::DesocupadaTotal => "desocupada_total",
      Self::OcupacionFormal => "ocupacion_formal",
      Self::OcupacionInformal => "ocupacion_informal",
      Self::OcupacionNoRemunerada => "ocupacion_no_remunerada",
      Self::OcupadaHombres => "ocupada_hombres",
      Self::OcupadaMujeres => "ocupada_mujeres",
      Self::IngPromMesTotal => "ing_prom_mes_total",
      Self::IngPromHoraTotal => "ing_prom_hora_total",
      Self::IngPromMesReal => "ing_prom_mes_real",
      Self::IngPromHoraReal => "ing_prom_hora_real",
      Self::Deflactor => "deflactor",
    }
  }

  /// Every national column except `pob_total` must be present; a file
  /// without one is rejected at load.
  pub fn required(self) -> bool { !matches!(self, Self::PobTotal) }
}

// ─── State measures ──────────────────────────────────────────────────────────

/// A raw numeric column of the state table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateMeasure {
  Pob15YMas,
  PeaTotal,
  OcupadaTotal,
  DesocupadaTotal,
  OcupacionFormal,
  OcupacionInformal,
  IngPromMesTotal,
  IngPromHoraTotal,
}

impl StateMeasure {
  pub const ALL: [Self; 8] = [
    Self::Pob15YMas,
    Self::PeaTotal,
    Self::OcupadaTotal,
    Self::DesocupadaTotal,
    Self::OcupacionFormal,
    Self::OcupacionInformal,
    Self::IngPromMesTotal,
    Self::IngPromHoraTotal,
  ];

  pub fn column(self) -> &'static str {
    match self {
      Self::Pob15YMas => "pob_15_y_mas",
      Self::PeaTotal => "pea_total",
      Self::OcupadaTotal => "ocupada_total",
      Self::DesocupadaTotal => "desocupada_total",
      Self::OcupacionFormal => "ocupacion_formal",
      Self::OcupacionInformal => "ocupacion_informal",
      Self::IngPromMesTotal => "ing_prom_mes_total",
      Self::IngPromHoraTotal => "ing_prom_hora_total",
    }
  }

  pub fn display_name(self) -> &'static str {
    match self {
      Self::Pob15YMas => "Población de 15 años y más",
      Self::PeaTotal => "Población económicamente activa",
      Self::OcupadaTotal => "Población ocupada",
      Self::DesocupadaTotal => "Población desocupada",
      Self::OcupacionFormal => "Ocupación formal",
      Self::OcupacionInformal => "Ocupación informal",
      Self::IngPromMesTotal => "Ingreso promedio mensual",
      Self::IngPromHoraTotal => "Ingreso promedio por hora",
    }
  }

  pub fn required(self) -> bool {
    matches!(
      self,
      Self::PeaTotal
        | Self::OcupadaTotal
        | Self::DesocupadaTotal
        | Self::IngPromMesTotal
        | Self::IngPromHoraTotal
    )
  }

  pub fn from_column(column: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|m| m.column() == column)
  }
}

/// Identifier and label columns of the state table. Never offered as
/// variables.
pub const STATE_IDENTIFIER_COLUMNS: [&str; 5] =
  ["year", "quarter", "ent_code", "ent_nombre", "periodo"];

/// Id of the derived per-row unemployment rate.
pub const TASA_DESOCUPACION: &str = "tasa_desocupacion";

/// One entry of the numeric variable catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableInfo {
  pub id:           String,
  pub display_name: String,
}

/// Human label for a column with no curated display name:
/// `tasa_part_mujeres` → `Tasa part mujeres`.
pub fn humanize(column: &str) -> String {
  let spaced = column.replace('_', " ");
  let mut chars = spaced.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

// ─── National chart metadata ─────────────────────────────────────────────────

/// A rate derived from national measures at query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NationalRate {
  /// ocupada_total / pob_15_y_mas
  Ocupacion,
  /// desocupada_total / pea_total
  Desocupacion,
  /// ocupacion_formal / ocupada_total
  FormalPct,
  /// ocupacion_informal / ocupada_total
  InformalPct,
}

/// Where a national chart series gets its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NationalSource {
  Measure(NationalMeasure),
  Rate(NationalRate),
}

/// Display metadata for one national series.
#[derive(Debug, Clone, Copy)]
pub struct NationalVariableDef {
  pub id:        &'static str,
  pub label:     &'static str,
  pub color:     &'static str,
  /// Decimal places the series is rounded to.
  pub precision: u32,
  /// Whether the chart shows the series before the user toggles anything.
  pub checked:   bool,
  pub source:    NationalSource,
}

/// A themed group of national series, rendered as one chart.
#[derive(Debug, Clone, Copy)]
pub struct NationalGroupDef {
  pub id:          &'static str,
  pub title:       &'static str,
  pub description: &'static str,
  pub variables:   &'static [NationalVariableDef],
}

const fn rate(
  id: &'static str,
  label: &'static str,
  color: &'static str,
  checked: bool,
  rate: NationalRate,
) -> NationalVariableDef {
  NationalVariableDef {
    id,
    label,
    color,
    precision: 2,
    checked,
    source: NationalSource::Rate(rate),
  }
}

const fn measure(
  id: &'static str,
  label: &'static str,
  color: &'static str,
  precision: u32,
  checked: bool,
  measure: NationalMeasure,
) -> NationalVariableDef {
  NationalVariableDef {
    id,
    label,
    color,
    precision,
    checked,
    source: NationalSource::Measure(measure),
  }
}

/// Group served when the caller names no selection.
pub const DEFAULT_NATIONAL_GROUP: &str = "tasas";

pub static NATIONAL_GROUPS: &[NationalGroupDef] = &[
  NationalGroupDef {
    id:          "tasas",
    title:       "Tasas de ocupación",
    description: "Tasa de ocupación nacional y composición formal/informal \
                  de la población ocupada (%).",
    variables:   &[
      rate("tasa_ocupacion", "Tasa de ocupación nacional", "#0d6efd", true, NationalRate::Ocupacion),
      rate(
        "ocupacion_formal_pct",
        "Ocupación formal / Población ocupada",
        "#20c997",
        true,
        NationalRate::FormalPct,
      ),
      rate(
        "ocupacion_informal_pct",
        "Ocupación informal / Población ocupada",
        "#f59e0b",
        false,
        NationalRate::InformalPct,
      ),
      rate("tasa_desocupacion", "Tasa de desocupación", "#dc3545", false, NationalRate::Desocupacion),
    ],
  },
  NationalGroupDef {
    id:          "poblacion",
    title:       "Población",
    description: "Población de 15 años y más, económicamente activa, ocupada \
                  y desocupada (personas).",
    variables:   &[
      measure("pob_15_y_mas", "Población de 15 años y más", "#6c757d", 0, true, NationalMeasure::Pob15YMas),
      measure("pea_total", "Población económicamente activa", "#0d6efd", 0, true, NationalMeasure::PeaTotal),
      measure("ocupada_total", "Población ocupada", "#198754", 0, true, NationalMeasure::OcupadaTotal),
      measure("desocupada_total", "Población desocupada", "#dc3545", 0, false, NationalMeasure::DesocupadaTotal),
    ],
  },
  NationalGroupDef {
    id:          "ocupacion",
    title:       "Ocupación",
    description: "Ocupación formal, informal y no remunerada, y población \
                  ocupada por sexo (personas).",
    variables:   &[
      measure("ocupacion_formal", "Ocupación formal", "#20c997", 0, true, NationalMeasure::OcupacionFormal),
      measure("ocupacion_informal", "Ocupación informal", "#f59e0b", 0, true, NationalMeasure::OcupacionInformal),
      measure(
        "ocupacion_no_remunerada",
        "Ocupación no remunerada",
        "#6f42c1",
        0,
        false,
        NationalMeasure::OcupacionNoRemunerada,
      ),
      measure("ocupada_hombres", "Población ocupada: hombres", "#0dcaf0", 0, false, NationalMeasure::OcupadaHombres),
      measure("ocupada_mujeres", "Población ocupada: mujeres", "#d63384", 0, false, NationalMeasure::OcupadaMujeres),
    ],
  },
  NationalGroupDef {
    id:          "ingresos",
    title:       "Ingresos",
    description: "Ingreso promedio mensual y por hora, nominal y deflactado \
                  (pesos).",
    variables:   &[
      measure("ing_prom_mes_total", "Ingreso mensual (nominal)", "#0d6efd", 2, true, NationalMeasure::IngPromMesTotal),
      measure("ing_prom_mes_real", "Ingreso mensual (real)", "#198754", 2, true, NationalMeasure::IngPromMesReal),
      measure(
        "ing_prom_hora_total",
        "Ingreso por hora (nominal)",
        "#fd7e14",
        2,
        false,
        NationalMeasure::IngPromHoraTotal,
      ),
      measure("ing_prom_hora_real", "Ingreso por hora (real)", "#20c997", 2, false, NationalMeasure::IngPromHoraReal),
    ],
  },
  NationalGroupDef {
    id:          "precios",
    title:       "Deflactor",
    description: "Deflactor usado para expresar los ingresos en términos \
                  reales.",
    variables:   &[measure("deflactor", "Deflactor", "#6c757d", 4, true, NationalMeasure::Deflactor)],
  },
];

pub fn national_group(id: &str) -> Option<&'static NationalGroupDef> {
  NATIONAL_GROUPS.iter().find(|g| g.id == id)
}

pub fn national_variable(id: &str) -> Option<&'static NationalVariableDef> {
  NATIONAL_GROUPS
    .iter()
    .flat_map(|g| g.variables.iter())
    .find(|v| v.id == id)
}
