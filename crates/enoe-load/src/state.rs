//! Decoding of the per-entity quarterly table.

use std::{collections::HashSet, io, path::Path};

use enoe_core::{
  names,
  record::{StateRecord, StateTable},
  variables::{STATE_IDENTIFIER_COLUMNS, StateMeasure},
};

use crate::{
  Result,
  national::read_period,
  table::{self, Columns, Row, parse_float},
};

/// Load the state table from a CSV file.
pub fn load_states(path: &Path) -> Result<StateTable> {
  let file = table::open(path)?;
  read_states(io::BufReader::new(file), &path.display().to_string())
}

/// Decode the state table from any CSV reader.
///
/// Columns beyond the known measures are kept as extra variables when
/// every non-empty cell in them is numeric. Entity names pass through the
/// alias table so legacy spellings collapse to one canonical name.
pub fn read_states<R: io::Read>(reader: R, source_name: &str) -> Result<StateTable> {
  let (columns, records) = table::read_records(reader, source_name)?;

  let year = columns.require("year")?;
  let quarter = columns.require("quarter")?;
  let ent_code = columns.require("ent_code")?;
  let ent_nombre = columns.require("ent_nombre")?;
  let periodo = columns.optional("periodo");

  let mut measures = Vec::with_capacity(StateMeasure::ALL.len());
  for m in StateMeasure::ALL {
    let idx = if m.required() { Some(columns.require(m.column())?) } else { columns.optional(m.column()) };
    if let Some(idx) = idx {
      measures.push((m, idx));
    }
  }

  let extras = numeric_extras(&columns, &records);

  let mut seen = HashSet::new();
  let mut rows = Vec::with_capacity(records.len());
  for (line, record) in &records {
    let row = Row::new(*line, record, &columns);
    let period = read_period(&row, year, quarter)?;
    let code: u32 = row.int(ent_code)?;
    if !seen.insert((code, period)) {
      return Err(row.duplicate(format!("entity {code} at {period}")));
    }

    let name = names::canonical_name(row.text(ent_nombre)?).to_string();
    let label = periodo
      .map(|idx| row.cell(idx))
      .filter(|s| !s.is_empty())
      .map_or_else(|| period.label(), str::to_string);

    let mut out = StateRecord {
      ent_code: code,
      ent_nombre: name,
      period,
      periodo: label,
      ..StateRecord::default()
    };
    for &(m, idx) in &measures {
      *out.slot_mut(m) = row.float(idx)?;
    }
    out.extra = extras
      .iter()
      .filter_map(|(column, idx)| {
        parse_float(row.cell(*idx))
          .ok()
          .flatten()
          .map(|v| (column.clone(), v))
      })
      .collect();
    rows.push(out);
  }

  let extra_columns = extras.into_iter().map(|(column, _)| column).collect();
  let table = StateTable::from_rows(rows, extra_columns);
  tracing::info!(
    source = source_name,
    rows = table.rows().len(),
    entities = table.entities().len(),
    periods = table.periods().len(),
    extra_columns = table.extra_columns().len(),
    "loaded state table"
  );
  Ok(table)
}

/// Extra columns with at least one value whose non-empty cells all parse as
/// numbers, with their positions, in source order.
fn numeric_extras(
  columns: &Columns,
  records: &[(u64, csv::StringRecord)],
) -> Vec<(String, usize)> {
  columns
    .names()
    .iter()
    .enumerate()
    .filter(|(_, name)| {
      !name.is_empty()
        && !STATE_IDENTIFIER_COLUMNS.contains(&name.as_str())
        && StateMeasure::from_column(name).is_none()
    })
    .filter(|(idx, name)| columns.optional(name) == Some(*idx))
    .filter(|(idx, _)| {
      let mut any = false;
      let numeric = records.iter().all(|(_, r)| {
        let cell = r.get(*idx).unwrap_or("");
        any |= !cell.is_empty();
        parse_float(cell).is_ok()
      });
      numeric && any
    })
    .map(|(idx, name)| (name.clone(), idx))
    .collect()
}
