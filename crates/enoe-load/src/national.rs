//! Decoding of the national quarterly table.

use std::{collections::HashSet, io, path::Path};

use enoe_core::{
  Period,
  record::{NationalRecord, NationalTable},
  variables::NationalMeasure,
};

use crate::{
  Result,
  table::{self, Row},
};

/// Load the national table from a CSV file.
pub fn load_national(path: &Path) -> Result<NationalTable> {
  let file = table::open(path)?;
  read_national(io::BufReader::new(file), &path.display().to_string())
}

/// Decode the national table from any CSV reader. `source_name` only
/// appears in error messages.
pub fn read_national<R: io::Read>(reader: R, source_name: &str) -> Result<NationalTable> {
  let (columns, records) = table::read_records(reader, source_name)?;

  let year = columns.require("year")?;
  let quarter = columns.require("quarter")?;
  let mut measures = Vec::with_capacity(NationalMeasure::ALL.len());
  for m in NationalMeasure::ALL {
    let idx = if m.required() { Some(columns.require(m.column())?) } else { columns.optional(m.column()) };
    if let Some(idx) = idx {
      measures.push((m, idx));
    }
  }

  let mut seen = HashSet::new();
  let mut rows = Vec::with_capacity(records.len());
  for (line, record) in &records {
    let row = Row::new(*line, record, &columns);
    let period = read_period(&row, year, quarter)?;
    if !seen.insert(period) {
      return Err(row.duplicate(format!("period {period}")));
    }

    let mut out = NationalRecord::new(period);
    for &(m, idx) in &measures {
      *out.slot_mut(m) = row.float(idx)?;
    }
    rows.push(out);
  }

  let table = NationalTable::from_rows(rows);
  tracing::info!(
    source = source_name,
    rows = table.rows().len(),
    columns = measures.len(),
    "loaded national table"
  );
  Ok(table)
}

pub(crate) fn read_period(row: &Row<'_>, year: usize, quarter: usize) -> Result<Period> {
  let y: i32 = row.int(year)?;
  let q: u8 = row.int(quarter)?;
  Period::new(y, q).ok_or_else(|| row.invalid(quarter))
}
