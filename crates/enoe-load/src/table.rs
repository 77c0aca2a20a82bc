//! Shared CSV decoding: header lookup and typed cell parsing.

use std::{collections::HashMap, fs::File, io, path::Path};

use csv::{ByteRecord, ReaderBuilder, StringRecord, Trim};

use crate::{Error, Result};

/// Open `path`, mapping a missing or unreadable file to [`Error::Io`].
pub(crate) fn open(path: &Path) -> Result<File> {
  File::open(path).map_err(|error| Error::Io { path: path.to_path_buf(), error })
}

/// Read every record of a CSV source. Returns the header row and the data
/// rows with their 1-based line numbers.
///
/// Bytes that are not valid UTF-8 decode to U+FFFD instead of failing, so
/// Latin-1 exports still load and their names reach the alias table.
pub(crate) fn read_records<R: io::Read>(
  reader: R,
  source_name: &str,
) -> Result<(Columns, Vec<(u64, StringRecord)>)> {
  let csv_err = |error: csv::Error| Error::Csv { source_name: source_name.to_string(), error };

  let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
  let headers = lossy(reader.byte_headers().map_err(csv_err)?);
  let columns = Columns::new(&headers, source_name);

  let mut rows = Vec::new();
  for record in reader.byte_records() {
    let record = record.map_err(csv_err)?;
    let line = record.position().map_or(0, |p| p.line());
    rows.push((line, lossy(&record)));
  }
  Ok((columns, rows))
}

fn lossy(record: &ByteRecord) -> StringRecord {
  record.iter().map(|field| String::from_utf8_lossy(field).trim().to_string()).collect()
}

// ─── Columns ─────────────────────────────────────────────────────────────────

/// Header names and their positions.
pub(crate) struct Columns {
  names:       Vec<String>,
  index:       HashMap<String, usize>,
  source_name: String,
}

impl Columns {
  fn new(headers: &StringRecord, source_name: &str) -> Self {
    let names: Vec<String> = headers
      .iter()
      .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
      .collect();
    let mut index = HashMap::new();
    for (i, name) in names.iter().enumerate() {
      index.entry(name.clone()).or_insert(i);
    }
    Self { names, index, source_name: source_name.to_string() }
  }

  pub(crate) fn names(&self) -> &[String] { &self.names }

  pub(crate) fn optional(&self, column: &str) -> Option<usize> { self.index.get(column).copied() }

  pub(crate) fn require(&self, column: &'static str) -> Result<usize> {
    self.optional(column).ok_or_else(|| Error::MissingColumn {
      source_name: self.source_name.clone(),
      column,
    })
  }
}

// ─── Cells ───────────────────────────────────────────────────────────────────

/// One data row, for typed access with line-numbered errors.
pub(crate) struct Row<'a> {
  pub(crate) line: u64,
  record:          &'a StringRecord,
  columns:         &'a Columns,
}

impl<'a> Row<'a> {
  pub(crate) fn new(line: u64, record: &'a StringRecord, columns: &'a Columns) -> Self {
    Self { line, record, columns }
  }

  pub(crate) fn cell(&self, idx: usize) -> &'a str { self.record.get(idx).unwrap_or("") }

  pub(crate) fn invalid(&self, idx: usize) -> Error {
    Error::InvalidValue {
      source_name: self.columns.source_name.clone(),
      line:        self.line,
      column:      self.columns.names.get(idx).cloned().unwrap_or_default(),
      value:       self.cell(idx).to_string(),
    }
  }

  pub(crate) fn duplicate(&self, key: String) -> Error {
    Error::DuplicateRow {
      source_name: self.columns.source_name.clone(),
      line: self.line,
      key,
    }
  }

  /// A measure cell. Empty and non-finite cells (`NaN`, `inf`) are null;
  /// anything else that is not a number is an error.
  pub(crate) fn float(&self, idx: usize) -> Result<Option<f64>> {
    parse_float(self.cell(idx)).map_err(|()| self.invalid(idx))
  }

  /// An integer cell. Accepts `2024` and the float rendering `2024.0`.
  pub(crate) fn int<T: TryFrom<i64>>(&self, idx: usize) -> Result<T> {
    parse_int(self.cell(idx))
      .and_then(|v| T::try_from(v).ok())
      .ok_or_else(|| self.invalid(idx))
  }

  pub(crate) fn text(&self, idx: usize) -> Result<&'a str> {
    let s = self.cell(idx);
    if s.is_empty() { Err(self.invalid(idx)) } else { Ok(s) }
  }
}

pub(crate) fn parse_float(cell: &str) -> Result<Option<f64>, ()> {
  if cell.is_empty() {
    return Ok(None);
  }
  let v: f64 = cell.parse().map_err(|_| ())?;
  Ok(v.is_finite().then_some(v))
}

fn parse_int(cell: &str) -> Option<i64> {
  if let Ok(v) = cell.parse::<i64>() {
    return Some(v);
  }
  let f: f64 = cell.parse().ok()?;
  (f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15).then_some(f as i64)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn floats_treat_blank_and_nan_as_null() {
    assert_eq!(parse_float(""), Ok(None));
    assert_eq!(parse_float("NaN"), Ok(None));
    assert_eq!(parse_float("1.5e3"), Ok(Some(1_500.0)));
    assert_eq!(parse_float("12,5"), Err(()));
  }

  #[test]
  fn ints_accept_float_rendering() {
    assert_eq!(parse_int("2024"), Some(2024));
    assert_eq!(parse_int("2024.0"), Some(2024));
    assert_eq!(parse_int("2024.5"), None);
    assert_eq!(parse_int("T1"), None);
  }

  #[test]
  fn headers_are_trimmed_and_bom_stripped() {
    let headers = StringRecord::from(vec!["\u{feff}year", " quarter "]);
    let cols = Columns::new(&headers, "test");
    assert_eq!(cols.optional("year"), Some(0));
    assert_eq!(cols.optional("quarter"), Some(1));
    assert!(matches!(
      cols.require("ent_code"),
      Err(Error::MissingColumn { column: "ent_code", .. })
    ));
  }
}
