//! Survey periods: a year plus a quarter.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One ENOE survey quarter.
///
/// Ordering is chronological: by year, then by quarter. `Default` is the
/// zero placeholder used while a record is being decoded.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
pub struct Period {
  pub year:    i32,
  pub quarter: u8,
}

impl Period {
  /// Returns `None` unless `quarter` is in `1..=4`.
  pub fn new(year: i32, quarter: u8) -> Option<Self> {
    (1..=4).contains(&quarter).then_some(Self { year, quarter })
  }

  /// Display label used on chart axes, e.g. `2024 T3`.
  pub fn label(&self) -> String { self.to_string() }

  /// First calendar day of the quarter.
  pub fn start_date(&self) -> Option<NaiveDate> {
    let month = u32::from(self.quarter) * 3 - 2;
    NaiveDate::from_ymd_opt(self.year, month, 1)
  }
}

impl fmt::Display for Period {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} T{}", self.year, self.quarter)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_quarters_outside_range() {
    assert!(Period::new(2024, 0).is_none());
    assert!(Period::new(2024, 5).is_none());
    assert!(Period::new(2024, 4).is_some());
  }

  #[test]
  fn orders_by_year_then_quarter() {
    let a = Period::new(2023, 4).unwrap();
    let b = Period::new(2024, 1).unwrap();
    let c = Period::new(2024, 2).unwrap();
    assert!(a < b && b < c);
  }

  #[test]
  fn start_date_is_first_day_of_quarter() {
    let p = Period::new(2025, 3).unwrap();
    assert_eq!(p.start_date(), NaiveDate::from_ymd_opt(2025, 7, 1));
    assert_eq!(p.label(), "2025 T3");
  }

  #[test]
  fn display_matches_label() {
    let p = Period::new(2024, 1).unwrap();
    assert_eq!(p.to_string(), "2024 T1");
    assert_eq!(format!("period {p}"), format!("period {}", p.label()));
  }
}
