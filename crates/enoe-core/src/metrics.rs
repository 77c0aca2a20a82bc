//! Derived ratios and rounding.
//!
//! Every function here treats "no data" as `None`. A zero or missing
//! denominator yields `None` rather than zero, so a state with no labor
//! force never reads as full employment.

use crate::{Period, record::StateTable};

/// `numerator / denominator * 100`, or `None` when either side is missing,
/// the denominator is zero, or the result is not finite.
pub fn ratio_pct(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
  let (num, den) = (numerator?, denominator?);
  if den == 0.0 {
    return None;
  }
  let pct = num / den * 100.0;
  pct.is_finite().then_some(pct)
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: u32) -> f64 {
  let factor = 10f64.powi(places as i32);
  (value * factor).round() / factor
}

pub fn round_opt(value: Option<f64>, places: u32) -> Option<f64> {
  value.map(|v| round_to(v, places))
}

/// Round a population count to a whole number of people.
pub fn round_count(value: Option<f64>) -> Option<i64> {
  value.filter(|v| v.is_finite()).map(|v| v.round() as i64)
}

/// unemployed / labor_force in percent, two decimals.
pub fn unemployment_rate(unemployed: Option<f64>, labor_force: Option<f64>) -> Option<f64> {
  round_opt(ratio_pct(unemployed, labor_force), 2)
}

/// The latest period of the state table: the maximum year, then the
/// maximum quarter within that year.
pub fn latest_period(table: &StateTable) -> Option<Period> {
  let year = table.rows().iter().map(|r| r.period.year).max()?;
  let quarter = table
    .rows()
    .iter()
    .filter(|r| r.period.year == year)
    .map(|r| r.period.quarter)
    .max()?;
  Some(Period { year, quarter })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::record::StateRecord;

  #[test]
  fn unemployment_rate_is_bounded_for_valid_rows() {
    let cases = [(0.0, 10.0), (5.0, 10.0), (10.0, 10.0), (1.0, 3.0), (123_456.0, 9_876_543.0)];
    for (unemployed, labor_force) in cases {
      let rate = unemployment_rate(Some(unemployed), Some(labor_force)).unwrap();
      assert!((0.0..=100.0).contains(&rate), "{unemployed}/{labor_force} → {rate}");
    }
  }

  #[test]
  fn zero_or_missing_denominator_is_null() {
    assert_eq!(unemployment_rate(Some(5.0), Some(0.0)), None);
    assert_eq!(unemployment_rate(Some(5.0), None), None);
    assert_eq!(unemployment_rate(None, Some(10.0)), None);
  }

  #[test]
  fn rounds_to_two_decimals() {
    assert_eq!(unemployment_rate(Some(1.0), Some(3.0)), Some(33.33));
    assert_eq!(unemployment_rate(Some(50_000.0), Some(1_000_000.0)), Some(5.0));
    assert_eq!(round_to(2.675_000_1, 2), 2.68);
  }

  #[test]
  fn round_count_rounds_to_nearest_person() {
    assert_eq!(round_count(Some(1_234.5)), Some(1_235));
    assert_eq!(round_count(Some(f64::NAN)), None);
    assert_eq!(round_count(None), None);
  }

  fn row(year: i32, quarter: u8) -> StateRecord {
    StateRecord {
      period: Period::new(year, quarter).unwrap(),
      ..StateRecord::default()
    }
  }

  #[test]
  fn latest_period_uses_max_quarter_of_max_year() {
    let table = StateTable::from_rows(
      vec![row(2023, 4), row(2024, 2), row(2024, 1), row(2022, 3)],
      vec![],
    );
    assert_eq!(latest_period(&table), Period::new(2024, 2));
    assert_eq!(latest_period(&StateTable::default()), None);
  }
}
