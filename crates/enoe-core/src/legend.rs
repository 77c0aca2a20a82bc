//! Quantile legend for the choropleth map.

use serde::Serialize;

use crate::{Error, Result};

/// Fill colors of the five buckets, lightest first.
pub const COLORS: [&str; 5] = ["#eff3ff", "#bdd7e7", "#6baed6", "#3182bd", "#08519c"];

/// Quantile probabilities bounding the buckets.
pub const THRESHOLDS: [f64; 6] = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0];

/// One contiguous bucket of the legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendBreak {
  pub min:   f64,
  pub max:   f64,
  pub color: &'static str,
  pub label: String,
}

/// The `p`-quantile of ascending `sorted` values, interpolating linearly
/// between order statistics (`h = (n - 1) * p`).
///
/// `sorted` must be non-empty and `p` in `[0, 1]`.
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
  let h = (sorted.len() - 1) as f64 * p;
  let lo = h.floor() as usize;
  let hi = (lo + 1).min(sorted.len() - 1);
  sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Five quantile buckets over the non-null, finite `values`.
///
/// Bucket `i` spans `[q(i/5), q((i+1)/5)]`, so consecutive buckets share a
/// bound and together cover every observed value.
pub fn quantile_breaks<I>(values: I) -> Result<Vec<LegendBreak>>
where
  I: IntoIterator<Item = Option<f64>>,
{
  let mut sorted: Vec<f64> = values
    .into_iter()
    .flatten()
    .filter(|v| v.is_finite())
    .collect();
  if sorted.len() < 2 {
    return Err(Error::InsufficientObservations { found: sorted.len() });
  }
  sorted.sort_by(f64::total_cmp);

  let bounds: Vec<f64> = THRESHOLDS.iter().map(|p| quantile(&sorted, *p)).collect();
  Ok(
    bounds
      .windows(2)
      .zip(COLORS)
      .map(|(pair, color)| LegendBreak {
        min: pair[0],
        max: pair[1],
        color,
        label: format!("{} – {}", thousands(pair[0]), thousands(pair[1])),
      })
      .collect(),
  )
}

/// Round to a whole number and group digits by thousands: `12345.6` →
/// `12,346`.
pub fn thousands(value: f64) -> String {
  let rounded = value.round();
  let digits = format!("{:.0}", rounded.abs());
  let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
  if rounded < 0.0 {
    out.push('-');
  }
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(ch);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quantile_interpolates_between_order_statistics() {
    let v = [1.0, 2.0, 3.0, 4.0];
    assert_eq!(quantile(&v, 0.0), 1.0);
    assert_eq!(quantile(&v, 1.0), 4.0);
    assert!((quantile(&v, 0.5) - 2.5).abs() < 1e-12);
    assert!((quantile(&v, 0.2) - 1.6).abs() < 1e-12);
  }

  #[test]
  fn breaks_are_contiguous_and_cover_all_values() {
    let values = [8_200.0, 6_100.0, 9_950.5, 7_300.0, 12_480.0, 5_400.0, 7_777.7];
    let breaks = quantile_breaks(values.iter().copied().map(Some)).unwrap();
    assert_eq!(breaks.len(), 5);
    for i in 0..4 {
      assert_eq!(breaks[i].max, breaks[i + 1].min);
    }
    for v in values {
      assert!(breaks[0].min <= v && v <= breaks[4].max);
    }
    assert_eq!(breaks[0].color, "#eff3ff");
    assert_eq!(breaks[4].color, "#08519c");
    assert_eq!(breaks[0].label.split(" – ").next(), Some("5,400"));
  }

  #[test]
  fn nulls_are_dropped_before_ranking() {
    let breaks = quantile_breaks([None, Some(10.0), None, Some(20.0)]).unwrap();
    assert_eq!(breaks[0].min, 10.0);
    assert_eq!(breaks[4].max, 20.0);
  }

  #[test]
  fn fewer_than_two_observations_is_an_error() {
    assert!(matches!(
      quantile_breaks([Some(1.0), None]),
      Err(Error::InsufficientObservations { found: 1 })
    ));
    assert!(matches!(
      quantile_breaks(Vec::<Option<f64>>::new()),
      Err(Error::InsufficientObservations { found: 0 })
    ));
  }

  #[test]
  fn thousands_groups_digits() {
    assert_eq!(thousands(0.4), "0");
    assert_eq!(thousands(999.0), "999");
    assert_eq!(thousands(1_000.0), "1,000");
    assert_eq!(thousands(1_234_567.49), "1,234,567");
    assert_eq!(thousands(-12_345.6), "-12,346");
  }
}
