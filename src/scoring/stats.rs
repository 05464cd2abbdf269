//! Small descriptive-statistics helpers over peer values.
//!
//! All functions are deterministic for a given input order and return
//! `None` instead of dividing by zero.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Standard deviation convention for z-scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StdDevKind {
    /// Divide by N
    #[default]
    Population,
    /// Divide by N - 1
    Sample,
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let direct = values.iter().sum::<f64>() / n;
    if direct.is_finite() || !values.iter().all(|v| v.is_finite()) {
        return Some(direct);
    }
    // the running sum overflowed; the mean itself is within range
    Some(values.iter().map(|v| v / n).sum())
}

/// Median; the mean of the two middle values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some(midpoint(sorted[mid - 1], sorted[mid]))
    } else {
        Some(sorted[mid])
    }
}

fn midpoint(a: f64, b: f64) -> f64 {
    let m = (a + b) / 2.0;
    if m.is_finite() {
        m
    } else {
        a / 2.0 + b / 2.0
    }
}

pub fn std_dev(values: &[f64], kind: StdDevKind) -> Option<f64> {
    let m = mean(values)?;
    let denom = match kind {
        StdDevKind::Population => values.len() as f64,
        StdDevKind::Sample if values.len() < 2 => return None,
        StdDevKind::Sample => (values.len() - 1) as f64,
    };
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / denom).sqrt())
}

pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let mut iter = values.iter().copied();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

/// Average (fractional) 1-based rank of `value` among `population`.
///
/// Tied values share the mean of the positions they occupy. When
/// `contains_value` is false the value is ranked as if inserted into the
/// population. Returns `(rank, n)` where `n` counts the value itself.
pub fn average_rank(value: f64, population: &[f64], contains_value: bool) -> (f64, usize) {
    let below = population.iter().filter(|&&p| p < value).count();
    let mut equal = population.iter().filter(|&&p| p == value).count();
    let mut n = population.len();
    if !contains_value || equal == 0 {
        equal += 1;
        n += 1;
    }
    let rank = below as f64 + (equal as f64 + 1.0) / 2.0;
    (rank, n)
}
