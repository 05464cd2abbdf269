//! Imputation of missing or invalid raw values.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::stats;
use crate::model::RawValue;

/// Strategy for substituting a usable value when the raw value is invalid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ImputationMode {
    /// Give the metric the worst possible normalized score
    #[default]
    ZeroWorst,
    /// Mean of the valid peer values
    DatasetMean,
    /// Median of the valid peer values
    DatasetMedian,
    /// Leave the metric out of the axis for this entity
    Exclude,
}

impl ImputationMode {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ZeroWorst => "zero_worst",
            Self::DatasetMean => "dataset_mean",
            Self::DatasetMedian => "dataset_median",
            Self::Exclude => "exclude",
        }
    }
}

/// What the normalizer receives after imputation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ImputedValue {
    /// A number to normalize (genuine or substituted)
    Value(f64),
    /// Sentinel: assign the worst normalized score for the metric's direction
    Worst,
    /// The metric cannot be evaluated for this entity
    Excluded,
}

impl ImputedValue {
    #[must_use]
    pub const fn number(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// Outcome of imputing one raw value.
#[derive(Debug, Clone, PartialEq)]
pub struct Imputation {
    pub value: ImputedValue,
    pub was_imputed: bool,
    pub note: Option<String>,
}

impl Imputation {
    const fn genuine(v: f64) -> Self {
        Self {
            value: ImputedValue::Value(v),
            was_imputed: false,
            note: None,
        }
    }
}

/// Fills invalid raw values from peer statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct Imputer {
    mode: ImputationMode,
}

impl Imputer {
    #[must_use]
    pub const fn new(mode: ImputationMode) -> Self {
        Self { mode }
    }

    #[must_use]
    pub const fn mode(&self) -> ImputationMode {
        self.mode
    }

    /// Impute `raw` for `metric_id` from the finite values of the peer set.
    ///
    /// Valid (finite) raw values pass through untouched. Mean/median with no
    /// valid peer values fall back to the worst-score sentinel.
    #[must_use]
    pub fn impute(&self, metric_id: &str, raw: RawValue, peer_values: &[f64]) -> Imputation {
        if let RawValue::Finite(v) = raw {
            return Imputation::genuine(v);
        }

        let reason = raw.describe();
        let statistic = match self.mode {
            ImputationMode::ZeroWorst => {
                return Imputation {
                    value: ImputedValue::Worst,
                    was_imputed: true,
                    note: Some(format!("{metric_id} {reason}: assigned worst score")),
                };
            }
            ImputationMode::Exclude => {
                return Imputation {
                    value: ImputedValue::Excluded,
                    was_imputed: false,
                    note: Some(format!("{metric_id} {reason}: excluded from axis")),
                };
            }
            ImputationMode::DatasetMean => stats::mean(peer_values),
            ImputationMode::DatasetMedian => stats::median(peer_values),
        };

        match statistic {
            Some(v) => Imputation {
                value: ImputedValue::Value(v),
                was_imputed: true,
                note: Some(format!(
                    "{metric_id} {reason}: imputed {} {v:.4} from {} peer values",
                    self.mode.name(),
                    peer_values.len()
                )),
            },
            None => Imputation {
                value: ImputedValue::Worst,
                was_imputed: true,
                note: Some(format!(
                    "{metric_id} {reason}: no valid peer values for {}, fell back to zero_worst",
                    self.mode.name()
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METRIC: &str = "costs.aisc_last_year";

    #[test]
    fn test_valid_value_passes_through() {
        for mode in [
            ImputationMode::ZeroWorst,
            ImputationMode::DatasetMean,
            ImputationMode::DatasetMedian,
            ImputationMode::Exclude,
        ] {
            let out = Imputer::new(mode).impute(METRIC, RawValue::Finite(4.0), &[1.0]);
            assert_eq!(out.value, ImputedValue::Value(4.0));
            assert!(!out.was_imputed);
            assert!(out.note.is_none());
        }
    }

    #[test]
    fn test_zero_worst_sentinel() {
        let out = Imputer::new(ImputationMode::ZeroWorst).impute(METRIC, RawValue::Missing, &[1.0]);
        assert_eq!(out.value, ImputedValue::Worst);
        assert!(out.was_imputed);
    }

    #[test]
    fn test_mean_and_median() {
        let peers = [1.0, 2.0, 9.0];
        let mean = Imputer::new(ImputationMode::DatasetMean).impute(METRIC, RawValue::Missing, &peers);
        assert_eq!(mean.value, ImputedValue::Value(4.0));
        assert!(mean.was_imputed);

        let median = Imputer::new(ImputationMode::DatasetMedian).impute(
            METRIC,
            RawValue::NonFinite(f64::INFINITY),
            &peers,
        );
        assert_eq!(median.value, ImputedValue::Value(2.0));
        assert!(median.note.unwrap().contains("+inf"));
    }

    #[test]
    fn test_no_peer_values_falls_back_to_worst() {
        let out = Imputer::new(ImputationMode::DatasetMedian).impute(METRIC, RawValue::Missing, &[]);
        assert_eq!(out.value, ImputedValue::Worst);
        assert!(out.was_imputed);
        assert!(out.note.unwrap().contains("fell back"));
    }

    #[test]
    fn test_exclude() {
        let out = Imputer::new(ImputationMode::Exclude).impute(
            METRIC,
            RawValue::NonFinite(f64::NAN),
            &[1.0],
        );
        assert_eq!(out.value, ImputedValue::Excluded);
        assert!(!out.was_imputed);
    }
}
