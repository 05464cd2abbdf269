//! Mapping of metric values to a directional 0–1 goodness score.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::imputer::ImputedValue;
use super::stats::{self, StdDevKind};
use crate::config::DEFAULT_ZSCORE_CLAMP;
use crate::model::Dataset;

/// Score returned whenever a population gives no usable spread.
pub const NEUTRAL: f64 = 0.5;

/// Statistical mode used to normalize a value against its peers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMode {
    /// Fixed caller-supplied [min, max] per metric
    GlobalMinMax,
    /// [min, max] of the peer set
    #[default]
    DatasetMinMax,
    /// Average-rank percentile within the peer set
    DatasetRankPercentile,
    /// Clamped z-score against the peer set
    #[serde(rename = "dataset_zscore")]
    DatasetZScore,
}

impl NormalizationMode {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GlobalMinMax => "global_min_max",
            Self::DatasetMinMax => "dataset_min_max",
            Self::DatasetRankPercentile => "dataset_rank_percentile",
            Self::DatasetZScore => "dataset_zscore",
        }
    }

    /// Whether the mode reads peer statistics at all
    #[must_use]
    pub const fn uses_peers(&self) -> bool {
        !matches!(self, Self::GlobalMinMax)
    }
}

/// Z-score parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ZScoreParams {
    /// Symmetric clamp bound for z before rescaling
    pub clamp: f64,
    pub std_dev: StdDevKind,
}

impl Default for ZScoreParams {
    fn default() -> Self {
        Self {
            clamp: DEFAULT_ZSCORE_CLAMP,
            std_dev: StdDevKind::Population,
        }
    }
}

/// Inclusive value range of one metric across the whole universe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Precomputed per-metric ranges for `global_min_max`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct GlobalRanges(IndexMap<String, MetricRange>);

impl GlobalRanges {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finite [min, max] of every metric present in `dataset`.
    #[must_use]
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut ranges: IndexMap<String, MetricRange> = IndexMap::new();
        for entity in dataset.iter() {
            for (metric_id, value) in &entity.metrics {
                let Some(v) = value.filter(|v| v.is_finite()) else {
                    continue;
                };
                ranges
                    .entry(metric_id.clone())
                    .and_modify(|r| {
                        r.min = r.min.min(v);
                        r.max = r.max.max(v);
                    })
                    .or_insert(MetricRange::new(v, v));
            }
        }
        Self(ranges)
    }

    #[must_use]
    pub fn with_range(mut self, metric_id: impl Into<String>, min: f64, max: f64) -> Self {
        self.insert(metric_id, MetricRange::new(min, max));
        self
    }

    pub fn insert(&mut self, metric_id: impl Into<String>, range: MetricRange) {
        self.0.insert(metric_id.into(), range);
    }

    #[must_use]
    pub fn get(&self, metric_id: &str) -> Option<&MetricRange> {
        self.0.get(metric_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetricRange)> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Values of one metric across a peer set, as seen by the statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeerPopulation {
    /// Finite values (min/max, mean, stddev)
    pub finite: Vec<f64>,
    /// Every non-NaN value, ±∞ included (rank ordering)
    pub rankable: Vec<f64>,
    /// Whether the normalized value itself is part of the population
    pub includes_subject: bool,
}

impl PeerPopulation {
    /// Build from the other members' values plus, when the subject belongs
    /// to its own peer set, the subject's value-for-normalization.
    #[must_use]
    pub fn new(finite: Vec<f64>, rankable: Vec<f64>, subject_value: Option<f64>) -> Self {
        let mut population = Self {
            finite,
            rankable,
            includes_subject: false,
        };
        if let Some(v) = subject_value {
            population.push_subject(v);
        }
        population
    }

    fn push_subject(&mut self, v: f64) {
        if v.is_finite() {
            self.finite.push(v);
        }
        if !v.is_nan() {
            self.rankable.push(v);
        }
        self.includes_subject = true;
    }
}

/// Directional goodness score of one value.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Final score in [0, 1]; 1 is always the most favorable end
    pub value: f64,
    pub note: Option<String>,
}

impl Normalized {
    fn plain(value: f64) -> Self {
        Self { value, note: None }
    }

    fn noted(value: f64, note: String) -> Self {
        Self {
            value,
            note: Some(note),
        }
    }
}

/// Applies one [`NormalizationMode`] with its parameters.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    mode: NormalizationMode,
    zscore: ZScoreParams,
    ranges: &'a GlobalRanges,
}

impl<'a> Normalizer<'a> {
    #[must_use]
    pub const fn new(mode: NormalizationMode, zscore: ZScoreParams, ranges: &'a GlobalRanges) -> Self {
        Self {
            mode,
            zscore,
            ranges,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> NormalizationMode {
        self.mode
    }

    /// Normalize an imputed value against `population`.
    ///
    /// Returns `None` only for [`ImputedValue::Excluded`]. The worst-score
    /// sentinel yields 0 whatever the direction; real values are computed in
    /// ascending terms and inverted afterwards when lower is better.
    #[must_use]
    pub fn normalize(
        &self,
        metric_id: &str,
        value: ImputedValue,
        population: &PeerPopulation,
        higher_is_better: bool,
    ) -> Option<Normalized> {
        let v = match value {
            ImputedValue::Excluded => return None,
            ImputedValue::Worst => {
                return Some(Normalized::noted(
                    0.0,
                    format!("{metric_id}: worst score for direction"),
                ))
            }
            ImputedValue::Value(v) => v,
        };

        let ascending = match self.mode {
            NormalizationMode::GlobalMinMax => self.global_min_max(metric_id, v),
            NormalizationMode::DatasetMinMax => dataset_min_max(metric_id, v, population),
            NormalizationMode::DatasetRankPercentile => rank_percentile(metric_id, v, population),
            NormalizationMode::DatasetZScore => self.zscore(metric_id, v, population),
        };

        let value = if ascending.value.is_nan() {
            NEUTRAL
        } else {
            ascending.value.clamp(0.0, 1.0)
        };
        let value = if higher_is_better { value } else { 1.0 - value };
        Some(Normalized {
            value,
            note: ascending.note,
        })
    }

    fn global_min_max(&self, metric_id: &str, v: f64) -> Normalized {
        let Some(range) = self.ranges.get(metric_id) else {
            return Normalized::noted(NEUTRAL, format!("{metric_id}: no global range, neutral score"));
        };
        if range.max == range.min {
            return Normalized::noted(NEUTRAL, format!("{metric_id}: zero global range"));
        }
        range_position(metric_id, v, range.min, range.max)
    }

    fn zscore(&self, metric_id: &str, v: f64, population: &PeerPopulation) -> Normalized {
        let Some((lo, hi)) = stats::min_max(&population.finite) else {
            return Normalized::noted(NEUTRAL, format!("{metric_id}: no valid peer values"));
        };
        // identical values can still leave a rounding residue in the mean
        if lo == hi {
            return Normalized::noted(NEUTRAL, format!("{metric_id}: zero variance in peer set"));
        }
        let Some(z) = self
            .standard_score(v, &population.finite)
            .or_else(|| {
                // z is scale invariant; shrink the values when squares overflow
                let scale = lo.abs().max(hi.abs()).max(v.abs());
                let scaled: Vec<f64> = population.finite.iter().map(|x| x / scale).collect();
                self.standard_score(v / scale, &scaled)
            })
        else {
            return Normalized::noted(NEUTRAL, format!("{metric_id}: z-score out of numeric range"));
        };
        let clamp = self.zscore.clamp;
        let z = z.clamp(-clamp, clamp);
        Normalized::plain((z + clamp) / (2.0 * clamp))
    }

    /// `(v - mean) / sd`, or `None` when the statistics are unusable.
    fn standard_score(&self, v: f64, values: &[f64]) -> Option<f64> {
        let mean = stats::mean(values).filter(|m| m.is_finite())?;
        let sd = stats::std_dev(values, self.zscore.std_dev).filter(|sd| sd.is_finite() && *sd > 0.0)?;
        let z = (v - mean) / sd;
        (!z.is_nan()).then_some(z)
    }
}

fn dataset_min_max(metric_id: &str, v: f64, population: &PeerPopulation) -> Normalized {
    let Some((min, max)) = stats::min_max(&population.finite) else {
        return Normalized::noted(NEUTRAL, format!("{metric_id}: no valid peer values"));
    };
    if population.finite.len() < 2 || max == min {
        return Normalized::noted(NEUTRAL, format!("{metric_id}: degenerate peer range"));
    }
    range_position(metric_id, v, min, max)
}

/// Position of `v` in `[min, max]` (unclamped), for `min < max`.
///
/// Spans wider than `f64::MAX` are measured on values scaled into [-1, 1].
fn range_position(metric_id: &str, v: f64, min: f64, max: f64) -> Normalized {
    let (offset, span) = (v - min, max - min);
    let ratio = if offset.is_finite() && span.is_finite() {
        offset / span
    } else {
        let scale = v.abs().max(min.abs()).max(max.abs());
        (v / scale - min / scale) / (max / scale - min / scale)
    };
    if ratio.is_finite() {
        Normalized::plain(ratio)
    } else {
        Normalized::noted(NEUTRAL, format!("{metric_id}: range out of numeric range"))
    }
}

fn rank_percentile(metric_id: &str, v: f64, population: &PeerPopulation) -> Normalized {
    let (rank, n) = stats::average_rank(v, &population.rankable, population.includes_subject);
    if n <= 1 {
        return Normalized::noted(NEUTRAL, format!("{metric_id}: single ranked value"));
    }
    Normalized::plain((rank - 1.0) / (n as f64 - 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const M: &str = "financials.free_cash_flow_value";

    fn pop(values: &[f64]) -> PeerPopulation {
        PeerPopulation::new(
            values.iter().copied().filter(|v| v.is_finite()).collect(),
            values.iter().copied().filter(|v| !v.is_nan()).collect(),
            None,
        )
    }

    /// Score each value of `values` against the others plus itself
    fn score_all(mode: NormalizationMode, values: &[f64], higher: bool) -> Vec<f64> {
        let ranges = GlobalRanges::new();
        let normalizer = Normalizer::new(mode, ZScoreParams::default(), &ranges);
        (0..values.len())
            .map(|i| {
                let others: Vec<f64> = values
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, v)| *v)
                    .collect();
                let population = PeerPopulation::new(others.clone(), others, Some(values[i]));
                normalizer
                    .normalize(M, ImputedValue::Value(values[i]), &population, higher)
                    .unwrap()
                    .value
            })
            .collect()
    }

    #[test]
    fn test_min_max_scenario() {
        let values = [10.0, 20.0, 30.0];
        assert_eq!(
            score_all(NormalizationMode::DatasetMinMax, &values, true),
            vec![0.0, 0.5, 1.0]
        );
        assert_eq!(
            score_all(NormalizationMode::DatasetMinMax, &values, false),
            vec![1.0, 0.5, 0.0]
        );
    }

    #[test]
    fn test_rank_percentile_average_ties() {
        let out = score_all(NormalizationMode::DatasetRankPercentile, &[5.0, 5.0, 9.0], true);
        assert_eq!(out, vec![0.25, 0.25, 1.0]);
    }

    #[test]
    fn test_rank_percentile_single_member() {
        let out = score_all(NormalizationMode::DatasetRankPercentile, &[42.0], true);
        assert_eq!(out, vec![0.5]);
    }

    #[test]
    fn test_rank_percentile_counts_infinite_peers() {
        let ranges = GlobalRanges::new();
        let normalizer =
            Normalizer::new(NormalizationMode::DatasetRankPercentile, ZScoreParams::default(), &ranges);
        let mut population = pop(&[f64::INFINITY, f64::NAN]);
        population.push_subject(1.0);
        let n = normalizer
            .normalize(M, ImputedValue::Value(1.0), &population, true)
            .unwrap();
        assert_eq!(n.value, 0.0);
    }

    #[test]
    fn test_zscore_clamps_and_scales() {
        let out = score_all(NormalizationMode::DatasetZScore, &[1.0, 2.0, 3.0], true);
        assert!((out[1] - 0.5).abs() < 1e-12);
        assert!(out[0] < 0.5 && out[2] > 0.5);

        let ranges = GlobalRanges::new();
        let normalizer =
            Normalizer::new(NormalizationMode::DatasetZScore, ZScoreParams::default(), &ranges);
        // Far outside a tight population: clamped at +3 sd.
        let population = pop(&[1.0, 1.1, 0.9, 1.0]);
        let n = normalizer
            .normalize(M, ImputedValue::Value(1_000.0), &population, true)
            .unwrap();
        assert_eq!(n.value, 1.0);
    }

    #[test]
    fn test_degenerate_population_is_neutral() {
        for mode in [
            NormalizationMode::DatasetMinMax,
            NormalizationMode::DatasetRankPercentile,
            NormalizationMode::DatasetZScore,
        ] {
            for higher in [true, false] {
                let out = score_all(mode, &[7.0, 7.0, 7.0], higher);
                assert_eq!(out, vec![0.5; 3], "mode {}", mode.name());
            }
        }
    }

    #[test]
    fn test_extreme_finite_values_stay_in_unit_range() {
        let values = [-1e308, 0.0, 1e308];
        assert_eq!(
            score_all(NormalizationMode::DatasetMinMax, &values, true),
            vec![0.0, 0.5, 1.0]
        );

        let z = score_all(NormalizationMode::DatasetZScore, &values, true);
        assert_eq!(z[1], 0.5);
        assert!(z[0] < 0.5 && z[2] > 0.5, "{z:?}");

        let ranges = GlobalRanges::new().with_range(M, -f64::MAX, f64::MAX);
        let normalizer =
            Normalizer::new(NormalizationMode::GlobalMinMax, ZScoreParams::default(), &ranges);
        let n = normalizer
            .normalize(M, ImputedValue::Value(f64::MAX), &PeerPopulation::default(), false)
            .unwrap();
        assert_eq!(n.value, 0.0);
    }

    #[test]
    fn test_global_min_max() {
        let ranges = GlobalRanges::new().with_range(M, 0.0, 200.0).with_range("flat", 3.0, 3.0);
        let normalizer =
            Normalizer::new(NormalizationMode::GlobalMinMax, ZScoreParams::default(), &ranges);
        let empty = PeerPopulation::default();

        let n = normalizer.normalize(M, ImputedValue::Value(50.0), &empty, true).unwrap();
        assert_eq!(n.value, 0.25);
        let n = normalizer.normalize(M, ImputedValue::Value(500.0), &empty, false).unwrap();
        assert_eq!(n.value, 0.0);
        let n = normalizer
            .normalize("flat", ImputedValue::Value(3.0), &empty, true)
            .unwrap();
        assert_eq!(n.value, 0.5);
    }

    #[test]
    fn test_worst_sentinel_ignores_direction_and_mode() {
        let ranges = GlobalRanges::new();
        for mode in [
            NormalizationMode::GlobalMinMax,
            NormalizationMode::DatasetMinMax,
            NormalizationMode::DatasetRankPercentile,
            NormalizationMode::DatasetZScore,
        ] {
            let normalizer = Normalizer::new(mode, ZScoreParams::default(), &ranges);
            for higher in [true, false] {
                let n = normalizer
                    .normalize(M, ImputedValue::Worst, &pop(&[1.0, 2.0]), higher)
                    .unwrap();
                assert_eq!(n.value, 0.0);
            }
        }
    }

    #[test]
    fn test_excluded_is_not_normalized() {
        let ranges = GlobalRanges::new();
        let normalizer = Normalizer::new(NormalizationMode::DatasetMinMax, ZScoreParams::default(), &ranges);
        assert!(normalizer
            .normalize(M, ImputedValue::Excluded, &pop(&[1.0]), true)
            .is_none());
    }

    #[test]
    fn test_global_ranges_from_dataset() {
        use crate::model::Entity;
        let ds = Dataset::new(vec![
            Entity::new(1, "a").with_metric(M, 5.0).with_metric("x", f64::INFINITY),
            Entity::new(2, "b").with_metric(M, -2.0).with_null("x"),
        ])
        .unwrap();
        let ranges = GlobalRanges::from_dataset(&ds);
        assert_eq!(ranges.get(M), Some(&MetricRange::new(-2.0, 5.0)));
        assert!(ranges.get("x").is_none());
    }

    #[test]
    fn test_mode_names_match_serde() {
        let json = serde_json::to_string(&NormalizationMode::DatasetZScore).unwrap();
        assert_eq!(json, "\"dataset_zscore\"");
        let mode: NormalizationMode = serde_json::from_str("\"dataset_rank_percentile\"").unwrap();
        assert_eq!(mode, NormalizationMode::DatasetRankPercentile);
    }
}
