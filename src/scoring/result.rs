//! Scoring outputs.

use indexmap::IndexMap;
use serde::Serialize;

use super::debug::MetricTrace;

/// Scores, confidences and trace of one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub entity_id: u64,
    pub name: String,
    /// Axis id → score in [0, 1000], `None` when nothing could be scored
    pub axis_scores: IndexMap<String, Option<f64>>,
    /// Axis id → genuine share of applied weight in [0, 1]
    pub confidence: IndexMap<String, Option<f64>>,
    pub traces: Vec<MetricTrace>,
}

impl ScoreResult {
    #[must_use]
    pub fn score(&self, axis: &str) -> Option<f64> {
        self.axis_scores.get(axis).copied().flatten()
    }

    #[must_use]
    pub fn confidence(&self, axis: &str) -> Option<f64> {
        self.confidence.get(axis).copied().flatten()
    }

    pub fn traces_for<'a>(&'a self, axis: &'a str) -> impl Iterator<Item = &'a MetricTrace> + 'a {
        self.traces.iter().filter(move |t| t.axis == axis)
    }

    #[must_use]
    pub fn trace(&self, axis: &str, metric_id: &str) -> Option<&MetricTrace> {
        self.traces
            .iter()
            .find(|t| t.axis == axis && t.metric_id == metric_id)
    }

    /// Lowest confidence over all axes that produced a score
    #[must_use]
    pub fn min_confidence(&self) -> Option<f64> {
        self.confidence
            .values()
            .flatten()
            .copied()
            .reduce(f64::min)
    }
}

/// Results of one scoring run, in dataset order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringRun {
    pub results: Vec<ScoreResult>,
    /// Hash of configuration and dataset; equal inputs give equal fingerprints
    pub fingerprint: String,
    /// Axis ids in configuration order
    pub axes: Vec<String>,
}

impl ScoringRun {
    #[must_use]
    pub fn get(&self, entity_id: u64) -> Option<&ScoreResult> {
        self.results.iter().find(|r| r.entity_id == entity_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Entities whose lowest axis confidence is below `threshold`.
    /// Unscored entities count as below.
    pub fn below_confidence(&self, threshold: f64) -> impl Iterator<Item = &ScoreResult> {
        self.results
            .iter()
            .filter(move |r| r.min_confidence().map_or(true, |c| c < threshold))
    }
}
