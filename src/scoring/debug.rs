//! Per-metric audit trail.

use std::fmt::Write as _;

use serde::Serialize;

use super::result::ScoreResult;
use crate::model::RawValue;

/// Evaluation of one metric against one peer group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerGroupTrace {
    /// Peer group label, e.g. `nearest_by_size(10)`
    pub group: String,
    /// Renormalized blend weight of the group
    pub blend_weight: f64,
    /// Members of the peer set, subject included when applicable
    pub peer_count: usize,
    /// Whether the full dataset stood in for a missing classification
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imputed_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_for_normalization: Option<f64>,
    /// Directional score within this group; `None` if excluded
    pub normalized_value: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// Everything needed to redo the aggregation of one metric by hand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricTrace {
    pub metric_id: String,
    pub axis: String,
    pub higher_is_better: bool,
    pub raw_value: RawValue,
    pub was_imputed: bool,
    /// Substituted value, when every group agrees on one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imputed_value: Option<f64>,
    /// Value fed to the normalizer, when every group agrees on one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_for_normalization: Option<f64>,
    /// Blended directional score in [0, 1]; `None` if the metric was excluded
    pub normalized_value: Option<f64>,
    pub weight_configured: f64,
    /// Weight entering the axis denominator (0 when not evaluable)
    pub weight_applied: f64,
    /// `normalized_value * weight_applied`
    pub weighted_contribution: f64,
    pub peer_groups: Vec<PeerGroupTrace>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl MetricTrace {
    /// Whether the metric entered the axis arithmetic
    #[must_use]
    pub fn contributed(&self) -> bool {
        self.weight_applied > 0.0
    }

    /// Notes of the metric and of every peer group, in order
    pub fn all_notes(&self) -> impl Iterator<Item = &str> {
        self.notes
            .iter()
            .chain(self.peer_groups.iter().flat_map(|g| g.notes.iter()))
            .map(String::as_str)
    }
}

/// Append-only recorder of metric traces for one entity.
#[derive(Debug, Clone, Default)]
pub struct ScoreDebugger {
    traces: Vec<MetricTrace>,
}

impl ScoreDebugger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, trace: MetricTrace) {
        self.traces.push(trace);
    }

    #[must_use]
    pub fn traces(&self) -> &[MetricTrace] {
        &self.traces
    }

    #[must_use]
    pub fn finish(self) -> Vec<MetricTrace> {
        self.traces
    }
}

/// Render the trace of one result as plain-text tables, one per axis.
///
/// Each table ends with the sums that produce the axis score, so the
/// aggregation can be checked by hand.
#[must_use]
pub fn explain(result: &ScoreResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Entity {} ({})", result.entity_id, result.name);

    for (axis, score) in &result.axis_scores {
        let confidence = result.confidence.get(axis).copied().flatten();
        let _ = writeln!(
            out,
            "\nAxis {axis}: score {}, confidence {}",
            fmt_opt(*score, 1),
            fmt_opt(confidence, 3)
        );

        let traces: Vec<&MetricTrace> = result.traces_for(axis).collect();
        let id_width = traces
            .iter()
            .map(|t| t.metric_id.len())
            .max()
            .unwrap_or(6)
            .max(6);

        let _ = writeln!(
            out,
            "  {:<id_width$}  {:>3}  {:>12}  {:>3}  {:>12}  {:>6}  {:>6}  {:>6}  {:>8}",
            "metric", "dir", "raw", "imp", "used", "norm", "weight", "applied", "contrib"
        );
        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for t in &traces {
            numerator += t.weighted_contribution;
            denominator += t.weight_applied;
            let _ = writeln!(
                out,
                "  {:<id_width$}  {:>3}  {:>12}  {:>3}  {:>12}  {:>6}  {:>6.1}  {:>6.1}  {:>8.3}",
                t.metric_id,
                if t.higher_is_better { "+" } else { "-" },
                t.raw_value.describe(),
                if t.was_imputed { "yes" } else { "" },
                fmt_opt(t.value_for_normalization, 4),
                fmt_opt(t.normalized_value, 3),
                t.weight_configured,
                t.weight_applied,
                t.weighted_contribution,
            );
            if t.peer_groups.len() > 1 {
                for group in &t.peer_groups {
                    let _ = writeln!(
                        out,
                        "      {} x{:.3}: {} ({} peers)",
                        group.group,
                        group.blend_weight,
                        fmt_opt(group.normalized_value, 3),
                        group.peer_count
                    );
                }
            }
            for note in t.all_notes() {
                let _ = writeln!(out, "      note: {note}");
            }
        }
        let _ = writeln!(
            out,
            "  sum contrib {numerator:.3} / sum applied {denominator:.1} x 1000 = {}",
            fmt_opt(*score, 1)
        );
    }
    out
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "null".to_string(), |v| format!("{v:.precision$}"))
}
