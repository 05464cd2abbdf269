//! Weighted aggregation of metric scores into axis scores.

use super::debug::MetricTrace;

/// Upper end of the axis score scale.
pub const AXIS_SCALE: f64 = 1000.0;

/// Axis score and confidence of one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisOutcome {
    pub score: Option<f64>,
    pub confidence: Option<f64>,
    /// Sum of applied weights (the score denominator)
    pub weight_applied: f64,
    /// Applied weight backed by non-imputed values
    pub genuine_weight: f64,
}

/// Weighted mean of the normalized values of the traces of `axis`.
///
/// Only traces with a positive applied weight take part. With no such
/// trace both score and confidence are `None`.
#[must_use]
pub fn aggregate(axis: &str, traces: &[MetricTrace]) -> AxisOutcome {
    let mut numerator = 0.0;
    let mut weight_applied = 0.0;
    let mut genuine_weight = 0.0;

    for trace in traces.iter().filter(|t| t.axis == axis && t.contributed()) {
        let Some(normalized) = trace.normalized_value else {
            continue;
        };
        numerator += normalized * trace.weight_applied;
        weight_applied += trace.weight_applied;
        if !trace.was_imputed {
            genuine_weight += trace.weight_applied;
        }
    }

    if weight_applied <= 0.0 {
        return AxisOutcome {
            score: None,
            confidence: None,
            weight_applied: 0.0,
            genuine_weight: 0.0,
        };
    }

    AxisOutcome {
        score: Some((numerator / weight_applied * AXIS_SCALE).clamp(0.0, AXIS_SCALE)),
        confidence: Some((genuine_weight / weight_applied).clamp(0.0, 1.0)),
        weight_applied,
        genuine_weight,
    }
}

/// Renormalize blend weights so they sum to 1.
///
/// Non-positive and non-finite weights count as 0. Returns `None` when
/// nothing positive remains.
#[must_use]
pub fn renormalize(weights: &[f64]) -> Option<Vec<f64>> {
    let clean: Vec<f64> = weights
        .iter()
        .map(|&w| if w.is_finite() && w > 0.0 { w } else { 0.0 })
        .collect();
    let total: f64 = clean.iter().sum();
    (total > 0.0).then(|| clean.iter().map(|w| w / total).collect())
}

/// Blend per-group scores with already renormalized weights.
///
/// `None` entries (excluded groups) drop out and the remaining weights are
/// renormalized again.
#[must_use]
pub fn blend(scores: &[(Option<f64>, f64)]) -> Option<f64> {
    let mut total = 0.0;
    let mut weight = 0.0;
    for (score, w) in scores {
        if let Some(s) = score {
            total += s * w;
            weight += w;
        }
    }
    (weight > 0.0).then(|| (total / weight).clamp(0.0, 1.0))
}
