//! Scoring setup: tier gating, global ranges, engine construction.

use super::PipelineError;
use crate::catalog::MetricCatalog;
use crate::config::AppConfig;
use crate::error::ScoreError;
use crate::model::Dataset;
use crate::scoring::{GlobalRanges, ScoringEngine};

/// An engine ready to run, plus what tier gating removed.
#[derive(Debug)]
pub struct PreparedScoring<'c> {
    pub engine: ScoringEngine<'c>,
    /// Metrics dropped by tier gating, as `axis/metric`
    pub dropped_metrics: Vec<String>,
    /// Axes left without any accessible metric
    pub dropped_axes: Vec<String>,
}

/// Turn an application config into an engine.
///
/// Axes are restricted to metrics `config.tier` can access; axes left
/// empty are removed. With `ranges_from_dataset`, metrics without a
/// configured global range get the dataset's finite [min, max].
pub fn prepare_scoring<'c>(
    config: &AppConfig,
    catalog: &'c MetricCatalog,
    dataset: &Dataset,
    ranges_from_dataset: bool,
) -> Result<PreparedScoring<'c>, PipelineError> {
    let setup_failed = |source: ScoreError| PipelineError::SetupFailed { source };
    let mut scoring = config.scoring.clone();

    let dropped = scoring
        .restrict_to_tier(catalog, config.tier)
        .map_err(setup_failed)?;
    let dropped_metrics: Vec<String> = dropped
        .into_iter()
        .map(|(axis, metric)| {
            tracing::debug!("Tier {} cannot access {metric} (axis {axis})", config.tier);
            format!("{axis}/{metric}")
        })
        .collect();

    let dropped_axes: Vec<String> = scoring
        .axes
        .iter()
        .filter(|(_, axis)| axis.metrics.is_empty())
        .map(|(id, _)| id.clone())
        .collect();
    for axis in &dropped_axes {
        tracing::warn!("Axis '{axis}' has no metric available at tier {}; skipping", config.tier);
    }
    scoring.axes.retain(|_, axis| !axis.metrics.is_empty());
    if scoring.axes.is_empty() {
        return Err(setup_failed(ScoreError::config(format!(
            "no configured axis has a metric available at tier {}",
            config.tier
        ))));
    }

    if ranges_from_dataset {
        let universe = GlobalRanges::from_dataset(dataset);
        let missing: Vec<String> = scoring
            .axis_metrics()
            .into_iter()
            .filter(|m| scoring.global_ranges.get(m).is_none())
            .map(str::to_string)
            .collect();
        for metric in missing {
            if let Some(range) = universe.get(&metric) {
                scoring.global_ranges.insert(metric, *range);
            }
        }
    }

    let engine = ScoringEngine::new(catalog, scoring).map_err(setup_failed)?;
    Ok(PreparedScoring {
        engine,
        dropped_metrics,
        dropped_axes,
    })
}
