//! The scoring engine.

use indexmap::IndexMap;
use rayon::prelude::*;

use super::aggregator::{aggregate, blend};
use super::debug::{MetricTrace, PeerGroupTrace, ScoreDebugger};
use super::imputer::Imputer;
use super::normalizer::{NormalizationMode, Normalizer, PeerPopulation};
use super::result::{ScoreResult, ScoringRun};
use crate::catalog::MetricCatalog;
use crate::config::{ScoringConfig, Validatable};
use crate::error::{OptionContext, Result, ScoreError};
use crate::model::{Dataset, Entity};
use crate::peers::{PeerCache, PeerGroupResolver, PeerGroupSpec, PeerSet};
use crate::utils::run_fingerprint;

/// A metric of an axis with its direction resolved against the catalog.
#[derive(Debug, Clone)]
struct ResolvedMetric {
    id: String,
    weight: f64,
    higher_is_better: bool,
}

#[derive(Debug, Clone)]
struct ResolvedAxis {
    id: String,
    metrics: Vec<ResolvedMetric>,
}

/// Scores datasets under one validated [`ScoringConfig`].
///
/// Construction does every check that can fail; scoring itself never
/// errors. Irregular data is resolved with fallbacks and surfaces as trace
/// notes.
///
/// ```
/// use composite_scorer::catalog::{ids, MetricCatalog};
/// use composite_scorer::config::{AxisConfig, ScoringConfig};
/// use composite_scorer::model::{Dataset, Entity};
/// use composite_scorer::scoring::ScoringEngine;
///
/// let catalog = MetricCatalog::standard();
/// let config = ScoringConfig::builder()
///     .axis("cost", AxisConfig::new().metric(ids::AISC_LAST_YEAR, 100.0))
///     .build();
/// let engine = ScoringEngine::new(&catalog, config).unwrap();
///
/// let dataset = Dataset::new(vec![
///     Entity::new(1, "Low cost").with_metric(ids::AISC_LAST_YEAR, 900.0),
///     Entity::new(2, "High cost").with_metric(ids::AISC_LAST_YEAR, 1_800.0),
/// ])
/// .unwrap();
/// let run = engine.score(&dataset);
/// assert_eq!(run.results[0].score("cost"), Some(1000.0));
/// assert_eq!(run.results[1].score("cost"), Some(0.0));
/// ```
#[derive(Debug)]
pub struct ScoringEngine<'c> {
    catalog: &'c MetricCatalog,
    config: ScoringConfig,
    axes: Vec<ResolvedAxis>,
    /// Peer groups with renormalized blend weights
    groups: Vec<(PeerGroupSpec, f64)>,
    imputer: Imputer,
}

impl<'c> ScoringEngine<'c> {
    /// Validate `config` against `catalog` and build an engine.
    ///
    /// Structural violations are reported together as one
    /// [`ScoreError::Config`]; the first unknown metric id fails with
    /// [`ScoreError::UnknownMetric`].
    pub fn new(catalog: &'c MetricCatalog, config: ScoringConfig) -> Result<Self> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(errors.into());
        }

        let mut axes = Vec::with_capacity(config.axes.len());
        for (axis_id, axis) in &config.axes {
            let metrics = axis
                .metrics
                .iter()
                .map(|m| {
                    let definition = catalog.get(&m.metric)?;
                    Ok(ResolvedMetric {
                        id: m.metric.clone(),
                        weight: m.weight,
                        higher_is_better: m.higher_is_better.unwrap_or(definition.higher_is_better),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            axes.push(ResolvedAxis {
                id: axis_id.clone(),
                metrics,
            });
        }

        for spec in config.peers.specs() {
            for metric in spec.strategy.referenced_metrics() {
                catalog.get(metric)?;
            }
        }

        if config.normalization == NormalizationMode::GlobalMinMax {
            let missing: Vec<&str> = config
                .axis_metrics()
                .into_iter()
                .filter(|m| config.global_ranges.get(m).is_none())
                .collect();
            if !missing.is_empty() {
                return Err(ScoreError::config(format!(
                    "global_ranges: global_min_max needs a range for {}",
                    missing.join(", ")
                )));
            }
        }

        let groups: Vec<(PeerGroupSpec, f64)> = config
            .peers
            .groups()
            .ok_or_else(|| ScoreError::config("peers.blend: no positive blend weight"))?
            .into_iter()
            .map(|(spec, weight)| (spec.clone(), weight))
            .collect();

        Ok(Self {
            catalog,
            imputer: Imputer::new(config.imputation),
            config,
            axes,
            groups,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    #[must_use]
    pub const fn catalog(&self) -> &'c MetricCatalog {
        self.catalog
    }

    /// Axis ids in configuration order
    #[must_use]
    pub fn axis_ids(&self) -> Vec<String> {
        self.axes.iter().map(|a| a.id.clone()).collect()
    }

    /// Score every entity of `dataset`.
    ///
    /// Peer sets are resolved once per group up front; entities are then
    /// scored in parallel. Results keep dataset order.
    #[must_use]
    pub fn score(&self, dataset: &Dataset) -> ScoringRun {
        tracing::info!(
            entities = dataset.len(),
            axes = self.axes.len(),
            normalization = self.config.normalization.name(),
            imputation = self.config.imputation.name(),
            peer_groups = self.groups.len(),
            "scoring run started"
        );

        let caches: Vec<PeerCache> = self
            .groups
            .iter()
            .map(|(spec, _)| PeerCache::build(dataset, spec))
            .collect();
        let fallbacks: usize = caches.iter().map(PeerCache::fallback_count).sum();
        if fallbacks > 0 {
            tracing::debug!(fallbacks, "peer groups fell back to the full dataset");
        }

        let results: Vec<ScoreResult> = (0..dataset.len())
            .into_par_iter()
            .map(|index| {
                let sets: Vec<&PeerSet> = caches.iter().filter_map(|c| c.get(index)).collect();
                self.score_index(dataset, index, &sets)
            })
            .collect();

        let unscored = results
            .iter()
            .filter(|r| r.axis_scores.values().all(Option::is_none))
            .count();
        tracing::info!(scored = results.len() - unscored, unscored, "scoring run finished");

        ScoringRun {
            results,
            fingerprint: run_fingerprint(&self.config, dataset.entities()),
            axes: self.axis_ids(),
        }
    }

    /// Score a single entity of `dataset` by id.
    pub fn score_entity(&self, dataset: &Dataset, entity_id: u64) -> Result<ScoreResult> {
        let index = dataset
            .index_of(entity_id)
            .with_context_none(|| format!("entity {entity_id} is not in the dataset"))?;
        let sets: Vec<PeerSet> = self
            .groups
            .iter()
            .map(|(spec, _)| PeerGroupResolver::new(dataset, spec).resolve(index))
            .collect();
        let sets: Vec<&PeerSet> = sets.iter().collect();
        Ok(self.score_index(dataset, index, &sets))
    }

    /// Score the entity at `index`; `sets` holds its peer set per group.
    fn score_index(&self, dataset: &Dataset, index: usize, sets: &[&PeerSet]) -> ScoreResult {
        let entity = &dataset.entities()[index];
        let mut debugger = ScoreDebugger::new();
        for axis in &self.axes {
            for metric in &axis.metrics {
                debugger.record(self.evaluate(dataset.entities(), index, sets, &axis.id, metric));
            }
        }
        let traces = debugger.finish();

        let mut axis_scores = IndexMap::with_capacity(self.axes.len());
        let mut confidence = IndexMap::with_capacity(self.axes.len());
        for axis in &self.axes {
            let outcome = aggregate(&axis.id, &traces);
            axis_scores.insert(axis.id.clone(), outcome.score);
            confidence.insert(axis.id.clone(), outcome.confidence);
        }

        ScoreResult {
            entity_id: entity.id,
            name: entity.name.clone(),
            axis_scores,
            confidence,
            traces,
        }
    }

    /// Impute, normalize and blend one metric of one axis for one entity.
    fn evaluate(
        &self,
        entities: &[Entity],
        index: usize,
        sets: &[&PeerSet],
        axis: &str,
        metric: &ResolvedMetric,
    ) -> MetricTrace {
        let normalizer = Normalizer::new(
            self.config.normalization,
            self.config.zscore,
            &self.config.global_ranges,
        );
        let raw = entities[index].raw(&metric.id);

        let mut notes: Vec<String> = Vec::new();
        let mut was_imputed = false;
        let mut excluded = false;
        let mut groups = Vec::with_capacity(sets.len());

        for ((spec, blend_weight), set) in self.groups.iter().zip(sets) {
            let mut group_notes = set.notes.clone();
            let (finite, rankable) = peer_values(entities, set, index, &metric.id);

            let imputation = self.imputer.impute(&metric.id, raw, &finite);
            was_imputed |= imputation.was_imputed;
            if let Some(note) = imputation.note {
                if imputation.value.number().is_some() {
                    group_notes.push(note);
                } else if !notes.contains(&note) {
                    notes.push(note);
                }
            }

            let subject_value = imputation.value.number();
            let population = if normalizer.mode().uses_peers() {
                let self_included = set.includes_subject || set.is_empty();
                PeerPopulation::new(finite, rankable, subject_value.filter(|_| self_included))
            } else {
                PeerPopulation::default()
            };

            let normalized =
                normalizer.normalize(&metric.id, imputation.value, &population, metric.higher_is_better);
            if let Some(note) = normalized.as_ref().and_then(|n| n.note.clone()) {
                group_notes.push(note);
            }
            excluded |= normalized.is_none();

            groups.push(PeerGroupTrace {
                group: spec.label(),
                blend_weight: *blend_weight,
                peer_count: set.len(),
                fallback: set.fallback,
                imputed_value: subject_value.filter(|_| imputation.was_imputed),
                value_for_normalization: subject_value,
                normalized_value: normalized.map(|n| n.value),
                notes: group_notes,
            });
        }

        let normalized_value = if excluded {
            None
        } else {
            let scores: Vec<(Option<f64>, f64)> = groups
                .iter()
                .map(|g| (g.normalized_value, g.blend_weight))
                .collect();
            blend(&scores)
        };
        let weight_applied = if normalized_value.is_some() {
            metric.weight
        } else {
            0.0
        };
        if metric.weight == 0.0 {
            notes.push(format!("{}: weight 0, not counted", metric.id));
        }

        MetricTrace {
            metric_id: metric.id.clone(),
            axis: axis.to_string(),
            higher_is_better: metric.higher_is_better,
            raw_value: raw,
            was_imputed,
            imputed_value: agreed(groups.iter().map(|g| g.imputed_value)),
            value_for_normalization: agreed(groups.iter().map(|g| g.value_for_normalization)),
            normalized_value,
            weight_configured: metric.weight,
            weight_applied,
            weighted_contribution: normalized_value.unwrap_or(0.0) * weight_applied,
            peer_groups: groups,
            notes,
        }
    }
}

/// Finite and rankable values of `metric` among the peers other than the subject.
fn peer_values(
    entities: &[Entity],
    set: &PeerSet,
    subject: usize,
    metric: &str,
) -> (Vec<f64>, Vec<f64>) {
    let mut finite = Vec::with_capacity(set.len());
    let mut rankable = Vec::with_capacity(set.len());
    for i in set.others(subject) {
        let raw = entities[i].raw(metric);
        if let Some(v) = raw.finite() {
            finite.push(v);
        }
        if let Some(v) = raw.rankable() {
            rankable.push(v);
        }
    }
    (finite, rankable)
}

/// The common value when every entry is `Some` of the same number.
fn agreed(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let mut common: Option<f64> = None;
    for value in values {
        let value = value?;
        match common {
            None => common = Some(value),
            Some(prev) if prev == value => {}
            Some(_) => return None,
        }
    }
    common
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ids;
    use crate::config::{AxisConfig, BlendedPeerGroup};
    use crate::model::CompanyStatus;
    use crate::peers::PeerGroupStrategy;
    use crate::scoring::{GlobalRanges, ImputationMode};

    fn aisc_dataset(values: &[Option<f64>]) -> Dataset {
        Dataset::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    let e = Entity::new(i as u64 + 1, format!("c{i}"));
                    match v {
                        Some(v) => e.with_metric(ids::AISC_LAST_YEAR, *v),
                        None => e.with_null(ids::AISC_LAST_YEAR),
                    }
                })
                .collect(),
        )
        .unwrap()
    }

    fn single_axis(metric: &str, weight: f64) -> ScoringConfig {
        ScoringConfig::builder()
            .axis("x", AxisConfig::new().metric(metric, weight))
            .build()
    }

    #[test]
    fn test_unknown_metric_fails_fast() {
        let catalog = MetricCatalog::standard();
        let err = ScoringEngine::new(&catalog, single_axis("costs.made_up", 10.0)).unwrap_err();
        assert!(matches!(err, ScoreError::UnknownMetric { .. }));
    }

    #[test]
    fn test_invalid_weight_fails_fast() {
        let catalog = MetricCatalog::standard();
        let err = ScoringEngine::new(&catalog, single_axis(ids::CASH, 150.0)).unwrap_err();
        assert!(matches!(err, ScoreError::Config(_)));
    }

    #[test]
    fn test_global_min_max_requires_ranges() {
        let catalog = MetricCatalog::standard();
        let config = ScoringConfig::builder()
            .axis("x", AxisConfig::new().metric(ids::CASH, 10.0))
            .normalization(NormalizationMode::GlobalMinMax)
            .build();
        let err = ScoringEngine::new(&catalog, config.clone()).unwrap_err();
        assert!(err.to_string().contains(ids::CASH));

        let mut config = config;
        config.global_ranges = GlobalRanges::new().with_range(ids::CASH, 0.0, 10.0);
        assert!(ScoringEngine::new(&catalog, config).is_ok());
    }

    #[test]
    fn test_unknown_size_measure_fails_fast() {
        let catalog = MetricCatalog::standard();
        let mut config = single_axis(ids::CASH, 10.0);
        config.peers = crate::config::PeerSelection::Single(PeerGroupSpec::new(
            PeerGroupStrategy::ScaleBucket {
                measure: "production.unknown".to_string(),
                thresholds: vec![1.0],
            },
        ));
        assert!(matches!(
            ScoringEngine::new(&catalog, config),
            Err(ScoreError::UnknownMetric { .. })
        ));
    }

    #[test]
    fn test_lower_is_better_from_catalog() {
        let catalog = MetricCatalog::standard();
        let engine = ScoringEngine::new(&catalog, single_axis(ids::AISC_LAST_YEAR, 100.0)).unwrap();
        let run = engine.score(&aisc_dataset(&[Some(800.0), Some(1_200.0), Some(1_600.0)]));
        let scores: Vec<Option<f64>> = run.results.iter().map(|r| r.score("x")).collect();
        assert_eq!(scores, vec![Some(1000.0), Some(500.0), Some(0.0)]);
        assert_eq!(run.axes, vec!["x".to_string()]);
    }

    #[test]
    fn test_direction_override() {
        let catalog = MetricCatalog::standard();
        let config = ScoringConfig::builder()
            .axis(
                "x",
                AxisConfig::new().metric_with_direction(ids::AISC_LAST_YEAR, 100.0, true),
            )
            .build();
        let engine = ScoringEngine::new(&catalog, config).unwrap();
        let run = engine.score(&aisc_dataset(&[Some(800.0), Some(1_600.0)]));
        assert_eq!(run.results[0].score("x"), Some(0.0));
        assert_eq!(run.results[1].score("x"), Some(1000.0));
    }

    #[test]
    fn test_zero_worst_lowers_confidence() {
        let catalog = MetricCatalog::standard();
        let config = ScoringConfig::builder()
            .axis(
                "x",
                AxisConfig::new()
                    .metric(ids::AISC_LAST_YEAR, 25.0)
                    .metric(ids::CASH, 75.0),
            )
            .build();
        let engine = ScoringEngine::new(&catalog, config).unwrap();
        let dataset = Dataset::new(vec![
            Entity::new(1, "a").with_metric(ids::CASH, 10.0),
            Entity::new(2, "b")
                .with_metric(ids::CASH, 5.0)
                .with_metric(ids::AISC_LAST_YEAR, 1_000.0),
        ])
        .unwrap();
        let result = &engine.score(&dataset).results[0];
        assert!((result.score("x").unwrap() - 750.0).abs() < 1e-9);
        assert!((result.confidence("x").unwrap() - 0.75).abs() < 1e-12);

        let trace = result.trace("x", ids::AISC_LAST_YEAR).unwrap();
        assert!(trace.was_imputed);
        assert_eq!(trace.normalized_value, Some(0.0));
        assert_eq!(trace.weight_applied, 25.0);
    }

    #[test]
    fn test_exclude_mode_drops_weight() {
        let catalog = MetricCatalog::standard();
        let config = ScoringConfig::builder()
            .axis("x", AxisConfig::new().metric(ids::AISC_LAST_YEAR, 50.0))
            .imputation(ImputationMode::Exclude)
            .build();
        let engine = ScoringEngine::new(&catalog, config).unwrap();
        let run = engine.score(&aisc_dataset(&[None, Some(900.0)]));
        assert_eq!(run.results[0].score("x"), None);
        assert_eq!(run.results[0].confidence("x"), None);
        let trace = run.results[0].trace("x", ids::AISC_LAST_YEAR).unwrap();
        assert_eq!(trace.weight_applied, 0.0);
        assert!(!trace.was_imputed);
        assert_eq!(run.results[1].score("x"), Some(500.0));
    }

    #[test]
    fn test_median_imputation_records_value() {
        let catalog = MetricCatalog::standard();
        let config = ScoringConfig::builder()
            .axis("x", AxisConfig::new().metric(ids::AISC_LAST_YEAR, 50.0))
            .imputation(ImputationMode::DatasetMedian)
            .build();
        let engine = ScoringEngine::new(&catalog, config).unwrap();
        let run = engine.score(&aisc_dataset(&[None, Some(800.0), Some(1_000.0), Some(1_600.0)]));
        let trace = run.results[0].trace("x", ids::AISC_LAST_YEAR).unwrap();
        assert_eq!(trace.imputed_value, Some(1_000.0));
        assert_eq!(trace.value_for_normalization, Some(1_000.0));
        assert_eq!(run.results[0].confidence("x"), Some(0.0));
        // 1000 within [800, 1600], lower is better
        assert!((trace.normalized_value.unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_weight_zero_metric_is_recorded_but_inert() {
        let catalog = MetricCatalog::standard();
        let config = ScoringConfig::builder()
            .axis(
                "x",
                AxisConfig::new()
                    .metric(ids::AISC_LAST_YEAR, 100.0)
                    .metric(ids::CASH, 0.0),
            )
            .build();
        let engine = ScoringEngine::new(&catalog, config).unwrap();
        let run = engine.score(&aisc_dataset(&[Some(800.0), Some(900.0)]));
        let result = &run.results[0];
        assert_eq!(result.traces.len(), 2);
        assert_eq!(result.confidence("x"), Some(1.0));
        assert_eq!(result.trace("x", ids::CASH).unwrap().weight_applied, 0.0);
    }

    #[test]
    fn test_blend_of_two_groups() {
        let catalog = MetricCatalog::standard();
        let config = ScoringConfig::builder()
            .axis("x", AxisConfig::new().metric(ids::AISC_LAST_YEAR, 100.0))
            .blend(vec![
                BlendedPeerGroup::new(PeerGroupSpec::new(PeerGroupStrategy::StatusCohort), 3.0),
                BlendedPeerGroup::new(
                    PeerGroupSpec::new(PeerGroupStrategy::nearest_by_size(1)),
                    1.0,
                ),
            ])
            .build();
        let engine = ScoringEngine::new(&catalog, config).unwrap();

        let company = |id: u64, status, aisc: f64, mcap: f64| {
            Entity::new(id, format!("c{id}"))
                .with_status(status)
                .with_metric(ids::AISC_LAST_YEAR, aisc)
                .with_metric(ids::MARKET_CAP, mcap)
        };
        let dataset = Dataset::new(vec![
            company(1, CompanyStatus::Producer, 1_000.0, 100.0),
            company(2, CompanyStatus::Producer, 2_000.0, 10_000.0),
            company(3, CompanyStatus::Developer, 500.0, 110.0),
        ])
        .unwrap();

        let result = engine.score_entity(&dataset, 1).unwrap();
        let trace = result.trace("x", ids::AISC_LAST_YEAR).unwrap();
        assert_eq!(trace.peer_groups.len(), 2);
        // Status cohort {1, 2}: best cost; nearest by size {1, 3}: worst cost.
        assert_eq!(trace.peer_groups[0].normalized_value, Some(1.0));
        assert_eq!(trace.peer_groups[1].normalized_value, Some(0.0));
        assert_eq!(trace.peer_groups[0].blend_weight, 0.75);
        assert!((result.score("x").unwrap() - 750.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_entity_matches_full_run() {
        let catalog = MetricCatalog::standard();
        let engine = ScoringEngine::new(&catalog, single_axis(ids::AISC_LAST_YEAR, 100.0)).unwrap();
        let dataset = aisc_dataset(&[Some(700.0), None, Some(f64::INFINITY), Some(1_500.0)]);
        let run = engine.score(&dataset);
        for result in &run.results {
            assert_eq!(&engine.score_entity(&dataset, result.entity_id).unwrap(), result);
        }
        match engine.score_entity(&dataset, 99) {
            Err(ScoreError::Validation(msg)) => assert!(msg.contains("entity 99"), "{msg}"),
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_dataset() {
        let catalog = MetricCatalog::standard();
        let engine = ScoringEngine::new(&catalog, single_axis(ids::CASH, 1.0)).unwrap();
        let run = engine.score(&Dataset::default());
        assert!(run.is_empty());
        assert_eq!(run.fingerprint.len(), 16);
    }

    #[test]
    fn test_agreed() {
        assert_eq!(agreed([Some(1.0), Some(1.0)].into_iter()), Some(1.0));
        assert_eq!(agreed([Some(1.0), Some(2.0)].into_iter()), None);
        assert_eq!(agreed([Some(1.0), None].into_iter()), None);
        assert_eq!(agreed(std::iter::empty()), None);
    }
}
