//! Property-based tests for the scoring engine.
//!
//! Random datasets with missing, non-finite and near-`f64::MAX` values,
//! scored under every normalization and imputation mode, must respect the
//! score bounds and be deterministic.

use composite_scorer::catalog::{MetricCategory, MetricDefinition, MetricUnit, Tier};
use composite_scorer::config::{AxisConfig, ScoringConfig};
use composite_scorer::model::{CompanyStatus, Dataset, Entity};
use composite_scorer::peers::{PeerGroupSpec, PeerGroupStrategy};
use composite_scorer::scoring::{GlobalRanges, ImputationMode, NormalizationMode};
use composite_scorer::{MetricCatalog, ScoringEngine};
use proptest::prelude::*;

const A: &str = "prop.a";
const B: &str = "prop.b";
const IDLE: &str = "prop.idle";
const BOUND: f64 = 1e6;

fn catalog() -> MetricCatalog {
    MetricCatalog::from_definitions([
        MetricDefinition::new(A, "A", MetricCategory::Financials, MetricUnit::Ratio, true, Tier::Free),
        MetricDefinition::new(B, "B", MetricCategory::Costs, MetricUnit::Ratio, false, Tier::Free),
        MetricDefinition::new(IDLE, "Idle", MetricCategory::Financials, MetricUnit::Ratio, true, Tier::Free),
    ])
    .unwrap()
}

fn raw_value() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        6 => (-BOUND..BOUND).prop_map(Some),
        1 => prop_oneof![Just(f64::MAX), Just(-f64::MAX), Just(1e308), Just(-1e308)].prop_map(Some),
        1 => Just(None),
        1 => Just(Some(f64::NAN)),
        1 => Just(Some(f64::INFINITY)),
        1 => Just(Some(f64::NEG_INFINITY)),
    ]
}

fn status() -> impl Strategy<Value = Option<CompanyStatus>> {
    prop_oneof![
        Just(Some(CompanyStatus::Producer)),
        Just(Some(CompanyStatus::Explorer)),
        Just(None),
    ]
}

fn normalization() -> impl Strategy<Value = NormalizationMode> {
    prop_oneof![
        Just(NormalizationMode::GlobalMinMax),
        Just(NormalizationMode::DatasetMinMax),
        Just(NormalizationMode::DatasetRankPercentile),
        Just(NormalizationMode::DatasetZScore),
    ]
}

fn imputation() -> impl Strategy<Value = ImputationMode> {
    prop_oneof![
        Just(ImputationMode::ZeroWorst),
        Just(ImputationMode::DatasetMean),
        Just(ImputationMode::DatasetMedian),
        Just(ImputationMode::Exclude),
    ]
}

fn with_value(entity: Entity, metric: &str, value: Option<f64>) -> Entity {
    match value {
        Some(v) => entity.with_metric(metric, v),
        None => entity.with_null(metric),
    }
}

fn dataset_strategy() -> impl Strategy<Value = Dataset> {
    prop::collection::vec((status(), raw_value(), raw_value()), 0..24).prop_map(|rows| {
        let entities = rows
            .into_iter()
            .enumerate()
            .map(|(i, (status, a, b))| {
                let mut entity = Entity::new(i as u64 + 1, format!("E{i}"));
                entity.status = status;
                with_value(with_value(entity, A, a), B, b)
            })
            .collect();
        Dataset::new(entities).unwrap()
    })
}

fn config(
    normalization: NormalizationMode,
    imputation: ImputationMode,
    axis: AxisConfig,
) -> ScoringConfig {
    ScoringConfig::builder()
        .axis("x", axis)
        .normalization(normalization)
        .imputation(imputation)
        .peers(PeerGroupSpec::new(PeerGroupStrategy::StatusCohort))
        .global_ranges(
            GlobalRanges::new()
                .with_range(A, -BOUND, BOUND)
                .with_range(B, -BOUND, BOUND)
                .with_range(IDLE, -BOUND, BOUND),
        )
        .build()
}

fn two_metric_axis(wa: f64, wb: f64) -> AxisConfig {
    AxisConfig::new().metric(A, wa).metric(B, wb)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn scores_stay_in_bounds(
        dataset in dataset_strategy(),
        normalization in normalization(),
        imputation in imputation(),
        wa in 0.0..=100.0f64,
        wb in 0.0..=100.0f64,
    ) {
        let catalog = catalog();
        let engine = ScoringEngine::new(
            &catalog,
            config(normalization, imputation, two_metric_axis(wa, wb)),
        ).unwrap();
        let run = engine.score(&dataset);
        prop_assert_eq!(run.len(), dataset.len());

        for result in &run.results {
            match (result.score("x"), result.confidence("x")) {
                (Some(score), Some(confidence)) => {
                    prop_assert!((0.0..=1000.0).contains(&score), "score {}", score);
                    prop_assert!((0.0..=1.0).contains(&confidence), "confidence {}", confidence);
                }
                (None, None) => {}
                other => prop_assert!(false, "score and confidence disagree: {:?}", other),
            }
            for trace in &result.traces {
                if let Some(n) = trace.normalized_value {
                    prop_assert!((0.0..=1.0).contains(&n), "normalized {}", n);
                }
                prop_assert!(trace.weight_applied == 0.0 || trace.weight_applied == trace.weight_configured);
            }
        }
    }

    #[test]
    fn scoring_is_deterministic(
        dataset in dataset_strategy(),
        normalization in normalization(),
        imputation in imputation(),
    ) {
        let catalog = catalog();
        let engine = ScoringEngine::new(
            &catalog,
            config(normalization, imputation, two_metric_axis(50.0, 50.0)),
        ).unwrap();
        let first = engine.score(&dataset);
        let second = engine.score(&dataset);
        prop_assert_eq!(&first.fingerprint, &second.fingerprint);
        // NaN raw values compare unequal, so compare the serialized form
        prop_assert_eq!(
            serde_json::to_string(&first.results).unwrap(),
            serde_json::to_string(&second.results).unwrap()
        );
    }

    #[test]
    fn better_values_never_score_lower(
        values in prop::collection::vec(-BOUND..BOUND, 2..16),
        normalization in normalization(),
    ) {
        let catalog = catalog();
        let dataset = Dataset::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    Entity::new(i as u64 + 1, format!("E{i}"))
                        .with_status(CompanyStatus::Producer)
                        .with_metric(A, *v)
                        .with_metric(B, *v)
                })
                .collect(),
        ).unwrap();

        for (metric, higher_is_better) in [(A, true), (B, false)] {
            let engine = ScoringEngine::new(
                &catalog,
                config(normalization, ImputationMode::ZeroWorst, AxisConfig::new().metric(metric, 100.0)),
            ).unwrap();
            let run = engine.score(&dataset);
            for (i, x) in values.iter().enumerate() {
                for (j, y) in values.iter().enumerate() {
                    let better = if higher_is_better { x > y } else { x < y };
                    if better {
                        let sx = run.results[i].score("x").unwrap();
                        let sy = run.results[j].score("x").unwrap();
                        prop_assert!(sx >= sy, "{} {} -> {} vs {} -> {}", metric, x, sx, y, sy);
                    }
                }
            }
        }
    }

    #[test]
    fn constant_population_is_neutral(
        value in -BOUND..BOUND,
        count in 1usize..12,
        normalization in prop_oneof![
            Just(NormalizationMode::DatasetMinMax),
            Just(NormalizationMode::DatasetRankPercentile),
            Just(NormalizationMode::DatasetZScore),
        ],
    ) {
        let catalog = catalog();
        let dataset = Dataset::new(
            (0..count)
                .map(|i| {
                    Entity::new(i as u64 + 1, format!("E{i}"))
                        .with_status(CompanyStatus::Producer)
                        .with_metric(A, value)
                })
                .collect(),
        ).unwrap();
        let engine = ScoringEngine::new(
            &catalog,
            config(normalization, ImputationMode::ZeroWorst, AxisConfig::new().metric(A, 10.0)),
        ).unwrap();
        for result in &engine.score(&dataset).results {
            prop_assert_eq!(result.score("x"), Some(500.0));
            prop_assert_eq!(result.confidence("x"), Some(1.0));
        }
    }

    #[test]
    fn zero_weight_metric_changes_nothing(
        dataset in dataset_strategy(),
        normalization in normalization(),
        imputation in imputation(),
    ) {
        let catalog = catalog();
        let base = ScoringEngine::new(
            &catalog,
            config(normalization, imputation, two_metric_axis(40.0, 60.0)),
        ).unwrap();
        let padded = ScoringEngine::new(
            &catalog,
            config(normalization, imputation, two_metric_axis(40.0, 60.0).metric(IDLE, 0.0)),
        ).unwrap();

        let before = base.score(&dataset);
        let after = padded.score(&dataset);
        for (x, y) in before.results.iter().zip(&after.results) {
            prop_assert_eq!(x.score("x"), y.score("x"));
            prop_assert_eq!(x.confidence("x"), y.confidence("x"));
        }
    }
}
