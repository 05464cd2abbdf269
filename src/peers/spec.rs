//! Peer-group specifications.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalog::ids;
use crate::config::DEFAULT_PRODUCTION_THRESHOLDS;

/// One size measure contributing to the blended size of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SizeMeasure {
    /// Metric identifier holding the measure
    pub metric: String,
    /// Relative weight within the blend
    #[serde(default = "default_measure_weight")]
    pub weight: f64,
}

impl SizeMeasure {
    pub fn new(metric: impl Into<String>, weight: f64) -> Self {
        Self {
            metric: metric.into(),
            weight,
        }
    }
}

const fn default_measure_weight() -> f64 {
    1.0
}

/// Market cap and enterprise value, equally weighted.
#[must_use]
pub fn default_size_measures() -> Vec<SizeMeasure> {
    vec![
        SizeMeasure::new(ids::MARKET_CAP, 0.5),
        SizeMeasure::new(ids::ENTERPRISE_VALUE, 0.5),
    ]
}

/// How the comparison group is chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum PeerGroupStrategy {
    /// All entities sharing the subject's status
    StatusCohort,
    /// The `n` entities whose log-scaled size is closest to the subject's
    NearestBySize {
        n: usize,
        #[serde(default = "default_size_measures")]
        measures: Vec<SizeMeasure>,
    },
    /// Entities in the same bucket of a production/resource measure.
    ///
    /// `thresholds` are ascending; a value's bucket is the number of
    /// thresholds it is greater than or equal to.
    ScaleBucket { measure: String, thresholds: Vec<f64> },
}

impl PeerGroupStrategy {
    /// Nearest-by-size with the default size blend
    #[must_use]
    pub fn nearest_by_size(n: usize) -> Self {
        Self::NearestBySize {
            n,
            measures: default_size_measures(),
        }
    }

    /// Scale buckets on current gold-equivalent production (koz/yr)
    #[must_use]
    pub fn production_buckets() -> Self {
        Self::ScaleBucket {
            measure: ids::CURRENT_PRODUCTION.to_string(),
            thresholds: DEFAULT_PRODUCTION_THRESHOLDS.to_vec(),
        }
    }

    /// Short label used in traces and reports
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::StatusCohort => "status_cohort".to_string(),
            Self::NearestBySize { n, .. } => format!("nearest_by_size({n})"),
            Self::ScaleBucket { measure, .. } => format!("scale_bucket({measure})"),
        }
    }

    /// Metric identifiers the strategy reads for classification
    #[must_use]
    pub fn referenced_metrics(&self) -> Vec<&str> {
        match self {
            Self::StatusCohort => Vec::new(),
            Self::NearestBySize { measures, .. } => {
                measures.iter().map(|m| m.metric.as_str()).collect()
            }
            Self::ScaleBucket { measure, .. } => vec![measure.as_str()],
        }
    }
}

/// Strategy plus parameters, resolved per entity into a [`super::PeerSet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PeerGroupSpec {
    #[serde(flatten)]
    pub strategy: PeerGroupStrategy,
    /// Whether the subject is part of its own comparison set
    #[serde(default = "default_include_self")]
    pub include_self: bool,
}

const fn default_include_self() -> bool {
    true
}

impl PeerGroupSpec {
    #[must_use]
    pub const fn new(strategy: PeerGroupStrategy) -> Self {
        Self {
            strategy,
            include_self: true,
        }
    }

    #[must_use]
    pub const fn excluding_self(mut self) -> Self {
        self.include_self = false;
        self
    }

    #[must_use]
    pub fn label(&self) -> String {
        if self.include_self {
            self.strategy.label()
        } else {
            format!("{} excl. self", self.strategy.label())
        }
    }
}

impl Default for PeerGroupSpec {
    fn default() -> Self {
        Self::new(PeerGroupStrategy::StatusCohort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(PeerGroupStrategy::StatusCohort.label(), "status_cohort");
        assert_eq!(
            PeerGroupStrategy::nearest_by_size(10).label(),
            "nearest_by_size(10)"
        );
        assert_eq!(
            PeerGroupSpec::new(PeerGroupStrategy::StatusCohort)
                .excluding_self()
                .label(),
            "status_cohort excl. self"
        );
    }

    #[test]
    fn test_yaml_shape() {
        let spec: PeerGroupSpec = serde_yaml::from_str("strategy: nearest_by_size\nn: 5\n").unwrap();
        assert!(spec.include_self);
        match spec.strategy {
            PeerGroupStrategy::NearestBySize { n, measures } => {
                assert_eq!(n, 5);
                assert_eq!(measures, default_size_measures());
            }
            other => panic!("unexpected strategy {other:?}"),
        }

        let spec: PeerGroupSpec = serde_yaml::from_str(
            "strategy: scale_bucket\nmeasure: production.current_production_total_aueq_koz\nthresholds: [1, 100]\ninclude_self: false\n",
        )
        .unwrap();
        assert!(!spec.include_self);
        assert_eq!(
            spec.strategy.referenced_metrics(),
            vec!["production.current_production_total_aueq_koz"]
        );
    }
}
