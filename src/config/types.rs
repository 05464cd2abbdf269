//! Configuration types for scoring runs.
//!
//! Provides structured configuration for axes, normalization, imputation and
//! peer selection, plus the application-level wrapper loaded from files.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalog::{MetricCatalog, Tier};
use crate::error::Result;
use crate::peers::PeerGroupSpec;
use crate::reports::ReportFormat;
use crate::scoring::aggregator::renormalize;
use crate::scoring::{GlobalRanges, ImputationMode, NormalizationMode, ZScoreParams};

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI arguments override file settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Active subscription tier; axes are filtered to metrics it can access
    pub tier: Tier,
    /// Scoring engine configuration
    pub scoring: ScoringConfig,
    /// Output configuration (format, file, traces)
    pub output: OutputConfig,
}

impl AppConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Scoring Configuration
// ============================================================================

/// Everything the engine needs besides the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Composite axes, scored independently, in output order
    pub axes: IndexMap<String, AxisConfig>,
    /// Normalization mode applied to every metric
    pub normalization: NormalizationMode,
    /// Imputation mode for missing or non-finite values
    pub imputation: ImputationMode,
    /// Peer group, or weighted blend of peer groups
    pub peers: PeerSelection,
    /// Z-score parameters (used by `dataset_zscore`)
    pub zscore: ZScoreParams,
    /// Per-metric [min, max] (required by `global_min_max`)
    #[serde(skip_serializing_if = "GlobalRanges::is_empty")]
    pub global_ranges: GlobalRanges,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::balanced_preset()
    }
}

impl ScoringConfig {
    /// Start from an empty configuration (no axes).
    pub fn builder() -> ScoringConfigBuilder {
        ScoringConfigBuilder::default()
    }

    /// Restrict every axis to metrics accessible under `tier`.
    ///
    /// Returns the dropped `(axis, metric)` pairs.
    pub fn restrict_to_tier(
        &mut self,
        catalog: &MetricCatalog,
        tier: Tier,
    ) -> Result<Vec<(String, String)>> {
        let mut dropped = Vec::new();
        for (axis_id, axis) in &mut self.axes {
            let (restricted, removed) = axis.restrict_to_tier(catalog, tier)?;
            *axis = restricted;
            dropped.extend(removed.into_iter().map(|m| (axis_id.clone(), m)));
        }
        Ok(dropped)
    }

    /// Every metric id referenced by the axes, deduplicated, in order
    #[must_use]
    pub fn axis_metrics(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for metric in self.axes.values().flat_map(|a| a.metrics.iter()) {
            if !seen.contains(&metric.metric.as_str()) {
                seen.push(metric.metric.as_str());
            }
        }
        seen
    }
}

/// Builder for constructing `ScoringConfig` with fluent API.
#[derive(Debug)]
#[must_use]
pub struct ScoringConfigBuilder {
    config: ScoringConfig,
}

impl Default for ScoringConfigBuilder {
    fn default() -> Self {
        Self {
            config: ScoringConfig {
                axes: IndexMap::new(),
                normalization: NormalizationMode::default(),
                imputation: ImputationMode::default(),
                peers: PeerSelection::default(),
                zscore: ZScoreParams::default(),
                global_ranges: GlobalRanges::default(),
            },
        }
    }
}

impl ScoringConfigBuilder {
    /// Add (or replace) an axis.
    pub fn axis(mut self, id: impl Into<String>, axis: AxisConfig) -> Self {
        self.config.axes.insert(id.into(), axis);
        self
    }

    pub const fn normalization(mut self, mode: NormalizationMode) -> Self {
        self.config.normalization = mode;
        self
    }

    pub const fn imputation(mut self, mode: ImputationMode) -> Self {
        self.config.imputation = mode;
        self
    }

    /// Use a single peer group.
    pub fn peers(mut self, spec: PeerGroupSpec) -> Self {
        self.config.peers = PeerSelection::Single(spec);
        self
    }

    /// Blend several peer groups.
    pub fn blend(mut self, groups: Vec<BlendedPeerGroup>) -> Self {
        self.config.peers = PeerSelection::Blend { blend: groups };
        self
    }

    pub const fn zscore(mut self, params: ZScoreParams) -> Self {
        self.config.zscore = params;
        self
    }

    pub fn global_ranges(mut self, ranges: GlobalRanges) -> Self {
        self.config.global_ranges = ranges;
        self
    }

    #[must_use]
    pub fn build(self) -> ScoringConfig {
        self.config
    }
}

// ============================================================================
// Axis Configuration
// ============================================================================

/// Metrics and weights of one composite axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AxisConfig {
    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Weighted metrics; weights need not sum to anything
    pub metrics: Vec<AxisMetricConfig>,
}

impl AxisConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add a metric using the catalog's direction.
    #[must_use]
    pub fn metric(mut self, metric: impl Into<String>, weight: f64) -> Self {
        self.metrics.push(AxisMetricConfig::new(metric, weight));
        self
    }

    /// Add a metric with an explicit direction.
    #[must_use]
    pub fn metric_with_direction(
        mut self,
        metric: impl Into<String>,
        weight: f64,
        higher_is_better: bool,
    ) -> Self {
        let mut config = AxisMetricConfig::new(metric, weight);
        config.higher_is_better = Some(higher_is_better);
        self.metrics.push(config);
        self
    }

    /// Keep only metrics whose minimum tier is within `tier`.
    ///
    /// Returns the filtered axis and the ids that were dropped. Unknown
    /// metric ids are an error.
    pub fn restrict_to_tier(&self, catalog: &MetricCatalog, tier: Tier) -> Result<(Self, Vec<String>)> {
        let mut kept = Vec::with_capacity(self.metrics.len());
        let mut dropped = Vec::new();
        for metric in &self.metrics {
            if catalog.get(&metric.metric)?.accessible_to(tier) {
                kept.push(metric.clone());
            } else {
                dropped.push(metric.metric.clone());
            }
        }
        Ok((
            Self {
                label: self.label.clone(),
                metrics: kept,
            },
            dropped,
        ))
    }

    /// Sum of configured weights
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.metrics.iter().map(|m| m.weight).sum()
    }
}

/// One weighted metric of an axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AxisMetricConfig {
    /// Catalog metric identifier
    pub metric: String,
    /// Importance in [0, 100]
    #[schemars(range(min = 0, max = 100))]
    pub weight: f64,
    /// Override of the catalog's direction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub higher_is_better: Option<bool>,
}

impl AxisMetricConfig {
    pub fn new(metric: impl Into<String>, weight: f64) -> Self {
        Self {
            metric: metric.into(),
            weight,
            higher_is_better: None,
        }
    }
}

// ============================================================================
// Peer Selection
// ============================================================================

/// One peer group, or a weighted blend of several.
///
/// ```yaml
/// peers:
///   strategy: nearest_by_size
///   n: 10
/// ```
///
/// ```yaml
/// peers:
///   blend:
///     - strategy: status_cohort
///       weight: 0.5
///     - strategy: nearest_by_size
///       n: 10
///       weight: 0.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum PeerSelection {
    Blend { blend: Vec<BlendedPeerGroup> },
    Single(PeerGroupSpec),
}

impl Default for PeerSelection {
    fn default() -> Self {
        Self::Single(PeerGroupSpec::default())
    }
}

impl PeerSelection {
    /// Peer groups with blend weights renormalized to sum to 1.
    ///
    /// `None` when a blend has no positive weight.
    #[must_use]
    pub fn groups(&self) -> Option<Vec<(&PeerGroupSpec, f64)>> {
        match self {
            Self::Single(spec) => Some(vec![(spec, 1.0)]),
            Self::Blend { blend } => {
                let raw: Vec<f64> = blend.iter().map(|g| g.weight).collect();
                let weights = renormalize(&raw)?;
                Some(
                    blend
                        .iter()
                        .zip(weights)
                        .map(|(g, w)| (&g.spec, w))
                        .collect(),
                )
            }
        }
    }

    /// All specs, in configuration order
    #[must_use]
    pub fn specs(&self) -> Vec<&PeerGroupSpec> {
        match self {
            Self::Single(spec) => vec![spec],
            Self::Blend { blend } => blend.iter().map(|g| &g.spec).collect(),
        }
    }
}

/// A peer group with its master blend weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BlendedPeerGroup {
    #[serde(flatten)]
    pub spec: PeerGroupSpec,
    pub weight: f64,
}

impl BlendedPeerGroup {
    #[must_use]
    pub const fn new(spec: PeerGroupSpec, weight: f64) -> Self {
        Self { spec, weight }
    }
}

// ============================================================================
// Output Configuration
// ============================================================================

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Include per-metric traces in JSON output
    pub include_traces: bool,
    /// Exit non-zero when any entity's confidence falls below this
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0, max = 1))]
    pub min_confidence: Option<f64>,
}
