//! Default configurations and presets for composite-scorer.
//!
//! Provides named presets for common screens and default values.

use super::types::{AppConfig, AxisConfig, BlendedPeerGroup, ScoringConfig};
use crate::catalog::ids;
use crate::peers::{PeerGroupSpec, PeerGroupStrategy};
use crate::scoring::{ImputationMode, NormalizationMode};

// ============================================================================
// Default Values
// ============================================================================

/// Default symmetric z-score clamp
pub const DEFAULT_ZSCORE_CLAMP: f64 = 3.0;

/// Default peer count for nearest-by-size groups
pub const DEFAULT_NEAREST_PEERS: usize = 10;

/// Default current-production bucket thresholds (koz AuEq per year)
pub const DEFAULT_PRODUCTION_THRESHOLDS: [f64; 3] = [1.0, 100.0, 500.0];

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Cheapness of resources, reserves and earnings
    Value,
    /// Cost position, balance sheet and asset quality
    Quality,
    /// Value and quality axes blended over three peer groups
    Balanced,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Quality => "quality",
            Self::Balanced => "balanced",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "value" | "cheap" => Some(Self::Value),
            "quality" => Some(Self::Quality),
            "balanced" | "default" => Some(Self::Balanced),
            _ => None,
        }
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Value => "EV and market cap per ounce, price to book; nearest-by-size peers",
            Self::Quality => "AISC, margins and balance sheet; status cohort peers",
            Self::Balanced => "Value and quality axes blended across three peer groups",
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Value, Self::Quality, Self::Balanced]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

fn value_axis() -> AxisConfig {
    AxisConfig::new()
        .with_label("Value")
        .metric(ids::EV_PER_RESOURCE_OZ, 40.0)
        .metric(ids::EV_PER_RESERVE_OZ, 30.0)
        .metric(ids::PRICE_TO_BOOK, 20.0)
        .metric(ids::EV_TO_EBITDA, 10.0)
}

fn quality_axis() -> AxisConfig {
    AxisConfig::new()
        .with_label("Quality")
        .metric(ids::AISC_LAST_YEAR, 35.0)
        .metric(ids::OPERATING_MARGIN, 20.0)
        .metric(ids::NET_FINANCIAL_ASSETS, 20.0)
        .metric(ids::FREE_CASH_FLOW, 15.0)
        .metric(ids::MEASURED_INDICATED_TOTAL, 10.0)
}

impl ScoringConfig {
    /// Create a `ScoringConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Value => Self::value_preset(),
            ConfigPreset::Quality => Self::quality_preset(),
            ConfigPreset::Balanced => Self::balanced_preset(),
        }
    }

    /// Value screen.
    ///
    /// - Single `value` axis
    /// - Rank percentile against the ten nearest companies by size
    /// - Missing values imputed from the peer median
    #[must_use]
    pub fn value_preset() -> Self {
        Self::builder()
            .axis("value", value_axis())
            .normalization(NormalizationMode::DatasetRankPercentile)
            .imputation(ImputationMode::DatasetMedian)
            .peers(PeerGroupSpec::new(PeerGroupStrategy::nearest_by_size(
                DEFAULT_NEAREST_PEERS,
            )))
            .build()
    }

    /// Quality screen.
    ///
    /// - Single `quality` axis
    /// - Z-scores within the status cohort
    /// - Missing values get the worst score
    #[must_use]
    pub fn quality_preset() -> Self {
        Self::builder()
            .axis("quality", quality_axis())
            .normalization(NormalizationMode::DatasetZScore)
            .imputation(ImputationMode::ZeroWorst)
            .peers(PeerGroupSpec::new(PeerGroupStrategy::StatusCohort))
            .build()
    }

    /// Two-axis screen blended over status, size and scale peers.
    #[must_use]
    pub fn balanced_preset() -> Self {
        Self::builder()
            .axis("value", value_axis())
            .axis("quality", quality_axis())
            .normalization(NormalizationMode::DatasetMinMax)
            .imputation(ImputationMode::ZeroWorst)
            .blend(vec![
                BlendedPeerGroup::new(PeerGroupSpec::new(PeerGroupStrategy::StatusCohort), 0.4),
                BlendedPeerGroup::new(
                    PeerGroupSpec::new(PeerGroupStrategy::nearest_by_size(DEFAULT_NEAREST_PEERS)),
                    0.4,
                ),
                BlendedPeerGroup::new(
                    PeerGroupSpec::new(PeerGroupStrategy::production_buckets()),
                    0.2,
                ),
            ])
            .build()
    }
}

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        Self {
            scoring: ScoringConfig::from_preset(preset),
            ..Self::default()
        }
    }
}
