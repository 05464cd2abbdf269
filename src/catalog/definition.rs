//! Metric definition types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Subscription tier gating which metrics a caller may configure.
///
/// Totally ordered: `Free < Pro < Premium`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Pro,
    Premium,
}

impl Tier {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Premium => "premium",
        }
    }

    /// Parse a tier from its name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "free" => Some(Self::Free),
            "pro" => Some(Self::Pro),
            "premium" => Some(Self::Premium),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown tier '{s}' (expected free, pro, premium)"))
    }
}

/// Grouping of metrics by subject area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum MetricCategory {
    Financials,
    Valuation,
    Reserves,
    Resources,
    Production,
    Costs,
    CapitalStructure,
}

impl MetricCategory {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Financials => "Financials",
            Self::Valuation => "Valuation",
            Self::Reserves => "Reserves",
            Self::Resources => "Resources",
            Self::Production => "Production",
            Self::Costs => "Costs",
            Self::CapitalStructure => "Capital Structure",
        }
    }
}

/// Unit a raw metric value is expressed in.
///
/// Informational only; the engine works on dimensionless normalized numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MetricUnit {
    /// Reporting-currency amount
    Currency,
    /// Currency per gold-equivalent ounce
    CurrencyPerOunce,
    /// Million gold-equivalent ounces
    MillionOunces,
    /// Thousand gold-equivalent ounces
    ThousandOunces,
    /// Plain ratio
    Ratio,
    /// Percentage (0-100)
    Percent,
    Years,
    Count,
}

/// Immutable definition of one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricDefinition {
    /// Stable identifier, e.g. `costs.aisc_last_year`
    pub id: String,
    /// Short human-readable label
    pub label: String,
    pub category: MetricCategory,
    pub unit: MetricUnit,
    /// Default direction; axis configuration may override it
    pub higher_is_better: bool,
    /// Lowest tier allowed to configure this metric
    pub min_tier: Tier,
}

impl MetricDefinition {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        category: MetricCategory,
        unit: MetricUnit,
        higher_is_better: bool,
        min_tier: Tier,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category,
            unit,
            higher_is_better,
            min_tier,
        }
    }

    /// Whether a caller on `tier` may use this metric
    #[must_use]
    pub fn accessible_to(&self, tier: Tier) -> bool {
        self.min_tier <= tier
    }
}
