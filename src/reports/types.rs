//! Report type definitions.

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Aligned table for the terminal
    #[default]
    Summary,
    /// Structured JSON output
    Json,
    /// CSV for spreadsheet import
    Csv,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Summary => write!(f, "summary"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Configuration for report generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include per-metric traces (JSON only)
    pub include_traces: bool,
    /// Order rows by rank on this axis instead of dataset order
    pub rank_by: Option<String>,
    /// Flag entities whose lowest axis confidence is below this value
    pub min_confidence: Option<f64>,
    /// Title for the report
    pub title: Option<String>,
    /// Additional metadata to include
    pub metadata: ReportMetadata,
}

impl ReportConfig {
    #[must_use]
    pub fn with_traces(mut self, include: bool) -> Self {
        self.include_traces = include;
        self
    }

    #[must_use]
    pub fn rank_by(mut self, axis: impl Into<String>) -> Self {
        self.rank_by = Some(axis.into());
        self
    }

    #[must_use]
    pub fn min_confidence(mut self, threshold: Option<f64>) -> Self {
        self.min_confidence = threshold;
        self
    }

    /// Whether `confidence` falls below the configured threshold.
    /// Unscored axes (`None`) count as below.
    #[must_use]
    pub fn is_low_confidence(&self, confidence: Option<f64>) -> bool {
        self.min_confidence
            .is_some_and(|threshold| confidence.map_or(true, |c| c < threshold))
    }
}

/// Metadata about the report inputs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path of the scored dataset
    pub dataset_path: Option<String>,
    /// Config file the run was configured from
    pub config_path: Option<String>,
    /// Tier the axes were restricted to
    pub tier: Option<String>,
    /// Metrics dropped by tier gating, as `axis/metric`
    pub dropped_metrics: Vec<String>,
}
