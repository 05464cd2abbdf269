//! Entity records.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::raw::{metric_map, RawValue};

/// Operating status of a company, used for status-cohort peer groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyStatus {
    Producer,
    Developer,
    Explorer,
    Royalty,
    #[serde(other)]
    Other,
}

impl CompanyStatus {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Producer => "producer",
            Self::Developer => "developer",
            Self::Explorer => "explorer",
            Self::Royalty => "royalty",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One company in the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable identifier; lower ids win deterministic tie-breaks
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CompanyStatus>,
    /// Raw metric values keyed by metric identifier
    #[serde(default, with = "metric_map")]
    pub metrics: IndexMap<String, Option<f64>>,
}

impl Entity {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ticker: None,
            status: None,
            metrics: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: CompanyStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set a raw metric value (non-finite values are kept as sentinels).
    #[must_use]
    pub fn with_metric(mut self, metric_id: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(metric_id.into(), Some(value));
        self
    }

    /// Record an explicit null for a metric.
    #[must_use]
    pub fn with_null(mut self, metric_id: impl Into<String>) -> Self {
        self.metrics.insert(metric_id.into(), None);
        self
    }

    /// Classified raw value for a metric
    #[must_use]
    pub fn raw(&self, metric_id: &str) -> RawValue {
        RawValue::from_option(self.metrics.get(metric_id).copied().flatten())
    }

    /// Finite value for a metric, if any
    #[must_use]
    pub fn value(&self, metric_id: &str) -> Option<f64> {
        self.raw(metric_id).finite()
    }
}
