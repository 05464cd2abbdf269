//! Catalog lookup structure.

use indexmap::IndexMap;

use super::definition::{MetricCategory, MetricDefinition, Tier};
use crate::error::{Result, ScoreError};

/// Read-only registry of metric definitions.
///
/// Lookups are O(1) by identifier; iteration follows registration order.
/// After construction the catalog is never mutated, so a shared reference
/// can be read from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct MetricCatalog {
    pub(super) definitions: IndexMap<String, MetricDefinition>,
}

impl MetricCatalog {
    /// Build a catalog from definitions, rejecting duplicate identifiers.
    pub fn from_definitions(definitions: impl IntoIterator<Item = MetricDefinition>) -> Result<Self> {
        let mut map = IndexMap::new();
        for def in definitions {
            if map.contains_key(&def.id) {
                return Err(ScoreError::config(format!(
                    "duplicate metric definition '{}'",
                    def.id
                )));
            }
            map.insert(def.id.clone(), def);
        }
        Ok(Self { definitions: map })
    }

    /// Look up a metric, failing fast on unknown identifiers.
    pub fn get(&self, metric_id: &str) -> Result<&MetricDefinition> {
        self.definitions
            .get(metric_id)
            .ok_or_else(|| ScoreError::unknown_metric(metric_id))
    }

    #[must_use]
    pub fn contains(&self, metric_id: &str) -> bool {
        self.definitions.contains_key(metric_id)
    }

    /// Metrics whose minimum tier is at or below `tier`, in registry order.
    #[must_use]
    pub fn accessible_to(&self, tier: Tier) -> Vec<&MetricDefinition> {
        self.definitions
            .values()
            .filter(|def| def.accessible_to(tier))
            .collect()
    }

    #[must_use]
    pub fn by_category(&self, category: MetricCategory) -> Vec<&MetricDefinition> {
        self.definitions
            .values()
            .filter(|def| def.category == category)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricDefinition> {
        self.definitions.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
