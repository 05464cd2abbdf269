//! Per-run peer-set cache.

use rayon::prelude::*;

use super::resolver::{PeerGroupResolver, PeerSet};
use super::spec::PeerGroupSpec;
use crate::model::Dataset;

/// Peer sets for every entity of a dataset under one [`PeerGroupSpec`].
///
/// Built eagerly, in parallel, before scoring starts; afterwards it is only
/// read. Valid for the dataset snapshot it was built from and nothing else.
#[derive(Debug, Clone)]
pub struct PeerCache {
    spec: PeerGroupSpec,
    sets: Vec<PeerSet>,
}

impl PeerCache {
    /// Resolve peer sets for every entity in `dataset`.
    #[must_use]
    pub fn build(dataset: &Dataset, spec: &PeerGroupSpec) -> Self {
        let resolver = PeerGroupResolver::new(dataset, spec);
        let sets: Vec<PeerSet> = (0..dataset.len())
            .into_par_iter()
            .map(|subject| resolver.resolve(subject))
            .collect();

        let fallbacks = sets.iter().filter(|s| s.fallback).count();
        tracing::debug!(
            strategy = %spec.label(),
            entities = sets.len(),
            fallbacks,
            "peer cache built"
        );

        Self {
            spec: spec.clone(),
            sets,
        }
    }

    /// Peer set of the entity at dataset index `subject`
    #[must_use]
    pub fn get(&self, subject: usize) -> Option<&PeerSet> {
        self.sets.get(subject)
    }

    #[must_use]
    pub const fn spec(&self) -> &PeerGroupSpec {
        &self.spec
    }

    /// Number of subjects compared against the full dataset
    #[must_use]
    pub fn fallback_count(&self) -> usize {
        self.sets.iter().filter(|s| s.fallback).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
