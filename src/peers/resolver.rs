//! Peer-set resolution for one strategy over one dataset snapshot.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::spec::{PeerGroupSpec, PeerGroupStrategy, SizeMeasure};
use crate::model::{CompanyStatus, Dataset, Entity};

/// Comparison group for one subject entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerSet {
    /// Dataset indices of the members, ascending
    pub members: Vec<usize>,
    /// Whether the subject itself is among `members`
    pub includes_subject: bool,
    /// Whether the full dataset was used because the subject lacked the
    /// classification attribute
    pub fallback: bool,
    pub notes: Vec<String>,
}

impl PeerSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members other than the subject
    pub fn others(&self, subject: usize) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().copied().filter(move |&i| i != subject)
    }
}

/// Per-entity classification value precomputed for a strategy.
#[derive(Debug, Clone)]
enum Classification {
    Status(Vec<Option<CompanyStatus>>),
    Size(Vec<Option<f64>>),
    Bucket(Vec<Option<usize>>),
}

/// Resolves peer sets for a single [`PeerGroupSpec`].
///
/// Classification values (status, log size, bucket) are computed once at
/// construction; [`resolve`](Self::resolve) is then a pure function of the
/// subject index and safe to call from many threads.
#[derive(Debug, Clone)]
pub struct PeerGroupResolver<'a> {
    dataset: &'a Dataset,
    spec: &'a PeerGroupSpec,
    classification: Classification,
}

impl<'a> PeerGroupResolver<'a> {
    #[must_use]
    pub fn new(dataset: &'a Dataset, spec: &'a PeerGroupSpec) -> Self {
        let classification = match &spec.strategy {
            PeerGroupStrategy::StatusCohort => {
                Classification::Status(dataset.iter().map(|e| e.status).collect())
            }
            PeerGroupStrategy::NearestBySize { measures, .. } => Classification::Size(
                dataset.iter().map(|e| blended_log_size(e, measures)).collect(),
            ),
            PeerGroupStrategy::ScaleBucket {
                measure,
                thresholds,
            } => Classification::Bucket(
                dataset
                    .iter()
                    .map(|e| e.value(measure).map(|v| bucket_index(v, thresholds)))
                    .collect(),
            ),
        };

        Self {
            dataset,
            spec,
            classification,
        }
    }

    /// Resolve the peer set of the entity at `subject`.
    #[must_use]
    pub fn resolve(&self, subject: usize) -> PeerSet {
        let others = match &self.classification {
            Classification::Status(statuses) => statuses
                .get(subject)
                .copied()
                .flatten()
                .map(|status| same_class(statuses, subject, &Some(status))),
            Classification::Bucket(buckets) => buckets
                .get(subject)
                .copied()
                .flatten()
                .map(|bucket| same_class(buckets, subject, &Some(bucket))),
            Classification::Size(sizes) => sizes
                .get(subject)
                .copied()
                .flatten()
                .map(|size| self.nearest(sizes, subject, size)),
        };

        let mut notes = Vec::new();
        let (mut members, fallback) = match others {
            Some(others) => (others, false),
            None => {
                notes.push(format!(
                    "no classification value for {}; compared against full dataset",
                    self.spec.strategy.label()
                ));
                let all = (0..self.dataset.len()).filter(|&i| i != subject).collect();
                (all, true)
            }
        };

        if self.spec.include_self {
            members.push(subject);
            members.sort_unstable();
        }

        if members.is_empty() {
            notes.push("peer set empty; own value used as is".to_string());
        }

        PeerSet {
            members,
            includes_subject: self.spec.include_self,
            fallback,
            notes,
        }
    }

    /// The `n` closest entities by log size, excluding the subject.
    ///
    /// Ties in distance go to the lower entity id.
    fn nearest(&self, sizes: &[Option<f64>], subject: usize, size: f64) -> Vec<usize> {
        let n = match &self.spec.strategy {
            PeerGroupStrategy::NearestBySize { n, .. } => *n,
            _ => 0,
        };
        let entities = self.dataset.entities();

        let mut candidates: Vec<(f64, u64, usize)> = sizes
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != subject)
            .filter_map(|(i, s)| s.map(|s| ((s - size).abs(), entities[i].id, i)))
            .collect();

        let by_distance = |a: &(f64, u64, usize), b: &(f64, u64, usize)| -> Ordering {
            a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1))
        };

        if candidates.len() > n {
            if n == 0 {
                candidates.clear();
            } else {
                candidates.select_nth_unstable_by(n - 1, by_distance);
                candidates.truncate(n);
            }
        }

        let mut members: Vec<usize> = candidates.into_iter().map(|(_, _, i)| i).collect();
        members.sort_unstable();
        members
    }
}

/// Indices (other than the subject) whose class equals `class`.
fn same_class<T: PartialEq>(classes: &[Option<T>], subject: usize, class: &Option<T>) -> Vec<usize> {
    classes
        .iter()
        .enumerate()
        .filter(|&(i, c)| i != subject && c == class)
        .map(|(i, _)| i)
        .collect()
}

/// Weighted mean of `ln(1 + max(v, 0))` over the measures the entity has.
///
/// Weights renormalize over available measures; `None` when no measure is
/// available or all available weights are zero.
pub(crate) fn blended_log_size(entity: &Entity, measures: &[SizeMeasure]) -> Option<f64> {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for measure in measures {
        if measure.weight <= 0.0 {
            continue;
        }
        if let Some(v) = entity.value(&measure.metric) {
            weighted += measure.weight * v.max(0.0).ln_1p();
            total_weight += measure.weight;
        }
    }
    (total_weight > 0.0).then(|| weighted / total_weight)
}

/// Number of thresholds at or below `value`.
pub(crate) fn bucket_index(value: f64, thresholds: &[f64]) -> usize {
    thresholds.iter().take_while(|&&t| value >= t).count()
}
