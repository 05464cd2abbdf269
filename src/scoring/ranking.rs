//! Ordering of scored entities along one axis.

use std::cmp::Ordering;

use serde::Serialize;

use super::result::ScoringRun;
use crate::error::{Result, ScoreError};

/// One row of an axis ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntity {
    /// Competition rank (1, 2, 2, 4); `None` for unscored entities
    pub rank: Option<usize>,
    pub entity_id: u64,
    pub name: String,
    pub score: Option<f64>,
    pub confidence: Option<f64>,
}

/// Rank the entities of `run` on `axis`.
///
/// Highest score first, unscored entities last; equal scores share a rank
/// and are listed by ascending entity id.
pub fn rank(run: &ScoringRun, axis: &str) -> Result<Vec<RankedEntity>> {
    if !run.axes.iter().any(|a| a == axis) {
        return Err(ScoreError::config(format!(
            "unknown axis '{axis}' (available: {})",
            run.axes.join(", ")
        )));
    }

    let mut rows: Vec<RankedEntity> = run
        .results
        .iter()
        .map(|r| RankedEntity {
            rank: None,
            entity_id: r.entity_id,
            name: r.name.clone(),
            score: r.score(axis),
            confidence: r.confidence(axis),
        })
        .collect();

    rows.sort_by(|a, b| {
        let by_score = match (a.score, b.score) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_score.then_with(|| a.entity_id.cmp(&b.entity_id))
    });

    let mut previous: Option<f64> = None;
    let mut current = 0;
    for (position, row) in rows.iter_mut().enumerate() {
        if let Some(score) = row.score {
            if previous != Some(score) {
                current = position + 1;
                previous = Some(score);
            }
            row.rank = Some(current);
        }
    }
    Ok(rows)
}
