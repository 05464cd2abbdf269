//! Composite metric scoring.
//!
//! For every entity and every configured axis metric the engine:
//!
//! 1. looks up the entity's peer set in each configured peer group,
//! 2. imputes the raw value when it is missing or non-finite ([`Imputer`]),
//! 3. normalizes it to a directional 0–1 score against the peers
//!    ([`Normalizer`]), blending across peer groups,
//! 4. aggregates the weighted metric scores into a 0–1000 axis score and a
//!    confidence ([`aggregator::aggregate`]),
//!
//! while [`ScoreDebugger`] records a [`MetricTrace`] of each step.
//!
//! Scoring is a pure function of dataset and configuration: equal inputs
//! produce bit-identical [`ScoringRun`]s.

pub mod aggregator;
mod debug;
mod engine;
mod imputer;
mod normalizer;
mod ranking;
mod result;
pub mod stats;

pub use aggregator::{AxisOutcome, AXIS_SCALE};
pub use debug::{explain, MetricTrace, PeerGroupTrace, ScoreDebugger};
pub use engine::ScoringEngine;
pub use imputer::{Imputation, ImputationMode, ImputedValue, Imputer};
pub use normalizer::{
    GlobalRanges, MetricRange, NormalizationMode, Normalized, Normalizer, PeerPopulation,
    ZScoreParams, NEUTRAL,
};
pub use ranking::{rank, RankedEntity};
pub use result::{ScoreResult, ScoringRun};
pub use stats::StdDevKind;
