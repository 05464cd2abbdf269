//! **Peer-relative composite scoring for company screening.**
//!
//! `composite-scorer` turns a snapshot of raw, heterogeneous company metrics
//! (market capitalisation, cost per ounce, resource ounces, ratios) into
//! comparable 0–1000 composite scores along configurable axes such as
//! "value" and "quality". Every metric is judged against a peer group of
//! similar companies, missing data is imputed under an explicit policy, and
//! each score carries a confidence and a full trace of how it was computed.
//!
//! ## Core Concepts & Modules
//!
//! - **[`catalog`]**: The [`MetricCatalog`] of known metrics with their default
//!   direction and the subscription [`Tier`] that unlocks them.
//! - **[`model`]**: The immutable [`Dataset`] snapshot of [`Entity`] records.
//! - **[`peers`]**: Peer group strategies (status cohort, nearest by size,
//!   scale buckets) and their resolution into [`PeerSet`]s.
//! - **[`scoring`]**: Imputation, normalization, aggregation and tracing,
//!   orchestrated by the [`ScoringEngine`].
//! - **[`config`]**: Typed, validated configuration with presets and YAML
//!   file discovery.
//! - **[`reports`]**: Summary table, JSON and CSV renderers for a [`ScoringRun`].
//! - **[`pipeline`]**: Shared load → score → report orchestration for the CLI.
//!
//! ## Getting Started
//!
//! ```
//! use composite_scorer::{
//!     catalog::ids, AxisConfig, Dataset, Entity, MetricCatalog, ScoringConfig, ScoringEngine,
//! };
//!
//! let catalog = MetricCatalog::standard();
//! let config = ScoringConfig::builder()
//!     .axis("cost", AxisConfig::new().metric(ids::AISC_LAST_YEAR, 100.0))
//!     .build();
//! let engine = ScoringEngine::new(&catalog, config)?;
//!
//! let dataset = Dataset::new(vec![
//!     Entity::new(1, "Low Cost Gold").with_metric(ids::AISC_LAST_YEAR, 900.0),
//!     Entity::new(2, "High Cost Gold").with_metric(ids::AISC_LAST_YEAR, 1500.0),
//! ])?;
//!
//! let run = engine.score(&dataset);
//! assert_eq!(run.get(1).and_then(|r| r.score("cost")), Some(1000.0));
//! assert_eq!(run.get(2).and_then(|r| r.score("cost")), Some(0.0));
//! # Ok::<(), composite_scorer::ScoreError>(())
//! ```
//!
//! ## Ranking and Explaining
//!
//! ```no_run
//! use composite_scorer::{explain, rank, ConfigPreset, Dataset, MetricCatalog, ScoringConfig, ScoringEngine};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = MetricCatalog::standard();
//!     let engine = ScoringEngine::new(&catalog, ScoringConfig::from_preset(ConfigPreset::Value))?;
//!     let dataset = Dataset::from_json_str(&std::fs::read_to_string("universe.json")?)?;
//!
//!     let run = engine.score(&dataset);
//!     for row in rank(&run, "value")?.iter().take(10) {
//!         println!("{:?} {} {:?}", row.rank, row.name, row.score);
//!     }
//!     if let Some(top) = run.results.first() {
//!         println!("{}", explain(top));
//!     }
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Cast safety: usize↔f64 casts are pervasive in rank and percentile math
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    // Doc completeness: # Errors / # Panics sections are aspirational
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::fn_params_excessive_bools,
    // Variable names like `min`/`mid` are clear in context
    clippy::similar_names
)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod peers;
pub mod pipeline;
pub mod reports;
pub mod scoring;
pub mod utils;

// Re-export main types for convenience
pub use catalog::{MetricCatalog, MetricCategory, MetricDefinition, MetricUnit, Tier};
pub use config::{
    AppConfig, AxisConfig, AxisMetricConfig, BlendedPeerGroup, ConfigPreset, OutputConfig,
    PeerSelection, ScoringConfig,
};
pub use config::{ConfigError, Validatable};
pub use error::{ErrorContext, OptionContext, Result, ScoreError};
pub use model::{CompanyStatus, Dataset, Entity, RawValue};
pub use peers::{PeerCache, PeerGroupResolver, PeerGroupSpec, PeerGroupStrategy, PeerSet};
pub use reports::{ReportFormat, ReportGenerator};
pub use scoring::{
    explain, rank, GlobalRanges, ImputationMode, MetricTrace, NormalizationMode, RankedEntity,
    ScoreResult, ScoringEngine, ScoringRun, ZScoreParams,
};
