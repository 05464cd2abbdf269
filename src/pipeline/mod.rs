//! Pipeline orchestration for scoring runs.
//!
//! This module provides the shared load → prepare → score → report workflow
//! used by the CLI command handlers.

mod load;
mod output;
mod report_stage;
mod score_stage;

pub use load::load_dataset;
pub use output::{should_use_color, write_output, OutputTarget};
pub use report_stage::{output_report, report_config_for};
pub use score_stage::{prepare_scoring, PreparedScoring};

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to read or parse a dataset file
    #[error("Loading failed for {path}: {source}")]
    LoadFailed {
        path: String,
        #[source]
        source: crate::error::ScoreError,
    },

    /// Configuration could not be turned into an engine
    #[error("Scoring setup failed: {source}")]
    SetupFailed {
        #[source]
        source: crate::error::ScoreError,
    },

    /// Report generation or output failed
    #[error("Report failed: {source}")]
    ReportFailed {
        #[source]
        source: anyhow::Error,
    },
}

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success - every entity met the confidence threshold (or none was set)
    pub const SUCCESS: i32 = 0;
    /// At least one entity scored below `--min-confidence`
    pub const BELOW_CONFIDENCE: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}
