//! Report generation for scoring runs.
//!
//! This module provides multiple output formats for a [`ScoringRun`]:
//! - Summary: aligned terminal table of axis scores and confidences
//! - JSON: structured data, optionally with per-metric traces
//! - CSV: one row per entity for spreadsheet import

mod csv;
mod json;
mod summary;
mod types;

pub use csv::CsvReporter;
pub use json::JsonReporter;
pub use summary::SummaryReporter;
pub use types::{ReportConfig, ReportFormat, ReportMetadata};

use crate::scoring::{rank, ScoreResult, ScoringRun};
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report from a scoring run
    fn generate_run_report(
        &self,
        run: &ScoringRun,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Write report to a writer
    fn write_run_report(
        &self,
        run: &ScoringRun,
        config: &ReportConfig,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let report = self.generate_run_report(run, config)?;
        writer.write_all(report.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    create_reporter_with_options(format, true)
}

/// Create a report generator with color control
#[must_use]
pub fn create_reporter_with_options(
    format: ReportFormat,
    use_color: bool,
) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Summary => {
            if use_color {
                Box::new(SummaryReporter::new())
            } else {
                Box::new(SummaryReporter::new().no_color())
            }
        }
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Csv => Box::new(CsvReporter::new()),
    }
}

/// Results in report order: by rank on `config.rank_by`, else dataset order.
pub(crate) fn ordered_results<'a>(
    run: &'a ScoringRun,
    config: &ReportConfig,
) -> Result<Vec<(Option<usize>, &'a ScoreResult)>, ReportError> {
    match &config.rank_by {
        Some(axis) => {
            let ranked = rank(run, axis).map_err(|e| ReportError::ConfigError(e.to_string()))?;
            Ok(ranked
                .iter()
                .filter_map(|row| run.get(row.entity_id).map(|r| (row.rank, r)))
                .collect())
        }
        None => Ok(run.results.iter().map(|r| (None, r)).collect()),
    }
}
