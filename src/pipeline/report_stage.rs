//! Report output stage.

use crate::config::AppConfig;
use crate::reports::{create_reporter_with_options, ReportConfig, ReportMetadata};
use crate::scoring::ScoringRun;
use anyhow::Result;
use std::path::Path;

use super::{should_use_color, write_output, OutputTarget, PipelineError};

/// Build the report configuration for a run from the app config.
#[must_use]
pub fn report_config_for(
    config: &AppConfig,
    dataset_path: &Path,
    config_path: Option<&Path>,
    dropped_metrics: Vec<String>,
) -> ReportConfig {
    ReportConfig {
        include_traces: config.output.include_traces,
        min_confidence: config.output.min_confidence,
        metadata: ReportMetadata {
            dataset_path: Some(dataset_path.display().to_string()),
            config_path: config_path.map(|p| p.display().to_string()),
            tier: Some(config.tier.to_string()),
            dropped_metrics,
        },
        ..ReportConfig::default()
    }
}

/// Render `run` in the configured format and write it to the configured
/// destination.
pub fn output_report(
    config: &AppConfig,
    run: &ScoringRun,
    report_config: &ReportConfig,
    no_color: bool,
    quiet: bool,
) -> Result<()> {
    let target = OutputTarget::from_option(config.output.file.clone());
    let reporter =
        create_reporter_with_options(config.output.format, should_use_color(no_color, &target));
    let report = reporter
        .generate_run_report(run, report_config)
        .map_err(|e| PipelineError::ReportFailed { source: e.into() })?;

    write_output(&report, &target, quiet)
}
