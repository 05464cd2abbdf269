//! Score command handler.
//!
//! Implements the `score` subcommand: score every entity of a dataset and
//! write a report.

use super::{load_config, path_for_display, ScoringOptions};
use crate::catalog::MetricCatalog;
use crate::pipeline::{
    exit_codes, load_dataset, output_report, prepare_scoring, report_config_for,
};
use anyhow::Result;

/// Run the score command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
pub fn run_score(options: &ScoringOptions, rank_by: Option<String>, no_color: bool) -> Result<i32> {
    let (config, loaded_from) = load_config(options)?;
    let catalog = MetricCatalog::standard();
    let dataset = load_dataset(&options.dataset, options.quiet)?;

    let prepared = prepare_scoring(&config, &catalog, &dataset, options.ranges_from_dataset)?;
    let run = prepared.engine.score(&dataset);

    let mut report_config = report_config_for(
        &config,
        &options.dataset,
        path_for_display(loaded_from.as_ref()),
        prepared.dropped_metrics,
    );
    report_config.rank_by = rank_by;
    output_report(&config, &run, &report_config, no_color, options.quiet)?;

    if let Some(threshold) = config.output.min_confidence {
        let below = run.below_confidence(threshold).count();
        if below > 0 {
            tracing::warn!(
                "{below} of {} entities scored with confidence below {threshold:.2}",
                run.len()
            );
            return Ok(exit_codes::BELOW_CONFIDENCE);
        }
    }

    Ok(exit_codes::SUCCESS)
}
