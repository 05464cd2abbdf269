//! Explain command handler.
//!
//! Implements the `explain` subcommand: score one entity against the full
//! dataset and print its trace table.

use super::{load_config, ScoringOptions};
use crate::catalog::MetricCatalog;
use crate::pipeline::{exit_codes, load_dataset, prepare_scoring, write_output, OutputTarget};
use crate::scoring::explain;
use anyhow::{Context, Result};

/// Run the explain command, returning the desired exit code.
pub fn run_explain(options: &ScoringOptions, entity_id: u64) -> Result<i32> {
    let (config, _) = load_config(options)?;
    let catalog = MetricCatalog::standard();
    let dataset = load_dataset(&options.dataset, options.quiet)?;

    let prepared = prepare_scoring(&config, &catalog, &dataset, options.ranges_from_dataset)?;
    let result = prepared
        .engine
        .score_entity(&dataset, entity_id)
        .with_context(|| format!("explaining entity {entity_id}"))?;

    let mut text = explain(&result);
    if !prepared.dropped_metrics.is_empty() {
        text.push_str(&format!(
            "\nNot available at tier {}: {}\n",
            config.tier,
            prepared.dropped_metrics.join(", ")
        ));
    }

    let target = OutputTarget::from_option(config.output.file.clone());
    write_output(&text, &target, options.quiet)?;
    Ok(exit_codes::SUCCESS)
}
