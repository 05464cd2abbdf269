//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand.

mod catalog;
mod explain;
mod score;

pub use catalog::run_catalog;
pub use explain::run_explain;
pub use score::run_score;

use crate::config::{AppConfig, ConfigError, ConfigOverrides, Validatable};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Inputs shared by every command that scores a dataset.
#[derive(Debug, Clone, Default)]
pub struct ScoringOptions {
    /// Dataset JSON file
    pub dataset: PathBuf,
    /// Explicit config file (otherwise discovered)
    pub config_path: Option<PathBuf>,
    /// Command-line overrides applied on top of the file
    pub overrides: ConfigOverrides,
    /// Fill missing global ranges from the dataset itself
    pub ranges_from_dataset: bool,
    /// Suppress non-essential output
    pub quiet: bool,
}

impl ScoringOptions {
    #[must_use]
    pub fn new(dataset: impl Into<PathBuf>) -> Self {
        Self {
            dataset: dataset.into(),
            ..Self::default()
        }
    }
}

/// Load the effective configuration and reject invalid output settings.
fn load_config(options: &ScoringOptions) -> Result<(AppConfig, Option<PathBuf>)> {
    let (config, loaded_from) =
        AppConfig::from_file_with_overrides(options.config_path.as_deref(), &options.overrides)
            .context("failed to load configuration")?;
    if let Some(path) = &loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }
    let errors = config.output.validate();
    if !errors.is_empty() {
        bail!("invalid output configuration: {}", join_errors(&errors));
    }
    Ok((config, loaded_from))
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn path_for_display(path: Option<&PathBuf>) -> Option<&Path> {
    path.map(PathBuf::as_path)
}
