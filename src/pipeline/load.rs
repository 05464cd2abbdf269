//! Dataset loading.

use super::PipelineError;
use crate::error::{ErrorContext, ScoreError};
use crate::model::Dataset;
use std::path::Path;

/// Read and parse a dataset snapshot, with the path in every error.
pub fn load_dataset(path: &Path, quiet: bool) -> Result<Dataset, PipelineError> {
    if !quiet {
        tracing::info!("Loading dataset: {}", path.display());
    }
    let load_failed = |source: ScoreError| PipelineError::LoadFailed {
        path: path.display().to_string(),
        source,
    };

    let content = std::fs::read_to_string(path).map_err(|e| load_failed(ScoreError::io(path, e)))?;
    let dataset = Dataset::from_json_str(&content)
        .context("parsing dataset JSON")
        .map_err(load_failed)?;

    if !quiet {
        tracing::info!("Loaded {} entities", dataset.len());
    }
    Ok(dataset)
}
