//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::defaults::ConfigPreset;
use super::types::{AppConfig, ScoringConfig};
use crate::catalog::Tier;
use crate::reports::ReportFormat;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".composite-scorer.yaml",
    ".composite-scorer.yml",
    "composite-scorer.yaml",
    "composite-scorer.yml",
];

/// Directory under the user config dir holding a global config file
const CONFIG_DIR_NAME: &str = "composite-scorer";

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided (returned even when it does not exist)
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/composite-scorer/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    let cwd = std::env::current_dir().ok();
    if let Some(path) = cwd.as_deref().and_then(find_config_in_dir) {
        return Some(path);
    }

    if let Some(path) = find_git_root().and_then(|root| find_config_in_dir(&root)) {
        return Some(path);
    }

    if let Some(path) = user_config_dir().and_then(|dir| find_config_in_dir(&dir)) {
        return Some(path);
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Per-user configuration directory, if the platform has one.
#[must_use]
pub fn user_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load the explicit config file, or fall back to discovery.
///
/// An explicit path must exist and parse; a broken discovered file is
/// skipped with a warning.
pub fn resolve_config(
    explicit_path: Option<&Path>,
) -> Result<(AppConfig, Option<PathBuf>), ConfigFileError> {
    match explicit_path {
        Some(path) => {
            let config = load_config_file(path)?;
            Ok((config, Some(path.to_path_buf())))
        }
        None => Ok(load_or_default()),
    }
}

/// Load config from a discovered file, or return default.
#[must_use]
pub fn load_or_default() -> (AppConfig, Option<PathBuf>) {
    discover_config_file(None).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

/// Settings given on the command line, layered over file config.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub tier: Option<Tier>,
    /// Replaces the whole scoring section
    pub preset: Option<ConfigPreset>,
    /// Keep only these axes (empty keeps all)
    pub axes: Vec<String>,
    pub format: Option<ReportFormat>,
    pub file: Option<PathBuf>,
    pub include_traces: bool,
    pub min_confidence: Option<f64>,
}

impl AppConfig {
    /// Merge command-line overrides into this config.
    pub fn merge(&mut self, overrides: &ConfigOverrides) {
        if let Some(tier) = overrides.tier {
            self.tier = tier;
        }
        if let Some(preset) = overrides.preset {
            self.scoring = ScoringConfig::from_preset(preset);
        }
        if !overrides.axes.is_empty() {
            self.scoring
                .axes
                .retain(|id, _| overrides.axes.iter().any(|a| a == id));
        }

        if let Some(format) = overrides.format {
            self.output.format = format;
        }
        if overrides.file.is_some() {
            self.output.file.clone_from(&overrides.file);
        }
        if overrides.include_traces {
            self.output.include_traces = true;
        }
        if overrides.min_confidence.is_some() {
            self.output.min_confidence = overrides.min_confidence;
        }
    }

    /// Load from file and merge with CLI overrides.
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<(Self, Option<PathBuf>), ConfigFileError> {
        let (mut config, loaded_from) = resolve_config(config_path)?;
        config.merge(overrides);
        Ok((config, loaded_from))
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content from the defaults.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# Composite scorer configuration
# Place this file at .composite-scorer.yaml in your project root or ~/.config/composite-scorer/

{}",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# Composite Scorer Configuration File
# ====================================
#
# Place it at:
#   - .composite-scorer.yaml in your project root
#   - ~/.config/composite-scorer/composite-scorer.yaml for global config
#
# CLI arguments always override file settings.

# Subscription tier: free, pro, premium
tier: free

scoring:
  # Axes are scored independently; weights are 0-100 and need not sum to 100
  axes:
    value:
      label: Value
      metrics:
        - metric: valuation.ev_per_resource_oz_all
          weight: 40
        - metric: valuation.price_to_book
          weight: 20
          # Override the catalog direction
          # higher_is_better: false
    quality:
      metrics:
        - metric: costs.aisc_last_year
          weight: 60
        - metric: financials.net_financial_assets
          weight: 40

  # global_min_max, dataset_min_max, dataset_rank_percentile, dataset_zscore
  normalization: dataset_min_max

  # zero_worst, dataset_mean, dataset_median, exclude
  imputation: zero_worst

  # A single peer group ...
  #   peers:
  #     strategy: status_cohort
  # ... or a blend whose weights are renormalized to sum to 1
  peers:
    blend:
      - strategy: status_cohort
        weight: 0.5
      - strategy: nearest_by_size
        n: 10
        # measures:
        #   - metric: financials.market_cap_value
        #     weight: 0.5
        weight: 0.3
      - strategy: scale_bucket
        measure: production.current_production_total_aueq_koz
        thresholds: [1, 100, 500]
        include_self: true
        weight: 0.2

  zscore:
    clamp: 3.0
    # population or sample
    std_dev: population

  # Required for global_min_max
  # global_ranges:
  #   costs.aisc_last_year: { min: 600, max: 2500 }

output:
  # summary, json, csv
  format: summary
  # file: scores.json
  include_traces: false
  # Exit with code 1 when an entity's confidence is below this
  # min_confidence: 0.5
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
