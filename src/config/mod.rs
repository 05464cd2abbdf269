//! Configuration module for composite-scorer.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for common screens
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use composite_scorer::config::{AppConfig, AxisConfig, ConfigPreset, ScoringConfig};
//!
//! // Use defaults (the balanced preset)
//! let config = AppConfig::default();
//!
//! // Use a preset
//! let config = AppConfig::from_preset(ConfigPreset::Value);
//!
//! // Use builder
//! let scoring = ScoringConfig::builder()
//!     .axis("cost", AxisConfig::new().metric("costs.aisc_last_year", 100.0))
//!     .build();
//!
//! // Load from file
//! use composite_scorer::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default();
//! ```
//!
//! # Configuration File
//!
//! Place a `.composite-scorer.yaml` file in your project root or
//! `~/.config/composite-scorer/`:
//!
//! ```yaml
//! tier: pro
//! scoring:
//!   axes:
//!     cost:
//!       metrics:
//!         - metric: costs.aisc_last_year
//!           weight: 100
//!   normalization: dataset_rank_percentile
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    ConfigPreset, DEFAULT_NEAREST_PEERS, DEFAULT_PRODUCTION_THRESHOLDS, DEFAULT_ZSCORE_CLAMP,
};
pub use types::{
    AppConfig, AxisConfig, AxisMetricConfig, BlendedPeerGroup, OutputConfig, PeerSelection,
    ScoringConfig, ScoringConfigBuilder,
};
pub use validation::{ConfigError, Validatable, WEIGHT_RANGE};

pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, resolve_config, ConfigFileError, ConfigOverrides,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.composite-scorer.yaml` config files. It can be used by editors for
/// validation and autocompletion.
pub fn generate_json_schema() -> serde_json::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}
