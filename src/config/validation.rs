//! Configuration validation for composite-scorer.
//!
//! Provides validation traits and implementations for all configuration types.
//! Checks here are structural; catalog lookups happen when the engine is built.

use super::types::*;
use crate::peers::{PeerGroupSpec, PeerGroupStrategy};
use crate::scoring::{GlobalRanges, ZScoreParams};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// Inclusive bounds of a metric weight
pub const WEIGHT_RANGE: std::ops::RangeInclusive<f64> = 0.0..=100.0;

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.scoring.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for ScoringConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.axes.is_empty() {
            errors.push(ConfigError::new("axes", "At least one axis is required"));
        }
        for (id, axis) in &self.axes {
            errors.extend(validate_axis(id, axis));
        }

        errors.extend(self.peers.validate());
        errors.extend(self.zscore.validate());
        errors.extend(self.global_ranges.validate());
        errors
    }
}

fn validate_axis(id: &str, axis: &AxisConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    let field = format!("axes.{id}");

    if id.trim().is_empty() {
        errors.push(ConfigError::new("axes", "Axis identifiers must not be empty"));
    }
    if axis.metrics.is_empty() {
        errors.push(ConfigError::new(&field, "Axis has no metrics"));
    }

    let mut seen: Vec<&str> = Vec::with_capacity(axis.metrics.len());
    for (i, metric) in axis.metrics.iter().enumerate() {
        let metric_field = format!("{field}.metrics[{i}]");
        if !metric.weight.is_finite() || !WEIGHT_RANGE.contains(&metric.weight) {
            errors.push(ConfigError::new(
                &metric_field,
                format!(
                    "Weight for '{}' must be between 0 and 100, got {}",
                    metric.metric, metric.weight
                ),
            ));
        }
        if seen.contains(&metric.metric.as_str()) {
            errors.push(ConfigError::new(
                &metric_field,
                format!("Metric '{}' appears more than once", metric.metric),
            ));
        }
        seen.push(&metric.metric);
    }
    errors
}

impl Validatable for PeerSelection {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        match self {
            Self::Single(spec) => errors.extend(validate_spec("peers", spec)),
            Self::Blend { blend } => {
                if blend.is_empty() {
                    errors.push(ConfigError::new("peers.blend", "Blend has no peer groups"));
                }
                for (i, group) in blend.iter().enumerate() {
                    let field = format!("peers.blend[{i}]");
                    if !group.weight.is_finite() || group.weight < 0.0 {
                        errors.push(ConfigError::new(
                            &field,
                            format!("Blend weight must be finite and >= 0, got {}", group.weight),
                        ));
                    }
                    errors.extend(validate_spec(&field, &group.spec));
                }
                if !blend.is_empty() && self.groups().is_none() {
                    errors.push(ConfigError::new(
                        "peers.blend",
                        "At least one blend weight must be positive",
                    ));
                }
            }
        }
        errors
    }
}

fn validate_spec(field: &str, spec: &PeerGroupSpec) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    match &spec.strategy {
        PeerGroupStrategy::StatusCohort => {}
        PeerGroupStrategy::NearestBySize { n, measures } => {
            if *n == 0 {
                errors.push(ConfigError::new(format!("{field}.n"), "n must be at least 1"));
            }
            if measures.is_empty() {
                errors.push(ConfigError::new(
                    format!("{field}.measures"),
                    "At least one size measure is required",
                ));
            }
            if measures.iter().any(|m| !m.weight.is_finite() || m.weight < 0.0) {
                errors.push(ConfigError::new(
                    format!("{field}.measures"),
                    "Size measure weights must be finite and >= 0",
                ));
            } else if !measures.is_empty() && measures.iter().all(|m| m.weight == 0.0) {
                errors.push(ConfigError::new(
                    format!("{field}.measures"),
                    "At least one size measure weight must be positive",
                ));
            }
        }
        PeerGroupStrategy::ScaleBucket {
            measure,
            thresholds,
        } => {
            if measure.trim().is_empty() {
                errors.push(ConfigError::new(format!("{field}.measure"), "Measure is required"));
            }
            if thresholds.is_empty() {
                errors.push(ConfigError::new(
                    format!("{field}.thresholds"),
                    "At least one threshold is required",
                ));
            }
            let ascending = thresholds.windows(2).all(|w| w[0] < w[1]);
            if thresholds.iter().any(|t| !t.is_finite()) || !ascending {
                errors.push(ConfigError::new(
                    format!("{field}.thresholds"),
                    "Thresholds must be finite and strictly ascending",
                ));
            }
        }
    }
    errors
}

impl Validatable for ZScoreParams {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !self.clamp.is_finite() || self.clamp <= 0.0 {
            errors.push(ConfigError::new(
                "zscore.clamp",
                format!("Clamp must be a positive number, got {}", self.clamp),
            ));
        }
        errors
    }
}

impl Validatable for GlobalRanges {
    fn validate(&self) -> Vec<ConfigError> {
        self.iter()
            .filter(|(_, r)| !r.min.is_finite() || !r.max.is_finite() || r.min > r.max)
            .map(|(id, r)| {
                ConfigError::new(
                    format!("global_ranges.{id}"),
                    format!("Range must be finite with min <= max, got [{}, {}]", r.min, r.max),
                )
            })
            .collect()
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        // Validate output file path if specified
        if let Some(parent) = self.file.as_ref().and_then(|f| f.parent()) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                errors.push(ConfigError::new(
                    "output.file",
                    format!("Parent directory does not exist: {}", parent.display()),
                ));
            }
        }

        if let Some(min) = self.min_confidence {
            if !(0.0..=1.0).contains(&min) {
                errors.push(ConfigError::new(
                    "output.min_confidence",
                    format!("Minimum confidence must be between 0.0 and 1.0, got {min}"),
                ));
            }
        }

        errors
    }
}

// ============================================================================
// Tests
// ============================================================================
