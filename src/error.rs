//! Unified error types for composite-scorer.
//!
//! Only caller misuse surfaces here: unknown metric identifiers, invalid
//! configuration, unreadable datasets. Irregular *data* (missing values,
//! degenerate peer sets, zero variance) never becomes an error; the engine
//! resolves it with a fallback and records a trace note instead.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for composite-scorer operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScoreError {
    /// A metric identifier that the catalog does not know
    #[error("Unknown metric: '{metric_id}'")]
    UnknownMetric { metric_id: String },

    /// Configuration rejected at call time
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Errors while loading or assembling a dataset snapshot
    #[error("Dataset error: {context}")]
    Dataset {
        context: String,
        #[source]
        source: DatasetErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific dataset error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DatasetErrorKind {
    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Duplicate entity id: {0}")]
    DuplicateEntity(u64),
}

/// Convenient Result type for composite-scorer operations
pub type Result<T> = std::result::Result<T, ScoreError>;

impl ScoreError {
    /// Create an unknown-metric error
    pub fn unknown_metric(metric_id: impl Into<String>) -> Self {
        Self::UnknownMetric {
            metric_id: metric_id.into(),
        }
    }

    /// Create a dataset error with context
    pub fn dataset(context: impl Into<String>, source: DatasetErrorKind) -> Self {
        Self::Dataset {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the error reflects caller misuse of the configuration surface.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(self, Self::UnknownMetric { .. } | Self::Config(_))
    }
}

impl From<std::io::Error> for ScoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for ScoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::dataset(
            "JSON deserialization",
            DatasetErrorKind::InvalidJson(err.to_string()),
        )
    }
}

impl From<Vec<crate::config::ConfigError>> for ScoreError {
    fn from(errors: Vec<crate::config::ConfigError>) -> Self {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self::Config(joined)
    }
}

/// Extension trait for adding context to errors.
///
/// Context strings are chained outermost-first, e.g.
/// `"loading dataset: JSON deserialization"`.
///
/// ```ignore
/// use composite_scorer::error::ErrorContext;
///
/// let dataset = Dataset::from_json_str(&content)
///     .with_context(|| format!("loading dataset from {}", path.display()))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<ScoreError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: ScoreError, new_ctx: &str) -> ScoreError {
    match err {
        ScoreError::Dataset {
            context: existing,
            source,
        } => ScoreError::Dataset {
            context: chain_context(new_ctx, &existing),
            source,
        },
        ScoreError::Io {
            path,
            message,
            source,
        } => ScoreError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        ScoreError::Config(msg) => ScoreError::Config(chain_context(new_ctx, &msg)),
        ScoreError::Validation(msg) => ScoreError::Validation(chain_context(new_ctx, &msg)),
        // The metric id is the whole message; wrapping it would bury it.
        other @ ScoreError::UnknownMetric { .. } => other,
    }
}

/// Chain two context strings together.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to a validation error with context from a closure.
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| ScoreError::Validation(f().into()))
    }
}
