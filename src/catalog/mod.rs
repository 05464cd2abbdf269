//! Metric catalog.
//!
//! A static, read-only registry of metric definitions keyed by identifier.
//! The catalog is built explicitly (usually via [`MetricCatalog::standard`])
//! and passed by reference; nothing here is a process-wide singleton.
//!
//! # Usage
//!
//! ```
//! use composite_scorer::catalog::{MetricCatalog, Tier};
//!
//! let catalog = MetricCatalog::standard();
//! let aisc = catalog.get("costs.aisc_last_year").unwrap();
//! assert!(!aisc.higher_is_better);
//!
//! let free = catalog.accessible_to(Tier::Free);
//! assert!(free.iter().all(|m| m.min_tier == Tier::Free));
//! ```

mod definition;
mod registry;
pub mod standard;

pub use definition::{MetricCategory, MetricDefinition, MetricUnit, Tier};
pub use registry::MetricCatalog;
pub use standard::ids;
