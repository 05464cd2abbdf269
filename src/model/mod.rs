//! Dataset model.
//!
//! Entities are opaque to the engine apart from a metric map and the
//! classification attributes used for peer grouping. A [`Dataset`] is an
//! immutable snapshot: the engine only ever reads it.

mod dataset;
mod entity;
mod raw;

pub use dataset::Dataset;
pub use entity::{CompanyStatus, Entity};
pub use raw::RawValue;
