//! Peer-group resolution.
//!
//! A peer set is the comparison group against which one entity's metric
//! values are normalized. Three strategies are supported:
//!
//! - **Status cohort**: every entity sharing the subject's operating status
//! - **Nearest by size**: the N entities closest in log-scaled size
//! - **Scale bucket**: every entity in the subject's operational-scale bucket
//!
//! Resolution never fails. A subject lacking the attribute a strategy needs
//! is compared against the full dataset instead, and the fallback is noted.
//!
//! Peer sets are resolved once per run and per strategy into a read-only
//! [`PeerCache`] before any parallel scoring starts.

mod cache;
mod resolver;
mod spec;

pub use cache::PeerCache;
pub use resolver::{PeerGroupResolver, PeerSet};
pub use spec::{PeerGroupSpec, PeerGroupStrategy, SizeMeasure};
