//! Shared utilities.

mod hash;

pub use hash::{content_hash, run_fingerprint};
