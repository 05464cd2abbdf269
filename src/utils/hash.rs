//! Content hashing utilities.

use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

use crate::model::Entity;

/// Compute a content hash for arbitrary bytes
pub fn content_hash(data: &[u8]) -> u64 {
    xxh3_64(data)
}

/// Fingerprint of a scoring run's inputs as 16 hex digits.
///
/// Hashes the JSON form of the configuration followed by every entity in
/// dataset order, so reordering entities changes the fingerprint.
pub fn run_fingerprint<C: Serialize>(config: &C, entities: &[Entity]) -> String {
    let mut input = serde_json::to_vec(config).unwrap_or_default();
    for entity in entities {
        input.extend(serde_json::to_vec(entity).unwrap_or_default());
        input.push(b'\n');
    }
    format!("{:016x}", content_hash(&input))
}
