//! Canonical projection hashing.
//!
//! Two independent implementations given the same source hash and projection
//! MUST produce identical projection hashes.
//!
//! Algorithm:
//! 1. Build the projection key `{collapse_result_hash, layout, mode, styling}`
//! 2. Serialize with keys sorted at every level, no insignificant whitespace,
//!    non-ASCII kept as literal UTF-8
//! 3. hash = "sha256:" || hex_lower(SHA256(keyBytes))
//!
//! No other projection field (e.g. `animation`) participates.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Prefix carried by every K-UX content hash.
pub const HASH_PREFIX: &str = "sha256:";

/// The four logical inputs of the projection hash.
///
/// Values are taken verbatim from the document, whatever their type, so a
/// hash can still be recomputed for a projection that failed its schema
/// checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionKey<'a> {
    pub collapse_result_hash: &'a Value,
    pub mode: &'a Value,
    pub layout: &'a Value,
    pub styling: &'a Value,
}

impl<'a> ProjectionKey<'a> {
    /// Pick the key fields out of a source hash and a projection record.
    ///
    /// Returns `None` when the projection lacks `mode`, `layout` or `styling`.
    pub fn from_projection(
        collapse_result_hash: &'a Value,
        projection: &'a Map<String, Value>,
    ) -> Option<Self> {
        Some(Self {
            collapse_result_hash,
            mode: projection.get("mode")?,
            layout: projection.get("layout")?,
            styling: projection.get("styling")?,
        })
    }

    fn to_value(self) -> Value {
        let mut map = Map::new();
        map.insert(
            "collapse_result_hash".to_string(),
            self.collapse_result_hash.clone(),
        );
        map.insert("mode".to_string(), self.mode.clone());
        map.insert("layout".to_string(), self.layout.clone());
        map.insert("styling".to_string(), self.styling.clone());
        Value::Object(map)
    }

    /// Canonical byte form hashed by [`ProjectionKey::digest`].
    pub fn canonical_bytes(self) -> Vec<u8> {
        canonical_json(&self.to_value())
    }

    pub fn digest(self) -> String {
        sha256_tagged(&self.canonical_bytes())
    }
}

/// Compute the projection hash over a source hash and a projection record.
pub fn compute_projection_hash(
    collapse_result_hash: &Value,
    projection: &Map<String, Value>,
) -> Option<String> {
    ProjectionKey::from_projection(collapse_result_hash, projection).map(ProjectionKey::digest)
}

/// Render `value` with object keys sorted at every nesting level and no
/// whitespace between tokens.
pub fn canonical_json(value: &Value) -> Vec<u8> {
    serde_json::to_vec(&sort_json_value(value)).expect("canonical json rendering should succeed")
}

// Map iteration order depends on serde_json's `preserve_order` feature, so
// the sort is explicit rather than inherited from the map type.
fn sort_json_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();
            let mut sorted = Map::new();
            for key in keys {
                if let Some(item) = map.get(key) {
                    sorted.insert(key.clone(), sort_json_value(item));
                }
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_json_value).collect()),
        _ => value.clone(),
    }
}

/// SHA-256 of `bytes` as `sha256:<64 lowercase hex>`.
pub fn sha256_tagged(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{HASH_PREFIX}{digest:x}")
}
