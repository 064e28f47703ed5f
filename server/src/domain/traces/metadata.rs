//! Reserved vs. custom metadata partitioning.
//!
//! Metadata fields known to the internal schema land in the reserved map;
//! everything else is custom. One routine serves both call sites (trace
//! level and nested input metadata), so no key can ever appear in both.

use serde_json::{Map as JsonMap, Value as JsonValue};

/// Metadata keys the internal schema knows about.
pub const RESERVED_METADATA_KEYS: &[&str] = &[
    "user_id",
    "thread_id",
    "customer_id",
    "labels",
    "sdk_version",
    "sdk_language",
];

/// Trace-level metadata accumulator. Spans contribute as they are mapped;
/// later contributions overwrite earlier ones key by key.
#[derive(Debug, Clone, Default)]
pub struct TraceMetadata {
    pub reserved: JsonMap<String, JsonValue>,
    pub custom: JsonMap<String, JsonValue>,
}

impl TraceMetadata {
    /// Partition a metadata map against the reserved-field schema and merge
    /// both halves in.
    pub fn merge_split(&mut self, metadata: JsonMap<String, JsonValue>) {
        let (reserved, custom) = split_reserved(metadata);
        self.reserved.extend(reserved);
        self.custom.extend(custom);
    }
}

/// Split a metadata map into its (reserved, custom) halves.
pub fn split_reserved(
    metadata: JsonMap<String, JsonValue>,
) -> (JsonMap<String, JsonValue>, JsonMap<String, JsonValue>) {
    let mut reserved = JsonMap::new();
    let mut custom = JsonMap::new();
    for (key, value) in metadata {
        if RESERVED_METADATA_KEYS.contains(&key.as_str()) {
            reserved.insert(key, value);
        } else {
            custom.insert(key, value);
        }
    }
    (reserved, custom)
}
