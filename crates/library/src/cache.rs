//! In-memory metadata cache with a version-string invalidation rule.
//!
//! The cache is an explicit object owned by the caller and passed by
//! reference into aggregation. It can be serialized wholesale, so the
//! application may persist it through its key-value store and reload it
//! on the next run.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Cached metadata snapshot for one game, keyed by namespaced app id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CachedMetadata {
    /// Upstream version string the snapshot was taken at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art_cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

/// Metadata snapshots for all known games.
///
/// Entries are overwritten when the upstream version string changes and
/// reused otherwise; nothing is ever explicitly deleted. Writes are
/// last-write-wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataCache {
    entries: HashMap<String, CachedMetadata>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `app_id` if its stored version matches the
    /// upstream `version`. A mismatch means the snapshot is stale and the
    /// caller should refresh it.
    pub fn get_fresh(&self, app_id: &str, version: Option<&str>) -> Option<&CachedMetadata> {
        self.entries
            .get(app_id)
            .filter(|cached| cached.version.as_deref() == version)
    }

    /// Inserts or overwrites the snapshot for `app_id`.
    pub fn insert(&mut self, app_id: String, metadata: CachedMetadata) {
        self.entries.insert(app_id, metadata);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
