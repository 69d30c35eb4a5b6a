//! Resolved-manifest memoization
//!
//! Graph expansion re-encounters the same manifests constantly; the cache
//! is what keeps repeated shared dependencies and conflict-driven restarts
//! affordable. It is the only object intentionally shared across
//! resolution calls, so it must tolerate concurrent readers. Entries are
//! idempotent given identical inputs, making last-writer-wins population
//! acceptable.

use crate::resolved::ResolvedManifest;
use crate::types::ResolvedGroupArtifactVersion;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Memoizes fully resolved manifests by coordinate.
pub trait ResolvedManifestCache {
    fn get(&self, gav: &ResolvedGroupArtifactVersion) -> Option<Arc<ResolvedManifest>>;
    fn put(&self, gav: ResolvedGroupArtifactVersion, manifest: Arc<ResolvedManifest>);
}

/// In-memory cache backed by a read-write lock.
#[derive(Default)]
pub struct InMemoryManifestCache {
    entries: RwLock<HashMap<ResolvedGroupArtifactVersion, Arc<ResolvedManifest>>>,
}

impl InMemoryManifestCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResolvedManifestCache for InMemoryManifestCache {
    fn get(&self, gav: &ResolvedGroupArtifactVersion) -> Option<Arc<ResolvedManifest>> {
        self.entries
            .read()
            .expect("cache lock poisoned")
            .get(gav)
            .cloned()
    }

    fn put(&self, gav: ResolvedGroupArtifactVersion, manifest: Arc<ResolvedManifest>) {
        self.entries
            .write()
            .expect("cache lock poisoned")
            .insert(gav, manifest);
    }
}
