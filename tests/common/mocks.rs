//! Mock implementations for testing
//!
//! Provides an in-memory manifest source and a recording listener so
//! resolution can be exercised without network access, and its event
//! stream asserted on.

#![allow(dead_code)]

use gavel::{
    Dependency, DownloadError, GroupArtifactVersion, Manifest, ManifestSource, Repository,
    ResolutionListener, ResolvedDependency, ResolvedGroupArtifactVersion, ResolvedManagedDependency,
    ResolvedManifest, Scope,
};
use std::collections::HashMap;
use std::sync::Mutex;

type ManifestKey = (String, String, String);

/// In-memory manifest source keyed by coordinate, recording fetch counts.
#[derive(Default)]
pub struct InMemorySource {
    manifests: HashMap<ManifestKey, Manifest>,
    fetch_counts: Mutex<HashMap<ManifestKey, usize>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(manifests: Vec<Manifest>) -> Self {
        let mut source = Self::new();
        for manifest in manifests {
            source.register(manifest);
        }
        source
    }

    pub fn register(&mut self, manifest: Manifest) {
        let key = (
            manifest.gav.group_id.clone(),
            manifest.gav.artifact_id.clone(),
            manifest.gav.version.clone(),
        );
        self.manifests.insert(key, manifest);
    }

    /// How many times a coordinate was fetched.
    pub fn fetch_count(&self, group_id: &str, artifact_id: &str, version: &str) -> usize {
        self.fetch_counts
            .lock()
            .unwrap()
            .get(&(
                group_id.to_string(),
                artifact_id.to_string(),
                version.to_string(),
            ))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetch_counts.lock().unwrap().values().sum()
    }
}

impl ManifestSource for InMemorySource {
    fn fetch(
        &self,
        gav: &GroupArtifactVersion,
        _relative_path: Option<&str>,
        _requesting: &ResolvedManifest,
        _repositories: &[Repository],
    ) -> Result<Manifest, DownloadError> {
        let key = (
            gav.group_id.clone().unwrap_or_default(),
            gav.artifact_id.clone(),
            gav.version.clone().unwrap_or_default(),
        );
        *self.fetch_counts.lock().unwrap().entry(key.clone()).or_insert(0) += 1;
        self.manifests
            .get(&key)
            .cloned()
            .ok_or_else(|| DownloadError::new(gav.clone(), "manifest not registered"))
    }
}

/// One observed resolution event, flattened to strings for assertions.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolutionEvent {
    Property { key: String, value: String },
    Repository { uri: String },
    Parent { gav: String },
    ParentCycle { gav: String },
    BomImport { gav: String },
    BomCycle { gav: String },
    Management { gav: String },
    Dependency { scope: Scope, gav: String },
    Cleared,
}

/// Listener that records every event for later inspection.
#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<ResolutionEvent>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ResolutionEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn was_cleared(&self) -> bool {
        self.events().contains(&ResolutionEvent::Cleared)
    }

    fn record(&self, event: ResolutionEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl ResolutionListener for RecordingListener {
    fn property(&self, key: &str, value: &str, _defined_in: &Manifest) {
        self.record(ResolutionEvent::Property {
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    fn repository(&self, repository: &Repository, _defined_in: &Manifest) {
        self.record(ResolutionEvent::Repository {
            uri: repository.uri.clone(),
        });
    }

    fn parent(&self, parent: &Manifest, _child: &Manifest) {
        self.record(ResolutionEvent::Parent {
            gav: parent.gav.to_string(),
        });
    }

    fn parent_cycle(&self, gav: &ResolvedGroupArtifactVersion, _child: &Manifest) {
        self.record(ResolutionEvent::ParentCycle {
            gav: gav.to_string(),
        });
    }

    fn bom_import(&self, bom: &ResolvedGroupArtifactVersion, _imported_by: &Manifest) {
        self.record(ResolutionEvent::BomImport {
            gav: bom.to_string(),
        });
    }

    fn bom_cycle(&self, bom: &GroupArtifactVersion, _imported_by: &Manifest) {
        self.record(ResolutionEvent::BomCycle {
            gav: bom.to_string(),
        });
    }

    fn dependency_management(&self, managed: &ResolvedManagedDependency, _defined_in: &Manifest) {
        self.record(ResolutionEvent::Management {
            gav: managed.gav.to_string(),
        });
    }

    fn dependency(&self, scope: Scope, resolved: &ResolvedDependency, _defined_in: &ResolvedManifest) {
        self.record(ResolutionEvent::Dependency {
            scope,
            gav: resolved.gav.to_string(),
        });
    }

    fn clear(&self) {
        self.record(ResolutionEvent::Cleared);
    }
}

/// A dependency as requested, without builder ceremony.
pub fn dep(group_id: &str, artifact_id: &str, version: &str) -> Dependency {
    Dependency::new(GroupArtifactVersion::new(group_id, artifact_id, version))
}
