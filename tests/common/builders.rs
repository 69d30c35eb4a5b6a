//! Manifest builders for creating test fixtures
//!
//! Provides fluent builders for constructing Manifest and Dependency
//! objects with various configurations for testing purposes.

#![allow(dead_code)]

use gavel::{
    Dependency, GroupArtifact, GroupArtifactVersion, License, ManagedDependency, Manifest, Parent,
    Profile, Repository, ResolvedGroupArtifactVersion,
};
use std::collections::HashMap;

/// A concrete coordinate for a test manifest.
pub fn gav(group_id: &str, artifact_id: &str, version: &str) -> ResolvedGroupArtifactVersion {
    ResolvedGroupArtifactVersion::new(group_id, artifact_id, version)
}

/// Builder for creating Manifest test fixtures
pub struct ManifestBuilder {
    manifest: Manifest,
}

impl ManifestBuilder {
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            manifest: Manifest::new(gav(group_id, artifact_id, version)),
        }
    }

    pub fn with_parent(mut self, group_id: &str, artifact_id: &str, version: &str) -> Self {
        self.manifest.parent = Some(Parent {
            gav: GroupArtifactVersion::new(group_id, artifact_id, version),
            relative_path: None,
        });
        self
    }

    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.manifest
            .properties
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_repository(mut self, id: &str, uri: &str) -> Self {
        self.manifest.repositories.push(Repository::new(id, uri));
        self
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.manifest.dependencies.push(dependency);
        self
    }

    /// Add a defined dependency-management entry pinning a version.
    pub fn with_managed(mut self, group_id: &str, artifact_id: &str, version: &str) -> Self {
        self.manifest
            .dependency_management
            .push(ManagedDependency::Defined {
                gav: GroupArtifactVersion::new(group_id, artifact_id, version),
                scope: None,
                r#type: None,
                classifier: None,
                exclusions: None,
            });
        self
    }

    pub fn with_managed_entry(mut self, entry: ManagedDependency) -> Self {
        self.manifest.dependency_management.push(entry);
        self
    }

    /// Add a BOM import to dependency management.
    pub fn with_import(mut self, group_id: &str, artifact_id: &str, version: &str) -> Self {
        self.manifest
            .dependency_management
            .push(ManagedDependency::Imported {
                gav: GroupArtifactVersion::new(group_id, artifact_id, version),
            });
        self
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.manifest.profiles.push(profile);
        self
    }

    pub fn with_packaging(mut self, packaging: &str) -> Self {
        self.manifest.packaging = Some(packaging.to_string());
        self
    }

    pub fn with_license(mut self, name: &str) -> Self {
        self.manifest.licenses.push(License::new(name));
        self
    }

    pub fn build(self) -> Manifest {
        self.manifest
    }
}

/// Builder for creating Dependency test fixtures
pub struct DependencyBuilder {
    dependency: Dependency,
}

impl DependencyBuilder {
    /// A dependency without a declared version, to be supplied by
    /// dependency management.
    pub fn unversioned(group_id: &str, artifact_id: &str) -> Self {
        Self {
            dependency: Dependency::new(GroupArtifactVersion {
                group_id: Some(group_id.to_string()),
                artifact_id: artifact_id.to_string(),
                version: None,
            }),
        }
    }

    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            dependency: Dependency::new(GroupArtifactVersion::new(
                group_id,
                artifact_id,
                version,
            )),
        }
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.dependency.gav.version = Some(version.to_string());
        self
    }

    pub fn with_scope(mut self, scope: &str) -> Self {
        self.dependency.scope = Some(scope.to_string());
        self
    }

    pub fn with_classifier(mut self, classifier: &str) -> Self {
        self.dependency.classifier = Some(classifier.to_string());
        self
    }

    pub fn with_type(mut self, r#type: &str) -> Self {
        self.dependency.r#type = Some(r#type.to_string());
        self
    }

    pub fn with_exclusion(mut self, group_id: &str, artifact_id: &str) -> Self {
        self.dependency
            .exclusions
            .get_or_insert_with(Vec::new)
            .push(GroupArtifact::new(group_id, artifact_id));
        self
    }

    pub fn with_optional(mut self, optional: &str) -> Self {
        self.dependency.optional = Some(optional.to_string());
        self
    }

    pub fn build(self) -> Dependency {
        self.dependency
    }
}

/// A profile fixture with the given name and properties.
pub fn profile_named(name: &str, properties: &[(&str, &str)]) -> Profile {
    Profile {
        name: Some(name.to_string()),
        properties: properties
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
        repositories: Vec::new(),
        dependency_management: Vec::new(),
        dependencies: Vec::new(),
    }
}
