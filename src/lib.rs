//! Build dependency graph resolution
//!
//! This crate resolves declarative build manifests into effective
//! manifests and transitive dependency graphs:
//! - Parent-chain inheritance merging (properties, repositories,
//!   dependency management, dependencies)
//! - Dependency-management overrides and BOM imports
//! - `${…}` property placeholder substitution
//! - Breadth-first transitive expansion with version-requirement
//!   tracking and conflict-driven restarts
//! - Classpath scope algebra and glob exclusions
//!
//! All I/O lives behind the [`ManifestSource`] collaborator; the crate
//! itself never touches the network or the filesystem.

pub mod cache;
pub mod error;
pub mod events;
pub mod graph;
pub mod manifest;
pub mod placeholder;
pub mod requirement;
pub mod resolved;
pub mod scope;
pub mod source;
pub mod types;

pub use cache::{InMemoryManifestCache, ResolvedManifestCache};
pub use error::{DownloadError, ResolutionError, ResolutionFailure, ResolutionFailures};
pub use events::{NoopListener, ResolutionListener};
pub use graph::ResolvedDependency;
pub use manifest::{Dependency, ManagedDependency, Manifest, Parent, Profile};
pub use requirement::{
    HighestWins, NearestWins, VersionConstraint, VersionRequirement, VersionResolver,
};
pub use resolved::{ResolvedManagedDependency, ResolvedManifest, Resolver};
pub use scope::Scope;
pub use source::ManifestSource;
pub use types::{
    GroupArtifact, GroupArtifactVersion, License, Repository, ResolvedGroupArtifactVersion,
};
