//! Raw manifest data model
//!
//! A [`Manifest`] is the immutable output of the external parser: the
//! declarative build descriptor exactly as written, placeholders and all.
//! Everything here is serde-derived so parsers and test fixtures can
//! produce manifests from YAML or JSON without touching the resolver.

use crate::types::{GroupArtifact, GroupArtifactVersion, License, Repository, ResolvedGroupArtifactVersion};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

/// A parsed build manifest. Immutable once parsed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub gav: ResolvedGroupArtifactVersion,
    #[serde(default)]
    pub parent: Option<Parent>,
    #[serde(default)]
    pub properties: HashMap<String, String>,
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub repositories: Vec<Repository>,
    #[serde(default)]
    pub dependency_management: Vec<ManagedDependency>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    #[serde(default)]
    pub packaging: Option<String>,
    #[serde(default)]
    pub licenses: Vec<License>,
}

impl Manifest {
    /// A minimal manifest with only a coordinate.
    pub fn new(gav: ResolvedGroupArtifactVersion) -> Self {
        Self {
            gav,
            parent: None,
            properties: HashMap::new(),
            profiles: Vec::new(),
            repositories: Vec::new(),
            dependency_management: Vec::new(),
            dependencies: Vec::new(),
            packaging: None,
            licenses: Vec::new(),
        }
    }
}

/// Reference to a manifest's parent in the inheritance chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parent {
    pub gav: GroupArtifactVersion,
    #[serde(default)]
    pub relative_path: Option<String>,
}

/// A conditionally-activated block of manifest overrides.
///
/// A profile is active when its name appears in the caller's
/// active-profile set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub properties: HashMap<String, String>,
    #[serde(default)]
    pub repositories: Vec<Repository>,
    #[serde(default)]
    pub dependency_management: Vec<ManagedDependency>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl Profile {
    pub fn is_active(&self, active_profiles: &[String]) -> bool {
        match &self.name {
            Some(name) => active_profiles.iter().any(|active| active == name),
            None => false,
        }
    }
}

/// A dependency as requested by a manifest, before substitution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub gav: GroupArtifactVersion,
    #[serde(default)]
    pub classifier: Option<String>,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub exclusions: Option<Vec<GroupArtifact>>,
    /// Kept as a string because it may be a placeholder.
    #[serde(default)]
    pub optional: Option<String>,
}

impl Dependency {
    pub fn new(gav: GroupArtifactVersion) -> Self {
        Self {
            gav,
            classifier: None,
            r#type: None,
            scope: None,
            exclusions: None,
            optional: None,
        }
    }
}

/// A dependency-management entry.
///
/// `Defined` entries pin version/scope/exclusions directly; `Imported`
/// entries name a BOM whose own management entries are spliced in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ManagedDependency {
    #[serde(rename_all = "camelCase")]
    Defined {
        gav: GroupArtifactVersion,
        #[serde(default)]
        scope: Option<String>,
        #[serde(default)]
        r#type: Option<String>,
        #[serde(default)]
        classifier: Option<String>,
        #[serde(default)]
        exclusions: Option<Vec<GroupArtifact>>,
    },
    #[serde(rename_all = "camelCase")]
    Imported { gav: GroupArtifactVersion },
}

/// The implicit root of every parent chain.
///
/// Manifests that declare no parent inherit from this constant instead:
/// it contributes the `central` repository and nothing else. Constructed
/// once and never mutated.
pub static BASE_MANIFEST: LazyLock<Manifest> = LazyLock::new(|| {
    let mut base = Manifest::new(ResolvedGroupArtifactVersion::new("", "", ""));
    base.repositories = vec![Repository::central()];
    base
});
