//! Coordinate types shared across the resolver
//!
//! A coordinate (GAV) identifies a component by group, artifact, and
//! version. Before property substitution any of the three may still
//! contain `${…}` placeholder text, so everything here is plain strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A group/artifact pair.
///
/// Used as the key under which version requirements accumulate, and as
/// the shape of an exclusion pattern (where either field may be a glob).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupArtifact {
    pub group_id: Option<String>,
    pub artifact_id: String,
}

impl GroupArtifact {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: Some(group_id.into()),
            artifact_id: artifact_id.into(),
        }
    }
}

impl fmt::Display for GroupArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.group_id.as_deref().unwrap_or(""),
            self.artifact_id
        )
    }
}

/// A possibly-unresolved coordinate as declared in a manifest.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupArtifactVersion {
    pub group_id: Option<String>,
    pub artifact_id: String,
    pub version: Option<String>,
}

impl GroupArtifactVersion {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: Some(group_id.into()),
            artifact_id: artifact_id.into(),
            version: Some(version.into()),
        }
    }

    pub fn group_artifact(&self) -> GroupArtifact {
        GroupArtifact {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
        }
    }
}

impl fmt::Display for GroupArtifactVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.group_id.as_deref().unwrap_or(""),
            self.artifact_id,
            self.version.as_deref().unwrap_or("")
        )
    }
}

/// A concrete coordinate, as carried by a fetched manifest.
///
/// `repository` records where the manifest was fetched from;
/// `dated_snapshot_version` qualifies snapshot versions with their
/// repository timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedGroupArtifactVersion {
    #[serde(default)]
    pub repository: Option<String>,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(default)]
    pub dated_snapshot_version: Option<String>,
}

impl ResolvedGroupArtifactVersion {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            repository: None,
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            dated_snapshot_version: None,
        }
    }

    pub fn group_artifact(&self) -> GroupArtifact {
        GroupArtifact {
            group_id: Some(self.group_id.clone()),
            artifact_id: self.artifact_id.clone(),
        }
    }
}

impl fmt::Display for ResolvedGroupArtifactVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// An artifact repository a manifest may declare.
///
/// Identity for merge deduplication is the `id`; both `id` and `uri` may
/// contain placeholders until the declaring chain's properties are merged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    #[serde(default)]
    pub id: Option<String>,
    pub uri: String,
}

impl Repository {
    pub fn new(id: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            uri: uri.into(),
        }
    }

    /// The default repository every parentless manifest inherits.
    pub fn central() -> Self {
        Self::new("central", "https://repo.maven.apache.org/maven2")
    }
}

/// A license declared by a manifest, carried through to resolved nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
}

impl License {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Case-sensitive glob match supporting a single `*` wildcard segment.
///
/// Exclusion patterns use this to match group and artifact ids; `*` on
/// its own matches any string.
pub fn matches_glob(value: &str, pattern: &str) -> bool {
    match pattern.find('*') {
        None => value == pattern,
        Some(star) => {
            let (prefix, suffix) = (&pattern[..star], &pattern[star + 1..]);
            value.len() >= prefix.len() + suffix.len()
                && value.starts_with(prefix)
                && value.ends_with(suffix)
        }
    }
}
