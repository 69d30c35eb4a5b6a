//! Version requirement accumulation and resolution
//!
//! One [`VersionRequirement`] accumulates every version constraint seen
//! for a single group-artifact pair across a whole graph expansion. The
//! policy that collapses the accumulated set into one concrete version is
//! the [`VersionResolver`] collaborator; richer constraint formats (range
//! syntax, repository metadata lookups) live behind that trait and are an
//! external contract.

use crate::types::{GroupArtifact, Repository};
use semver::Version;
use std::fmt;

/// A single constraint contributed by one sighting of a group-artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VersionConstraint {
    /// Declared by the manifest under resolution itself (depth 0).
    Direct { version: String },
    /// Contributed by a transitive dependency.
    Soft { version: String },
    /// A `LATEST` / `RELEASE` marker, resolvable only against repository
    /// metadata.
    Dynamic { marker: String },
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionConstraint::Direct { version } => write!(f, "{version} (direct)"),
            VersionConstraint::Soft { version } => f.write_str(version),
            VersionConstraint::Dynamic { marker } => f.write_str(marker),
        }
    }
}

/// Accumulated version constraints for one group-artifact pair, ordered
/// by first sighting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionRequirement {
    constraints: Vec<VersionConstraint>,
}

impl VersionRequirement {
    /// Start a requirement from the first sighting of a version at the
    /// given BFS depth.
    pub fn from_version(version: &str, depth: usize) -> Self {
        Self {
            constraints: vec![Self::constraint(version, depth)],
        }
    }

    /// A new requirement with one more transitive sighting merged in.
    /// Duplicate constraints are not recorded twice.
    pub fn merge(&self, version: &str) -> Self {
        let incoming = Self::constraint(version, usize::MAX);
        let mut merged = self.clone();
        if !merged.constraints.contains(&incoming) {
            merged.constraints.push(incoming);
        }
        merged
    }

    pub fn constraints(&self) -> &[VersionConstraint] {
        &self.constraints
    }

    fn constraint(version: &str, depth: usize) -> VersionConstraint {
        if version == "LATEST" || version == "RELEASE" {
            VersionConstraint::Dynamic {
                marker: version.to_string(),
            }
        } else if depth == 0 {
            VersionConstraint::Direct {
                version: version.to_string(),
            }
        } else {
            VersionConstraint::Soft {
                version: version.to_string(),
            }
        }
    }
}

impl fmt::Display for VersionRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, constraint) in self.constraints.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{constraint}")?;
        }
        write!(f, "]")
    }
}

/// Collapses an accumulated requirement into one concrete version.
pub trait VersionResolver {
    /// `None` when no version satisfies the requirement; the caller
    /// reports that as an unresolvable-version failure.
    fn resolve(
        &self,
        group_artifact: &GroupArtifact,
        requirement: &VersionRequirement,
        repositories: &[Repository],
    ) -> Option<String>;
}

/// The default policy: a direct declaration beats anything transitive,
/// and among transitive sightings the earliest wins.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestWins;

impl VersionResolver for NearestWins {
    fn resolve(
        &self,
        _group_artifact: &GroupArtifact,
        requirement: &VersionRequirement,
        _repositories: &[Repository],
    ) -> Option<String> {
        let mut first_soft = None;
        for constraint in requirement.constraints() {
            match constraint {
                VersionConstraint::Direct { version } => return Some(version.clone()),
                VersionConstraint::Soft { version } => {
                    if first_soft.is_none() {
                        first_soft = Some(version.clone());
                    }
                }
                VersionConstraint::Dynamic { .. } => {}
            }
        }
        first_soft
    }
}

/// An alternative policy picking the highest pinned version, ordering by
/// semver where both sides parse and lexically otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct HighestWins;

impl VersionResolver for HighestWins {
    fn resolve(
        &self,
        _group_artifact: &GroupArtifact,
        requirement: &VersionRequirement,
        _repositories: &[Repository],
    ) -> Option<String> {
        let mut highest: Option<String> = None;
        for constraint in requirement.constraints() {
            let version = match constraint {
                VersionConstraint::Direct { version } | VersionConstraint::Soft { version } => {
                    version
                }
                VersionConstraint::Dynamic { .. } => continue,
            };
            highest = Some(match highest {
                None => version.clone(),
                Some(current) => {
                    if compare_versions(version, &current) == std::cmp::Ordering::Greater {
                        version.clone()
                    } else {
                        current
                    }
                }
            });
        }
        highest
    }
}

fn compare_versions(a: &str, b: &str) -> std::cmp::Ordering {
    match (Version::parse(a), Version::parse(b)) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}
