//! Error types for dependency resolution
//!
//! Per-dependency failures (missing version, unresolvable version,
//! unresolved property) accumulate across a whole graph expansion and are
//! surfaced together in [`ResolutionFailures`], each attributed to the
//! root dependent that introduced the broken subtree. Download and model
//! failures are fatal and abort resolution immediately.

use crate::types::{GroupArtifact, GroupArtifactVersion};
use std::fmt;
use thiserror::Error;

/// Failure to fetch a manifest from the external source collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to download {gav}: {message}")]
pub struct DownloadError {
    pub gav: GroupArtifactVersion,
    pub message: String,
    /// Hint for callers: whether retrying the whole resolution may help.
    pub retryable: bool,
}

impl DownloadError {
    pub fn new(gav: GroupArtifactVersion, message: impl Into<String>) -> Self {
        Self {
            gav,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn retryable(gav: GroupArtifactVersion, message: impl Into<String>) -> Self {
        Self {
            gav,
            message: message.into(),
            retryable: true,
        }
    }
}

/// One resolution failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// No version survived substitution and management override.
    #[error("no version provided for {gav}")]
    MissingVersion { gav: GroupArtifactVersion },

    /// The version requirement resolver produced no concrete version.
    #[error("could not resolve version for {group_artifact} matching requirements {requirement}")]
    UnresolvableVersion {
        group_artifact: GroupArtifact,
        requirement: String,
    },

    /// A coordinate still carried an unresolved `${…}` marker.
    #[error("could not resolve property in {gav}")]
    UnresolvedProperty { gav: GroupArtifactVersion },

    /// The external manifest source failed. Fatal.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// A structurally broken manifest. Fatal.
    #[error("invalid manifest model: {message}")]
    Model { message: String },

    /// The conflict-restart loop exceeded its iteration cap.
    #[error("version requirements did not converge after {restarts} restarts")]
    NoConvergence { restarts: u32 },
}

impl ResolutionError {
    /// Fatal errors abort a graph expansion instead of accumulating.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ResolutionError::Download(_)
                | ResolutionError::Model { .. }
                | ResolutionError::NoConvergence { .. }
        )
    }
}

/// A resolution error attributed to the direct dependency whose subtree
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionFailure {
    /// Coordinate of the root dependent, as originally requested.
    pub root: GroupArtifactVersion,
    pub error: ResolutionError,
}

impl fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (via {})", self.error, self.root)
    }
}

/// Every failure encountered across one graph expansion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct ResolutionFailures {
    pub failures: Vec<ResolutionFailure>,
}

impl ResolutionFailures {
    pub fn new(failures: Vec<ResolutionFailure>) -> Self {
        Self { failures }
    }

    /// A single fatal failure that aborted resolution.
    pub fn fatal(root: GroupArtifactVersion, error: ResolutionError) -> Self {
        Self {
            failures: vec![ResolutionFailure { root, error }],
        }
    }

    /// Whether resolution was aborted by a fatal collaborator failure
    /// rather than completing with accumulated per-dependency errors.
    pub fn is_fatal(&self) -> bool {
        self.failures.iter().any(|f| f.error.is_fatal())
    }
}

impl fmt::Display for ResolutionFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} dependency resolution failure(s):",
            self.failures.len()
        )?;
        for failure in &self.failures {
            writeln!(f, "  - {failure}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aborting_errors_are_fatal() {
        let gav = GroupArtifactVersion::new("com.x", "y", "1.0");

        assert!(ResolutionError::Download(DownloadError::new(gav.clone(), "404")).is_fatal());
        assert!(ResolutionError::Model {
            message: "no group id".to_string(),
        }
        .is_fatal());
        assert!(ResolutionError::NoConvergence { restarts: 100 }.is_fatal());

        assert!(!ResolutionError::MissingVersion { gav: gav.clone() }.is_fatal());
        assert!(!ResolutionError::UnresolvedProperty { gav: gav.clone() }.is_fatal());
        assert!(!ResolutionError::UnresolvableVersion {
            group_artifact: GroupArtifact::new("com.x", "y"),
            requirement: "LATEST".to_string(),
        }
        .is_fatal());
    }

    #[test]
    fn test_fatal_aggregate_matches_its_error() {
        let gav = GroupArtifactVersion::new("com.x", "y", "1.0");
        let aborted =
            ResolutionFailures::fatal(gav.clone(), ResolutionError::NoConvergence { restarts: 100 });
        assert!(aborted.is_fatal());

        let accumulated = ResolutionFailures::new(vec![ResolutionFailure {
            root: gav.clone(),
            error: ResolutionError::MissingVersion { gav },
        }]);
        assert!(!accumulated.is_fatal());
    }
}
