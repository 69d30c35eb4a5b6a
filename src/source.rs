//! External manifest source collaborator
//!
//! The resolver never performs I/O itself. Parent, BOM, and transitive
//! dependency manifests all arrive through this trait; implementations
//! own download, on-disk caching, retries, and timeouts.

use crate::error::DownloadError;
use crate::manifest::Manifest;
use crate::resolved::ResolvedManifest;
use crate::types::{GroupArtifactVersion, Repository};

/// Fetches raw manifests by coordinate.
pub trait ManifestSource {
    /// Fetch the manifest for `gav`, searching `repositories`.
    ///
    /// `relative_path` is the parent-reference path hint, when one was
    /// declared. `requesting` is the manifest on whose behalf the fetch
    /// happens, for implementations that resolve relative paths or log
    /// provenance. The call may block on network I/O.
    fn fetch(
        &self,
        gav: &GroupArtifactVersion,
        relative_path: Option<&str>,
        requesting: &ResolvedManifest,
        repositories: &[Repository],
    ) -> Result<Manifest, DownloadError>;
}
