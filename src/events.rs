//! Resolution observability hooks
//!
//! Listeners observe merge and resolution milestones for tooling; they
//! never influence the outcome. Cycle truncation is deliberately lenient
//! (an inheritance or BOM cycle stops recursion without error), so the
//! corresponding hooks exist to make that policy inspectable.

use crate::graph::ResolvedDependency;
use crate::manifest::Manifest;
use crate::resolved::{ResolvedManagedDependency, ResolvedManifest};
use crate::scope::Scope;
use crate::types::{GroupArtifactVersion, Repository, ResolvedGroupArtifactVersion};

/// Observer hooks invoked at well-defined points of resolution.
///
/// All hooks default to no-ops. Implementations needing state should use
/// interior mutability; hooks take `&self`.
pub trait ResolutionListener {
    /// A property was merged into the resolved manifest.
    fn property(&self, _key: &str, _value: &str, _defined_in: &Manifest) {}

    /// A repository was merged into the resolved manifest.
    fn repository(&self, _repository: &Repository, _defined_in: &Manifest) {}

    /// A parent manifest was discovered while walking the chain.
    fn parent(&self, _parent: &Manifest, _child: &Manifest) {}

    /// An inheritance cycle was detected and silently truncated.
    fn parent_cycle(&self, _gav: &ResolvedGroupArtifactVersion, _child: &Manifest) {}

    /// A BOM was imported into dependency management.
    fn bom_import(&self, _bom: &ResolvedGroupArtifactVersion, _imported_by: &Manifest) {}

    /// A BOM-import cycle was detected and silently truncated.
    fn bom_cycle(&self, _bom: &GroupArtifactVersion, _imported_by: &Manifest) {}

    /// A managed dependency entry was folded into the resolved manifest.
    fn dependency_management(
        &self,
        _managed: &ResolvedManagedDependency,
        _defined_in: &Manifest,
    ) {
    }

    /// A dependency node was resolved during graph expansion.
    fn dependency(&self, _scope: Scope, _resolved: &ResolvedDependency, _defined_in: &ResolvedManifest) {}

    /// A version conflict restarted graph expansion; any previously
    /// observed dependency events are invalid.
    fn clear(&self) {}
}

/// Listener that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopListener;

impl ResolutionListener for NoopListener {}

pub(crate) static NOOP_LISTENER: NoopListener = NoopListener;
