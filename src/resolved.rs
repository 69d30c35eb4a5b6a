//! Resolved manifests and the parent-chain resolver
//!
//! A [`ResolvedManifest`] is the merge of a manifest with its whole
//! inheritance chain: properties, repositories, dependency management
//! (BOM imports expanded), and requested dependencies, all folded
//! leaf-first so the leaf always wins over an ancestor. [`Resolver`]
//! bundles the external collaborators and drives the two merge passes.

use crate::cache::ResolvedManifestCache;
use crate::error::ResolutionError;
use crate::events::{ResolutionListener, NOOP_LISTENER};
use crate::manifest::{Dependency, ManagedDependency, Manifest, BASE_MANIFEST};
use crate::placeholder;
use crate::requirement::{NearestWins, VersionResolver};
use crate::scope::Scope;
use crate::source::ManifestSource;
use crate::types::{
    GroupArtifact, GroupArtifactVersion, Repository, ResolvedGroupArtifactVersion,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

static NEAREST_WINS: NearestWins = NearestWins;

/// A managed-dependency entry after substitution, with import provenance.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedManagedDependency {
    pub gav: GroupArtifactVersion,
    pub scope: Option<Scope>,
    pub r#type: Option<String>,
    pub classifier: Option<String>,
    pub exclusions: Vec<GroupArtifact>,
    /// The `Defined` entry this was folded from.
    pub requested: ManagedDependency,
    /// The `Imported` entry that pulled this in, when it came via a BOM.
    pub requested_bom: Option<ManagedDependency>,
    /// Coordinate of the BOM that declared it.
    pub bom_gav: Option<ResolvedGroupArtifactVersion>,
}

impl ResolvedManagedDependency {
    /// Whether this entry manages the given dependency key. Type defaults
    /// to `jar` on both sides.
    pub fn matches(
        &self,
        group_id: &str,
        artifact_id: &str,
        r#type: Option<&str>,
        classifier: Option<&str>,
    ) -> bool {
        self.gav.group_id.as_deref() == Some(group_id)
            && self.gav.artifact_id == artifact_id
            && self.r#type.as_deref().unwrap_or("jar") == r#type.unwrap_or("jar")
            && self.classifier.as_deref() == classifier
    }
}

/// The effective view of a manifest after its parent chain is merged.
#[derive(Clone, Debug)]
pub struct ResolvedManifest {
    /// The original requested manifest, its own coordinate substituted.
    pub requested: Manifest,
    pub active_profiles: Vec<String>,
    /// Merged properties, first declaration wins walking leaf to root.
    pub properties: HashMap<String, String>,
    /// Merged management entries in declaration order; lookups take the
    /// first match, so duplicates are harmless until [`Self::deduplicate`].
    pub dependency_management: Vec<ResolvedManagedDependency>,
    /// The repository set as it stood before the chain walk, reused when
    /// resolving BOMs and transitive manifests.
    pub initial_repositories: Option<Vec<Repository>>,
    /// Merged repositories, deduplicated by id.
    pub repositories: Vec<Repository>,
    pub requested_dependencies: Vec<Dependency>,
}

impl ResolvedManifest {
    pub fn gav(&self) -> &ResolvedGroupArtifactVersion {
        &self.requested.gav
    }

    pub fn group_id(&self) -> &str {
        &self.requested.gav.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.requested.gav.artifact_id
    }

    pub fn version(&self) -> &str {
        &self.requested.gav.version
    }

    pub fn dated_snapshot_version(&self) -> Option<&str> {
        self.requested.gav.dated_snapshot_version.as_deref()
    }

    pub fn packaging(&self) -> &str {
        self.requested.packaging.as_deref().unwrap_or("jar")
    }

    /// Substitute `${…}` placeholders in `text` against this manifest.
    pub fn value(&self, text: &str) -> String {
        placeholder::substitute(text, &|name| self.property(name))
    }

    pub fn value_opt(&self, text: Option<&str>) -> Option<String> {
        text.map(|text| self.value(text))
    }

    /// Property lookup backing substitution.
    ///
    /// Reserved self-coordinate names are computed from the requested
    /// manifest and cannot be shadowed by the property map; for everything
    /// else an environment-level override beats the declared value.
    fn property(&self, name: &str) -> Option<String> {
        let requested = &self.requested;
        match name {
            "groupId" | "project.groupId" | "pom.groupId" => {
                return Some(requested.gav.group_id.clone());
            }
            "project.parent.groupId" => {
                return requested
                    .parent
                    .as_ref()
                    .and_then(|parent| parent.gav.group_id.clone());
            }
            // artifact id is never inherited from the parent
            "artifactId" | "project.artifactId" | "pom.artifactId" => {
                return Some(requested.gav.artifact_id.clone());
            }
            "project.parent.artifactId" => {
                return requested
                    .parent
                    .as_ref()
                    .map(|parent| parent.gav.artifact_id.clone());
            }
            "version" | "project.version" | "pom.version" => {
                return Some(requested.gav.version.clone());
            }
            "project.parent.version" => {
                return requested
                    .parent
                    .as_ref()
                    .and_then(|parent| parent.gav.version.clone());
            }
            _ => {}
        }
        std::env::var(name)
            .ok()
            .or_else(|| self.properties.get(name).cloned())
    }

    /// Substitute every field of a coordinate.
    pub fn values_gav(&self, gav: &GroupArtifactVersion) -> GroupArtifactVersion {
        GroupArtifactVersion {
            group_id: self.value_opt(gav.group_id.as_deref()),
            artifact_id: self.value(&gav.artifact_id),
            version: self.value_opt(gav.version.as_deref()),
        }
    }

    pub fn values_ga(&self, ga: &GroupArtifact) -> GroupArtifact {
        GroupArtifact {
            group_id: self.value_opt(ga.group_id.as_deref()),
            artifact_id: self.value(&ga.artifact_id),
        }
    }

    /// Managed version for a dependency key; first matching entry wins.
    pub fn managed_version(
        &self,
        group_id: &str,
        artifact_id: &str,
        r#type: Option<&str>,
        classifier: Option<&str>,
    ) -> Option<String> {
        for managed in &self.dependency_management {
            if managed.matches(group_id, artifact_id, r#type, classifier) {
                return self.value_opt(managed.gav.version.as_deref());
            }
        }
        None
    }

    /// Managed scope for a dependency key; first matching entry wins.
    pub fn managed_scope(
        &self,
        group_id: &str,
        artifact_id: &str,
        r#type: Option<&str>,
        classifier: Option<&str>,
    ) -> Option<Scope> {
        self.dependency_management
            .iter()
            .find(|managed| managed.matches(group_id, artifact_id, r#type, classifier))
            .and_then(|managed| managed.scope)
    }

    /// Managed exclusions for a dependency key; first matching entry wins.
    pub fn managed_exclusions(
        &self,
        group_id: &str,
        artifact_id: &str,
        r#type: Option<&str>,
        classifier: Option<&str>,
    ) -> Vec<GroupArtifact> {
        self.dependency_management
            .iter()
            .find(|managed| managed.matches(group_id, artifact_id, r#type, classifier))
            .map(|managed| managed.exclusions.clone())
            .unwrap_or_default()
    }

    /// Substitute a dependency's fields and fold in management overrides.
    ///
    /// A matching management entry's version takes precedence over the
    /// declared one. Managed scope applies only when the dependency
    /// declares none, and managed exclusions append to the declared ones.
    pub fn substitute_dependency(&self, dependency: &Dependency) -> Dependency {
        let mut d = dependency.clone();
        d.gav = self.values_gav(&dependency.gav);
        d.scope = self.value_opt(dependency.scope.as_deref());

        let Some(group_id) = d.gav.group_id.clone() else {
            return d;
        };

        let mut version = d.gav.version.clone();
        if let Some(managed) = self.managed_version(
            &group_id,
            &d.gav.artifact_id,
            d.r#type.as_deref(),
            d.classifier.as_deref(),
        ) {
            version = Some(managed);
        }

        if d.scope.is_none() {
            d.scope = self
                .managed_scope(
                    &group_id,
                    &d.gav.artifact_id,
                    d.r#type.as_deref(),
                    d.classifier.as_deref(),
                )
                .map(|scope| scope.to_string());
        }

        let managed_exclusions = self.managed_exclusions(
            &group_id,
            &d.gav.artifact_id,
            d.r#type.as_deref(),
            d.classifier.as_deref(),
        );
        if !managed_exclusions.is_empty() {
            let mut exclusions = d.exclusions.take().unwrap_or_default();
            exclusions.extend(managed_exclusions);
            d.exclusions = Some(exclusions);
        }

        if let Some(classifier) = d.classifier.as_deref() {
            d.classifier = Some(self.value(classifier));
        }
        if let Some(r#type) = d.r#type.as_deref() {
            d.r#type = Some(self.value(r#type));
        }
        d.gav.version = version;
        d
    }

    /// Drop all but the first management entry per (coordinate, type,
    /// classifier, scope) key, and likewise for requested dependencies.
    pub fn deduplicate(&mut self) {
        let mut seen = HashSet::new();
        self.dependency_management.retain(|managed| {
            seen.insert((
                managed.gav.clone(),
                managed.r#type.clone(),
                managed.classifier.clone(),
                managed.scope,
            ))
        });

        let mut seen = HashSet::new();
        self.requested_dependencies.retain(|dependency| {
            seen.insert((
                dependency.gav.clone(),
                dependency.r#type.clone(),
                dependency.classifier.clone(),
                dependency.scope.clone(),
            ))
        });
    }
}

/// Drives manifest and dependency-graph resolution against a set of
/// external collaborators.
pub struct Resolver<'a> {
    pub(crate) source: &'a dyn ManifestSource,
    pub(crate) cache: &'a dyn ResolvedManifestCache,
    pub(crate) listener: &'a dyn ResolutionListener,
    pub(crate) versions: &'a dyn VersionResolver,
}

impl<'a> Resolver<'a> {
    pub fn new(source: &'a dyn ManifestSource, cache: &'a dyn ResolvedManifestCache) -> Self {
        Self {
            source,
            cache,
            listener: &NOOP_LISTENER,
            versions: &NEAREST_WINS,
        }
    }

    pub fn with_listener(mut self, listener: &'a dyn ResolutionListener) -> Self {
        self.listener = listener;
        self
    }

    pub fn with_version_resolver(mut self, versions: &'a dyn VersionResolver) -> Self {
        self.versions = versions;
        self
    }

    /// Resolve a raw manifest into its effective form: merge its whole
    /// parent chain, expand BOM imports, and substitute its own
    /// coordinate.
    pub fn resolve_manifest(
        &self,
        manifest: Manifest,
        active_profiles: &[String],
        initial_repositories: Option<Vec<Repository>>,
    ) -> Result<ResolvedManifest, ResolutionError> {
        let mut bom_stack = Vec::new();
        let (pom, _) = self.resolve_manifest_inner(
            manifest,
            active_profiles,
            initial_repositories,
            &mut bom_stack,
        )?;
        Ok(pom)
    }

    /// Re-run resolution for an already resolved manifest, returning the
    /// input unchanged when nothing effective moved.
    pub fn re_resolve(&self, pom: &ResolvedManifest) -> Result<ResolvedManifest, ResolutionError> {
        let resolved = self.resolve_manifest(
            pom.requested.clone(),
            &pom.active_profiles,
            pom.initial_repositories.clone(),
        )?;

        for (key, value) in &resolved.properties {
            if pom.properties.get(key) != Some(value) {
                return Ok(resolved);
            }
        }
        if pom.requested_dependencies != resolved.requested_dependencies
            || pom.dependency_management != resolved.dependency_management
            || pom.repositories != resolved.repositories
        {
            return Ok(resolved);
        }
        Ok(pom.clone())
    }

    /// The returned flag reports whether any BOM import in this resolution
    /// was truncated against the in-flight import stack; such a result is
    /// incomplete relative to a fresh resolution of the same coordinate.
    pub(crate) fn resolve_manifest_inner(
        &self,
        manifest: Manifest,
        active_profiles: &[String],
        initial_repositories: Option<Vec<Repository>>,
        bom_stack: &mut Vec<GroupArtifactVersion>,
    ) -> Result<(ResolvedManifest, bool), ResolutionError> {
        let mut pom = ResolvedManifest {
            requested: manifest,
            active_profiles: active_profiles.to_vec(),
            properties: HashMap::new(),
            dependency_management: Vec::new(),
            initial_repositories,
            repositories: Vec::new(),
            requested_dependencies: Vec::new(),
        };
        let truncated = self.resolve_parents(&mut pom, bom_stack)?;
        Ok((pom, truncated))
    }

    /// Fully resolve a fetched manifest, consulting and populating the
    /// shared cache. Keyed by the fetch coordinate.
    ///
    /// A resolution whose BOM imports were truncated against the in-flight
    /// stack is valid for the current importer but incomplete for anyone
    /// else, so it is returned without being cached.
    pub(crate) fn resolve_cached(
        &self,
        manifest: Manifest,
        active_profiles: &[String],
        initial_repositories: Option<Vec<Repository>>,
        bom_stack: &mut Vec<GroupArtifactVersion>,
    ) -> Result<(Arc<ResolvedManifest>, bool), ResolutionError> {
        let key = manifest.gav.clone();
        if let Some(hit) = self.cache.get(&key) {
            return Ok((hit, false));
        }
        let (resolved, truncated) = self.resolve_manifest_inner(
            manifest,
            active_profiles,
            initial_repositories,
            bom_stack,
        )?;
        let resolved = Arc::new(resolved);
        if !truncated {
            self.cache.put(key, resolved.clone());
        }
        Ok((resolved, truncated))
    }

    fn resolve_parents(
        &self,
        pom: &mut ResolvedManifest,
        bom_stack: &mut Vec<GroupArtifactVersion>,
    ) -> Result<bool, ResolutionError> {
        if let Some(initial) = pom.initial_repositories.clone() {
            self.merge_repositories(pom, &initial, None);
        }

        let requested = pom.requested.clone();
        let mut ancestry = vec![requested.gav.clone()];
        self.merge_properties_and_repositories(pom, &requested, &mut ancestry)?;
        if pom.initial_repositories.is_none() {
            pom.initial_repositories = Some(pom.repositories.clone());
        }

        // Substitute the manifest's own coordinate now: environment-level
        // values used here are transient and will not be available once
        // the manifest crosses a process boundary.
        let gav = pom.requested.gav.clone();
        let substituted = ResolvedGroupArtifactVersion {
            repository: pom.value_opt(gav.repository.as_deref()),
            group_id: pom.value(&gav.group_id),
            artifact_id: pom.value(&gav.artifact_id),
            version: pom.value(&gav.version),
            dated_snapshot_version: pom.value_opt(gav.dated_snapshot_version.as_deref()),
        };
        pom.requested.gav = substituted;

        let requested = pom.requested.clone();
        let mut ancestry = vec![requested.gav.clone()];
        self.merge_dependencies(pom, &requested, &mut ancestry, bom_stack)
    }

    /// Pass A: properties then repositories, leaf to root.
    fn merge_properties_and_repositories(
        &self,
        pom: &mut ResolvedManifest,
        current: &Manifest,
        ancestry: &mut Vec<ResolvedGroupArtifactVersion>,
    ) -> Result<(), ResolutionError> {
        for profile in &current.profiles {
            if profile.is_active(&pom.active_profiles) {
                self.merge_properties(pom, &profile.properties, current);
            }
        }
        self.merge_properties(pom, &current.properties, current);

        // repositories may rely on properties merged just above
        for profile in &current.profiles {
            if profile.is_active(&pom.active_profiles) {
                self.merge_repositories(pom, &profile.repositories, Some(current));
            }
        }
        self.merge_repositories(pom, &current.repositories, Some(current));

        match &current.parent {
            Some(parent) => {
                let parent_gav = pom.values_gav(&parent.gav);
                let parent_manifest = self.source.fetch(
                    &parent_gav,
                    parent.relative_path.as_deref(),
                    pom,
                    &pom.repositories,
                )?;
                if ancestry.iter().any(|ancestor| *ancestor == parent_manifest.gav) {
                    debug!(gav = %parent_manifest.gav, "truncating inheritance cycle");
                    self.listener.parent_cycle(&parent_manifest.gav, current);
                    return Ok(());
                }
                ancestry.insert(0, parent_manifest.gav.clone());
                self.merge_properties_and_repositories(pom, &parent_manifest, ancestry)
            }
            None => {
                self.merge_repositories(pom, &BASE_MANIFEST.repositories, None);
                Ok(())
            }
        }
    }

    /// Pass B: dependency management then requested dependencies, leaf to
    /// root.
    fn merge_dependencies(
        &self,
        pom: &mut ResolvedManifest,
        current: &Manifest,
        ancestry: &mut Vec<ResolvedGroupArtifactVersion>,
        bom_stack: &mut Vec<GroupArtifactVersion>,
    ) -> Result<bool, ResolutionError> {
        let mut truncated = false;
        for profile in &current.profiles {
            if profile.is_active(&pom.active_profiles) {
                truncated |= self.merge_dependency_management(
                    pom,
                    &profile.dependency_management,
                    current,
                    bom_stack,
                )?;
                merge_requested_dependencies(pom, &profile.dependencies);
            }
        }
        truncated |=
            self.merge_dependency_management(pom, &current.dependency_management, current, bom_stack)?;
        merge_requested_dependencies(pom, &current.dependencies);

        match &current.parent {
            Some(parent) => {
                let parent_gav = pom.values_gav(&parent.gav);
                let parent_manifest = self.source.fetch(
                    &parent_gav,
                    parent.relative_path.as_deref(),
                    pom,
                    &pom.repositories,
                )?;
                self.listener.parent(&parent_manifest, current);
                if ancestry.iter().any(|ancestor| *ancestor == parent_manifest.gav) {
                    debug!(gav = %parent_manifest.gav, "truncating inheritance cycle");
                    self.listener.parent_cycle(&parent_manifest.gav, current);
                    return Ok(truncated);
                }
                ancestry.insert(0, parent_manifest.gav.clone());
                truncated |= self.merge_dependencies(pom, &parent_manifest, ancestry, bom_stack)?;
                Ok(truncated)
            }
            None => Ok(truncated),
        }
    }

    fn merge_properties(
        &self,
        pom: &mut ResolvedManifest,
        incoming: &HashMap<String, String>,
        defined_in: &Manifest,
    ) {
        for (key, value) in incoming {
            self.listener.property(key, value, defined_in);
            if !pom.properties.contains_key(key) {
                pom.properties.insert(key.clone(), value.clone());
            }
        }
    }

    fn merge_repositories(
        &self,
        pom: &mut ResolvedManifest,
        incoming: &[Repository],
        defined_in: Option<&Manifest>,
    ) {
        'next_repository: for repository in incoming {
            let candidate = Repository {
                id: pom.value_opt(repository.id.as_deref()),
                uri: pom.value(&repository.uri),
            };
            if let Some(id) = &candidate.id {
                for existing in &pom.repositories {
                    if existing.id.as_deref() == Some(id) {
                        continue 'next_repository;
                    }
                }
            }
            if let Some(defined_in) = defined_in {
                self.listener.repository(&candidate, defined_in);
            }
            pom.repositories.push(candidate);
        }
    }

    fn merge_dependency_management(
        &self,
        pom: &mut ResolvedManifest,
        incoming: &[ManagedDependency],
        defined_in: &Manifest,
        bom_stack: &mut Vec<GroupArtifactVersion>,
    ) -> Result<bool, ResolutionError> {
        let mut truncated = false;
        for entry in incoming {
            match entry {
                ManagedDependency::Imported { gav } => {
                    let import_gav = pom.values_gav(gav);
                    if bom_stack.contains(&import_gav) {
                        debug!(gav = %import_gav, "truncating BOM import cycle");
                        self.listener.bom_cycle(&import_gav, defined_in);
                        truncated = true;
                        continue;
                    }
                    let bom_manifest =
                        self.source
                            .fetch(&import_gav, None, pom, &pom.repositories)?;
                    bom_stack.push(import_gav);
                    let bom = self.resolve_cached(
                        bom_manifest,
                        &pom.active_profiles,
                        pom.initial_repositories.clone(),
                        bom_stack,
                    );
                    bom_stack.pop();
                    let (bom, bom_truncated) = bom?;
                    truncated |= bom_truncated;
                    self.listener.bom_import(bom.gav(), defined_in);
                    for managed in &bom.dependency_management {
                        let mut managed = managed.clone();
                        managed.requested_bom = Some(entry.clone());
                        managed.bom_gav = Some(bom.gav().clone());
                        pom.dependency_management.push(managed);
                    }
                }
                ManagedDependency::Defined {
                    gav,
                    scope,
                    r#type,
                    classifier,
                    exclusions,
                } => {
                    let resolved = ResolvedManagedDependency {
                        gav: pom.values_gav(gav),
                        scope: scope
                            .as_deref()
                            .map(|scope| Scope::from_name(Some(&pom.value(scope)))),
                        r#type: pom.value_opt(r#type.as_deref()),
                        classifier: pom.value_opt(classifier.as_deref()),
                        exclusions: exclusions
                            .as_deref()
                            .unwrap_or_default()
                            .iter()
                            .map(|exclusion| pom.values_ga(exclusion))
                            .collect(),
                        requested: entry.clone(),
                        requested_bom: None,
                        bom_gav: None,
                    };
                    self.listener.dependency_management(&resolved, defined_in);
                    pom.dependency_management.push(resolved);
                }
            }
        }
        Ok(truncated)
    }
}

fn merge_requested_dependencies(pom: &mut ResolvedManifest, incoming: &[Dependency]) {
    pom.requested_dependencies.extend_from_slice(incoming);
}
