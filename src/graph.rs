//! Transitive dependency graph expansion
//!
//! Starting from a resolved manifest's direct dependencies, expansion
//! walks the graph breadth-first: every sighting of a group-artifact
//! contributes a version constraint, and whenever a later sighting
//! changes the winning version for a coordinate the whole expansion
//! restarts with the accumulated requirements. Restarting converges
//! because requirements only grow.
//!
//! Nodes live in one arena `Vec` in placement order; edges are indices
//! into it. The first requester of a group-artifact places and links the
//! node; later sightings only contribute their version constraint.

use crate::error::{ResolutionError, ResolutionFailure, ResolutionFailures};
use crate::manifest::Dependency;
use crate::placeholder;
use crate::requirement::VersionRequirement;
use crate::resolved::{ResolvedManifest, Resolver};
use crate::scope::Scope;
use crate::types::{
    matches_glob, GroupArtifact, GroupArtifactVersion, License, ResolvedGroupArtifactVersion,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, warn};

/// Cap on conflict-driven restarts before resolution is declared
/// non-convergent. Requirements only grow, so a well-behaved version
/// resolver converges in a handful of restarts; pathological resolvers
/// that flip between winners are cut off here.
const MAX_RESTARTS: u32 = 100;

/// One placed node of the resolved dependency graph.
#[derive(Clone, Debug)]
pub struct ResolvedDependency {
    /// The concrete coordinate, including the repository the manifest was
    /// fetched from.
    pub gav: ResolvedGroupArtifactVersion,
    /// The dependency exactly as the declaring manifest requested it.
    pub requested: Dependency,
    pub scope: Scope,
    /// Distance from the requesting manifest; direct dependencies are 0.
    pub depth: usize,
    pub licenses: Vec<License>,
    pub r#type: Option<String>,
    pub classifier: Option<String>,
    pub optional: bool,
    /// Exclusions of this node that actually pruned a child.
    pub effective_exclusions: Vec<GroupArtifact>,
    /// Arena indices of this node's resolved children.
    pub children: Vec<usize>,
}

impl ResolvedDependency {
    pub fn group_artifact(&self) -> GroupArtifact {
        self.gav.group_artifact()
    }

    /// Whether this node matches a dependency key, normalizing type to
    /// `jar`.
    pub fn matches(
        &self,
        group_id: &str,
        artifact_id: &str,
        r#type: Option<&str>,
        classifier: Option<&str>,
    ) -> bool {
        self.gav.group_id == group_id
            && self.gav.artifact_id == artifact_id
            && self.r#type.as_deref().unwrap_or("jar") == r#type.unwrap_or("jar")
            && self.classifier.as_deref() == classifier
    }
}

/// One pending unit of expansion work.
struct FrontierItem {
    /// The dependency as declared by `defined_in`, not yet substituted.
    dependency: Dependency,
    scope: Scope,
    depth: usize,
    /// Arena index of the node that requested this dependency.
    parent: Option<usize>,
    /// The direct dependency whose subtree this item belongs to, for
    /// failure attribution.
    root: Dependency,
    defined_in: Arc<ResolvedManifest>,
}

enum Outcome {
    Continue,
    /// A version conflict invalidated an already-placed node.
    Restart,
}

impl<'a> Resolver<'a> {
    /// Expand the dependency graph of `pom` for one target classpath.
    ///
    /// Returns nodes in placement order, direct dependencies first. Per
    /// dependency failures accumulate and are reported together; a source
    /// failure aborts immediately.
    pub fn resolve_dependencies(
        &self,
        pom: &ResolvedManifest,
        scope: Scope,
    ) -> Result<Vec<ResolvedDependency>, ResolutionFailures> {
        let mut requirements = HashMap::new();
        self.resolve_dependencies_with(pom, scope, &mut requirements)
    }

    /// Like [`Self::resolve_dependencies`], but sharing a requirements
    /// map across calls so sibling classpaths converge on the same
    /// versions.
    pub fn resolve_dependencies_with(
        &self,
        pom: &ResolvedManifest,
        scope: Scope,
        requirements: &mut HashMap<GroupArtifact, VersionRequirement>,
    ) -> Result<Vec<ResolvedDependency>, ResolutionFailures> {
        let top = Arc::new(pom.clone());
        let mut restarts = 0u32;

        'restart: loop {
            let mut nodes: Vec<ResolvedDependency> = Vec::new();
            let mut failures: Vec<ResolutionFailure> = Vec::new();
            let mut frontier: VecDeque<FrontierItem> = VecDeque::new();

            for requested in &top.requested_dependencies {
                let substituted = top.substitute_dependency(requested);
                let declared = Scope::from_name(substituted.scope.as_deref());
                if !declared.is_in_classpath_of(scope) {
                    continue;
                }
                frontier.push_back(FrontierItem {
                    dependency: requested.clone(),
                    scope,
                    depth: 0,
                    parent: None,
                    root: requested.clone(),
                    defined_in: top.clone(),
                });
            }

            while let Some(item) = frontier.pop_front() {
                match self.process_item(
                    &item,
                    scope,
                    &top,
                    &mut nodes,
                    &mut frontier,
                    requirements,
                ) {
                    Ok(Outcome::Continue) => {}
                    Ok(Outcome::Restart) => {
                        restarts += 1;
                        if restarts >= MAX_RESTARTS {
                            warn!(gav = %top.gav(), restarts, "version requirements did not converge");
                            return Err(ResolutionFailures::fatal(
                                item.root.gav.clone(),
                                ResolutionError::NoConvergence { restarts },
                            ));
                        }
                        debug!(
                            ga = %item.dependency.gav.group_artifact(),
                            restarts, "version conflict, restarting expansion"
                        );
                        self.listener.clear();
                        continue 'restart;
                    }
                    Err(error) if error.is_fatal() => {
                        return Err(ResolutionFailures::fatal(item.root.gav.clone(), error));
                    }
                    Err(error) => failures.push(ResolutionFailure {
                        root: item.root.gav.clone(),
                        error,
                    }),
                }
            }

            if !failures.is_empty() {
                return Err(ResolutionFailures::new(failures));
            }
            return Ok(nodes);
        }
    }

    fn process_item(
        &self,
        item: &FrontierItem,
        target: Scope,
        top: &Arc<ResolvedManifest>,
        nodes: &mut Vec<ResolvedDependency>,
        frontier: &mut VecDeque<FrontierItem>,
        requirements: &mut HashMap<GroupArtifact, VersionRequirement>,
    ) -> Result<Outcome, ResolutionError> {
        // Substitute against the manifest that declared the dependency,
        // then let the requesting manifest's management override.
        let d = item.defined_in.substitute_dependency(&item.dependency);
        let d = top.substitute_dependency(&d);

        let Some(group_id) = d.gav.group_id.clone() else {
            return Err(ResolutionError::Model {
                message: format!("dependency {} declares no group id", d.gav),
            });
        };
        let Some(version) = d.gav.version.clone() else {
            return Err(ResolutionError::MissingVersion { gav: d.gav.clone() });
        };

        // Only archive dependencies are expanded; other types carry no
        // manifest of their own.
        if let Some(r#type) = d.r#type.as_deref() {
            if r#type != "jar" && r#type != "pom" {
                return Ok(Outcome::Continue);
            }
        }

        if placeholder::is_unresolved(&group_id)
            || placeholder::is_unresolved(&d.gav.artifact_id)
            || placeholder::is_unresolved(&version)
        {
            return Err(ResolutionError::UnresolvedProperty { gav: d.gav.clone() });
        }

        let ga = GroupArtifact {
            group_id: Some(group_id.clone()),
            artifact_id: d.gav.artifact_id.clone(),
        };

        // Record the sighting before resolving so that the requirement
        // set reflects this constraint even if resolution fails.
        let resolved_version = match requirements.get(&ga).cloned() {
            None => {
                let requirement = VersionRequirement::from_version(&version, item.depth);
                requirements.insert(ga.clone(), requirement.clone());
                match self.versions.resolve(&ga, &requirement, &top.repositories) {
                    Some(resolved) => resolved,
                    None => {
                        return Err(ResolutionError::UnresolvableVersion {
                            group_artifact: ga,
                            requirement: requirement.to_string(),
                        });
                    }
                }
            }
            Some(existing) => {
                let merged = existing.merge(&version);
                let winner_before = self.versions.resolve(&ga, &existing, &top.repositories);
                let winner_after = self.versions.resolve(&ga, &merged, &top.repositories);
                requirements.insert(ga.clone(), merged.clone());
                let Some(winner_after) = winner_after else {
                    return Err(ResolutionError::UnresolvableVersion {
                        group_artifact: ga,
                        requirement: merged.to_string(),
                    });
                };
                // A changed winner invalidates anything resolved so far,
                // even placements of other coordinates influenced by it.
                if winner_before.as_deref() != Some(&winner_after) {
                    return Ok(Outcome::Restart);
                }
                if nodes.iter().any(|node| {
                    node.gav.group_id == group_id
                        && node.gav.artifact_id == ga.artifact_id
                        && node.classifier == d.classifier
                }) {
                    return Ok(Outcome::Continue);
                }
                winner_after
            }
        };

        let fetch_gav = GroupArtifactVersion {
            group_id: Some(group_id),
            artifact_id: ga.artifact_id.clone(),
            version: Some(resolved_version),
        };
        let manifest = self
            .source
            .fetch(&fetch_gav, None, &item.defined_in, &top.repositories)?;
        let mut bom_stack = Vec::new();
        let (resolved_pom, _) = self.resolve_cached(
            manifest,
            &top.active_profiles,
            top.initial_repositories.clone(),
            &mut bom_stack,
        )?;

        let index = nodes.len();
        let optional = item
            .dependency
            .optional
            .as_deref()
            .map(|optional| resolved_pom.value(optional).trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let node = ResolvedDependency {
            gav: resolved_pom.gav().clone(),
            requested: item.dependency.clone(),
            scope: item.scope,
            depth: item.depth,
            licenses: resolved_pom.requested.licenses.clone(),
            r#type: resolved_pom.value_opt(item.dependency.r#type.as_deref()),
            classifier: resolved_pom.value_opt(item.dependency.classifier.as_deref()),
            optional,
            effective_exclusions: Vec::new(),
            children: Vec::new(),
        };
        if let Some(parent) = item.parent {
            nodes[parent].children.push(index);
        }
        self.listener.dependency(item.scope, &node, &item.defined_in);
        nodes.push(node);

        'children: for child in &resolved_pom.requested_dependencies {
            let mut child = child.clone();
            if child.gav.group_id.is_none() {
                child.gav.group_id = Some(resolved_pom.group_id().to_string());
            }
            if let Some(optional) = child.optional.as_deref() {
                if resolved_pom.value(optional).trim().eq_ignore_ascii_case("true") {
                    continue;
                }
            }

            let child_scope = self.dependency_scope(&child, top, &resolved_pom);
            if !child_scope.is_in_classpath_of(item.scope)
                || !(child_scope.is_transitive() || child_scope == target)
            {
                continue;
            }

            if let Some(exclusions) = d.exclusions.as_deref() {
                let child_group = child.gav.group_id.as_deref().unwrap_or("");
                for exclusion in exclusions {
                    let group_pattern = top
                        .value_opt(exclusion.group_id.as_deref())
                        .unwrap_or_else(|| "*".to_string());
                    let artifact_pattern = top.value(&exclusion.artifact_id);
                    if matches_glob(child_group, &group_pattern)
                        && matches_glob(&child.gav.artifact_id, &artifact_pattern)
                    {
                        nodes[index].effective_exclusions.push(exclusion.clone());
                        continue 'children;
                    }
                }
                // exclusions apply to the whole subtree
                let mut merged = child.exclusions.take().unwrap_or_default();
                merged.extend(exclusions.iter().cloned());
                child.exclusions = Some(merged);
            }

            frontier.push_back(FrontierItem {
                dependency: child,
                scope: child_scope,
                depth: item.depth + 1,
                parent: Some(index),
                root: item.root.clone(),
                defined_in: resolved_pom.clone(),
            });
        }

        Ok(Outcome::Continue)
    }

    /// The effective scope of a transitive dependency: its declared scope
    /// (or the declaring manifest's managed scope), possibly narrowed by
    /// the requesting manifest's own management.
    fn dependency_scope(
        &self,
        child: &Dependency,
        top: &ResolvedManifest,
        containing: &ResolvedManifest,
    ) -> Scope {
        let group_id = child.gav.group_id.as_deref().unwrap_or("");
        let scope_in_containing = match child.scope.as_deref() {
            Some(scope) => Scope::from_name(Some(&containing.value(scope))),
            None => containing
                .managed_scope(
                    group_id,
                    &child.gav.artifact_id,
                    child.r#type.as_deref(),
                    child.classifier.as_deref(),
                )
                .unwrap_or(Scope::Compile),
        };
        match top.managed_scope(
            group_id,
            &child.gav.artifact_id,
            child.r#type.as_deref(),
            child.classifier.as_deref(),
        ) {
            Some(scope_in_top) if scope_in_containing.is_in_classpath_of(scope_in_top) => {
                scope_in_top
            }
            _ => scope_in_containing,
        }
    }
}
