//! Building the package graph.
//!
//! [`Resolver::build_node`] turns a dependency name and its constraints into a
//! graph node, loading and validating candidate files and recursing into
//! their requirements.
//!
//! A node is cached as soon as its package passes validation and before its
//! own requirements are resolved, so cycles and diamonds find the node that
//! is already being built. If a requirement then fails, everything the
//! candidate loaded is rolled back and the next candidate is tried.

use super::Resolver;
use crate::core::{CpsError, Result};
use crate::loader::load_file;
use crate::package::{Package, Requirement};
use crate::search::Candidate;
use crate::version::{Operator, compare};
use petgraph::graph::NodeIndex;

impl Resolver {
    /// Resolve `name` under `requirement` into a node of the package graph.
    ///
    /// # Errors
    ///
    /// - [`CpsError::PackageNotFound`] when no candidate file exists
    /// - a constraint error when a package already loaded for `name` does not
    ///   satisfy `requirement`
    /// - [`CpsError::ResolutionFailed`] with one cause per candidate when
    ///   every candidate failed
    pub fn build_node(&mut self, name: &str, requirement: &Requirement) -> Result<NodeIndex> {
        if let Some(node) = self.lookup(name) {
            tracing::debug!("Reusing {name} from {}", self.package(node).source.display());
            check_requirement(self.package(node), requirement)?;
            return Ok(node);
        }

        let candidates = self.paths.find_candidates(name)?;
        let mut causes = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            match self.try_candidate(name, requirement, candidate) {
                Ok(node) => return Ok(node),
                Err(cause) => {
                    tracing::debug!("Rejected {} for {name}: {cause}", candidate.path.display());
                    causes.push(cause);
                }
            }
        }

        Err(CpsError::ResolutionFailed {
            name: name.to_string(),
            causes,
        })
    }

    fn try_candidate(
        &mut self,
        name: &str,
        requirement: &Requirement,
        candidate: &Candidate,
    ) -> Result<NodeIndex> {
        let package = load_file(&candidate.path, candidate.kind)?;
        check_requirement(&package, requirement)?;

        let requires: Vec<(String, Requirement)> =
            package.requires.iter().map(|(dep, req)| (dep.clone(), req.clone())).collect();

        let mark = self.journal.len();
        let node = self.graph.add_node(package);
        self.cache.insert(name.to_string(), node);
        self.journal.push(name.to_string());

        let mut children = Vec::with_capacity(requires.len());
        for (dep, req) in requires {
            match self.build_node(&dep, &req) {
                Ok(child) => children.push((dep, child)),
                Err(err) => {
                    self.rollback(mark);
                    return Err(err);
                }
            }
        }

        for (dep, child) in children {
            self.graph.add_edge(node, child, dep);
        }
        Ok(node)
    }

    /// Remove every node cached after the journal position `mark`.
    fn rollback(&mut self, mark: usize) {
        for name in self.journal.drain(mark..).rev() {
            if let Some(node) = self.cache.remove(&name) {
                tracing::debug!("Evicting {name}");
                self.graph.remove_node(node);
            }
        }
    }
}

/// Check that `package` satisfies the version and component constraints of
/// `requirement`.
///
/// # Errors
///
/// - [`CpsError::NoVersion`] when a version is required but the package has none
/// - [`CpsError::VersionTooOld`] when its effective version is lower than required
/// - [`CpsError::MissingComponents`] when required components are not defined
/// - comparison errors for malformed versions or unsupported schemas
pub fn check_requirement(package: &Package, requirement: &Requirement) -> Result<()> {
    if let Some(required) = &requirement.version {
        let file = package.source.display().to_string();
        let Some(effective) = package.effective_version() else {
            return Err(CpsError::NoVersion {
                file,
                required: required.clone(),
            });
        };
        if compare(effective, Operator::Lt, required, package.version_schema)? {
            let (found, compat_version) = match &package.version {
                Some(version) => (version.clone(), package.compat_version.clone()),
                None => (effective.to_string(), None),
            };
            return Err(CpsError::VersionTooOld {
                file,
                found,
                compat_version,
                required: required.clone(),
                schema: package.version_schema.to_string(),
            });
        }
    }

    let missing = package.missing_components(&requirement.components);
    if !missing.is_empty() {
        return Err(CpsError::MissingComponents {
            package: package.name.clone(),
            components: missing.into_iter().map(str::to_string).collect(),
        });
    }
    Ok(())
}
