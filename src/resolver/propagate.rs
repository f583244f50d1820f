//! Component requirement propagation.
//!
//! After the graph is built every dependency that a package *declares* is
//! present, but only the components a consumer asks for, and whatever those
//! components reference, should contribute flags. [`propagate`] walks the
//! graph from the root and records in a [`Selection`]:
//!
//! - the components selected on each package, in the order they were added
//! - the dependency edges that some selected component actually uses
//!
//! A component reference into the same package (`:other`) selects that
//! component too. References to other packages are grouped per dependency
//! and pushed into the child, which may be reached from several parents and
//! accumulates the union of what they want. Each component is processed once
//! per package, so the walk terminates on cyclic graphs.

use super::Resolver;
use crate::core::{CpsError, Result};
use crate::package::Package;
use petgraph::graph::NodeIndex;
use std::collections::{BTreeSet, HashMap, VecDeque};

/// The part of a package graph that contributes to the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub(super) components: HashMap<NodeIndex, Vec<String>>,
    pub(super) used: HashMap<NodeIndex, BTreeSet<String>>,
}

impl Selection {
    /// Components selected on `node`, in selection order.
    #[must_use]
    pub fn components(&self, node: NodeIndex) -> &[String] {
        self.components.get(&node).map_or(&[], Vec::as_slice)
    }

    /// Whether the edge from `node` to its dependency `dependency` is used.
    #[must_use]
    pub fn uses(&self, node: NodeIndex, dependency: &str) -> bool {
        self.used.get(&node).is_some_and(|deps| deps.contains(dependency))
    }

    /// The used dependencies of `node`, in declaration order.
    #[must_use]
    pub fn used_children(&self, resolver: &Resolver, node: NodeIndex) -> Vec<NodeIndex> {
        resolver
            .children(node)
            .into_iter()
            .filter(|(name, _)| self.uses(node, name))
            .map(|(_, child)| child)
            .collect()
    }
}

/// What one package wants from one of its dependencies.
#[derive(Debug, Default)]
struct Wanted {
    components: Vec<String>,
    defaults: bool,
}

/// Compute which components of every reachable package are needed.
///
/// `requested` components are selected on `root`, preceded by its default
/// components when `use_defaults` is set.
///
/// # Errors
///
/// Returns [`CpsError::MissingComponents`] when a component is selected on a
/// package that does not define it.
pub fn propagate(
    resolver: &Resolver,
    root: NodeIndex,
    requested: &[String],
    use_defaults: bool,
) -> Result<Selection> {
    let mut selection = Selection::default();
    selection.visit(resolver, root, requested, use_defaults)?;
    Ok(selection)
}

impl Selection {
    fn visit(
        &mut self,
        resolver: &Resolver,
        node: NodeIndex,
        wanted: &[String],
        use_defaults: bool,
    ) -> Result<()> {
        let package = resolver.package(node);
        let added = self.select(package, node, wanted, use_defaults)?;
        if added.is_empty() {
            return Ok(());
        }

        let mut order: Vec<&str> = Vec::new();
        let mut by_dependency: HashMap<&str, Wanted> = HashMap::new();
        for name in &added {
            for reference in package.components[name].requires.iter().filter(|r| !r.is_self()) {
                let dependency = reference.package.as_str();
                let entry = by_dependency.entry(dependency).or_insert_with(|| {
                    order.push(dependency);
                    Wanted::default()
                });
                match &reference.component {
                    Some(component) => entry.components.push(component.clone()),
                    None => entry.defaults = true,
                }
            }
        }

        let children = resolver.children(node);
        for dependency in order {
            let Some(&(_, child)) = children.iter().find(|(name, _)| *name == dependency) else {
                tracing::warn!(
                    "{}: a component requires `{dependency}`, which is not a declared dependency; ignoring",
                    package.name
                );
                continue;
            };
            self.used.entry(node).or_default().insert(dependency.to_string());

            let wants = &by_dependency[dependency];
            self.visit(resolver, child, &wants.components, wants.defaults)?;
        }
        Ok(())
    }

    /// Add `wanted` (and the defaults) to the selection of `node`, following
    /// references into the same package. Returns the newly selected
    /// components.
    fn select(
        &mut self,
        package: &Package,
        node: NodeIndex,
        wanted: &[String],
        use_defaults: bool,
    ) -> Result<Vec<String>> {
        let mut queue: VecDeque<String> = VecDeque::new();
        if use_defaults {
            queue.extend(package.defaults().iter().cloned());
        }
        queue.extend(wanted.iter().cloned());

        let selected = self.components.entry(node).or_default();
        let mut added = Vec::new();
        while let Some(name) = queue.pop_front() {
            if selected.contains(&name) {
                continue;
            }
            let Some(component) = package.components.get(&name) else {
                return Err(CpsError::MissingComponents {
                    package: package.name.clone(),
                    components: vec![name],
                });
            };
            tracing::debug!("Selecting {}:{name}", package.name);

            for reference in component.requires.iter().filter(|r| r.is_self()) {
                match &reference.component {
                    Some(own) => queue.push_back(own.clone()),
                    None => queue.extend(package.defaults().iter().cloned()),
                }
            }
            selected.push(name.clone());
            added.push(name);
        }
        Ok(added)
    }
}
