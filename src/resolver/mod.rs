//! Dependency resolution for CPS packages.
//!
//! Resolving a package into flags happens in four passes over a shared
//! package graph:
//!
//! 1. **Build** ([`Resolver::build_node`]): load the requested package and,
//!    recursively, everything it requires. Each name is loaded at most once
//!    per run; later requesters share the node, so diamond dependencies are
//!    resolved once. When a candidate file (or anything below it) fails, the
//!    next candidate for that name is tried.
//! 2. **Propagate** ([`propagate`]): starting from the components the caller
//!    asked for, work out which components of every package are actually
//!    needed and which dependency edges are used at all.
//! 3. **Flatten** ([`flatten`]): order the used part of the graph so that
//!    every package precedes its dependencies.
//! 4. **Aggregate** ([`aggregate`]): resolve `@prefix@` placeholders and
//!    concatenate the flags of every selected component.
//!
//! [`find_package`] runs all four with a fresh [`Resolver`].
//!
//! # Graph Representation
//!
//! Packages live in a [`petgraph::stable_graph::StableDiGraph`]; node indices
//! stay valid when a failed candidate is removed again. An edge points from a
//! package to one of its dependencies and is labelled with the dependency
//! name it was declared under.
//!
//! # Limitations
//!
//! The first package successfully loaded for a name is used for the whole
//! run. A later requester whose constraints that package does not satisfy
//! fails instead of receiving a second version of the same name.

pub mod aggregate;
pub mod flatten;
pub mod graph;
pub mod propagate;

pub use aggregate::{ResolvedFlags, aggregate, substitute_prefix};
pub use flatten::flatten;
pub use propagate::{Selection, propagate};

use crate::config::Environment;
use crate::core::Result;
use crate::package::{Package, Requirement};
use crate::search::SearchPaths;
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::path::Path;

/// The arena holding every package loaded during one run.
pub type PackageGraph = StableDiGraph<Package, String>;

/// Run-scoped resolution state: the search directories, the package graph
/// and the cache mapping package names to graph nodes.
#[derive(Debug)]
pub struct Resolver {
    paths: SearchPaths,
    graph: PackageGraph,
    cache: HashMap<String, NodeIndex>,
    /// Names cached so far, in load order; lets a failed candidate undo
    /// everything it loaded.
    journal: Vec<String>,
}

impl Resolver {
    /// A resolver searching the directories derived from `env`.
    #[must_use]
    pub fn new(env: &Environment) -> Self {
        Self::with_search_paths(SearchPaths::new(env))
    }

    /// A resolver searching exactly `paths`.
    #[must_use]
    pub fn with_search_paths(paths: SearchPaths) -> Self {
        Self {
            paths,
            graph: PackageGraph::default(),
            cache: HashMap::new(),
            journal: Vec::new(),
        }
    }

    /// The package graph built so far.
    #[must_use]
    pub const fn graph(&self) -> &PackageGraph {
        &self.graph
    }

    /// The package stored at `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` was not returned by this resolver or was evicted.
    #[must_use]
    pub fn package(&self, node: NodeIndex) -> &Package {
        &self.graph[node]
    }

    /// The cached node for `name`, if one was loaded.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<NodeIndex> {
        self.cache.get(name).copied()
    }

    /// Number of packages currently in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether nothing has been loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// The dependencies of `node` with the names they were declared under,
    /// in declaration order.
    #[must_use]
    pub fn children(&self, node: NodeIndex) -> Vec<(&str, NodeIndex)> {
        let mut children: Vec<(&str, NodeIndex)> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| (edge.weight().as_str(), edge.target()))
            .collect();
        // Requirements are declared in a name-ordered map
        children.sort_by(|a, b| a.0.cmp(b.0));
        children
    }
}

/// Resolve `name` into the flags needed to use it.
///
/// `requested_components` are selected on the root package in addition to
/// its default components when `use_defaults` is set. `prefix_override`
/// replaces the installation prefix of every package.
///
/// # Errors
///
/// Any failure of the individual passes: the package or one of its
/// dependencies cannot be found or loaded, a constraint is not met, or a
/// selected component is unusable.
///
/// # Examples
///
/// ```rust,no_run
/// use cps_config::config::Environment;
/// use cps_config::find_package;
///
/// # fn example() -> cps_config::core::Result<()> {
/// let flags = find_package("fmt", &[], true, &Environment::from_env(), None)?;
/// println!("fmt {} links {:?}", flags.version, flags.link_location);
/// # Ok(())
/// # }
/// ```
pub fn find_package(
    name: &str,
    requested_components: &[String],
    use_defaults: bool,
    env: &Environment,
    prefix_override: Option<&Path>,
) -> Result<ResolvedFlags> {
    Resolver::new(env).resolve(name, requested_components, use_defaults, prefix_override)
}

impl Resolver {
    /// Run every pass for `name` on this resolver.
    ///
    /// # Errors
    ///
    /// See [`find_package`].
    pub fn resolve(
        &mut self,
        name: &str,
        requested_components: &[String],
        use_defaults: bool,
        prefix_override: Option<&Path>,
    ) -> Result<ResolvedFlags> {
        let root = self.build_node(name, &Requirement::components(requested_components.to_vec()))?;
        let selection = propagate(self, root, requested_components, use_defaults)?;
        let order = flatten(self, &selection, root);
        tracing::debug!(
            "Resolved {name}: {}",
            order.iter().map(|node| self.package(*node).name.as_str()).collect::<Vec<_>>().join(" -> ")
        );
        aggregate(self, &selection, &order, prefix_override)
    }
}
