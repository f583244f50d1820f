//! Linearizing the selected part of the package graph.

use super::{Resolver, Selection};
use petgraph::graph::NodeIndex;
use std::collections::{HashSet, VecDeque};

/// Order the packages reachable from `root` over used edges so that every
/// package comes before all of its dependencies.
///
/// The walk is depth-first in declaration order; a package is placed at the
/// front of the result once all of its dependencies have been placed. Each
/// package appears once even when it is reachable along several paths or
/// through a cycle.
#[must_use]
pub fn flatten(resolver: &Resolver, selection: &Selection, root: NodeIndex) -> Vec<NodeIndex> {
    let mut visited = HashSet::new();
    let mut order = VecDeque::new();
    visit(resolver, selection, root, &mut visited, &mut order);
    order.into()
}

fn visit(
    resolver: &Resolver,
    selection: &Selection,
    node: NodeIndex,
    visited: &mut HashSet<NodeIndex>,
    order: &mut VecDeque<NodeIndex>,
) {
    visited.insert(node);
    for child in selection.used_children(resolver, node) {
        if !visited.contains(&child) {
            visit(resolver, selection, child, visited, order);
        }
    }
    order.push_front(node);
}
