//! Upward reachability over a hierarchy.
//!
//! The ancestor set of a node is everything reachable by walking parent
//! edges, the node itself included (distance 0) and the Root excluded.
//! Traversal follows incoming edges on a shared borrow of the graph, so the
//! hierarchy is never reversed or otherwise touched.

use std::collections::VecDeque;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{VisitMap, Visitable};
use petgraph::Direction;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::graph::Hierarchy;
use super::node::Node;
use crate::error::{Error, Result};

/// Breadth-first walk from `start` along child -> parent edges.
///
/// Returns visited nodes in distance order, `start` first, `root` omitted.
pub(crate) fn reverse_bfs<L>(
    graph: &DiGraph<Node<L>, ()>,
    root: NodeIndex,
    start: NodeIndex,
) -> Vec<NodeIndex> {
    let mut discovered = graph.visit_map();
    let mut queue = VecDeque::new();
    let mut order = Vec::new();

    let _ = discovered.visit(start);
    queue.push_back(start);

    while let Some(node) = queue.pop_front() {
        if node == root {
            continue;
        }
        order.push(node);
        for parent in graph.neighbors_directed(node, Direction::Incoming) {
            if discovered.visit(parent) {
                queue.push_back(parent);
            }
        }
    }

    order
}

/// Per-column ancestor sets for an integer-indexed hierarchy.
///
/// Built once per hierarchy and reusable across any number of fills.
/// `sets[c]` lists the columns to mark whenever column `c` is positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorSets {
    sets: Vec<Vec<usize>>,
}

impl AncestorSets {
    /// Compute ancestor sets for every label of `hierarchy`.
    ///
    /// Labels must be exactly the ids `0..n_labels`; anything at or beyond
    /// `n_labels` is rejected with [`Error::NodeOutOfRange`].
    pub fn new(hierarchy: &Hierarchy<usize>) -> Result<Self> {
        let n = hierarchy.n_labels();
        let graph = hierarchy.graph();
        let root = hierarchy.root_index();

        let mut columns: Vec<(usize, NodeIndex)> = Vec::with_capacity(n);
        for ix in graph.node_indices() {
            if let Node::Label(id) = graph[ix] {
                if id >= n {
                    return Err(Error::NodeOutOfRange {
                        node: id,
                        n_columns: n,
                    });
                }
                columns.push((id, ix));
            }
        }

        let walk = |&(id, ix): &(usize, NodeIndex)| {
            let ancestors: Vec<usize> = reverse_bfs(graph, root, ix)
                .into_iter()
                .filter_map(|a| graph[a].as_label().copied())
                .collect();
            (id, ancestors)
        };

        #[cfg(feature = "parallel")]
        let walked: Vec<(usize, Vec<usize>)> = columns.par_iter().map(walk).collect();

        #[cfg(not(feature = "parallel"))]
        let walked: Vec<(usize, Vec<usize>)> = columns.iter().map(walk).collect();

        // n distinct ids all below n means every column is covered.
        let mut sets = vec![Vec::new(); n];
        for (id, ancestors) in walked {
            sets[id] = ancestors;
        }

        debug!(
            columns = n,
            memberships = sets.iter().map(Vec::len).sum::<usize>(),
            "computed ancestor sets"
        );
        Ok(Self { sets })
    }

    /// Number of columns covered.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// True when the hierarchy has no labels.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Ancestor columns of `column`, itself included.
    pub fn get(&self, column: usize) -> Option<&[usize]> {
        self.sets.get(column).map(Vec::as_slice)
    }

    /// Iterate `(column, ancestors)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.sets.iter().enumerate().map(|(c, s)| (c, s.as_slice()))
    }
}
