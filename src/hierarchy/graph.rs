//! Class hierarchy graph.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use tracing::debug;

use super::ancestors::reverse_bfs;
use super::node::Node;
use crate::error::{Error, Result};

/// A directed class hierarchy with edges pointing parent -> child.
///
/// The Root always exists. Real categories are attached with
/// [`add_edge`](Self::add_edge) / [`add_top_level`](Self::add_top_level), or
/// read from an existing graph that marks its root with a sentinel value.
///
/// Structure is not validated: a hierarchy where some node cannot reach the
/// Root, or that contains cycles, is accepted and simply yields whatever the
/// upward traversal finds.
#[derive(Debug, Clone)]
pub struct Hierarchy<L> {
    graph: DiGraph<Node<L>, ()>,
    index: HashMap<Node<L>, NodeIndex>,
    root: NodeIndex,
}

impl<L: Clone + Eq + Hash> Hierarchy<L> {
    /// Create a hierarchy holding only the Root.
    pub fn new() -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(Node::Root);
        let mut index = HashMap::new();
        let _ = index.insert(Node::Root, root);
        Self { graph, index, root }
    }

    /// Build from `(parent, child)` pairs.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (Node<L>, L)>,
    {
        let mut hierarchy = Self::new();
        for (parent, child) in edges {
            hierarchy.add_edge(parent, child);
        }
        hierarchy
    }

    /// Build from `(parent, child)` label pairs where `sentinel` marks the Root.
    ///
    /// Fails with [`Error::MissingRoot`] if no pair mentions the sentinel.
    pub fn from_sentinel_edges<I>(edges: I, sentinel: &L) -> Result<Self>
    where
        I: IntoIterator<Item = (L, L)>,
    {
        let mut hierarchy = Self::new();
        let mut saw_root = false;
        for (parent, child) in edges {
            let parent = Node::from_sentinel(parent, sentinel);
            let child = Node::from_sentinel(child, sentinel);
            saw_root |= parent.is_root() || child.is_root();
            hierarchy.connect(parent, child);
        }
        if !saw_root {
            return Err(Error::MissingRoot);
        }
        debug!(
            nodes = hierarchy.node_count(),
            edges = hierarchy.edge_count(),
            "built hierarchy from sentinel edges"
        );
        Ok(hierarchy)
    }

    /// Build from a petgraph graph whose root node carries `sentinel`.
    ///
    /// Isolated nodes are kept as labels with no parent.
    pub fn from_digraph<E>(graph: &DiGraph<L, E>, sentinel: &L) -> Result<Self> {
        if !graph.node_weights().any(|w| w == sentinel) {
            return Err(Error::MissingRoot);
        }
        let mut hierarchy = Self::new();
        for weight in graph.node_weights() {
            let _ = hierarchy.ensure(Node::from_sentinel(weight.clone(), sentinel));
        }
        for edge in graph.edge_references() {
            let parent = Node::from_sentinel(graph[edge.source()].clone(), sentinel);
            let child = Node::from_sentinel(graph[edge.target()].clone(), sentinel);
            hierarchy.connect(parent, child);
        }
        debug!(
            nodes = hierarchy.node_count(),
            edges = hierarchy.edge_count(),
            "built hierarchy from digraph"
        );
        Ok(hierarchy)
    }

    /// Add a label with no edges. No-op if it already exists.
    pub fn add_node(&mut self, label: L) {
        let _ = self.ensure(Node::Label(label));
    }

    /// Add a parent -> child edge, creating either endpoint as needed.
    pub fn add_edge(&mut self, parent: Node<L>, child: L) {
        self.connect(parent, Node::Label(child));
    }

    /// Attach `child` directly under the Root.
    pub fn add_top_level(&mut self, child: L) {
        self.add_edge(Node::Root, child);
    }

    fn connect(&mut self, parent: Node<L>, child: Node<L>) {
        let p = self.ensure(parent);
        let c = self.ensure(child);
        // Parallel edges collapse into one.
        let _ = self.graph.update_edge(p, c, ());
    }

    fn ensure(&mut self, node: Node<L>) -> NodeIndex {
        if let Some(&ix) = self.index.get(&node) {
            return ix;
        }
        let ix = self.graph.add_node(node.clone());
        let _ = self.index.insert(node, ix);
        ix
    }

    /// Total number of nodes, Root included.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of real categories (every node except the Root).
    pub fn n_labels(&self) -> usize {
        self.graph.node_count() - 1
    }

    /// Number of parent -> child edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Is `label` one of the hierarchy's categories?
    pub fn contains(&self, label: &L) -> bool {
        self.index.contains_key(&Node::Label(label.clone()))
    }

    /// All nodes, Root included, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<L>> {
        self.graph.node_weights()
    }

    /// All real categories in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &L> {
        self.graph.node_weights().filter_map(Node::as_label)
    }

    /// All `(parent, child)` edges.
    pub fn edges(&self) -> impl Iterator<Item = (&Node<L>, &Node<L>)> {
        self.graph
            .edge_references()
            .map(|e| (&self.graph[e.source()], &self.graph[e.target()]))
    }

    /// Direct parents of `label`.
    pub fn parents(&self, label: &L) -> Result<Vec<&Node<L>>>
    where
        L: Debug,
    {
        let ix = self.label_index(label)?;
        Ok(self
            .graph
            .neighbors_directed(ix, Direction::Incoming)
            .map(|p| &self.graph[p])
            .collect())
    }

    /// Direct children of `node`.
    pub fn children(&self, node: &Node<L>) -> Result<Vec<&L>>
    where
        L: Debug,
    {
        let ix = self
            .index
            .get(node)
            .copied()
            .ok_or_else(|| Error::UnknownNode(format!("{node:?}")))?;
        Ok(self
            .graph
            .neighbors_directed(ix, Direction::Outgoing)
            .filter_map(|c| self.graph[c].as_label())
            .collect())
    }

    /// The ancestor set of `label`: itself plus everything above it, minus the Root.
    ///
    /// Ordered by breadth-first distance from `label`.
    pub fn ancestors(&self, label: &L) -> Result<Vec<&L>>
    where
        L: Debug,
    {
        let ix = self.label_index(label)?;
        Ok(reverse_bfs(&self.graph, self.root, ix)
            .into_iter()
            .filter_map(|a| self.graph[a].as_label())
            .collect())
    }

    /// Rebuild the hierarchy with every label passed through `f`.
    ///
    /// Labels that map to the same value merge into one node.
    pub fn try_map_labels<M, F>(&self, mut f: F) -> Result<Hierarchy<M>>
    where
        M: Clone + Eq + Hash,
        F: FnMut(&L) -> Result<M>,
    {
        let mut mapped: Vec<Node<M>> = Vec::with_capacity(self.graph.node_count());
        for node in self.graph.node_weights() {
            mapped.push(match node {
                Node::Root => Node::Root,
                Node::Label(label) => Node::Label(f(label)?),
            });
        }

        let mut out = Hierarchy::new();
        for node in &mapped {
            let _ = out.ensure(node.clone());
        }
        for edge in self.graph.edge_references() {
            out.connect(
                mapped[edge.source().index()].clone(),
                mapped[edge.target().index()].clone(),
            );
        }
        Ok(out)
    }

    fn label_index(&self, label: &L) -> Result<NodeIndex>
    where
        L: Debug,
    {
        self.index
            .get(&Node::Label(label.clone()))
            .copied()
            .ok_or_else(|| Error::UnknownNode(format!("{label:?}")))
    }

    pub(crate) fn graph(&self) -> &DiGraph<Node<L>, ()> {
        &self.graph
    }

    pub(crate) fn root_index(&self) -> NodeIndex {
        self.root
    }
}

impl<L: Clone + Eq + Hash> Default for Hierarchy<L> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::hierarchy::ROOT;

    fn animals() -> Hierarchy<&'static str> {
        let mut h = Hierarchy::new();
        h.add_top_level("animal");
        h.add_top_level("plant");
        h.add_edge(Node::Label("animal"), "mammal");
        h.add_edge(Node::Label("mammal"), "cat");
        h.add_edge(Node::Label("mammal"), "dog");
        h
    }

    #[test]
    fn counts_exclude_root_from_labels() {
        let h = animals();
        assert_eq!(h.node_count(), 6);
        assert_eq!(h.n_labels(), 5);
        assert_eq!(h.edge_count(), 5);
        assert!(h.contains(&"cat"));
        assert!(!h.contains(&"fish"));
    }

    #[test]
    fn duplicate_edges_collapse() {
        let mut h = animals();
        h.add_edge(Node::Label("mammal"), "cat");
        assert_eq!(h.edge_count(), 5);
    }

    #[test]
    fn ancestors_include_self_and_skip_root() {
        let h = animals();
        let mut up = h.ancestors(&"cat").unwrap();
        up.sort_unstable();
        assert_eq!(up, vec![&"animal", &"cat", &"mammal"]);
        assert_eq!(h.ancestors(&"plant").unwrap(), vec![&"plant"]);
    }

    #[test]
    fn ancestors_follow_every_parent_in_a_dag() {
        let mut h = animals();
        h.add_edge(Node::Label("plant"), "carnivorous");
        h.add_edge(Node::Label("animal"), "carnivorous");
        let mut up = h.ancestors(&"carnivorous").unwrap();
        up.sort_unstable();
        assert_eq!(up, vec![&"animal", &"carnivorous", &"plant"]);
    }

    #[test]
    fn unknown_label_is_an_error() {
        let h = animals();
        assert!(matches!(h.ancestors(&"fish"), Err(Error::UnknownNode(_))));
        assert!(matches!(h.parents(&"fish"), Err(Error::UnknownNode(_))));
    }

    #[test]
    fn parents_and_children() {
        let h = animals();
        assert_eq!(h.parents(&"animal").unwrap(), vec![&Node::Root]);
        let mut kids = h.children(&Node::Label("mammal")).unwrap();
        kids.sort_unstable();
        assert_eq!(kids, vec![&"cat", &"dog"]);
        assert_eq!(h.children(&Node::Root).unwrap().len(), 2);
    }

    #[test]
    fn sentinel_edges_require_root() {
        let edges = vec![(ROOT, "a"), ("a", "b")];
        let h = Hierarchy::from_sentinel_edges(edges, &ROOT).unwrap();
        assert_eq!(h.n_labels(), 2);
        assert_eq!(h.parents(&"a").unwrap(), vec![&Node::Root]);

        let missing = Hierarchy::from_sentinel_edges(vec![("a", "b")], &ROOT);
        assert_eq!(missing.unwrap_err(), Error::MissingRoot);
    }

    #[test]
    fn from_digraph_keeps_isolated_nodes() {
        let mut g = DiGraph::<&str, ()>::new();
        let root = g.add_node(ROOT);
        let a = g.add_node("a");
        let _lonely = g.add_node("lonely");
        let _ = g.add_edge(root, a, ());

        let h = Hierarchy::from_digraph(&g, &ROOT).unwrap();
        assert_eq!(h.n_labels(), 2);
        assert!(h.parents(&"lonely").unwrap().is_empty());

        let no_root = DiGraph::<&str, ()>::new();
        assert_eq!(
            Hierarchy::from_digraph(&no_root, &ROOT).unwrap_err(),
            Error::MissingRoot
        );
    }

    #[test]
    fn map_labels_preserves_edges() {
        let h = animals();
        let upper = h
            .try_map_labels(|l| Ok(l.to_uppercase()))
            .unwrap();
        assert_eq!(upper.edge_count(), h.edge_count());
        let mut up = upper.ancestors(&"CAT".to_string()).unwrap();
        up.sort_unstable();
        assert_eq!(up, vec!["ANIMAL", "CAT", "MAMMAL"]);
    }

    #[test]
    fn from_edges_matches_incremental_build() {
        let h = Hierarchy::from_edges(vec![
            (Node::Root, "animal"),
            (Node::Root, "plant"),
            (Node::Label("animal"), "mammal"),
            (Node::Label("mammal"), "cat"),
            (Node::Label("mammal"), "dog"),
            (Node::Label("mammal"), "dog"),
        ]);
        let mut expected: Vec<_> = animals().edges().map(|(p, c)| (*p, *c)).collect();
        let mut edges: Vec<_> = h.edges().map(|(p, c)| (*p, *c)).collect();
        expected.sort_unstable();
        edges.sort_unstable();
        assert_eq!(edges, expected);
        assert_eq!(h.n_labels(), 5);
    }

    #[test]
    fn add_node_creates_an_isolated_label() {
        let mut h = animals();
        h.add_node("fungus");
        assert_eq!(h.n_labels(), 6);
        assert_eq!(h.edge_count(), 5);
        assert!(h.parents(&"fungus").unwrap().is_empty());
        assert_eq!(h.ancestors(&"fungus").unwrap(), vec![&"fungus"]);

        // Existing labels keep their edges.
        h.add_node("cat");
        assert_eq!(h.n_labels(), 6);
        assert_eq!(h.parents(&"cat").unwrap(), vec![&Node::Label("mammal")]);
    }

    #[test]
    fn nodes_include_root_first() {
        let h = animals();
        let nodes: Vec<_> = h.nodes().collect();
        assert_eq!(nodes.len(), h.node_count());
        assert_eq!(nodes[0], &Node::Root);
        assert_eq!(nodes.iter().filter(|n| n.is_root()).count(), 1);
        assert!(nodes.contains(&&Node::Label("dog")));
    }
}
