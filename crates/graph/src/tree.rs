//! Rooted trees.
//!
//! A [`Tree`] is a directed graph whose edges run from parent to child. Each
//! child records its position among its parent's children; removing a child
//! renumbers the siblings after it. The generic [`Graph::add_edge`] stays
//! available, so a tree can be made invalid on purpose and then checked with
//! [`Tree::is_valid_tree`].

use crate::graph::{describe_node, edge_schema, Graph, GraphKind};
use crate::keys::GraphKeys;
use crate::links::End;
use alloc::format;
use alloc::vec;
use alloc::vec::Vec;
use core::ops::Deref;
use hashbrown::HashSet;
use tracing::warn;
use trellis_core::{Error, Result, RowId};
use trellis_table::Table;

/// A rooted tree over a node table and a parent/child edge table.
#[derive(Clone)]
pub struct Tree {
    graph: Graph,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Creates an empty tree with `parent`/`child` edge columns.
    pub fn new() -> Self {
        let keys = GraphKeys::tree();
        let edges = Table::from_schema(&edge_schema(&keys));
        let graph = Graph::assemble(Table::new(), edges, true, keys, None, GraphKind::Tree, None);
        Self { graph }
    }

    /// Creates a tree over existing tables with `parent`/`child` edge columns.
    pub fn with_tables(nodes: Table, edges: Table) -> Result<Self> {
        Self::with_keys(nodes, edges, GraphKeys::tree())
    }

    /// Creates a tree over existing tables. The first node without a parent
    /// becomes the root.
    pub fn with_keys(nodes: Table, edges: Table, keys: GraphKeys) -> Result<Self> {
        let graph = Graph::build(nodes, edges, true, keys, GraphKind::Tree, None)?;
        let root = graph
            .nodes()
            .into_iter()
            .find(|&node| graph.in_degree(node).map_or(false, |d| d == 0));
        graph.inner.root.set(root);
        Ok(Self { graph })
    }

    pub(crate) fn from_graph(graph: Graph) -> Self {
        Self { graph }
    }

    /// Returns the tree as a graph.
    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn root(&self) -> Option<RowId> {
        self.graph.inner.root.get()
    }

    /// Adds the root node. Fails unless the tree is empty.
    pub fn add_root(&self) -> Result<RowId> {
        self.ensure_mutable()?;
        if self.node_count() > 0 {
            return Err(Error::unsupported("a tree can only get a root while empty"));
        }
        let root = self.node_table().add_row()?;
        self.graph.inner.root.set(Some(root));
        Ok(root)
    }

    /// Adds a new node as the last child of `parent` and returns it.
    pub fn add_child(&self, parent: RowId) -> Result<RowId> {
        self.ensure_mutable()?;
        self.check_node(parent)?;
        let child = self.node_table().add_row()?;
        self.insert_edge(parent, child)?;
        Ok(child)
    }

    /// Connects an existing parentless node as the last child of `parent`.
    pub fn add_child_edge(&self, parent: RowId, child: RowId) -> Result<RowId> {
        self.ensure_mutable()?;
        self.check_node(parent)?;
        self.check_node(child)?;
        if self.root() == Some(child) || self.in_degree(child)? > 0 {
            return Err(Error::invalid_argument(format!("node {} already has a parent", child)));
        }
        if self.is_ancestor(child, parent) {
            return Err(Error::invalid_argument(format!(
                "node {} is an ancestor of node {}",
                child, parent
            )));
        }
        self.insert_edge(parent, child)
    }

    fn is_ancestor(&self, ancestor: RowId, node: RowId) -> bool {
        let mut current = Some(node);
        let mut steps = 0;
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.node_count() {
                break;
            }
            current = self.parent(n);
        }
        false
    }

    /// Removes `node` and its whole subtree, deepest and last children first.
    /// Returns false if `node` was not valid.
    pub fn remove_child(&self, node: RowId) -> Result<bool> {
        self.ensure_mutable()?;
        if !self.is_valid_node(node) {
            return Ok(false);
        }
        if self.root() == Some(node) {
            return Err(Error::invalid_argument("the root is not a child; clear the tree instead"));
        }
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            if !seen.insert(n) {
                continue;
            }
            order.push(n);
            stack.extend(self.children(n)?.into_iter().rev());
        }
        for n in order.into_iter().rev() {
            self.remove_node(n)?;
        }
        Ok(true)
    }

    /// Removes a child edge together with the child's subtree.
    /// Returns false if `edge` was not valid.
    pub fn remove_child_edge(&self, edge: RowId) -> Result<bool> {
        self.ensure_mutable()?;
        if !self.is_valid_edge(edge) {
            return Ok(false);
        }
        match self.target_node(edge) {
            Some(child) => self.remove_child(child),
            None => self.remove_edge(edge),
        }
    }

    // ---------------------------------------------------------------
    // Navigation

    /// Returns the edge from the parent of `node`.
    pub fn parent_edge(&self, node: RowId) -> Option<RowId> {
        self.graph.inner.links.link(End::In, node, 0).ok().flatten()
    }

    pub fn parent(&self, node: RowId) -> Option<RowId> {
        self.source_node(self.parent_edge(node)?)
    }

    /// Returns the edge to the `index`-th child of `node`.
    pub fn child_edge(&self, node: RowId, index: usize) -> Option<RowId> {
        self.graph.inner.links.link(End::Out, node, index).ok().flatten()
    }

    /// Returns the `index`-th child of `node`.
    pub fn child(&self, node: RowId, index: usize) -> Option<RowId> {
        self.target_node(self.child_edge(node, index)?)
    }

    pub fn child_count(&self, node: RowId) -> Result<usize> {
        self.out_degree(node)
    }

    /// Returns the children of `node` in order.
    pub fn children(&self, node: RowId) -> Result<Vec<RowId>> {
        Ok(self
            .child_edges(node)?
            .into_iter()
            .filter_map(|edge| self.target_node(edge))
            .collect())
    }

    pub fn child_edges(&self, node: RowId) -> Result<Vec<RowId>> {
        self.out_edges(node)
    }

    /// Returns the position of `node` among its parent's children.
    pub fn child_index(&self, node: RowId) -> Option<usize> {
        if !self.is_valid_node(node) {
            return None;
        }
        self.graph.inner.links.child_index(node).ok().flatten()
    }

    pub fn first_child(&self, node: RowId) -> Option<RowId> {
        self.child(node, 0)
    }

    pub fn last_child(&self, node: RowId) -> Option<RowId> {
        let count = self.child_count(node).ok()?;
        self.child(node, count.checked_sub(1)?)
    }

    pub fn previous_sibling(&self, node: RowId) -> Option<RowId> {
        let parent = self.parent(node)?;
        let index = self.child_index(node)?;
        self.child(parent, index.checked_sub(1)?)
    }

    pub fn next_sibling(&self, node: RowId) -> Option<RowId> {
        let parent = self.parent(node)?;
        let index = self.child_index(node)?;
        self.child(parent, index + 1)
    }

    /// Returns the number of edges between `node` and the top of its branch.
    pub fn depth(&self, node: RowId) -> Result<usize> {
        self.check_node(node)?;
        let mut depth = 0;
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            depth += 1;
            if depth > self.node_count() {
                return Err(Error::invalid_argument(format!("node {} lies on a cycle", node)));
            }
            current = parent;
        }
        Ok(depth)
    }

    /// Checks the tree shape: one more node than edges, a parentless root,
    /// at most one parent per node, and every edge reachable from the root.
    pub fn is_valid_tree(&self) -> bool {
        let nodes = self.node_count();
        let edges = self.edge_count();
        if nodes != edges + 1 {
            warn!(nodes, edges, "tree must have exactly one more node than edges");
            return false;
        }
        let Some(root) = self.root().filter(|&r| self.is_valid_node(r)) else {
            warn!("tree has no root");
            return false;
        };
        if self.in_degree(root).unwrap_or(0) != 0 {
            warn!(detail = %describe_node(self, root), "tree root has a parent");
            return false;
        }
        for node in self.nodes() {
            if self.in_degree(node).unwrap_or(0) > 1 {
                warn!(detail = %describe_node(self, node), "tree node has more than one parent");
                return false;
            }
        }
        let mut seen = HashSet::new();
        let mut stack = vec![root];
        let mut reached = 0;
        while let Some(node) = stack.pop() {
            if !seen.insert(node) {
                warn!(detail = %describe_node(self, node), "tree contains a cycle");
                return false;
            }
            for edge in self.child_edges(node).unwrap_or_default() {
                reached += 1;
                stack.extend(self.target_node(edge));
            }
        }
        if reached != edges {
            warn!(reached, edges, "tree edges are not all reachable from the root");
            return false;
        }
        true
    }
}

impl Deref for Tree {
    type Target = Graph;

    fn deref(&self) -> &Graph {
        &self.graph
    }
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root())
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}
