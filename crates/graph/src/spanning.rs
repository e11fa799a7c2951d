//! Breadth-first spanning trees.

use crate::graph::{key_column, Direction, Graph, GraphKind};
use crate::keys::GraphKeys;
use crate::tree::Tree;
use alloc::collections::VecDeque;
use alloc::format;
use alloc::rc::Rc;
use alloc::vec;
use core::ops::Deref;
use trellis_core::{Error, Result, RowId, Schema};
use trellis_table::Table;

/// Edge column pointing back at the graph edge a tree edge was derived from.
pub const SOURCE_EDGE: &str = "source";

fn source_value(edge: RowId) -> Result<i32> {
    i32::try_from(edge)
        .map_err(|_| Error::invalid_argument(format!("edge {} does not fit a tree edge column", edge)))
}

/// A read-only tree spanning the nodes reachable from a root.
///
/// The tree shares its backing graph's node table. Its edges are derived:
/// every tree edge records the graph edge it follows in the
/// [`SOURCE_EDGE`] column. All structural mutators fail with a read-only
/// error.
#[derive(Clone)]
pub struct SpanningTree {
    tree: Tree,
}

impl SpanningTree {
    /// Builds the tree by breadth-first traversal of `graph` from `root`,
    /// following edges in either direction, outgoing ones first.
    pub(crate) fn build(graph: &Graph, root: RowId) -> Result<Self> {
        let keys = GraphKeys::tree();
        let schema: Schema = [
            key_column(&keys.source_key),
            key_column(&keys.target_key),
            key_column(SOURCE_EDGE),
        ]
        .into_iter()
        .flatten()
        .collect();
        let tree = Graph::build(
            graph.node_table().clone(),
            Table::from_schema(&schema),
            true,
            keys,
            GraphKind::Spanning,
            Some(Rc::downgrade(&graph.inner)),
        )?;
        tree.inner.root.set(Some(root));

        let span = graph.node_table().maximum_row().map_or(0, |max| max + 1);
        let mut visited = vec![false; span];
        let mut queue = VecDeque::new();
        if let Some(seen) = visited.get_mut(root) {
            *seen = true;
            queue.push_back(root);
        }
        while let Some(parent) = queue.pop_front() {
            for edge in graph.edge_rows(parent, Direction::Both)? {
                let node = graph.adjacent_node(edge, parent)?;
                match visited.get_mut(node) {
                    Some(seen) if !*seen => *seen = true,
                    _ => continue,
                }
                queue.push_back(node);
                let source = source_value(edge)?;
                let tree_edge = tree.insert_edge(parent, node)?;
                tree.edge_table().set_int(tree_edge, SOURCE_EDGE, source)?;
            }
        }
        Ok(Self {
            tree: Tree::from_graph(tree),
        })
    }

    /// Returns the graph edge a tree edge was derived from.
    pub fn source_edge(&self, tree_edge: RowId) -> Option<RowId> {
        let edge = self.edge_table().get_int(tree_edge, SOURCE_EDGE).ok()?;
        usize::try_from(edge).ok()
    }

    /// Returns the graph this tree spans, if it is still alive.
    pub fn backing_graph(&self) -> Option<Graph> {
        let inner = self.inner.backing.as_ref()?.upgrade()?;
        Some(Graph { inner })
    }

    /// Returns the tree view.
    #[inline]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Returns true if both handles refer to the same spanning tree.
    pub fn ptr_eq(&self, other: &SpanningTree) -> bool {
        self.graph().ptr_eq(other.graph())
    }
}

impl Deref for SpanningTree {
    type Target = Tree;

    fn deref(&self) -> &Tree {
        &self.tree
    }
}

impl core::fmt::Debug for SpanningTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpanningTree")
            .field("root", &self.root())
            .field("edges", &self.edge_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn scenario() -> (Graph, [RowId; 4]) {
        let graph = Graph::new(true);
        let a = graph.add_node().unwrap();
        let b = graph.add_node().unwrap();
        let c = graph.add_node().unwrap();
        let d = graph.add_node().unwrap();
        graph.add_edge(a, b).unwrap();
        graph.add_edge(a, c).unwrap();
        graph.add_edge(b, d).unwrap();
        (graph, [a, b, c, d])
    }

    fn tree_edges(tree: &SpanningTree) -> Vec<(RowId, RowId)> {
        tree.edges()
            .into_iter()
            .map(|e| (tree.source_node(e).unwrap(), tree.target_node(e).unwrap()))
            .collect()
    }

    #[test]
    fn test_bfs_order() {
        let (graph, [a, b, c, d]) = scenario();
        let tree = graph.spanning_tree_from(a).unwrap();
        assert_eq!(tree.root(), Some(a));
        assert_eq!(tree_edges(&tree), vec![(a, b), (a, c), (b, d)]);
        assert_eq!(tree.depth(d).unwrap(), 2);
        assert_eq!(tree.source_edge(2), Some(2));
        assert!(tree.is_valid_tree());
        assert!(tree.backing_graph().unwrap().ptr_eq(&graph));
    }

    #[test]
    fn test_follows_edges_backwards() {
        let (graph, [a, b, c, d]) = scenario();
        let tree = graph.spanning_tree_from(d).unwrap();
        assert_eq!(tree_edges(&tree), vec![(d, b), (b, a), (a, c)]);
        assert_eq!(tree.source_edge(1), Some(0));
    }

    #[test]
    fn test_cached_until_topology_changes() {
        let (graph, [a, b, ..]) = scenario();
        let first = graph.spanning_tree().unwrap();
        let again = graph.spanning_tree_from(a).unwrap();
        assert!(first.ptr_eq(&again));

        let other = graph.spanning_tree_from(b).unwrap();
        assert!(!other.ptr_eq(&first));
        assert_eq!(other.root(), Some(b));

        let back = graph.spanning_tree_from(a).unwrap();
        assert!(!back.ptr_eq(&first));

        graph.add_edge(b, a).unwrap();
        let rebuilt = graph.spanning_tree_from(a).unwrap();
        assert!(!rebuilt.ptr_eq(&back));

        let cached = graph.spanning_tree_from(a).unwrap();
        graph.clear_spanning_tree();
        assert!(!graph.spanning_tree_from(a).unwrap().ptr_eq(&cached));
    }

    #[test]
    fn test_read_only() {
        let (graph, [a, b, ..]) = scenario();
        let tree = graph.spanning_tree_from(a).unwrap();
        assert!(tree.is_read_only());
        assert!(tree.add_node().unwrap_err().is_state_error());
        assert!(tree.add_edge(a, b).unwrap_err().is_state_error());
        assert!(tree.remove_edge(0).unwrap_err().is_state_error());
        assert!(tree.remove_node(b).unwrap_err().is_state_error());
        assert!(tree.add_child(a).unwrap_err().is_state_error());
        assert!(tree.remove_child(b).unwrap_err().is_state_error());
        assert!(tree.clear().unwrap_err().is_state_error());
        assert_eq!(tree.edge_count(), 3);
    }

    #[test]
    fn test_unreachable_nodes_stay_out() {
        let (graph, [a, ..]) = scenario();
        let island = graph.add_node().unwrap();
        let tree = graph.spanning_tree_from(a).unwrap();
        assert_eq!(tree.edge_count(), 3);
        assert_eq!(tree.degree(island).unwrap(), 0);
        assert!(!tree.is_valid_tree());
    }

    #[test]
    fn test_source_value_is_checked() {
        assert_eq!(source_value(7).unwrap(), 7);
        let too_big = i32::MAX as usize + 1;
        assert!(source_value(too_big).unwrap_err().is_argument_error());
    }

    #[test]
    fn test_empty_graph() {
        let graph = Graph::new(true);
        assert!(graph.spanning_tree().unwrap_err().is_argument_error());
    }
}
