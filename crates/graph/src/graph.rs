//! Graphs over node and edge tables.
//!
//! A [`Graph`] pairs a node table with an edge table whose source and target
//! columns identify nodes. It listens to both tables and keeps a private
//! adjacency table in step with them, so edges and nodes may be edited
//! through the graph or directly through the tables.

use crate::event::{GraphEvent, GraphListener, Group};
use crate::keys::GraphKeys;
use crate::links::{End, Links};
use crate::spanning::SpanningTree;
use alloc::format;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use hashbrown::HashMap;
use tracing::{debug, warn};
use trellis_core::{ColumnDef, DataType, Error, Result, RowId, Schema, Value};
use trellis_table::{EventKind, ListenerList, Table, TableEvent, TableIndex, TableListener};

/// Which incident edges of a node to visit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Edges arriving at the node.
    In,
    /// Edges leaving the node.
    Out,
    /// Outgoing edges, then incoming ones.
    Both,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GraphKind {
    Plain,
    Tree,
    Spanning,
}

pub(crate) struct GraphInner {
    pub(crate) nodes: Table,
    pub(crate) edges: Table,
    pub(crate) links: Links,
    directed: bool,
    keys: GraphKeys,
    node_index: Option<Rc<TableIndex>>,
    node_key_type: Option<DataType>,
    pub(crate) kind: GraphKind,
    /// Endpoints each edge is currently filed under in the adjacency table.
    ends: RefCell<HashMap<RowId, (RowId, RowId)>>,
    /// Set while an edge row is half written; edge events are not filed.
    filing_suspended: Cell<bool>,
    pub(crate) root: Cell<Option<RowId>>,
    spanning: RefCell<Option<SpanningTree>>,
    pub(crate) backing: Option<Weak<GraphInner>>,
    listeners: ListenerList<dyn GraphListener>,
    observer: RefCell<Option<Rc<TableObserver>>>,
}

/// A directed or undirected graph backed by a node table and an edge table.
///
/// Self-loops and parallel edges are allowed.
#[derive(Clone)]
pub struct Graph {
    pub(crate) inner: Rc<GraphInner>,
}

/// Suspends edge filing until dropped.
struct SuspendFiling<'a>(&'a Cell<bool>);

impl<'a> SuspendFiling<'a> {
    fn new(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for SuspendFiling<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

struct TableObserver {
    graph: Weak<GraphInner>,
}

impl TableListener for TableObserver {
    fn table_changed(&self, table: &Table, event: &TableEvent) {
        let Some(inner) = self.graph.upgrade() else {
            return;
        };
        let graph = Graph { inner };
        let group = if table.ptr_eq(&graph.inner.nodes) {
            Group::Nodes
        } else {
            Group::Edges
        };
        if let Err(err) = graph.track(group, event) {
            warn!(error = %err, ?group, "adjacency bookkeeping failed");
        }
        graph.fire(&GraphEvent::from_table(group, event));
    }
}

pub(crate) fn key_column(name: &str) -> Option<ColumnDef> {
    ColumnDef::new(name, DataType::Int, Some(Value::Int(-1))).ok()
}

pub(crate) fn edge_schema(keys: &GraphKeys) -> Schema {
    key_column(&keys.source_key)
        .into_iter()
        .chain(key_column(&keys.target_key))
        .collect()
}

fn is_key_type(data_type: DataType) -> bool {
    matches!(data_type, DataType::Int | DataType::Long)
}

impl Graph {
    /// Creates an empty graph with `source`/`target` edge columns.
    pub fn new(directed: bool) -> Self {
        let keys = GraphKeys::default();
        let edges = Table::from_schema(&edge_schema(&keys));
        Self::assemble(Table::new(), edges, directed, keys, None, GraphKind::Plain, None)
    }

    /// Creates a graph over existing tables with the default edge columns.
    pub fn with_tables(nodes: Table, edges: Table, directed: bool) -> Result<Self> {
        Self::with_keys(nodes, edges, directed, GraphKeys::default())
    }

    /// Creates a graph over existing tables with the given key columns.
    ///
    /// Key columns must hold `Int` or `Long` values, and a `Long` node key
    /// needs `Long` edge columns. Existing edges whose
    /// endpoints resolve to valid nodes are filed into the adjacency table.
    pub fn with_keys(nodes: Table, edges: Table, directed: bool, keys: GraphKeys) -> Result<Self> {
        Self::build(nodes, edges, directed, keys, GraphKind::Plain, None)
    }

    pub(crate) fn build(
        nodes: Table,
        edges: Table,
        directed: bool,
        keys: GraphKeys,
        kind: GraphKind,
        backing: Option<Weak<GraphInner>>,
    ) -> Result<Self> {
        if nodes.ptr_eq(&edges) {
            return Err(Error::invalid_argument("node and edge tables must differ"));
        }
        let mut edge_key_types = Vec::with_capacity(2);
        for field in [&keys.source_key, &keys.target_key] {
            let data_type = edges
                .column_type(field)
                .ok_or_else(|| Error::column_not_found(field.as_str()))?;
            if !is_key_type(data_type) {
                return Err(Error::invalid_argument(
                    "incompatible column types for graph keys",
                ));
            }
            edge_key_types.push(data_type);
        }
        let node_key_type = match &keys.node_key {
            Some(field) => {
                let data_type = nodes
                    .column_type(field)
                    .ok_or_else(|| Error::column_not_found(field.as_str()))?;
                // edge columns must be able to hold every node key
                let narrowing = data_type == DataType::Long
                    && edge_key_types.iter().any(|&t| t != DataType::Long);
                if !is_key_type(data_type) || narrowing {
                    return Err(Error::invalid_argument(
                        "incompatible column types for graph keys",
                    ));
                }
                Some(data_type)
            }
            None => None,
        };

        let graph = Self::assemble(nodes, edges, directed, keys, node_key_type, kind, backing);
        let inner = &graph.inner;
        // mirror the node table's slots, free ones included
        let span = inner.nodes.maximum_row().map_or(0, |max| max + 1);
        for _ in 0..span {
            inner.links.add_node()?;
        }
        for row in 0..span {
            if !inner.nodes.is_valid_row(row) {
                inner.links.remove_node(row)?;
            }
        }
        for edge in inner.edges.rows() {
            graph.sync_edge(edge)?;
        }
        Ok(graph)
    }

    pub(crate) fn assemble(
        nodes: Table,
        edges: Table,
        directed: bool,
        keys: GraphKeys,
        node_key_type: Option<DataType>,
        kind: GraphKind,
        backing: Option<Weak<GraphInner>>,
    ) -> Self {
        let node_index = keys
            .node_key
            .as_deref()
            .and_then(|field| nodes.index(field).ok());
        let inner = Rc::new(GraphInner {
            nodes,
            edges,
            links: Links::new(kind != GraphKind::Plain),
            directed,
            keys,
            node_index,
            node_key_type,
            kind,
            ends: RefCell::new(HashMap::new()),
            filing_suspended: Cell::new(false),
            root: Cell::new(None),
            spanning: RefCell::new(None),
            backing,
            listeners: ListenerList::new(),
            observer: RefCell::new(None),
        });
        let observer = Rc::new(TableObserver {
            graph: Rc::downgrade(&inner),
        });
        inner.nodes.add_table_listener(&observer);
        inner.edges.add_table_listener(&observer);
        *inner.observer.borrow_mut() = Some(observer);
        Self { inner }
    }

    /// Returns true if both handles refer to the same graph.
    #[inline]
    pub fn ptr_eq(&self, other: &Graph) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    #[inline]
    pub fn is_directed(&self) -> bool {
        self.inner.directed
    }

    /// Returns true for graphs whose structure cannot be edited.
    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.inner.kind == GraphKind::Spanning
    }

    pub(crate) fn ensure_mutable(&self) -> Result<()> {
        if self.is_read_only() {
            return Err(Error::read_only("spanning trees cannot be edited"));
        }
        Ok(())
    }

    #[inline]
    pub fn node_table(&self) -> &Table {
        &self.inner.nodes
    }

    #[inline]
    pub fn edge_table(&self) -> &Table {
        &self.inner.edges
    }

    #[inline]
    pub fn keys(&self) -> &GraphKeys {
        &self.inner.keys
    }

    pub fn node_count(&self) -> usize {
        self.inner.nodes.row_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edges.row_count()
    }

    pub fn is_valid_node(&self, node: RowId) -> bool {
        self.inner.nodes.is_valid_row(node)
    }

    pub fn is_valid_edge(&self, edge: RowId) -> bool {
        self.inner.edges.is_valid_row(edge)
    }

    /// Returns the node rows, ascending.
    pub fn nodes(&self) -> Vec<RowId> {
        self.inner.nodes.rows()
    }

    /// Returns the edge rows, ascending.
    pub fn edges(&self) -> Vec<RowId> {
        self.inner.edges.rows()
    }

    pub(crate) fn check_node(&self, node: RowId) -> Result<()> {
        if !self.is_valid_node(node) {
            return Err(Error::invalid_argument(format!("{} is not a node of this graph", node)));
        }
        Ok(())
    }

    fn check_edge(&self, edge: RowId) -> Result<()> {
        if !self.is_valid_edge(edge) {
            return Err(Error::invalid_argument(format!("{} is not an edge of this graph", edge)));
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // Identity

    /// Returns the identity edges use to refer to `node`.
    pub fn node_key(&self, node: RowId) -> Result<i64> {
        self.check_node(node)?;
        match &self.inner.keys.node_key {
            Some(field) => self.inner.nodes.get_long(node, field),
            None => Ok(node as i64),
        }
    }

    /// Resolves an edge endpoint value to a valid node row.
    pub fn node_for_key(&self, key: i64) -> Option<RowId> {
        let node = match (&self.inner.node_index, self.inner.node_key_type) {
            (Some(index), Some(data_type)) => index.get(&Value::Long(key).coerce(data_type)?)?,
            _ => usize::try_from(key).ok()?,
        };
        self.is_valid_node(node).then_some(node)
    }

    fn resolve_edge(&self, edge: RowId) -> Option<(RowId, RowId)> {
        let edges = &self.inner.edges;
        let source = edges.get_long(edge, &self.inner.keys.source_key).ok()?;
        let target = edges.get_long(edge, &self.inner.keys.target_key).ok()?;
        Some((self.node_for_key(source)?, self.node_for_key(target)?))
    }

    // ---------------------------------------------------------------
    // Structure

    /// Adds a node and returns its row.
    pub fn add_node(&self) -> Result<RowId> {
        self.ensure_mutable()?;
        self.inner.nodes.add_row()
    }

    /// Adds an edge from `source` to `target` and returns its row.
    pub fn add_edge(&self, source: RowId, target: RowId) -> Result<RowId> {
        self.ensure_mutable()?;
        self.check_node(source)?;
        self.check_node(target)?;
        self.insert_edge(source, target)
    }

    /// Adds an edge without the mutability check. Both nodes must be valid.
    pub(crate) fn insert_edge(&self, source: RowId, target: RowId) -> Result<RowId> {
        let source_key = self.node_key(source)?;
        let target_key = self.node_key(target)?;
        let keys = &self.inner.keys;
        let edge = {
            let _suspended = SuspendFiling::new(&self.inner.filing_suspended);
            let edge = self.inner.edges.add_row()?;
            self.write_key(edge, &keys.source_key, source_key)?;
            edge
        };
        // the target write files the finished edge; an unchanged target
        // fires no event, so file explicitly as well
        self.write_key(edge, &keys.target_key, target_key)?;
        self.sync_edge(edge)?;
        Ok(edge)
    }

    fn write_key(&self, edge: RowId, field: &str, key: i64) -> Result<()> {
        let edges = &self.inner.edges;
        match edges.column_type(field) {
            Some(DataType::Int) => {
                let key = i32::try_from(key)
                    .map_err(|_| Error::type_mismatch(DataType::Int, Some(DataType::Long)))?;
                edges.set_int(edge, field, key)
            }
            _ => edges.set_long(edge, field, key),
        }
    }

    /// Removes an edge. Returns false if `edge` was not valid.
    pub fn remove_edge(&self, edge: RowId) -> Result<bool> {
        self.ensure_mutable()?;
        self.inner.edges.remove_row(edge)
    }

    /// Removes a node together with every incident edge.
    /// Returns false if `node` was not valid.
    pub fn remove_node(&self, node: RowId) -> Result<bool> {
        self.ensure_mutable()?;
        if !self.is_valid_node(node) {
            return Ok(false);
        }
        self.remove_incident_edges(node)?;
        self.inner.nodes.remove_row(node)
    }

    fn remove_incident_edges(&self, node: RowId) -> Result<()> {
        for edge in self.inner.links.links(End::In, node)?.into_iter().rev() {
            self.inner.edges.remove_row(edge)?;
        }
        for edge in self.inner.links.links(End::Out, node)?.into_iter().rev() {
            self.inner.edges.remove_row(edge)?;
        }
        Ok(())
    }

    /// Removes every edge and node.
    pub fn clear(&self) -> Result<()> {
        self.ensure_mutable()?;
        self.inner.edges.clear()?;
        self.inner.nodes.clear()?;
        self.inner.root.set(None);
        self.clear_spanning_tree();
        Ok(())
    }

    // ---------------------------------------------------------------
    // Adjacency

    pub fn in_degree(&self, node: RowId) -> Result<usize> {
        self.check_node(node)?;
        self.inner.links.degree(End::In, node)
    }

    pub fn out_degree(&self, node: RowId) -> Result<usize> {
        self.check_node(node)?;
        self.inner.links.degree(End::Out, node)
    }

    pub fn degree(&self, node: RowId) -> Result<usize> {
        Ok(self.in_degree(node)? + self.out_degree(node)?)
    }

    /// Returns the node an edge leaves from.
    pub fn source_node(&self, edge: RowId) -> Option<RowId> {
        self.inner.ends.borrow().get(&edge).map(|&(source, _)| source)
    }

    /// Returns the node an edge arrives at.
    pub fn target_node(&self, edge: RowId) -> Option<RowId> {
        self.inner.ends.borrow().get(&edge).map(|&(_, target)| target)
    }

    /// Returns the other end of `edge` as seen from `node`.
    pub fn adjacent_node(&self, edge: RowId, node: RowId) -> Result<RowId> {
        self.check_edge(edge)?;
        match self.inner.ends.borrow().get(&edge).copied() {
            Some((source, target)) if source == node => Ok(target),
            Some((source, target)) if target == node => Ok(source),
            _ => Err(Error::invalid_argument(format!(
                "edge {} is not incident on node {}",
                edge, node
            ))),
        }
    }

    /// Returns an edge from `source` to `target`, if any. Undirected graphs
    /// also accept an edge stored the other way round.
    pub fn edge(&self, source: RowId, target: RowId) -> Option<RowId> {
        self.find_edge(source, target).or_else(|| {
            if self.inner.directed {
                None
            } else {
                self.find_edge(target, source)
            }
        })
    }

    fn find_edge(&self, source: RowId, target: RowId) -> Option<RowId> {
        let out = self.out_degree(source).ok()?;
        let into = self.in_degree(target).ok()?;
        // scan the shorter of the two arrays
        let (end, node, wanted) = if out <= into {
            (End::Out, source, target)
        } else {
            (End::In, target, source)
        };
        let ends = self.inner.ends.borrow();
        self.inner
            .links
            .links(end, node)
            .ok()?
            .into_iter()
            .find(|edge| match ends.get(edge) {
                Some(&(s, t)) => if end == End::Out { t == wanted } else { s == wanted },
                None => false,
            })
    }

    /// Returns the edges incident on `node` in the given direction.
    pub fn edge_rows(&self, node: RowId, direction: Direction) -> Result<Vec<RowId>> {
        self.check_node(node)?;
        let links = &self.inner.links;
        Ok(match direction {
            Direction::In => links.links(End::In, node)?,
            Direction::Out => links.links(End::Out, node)?,
            Direction::Both => {
                let mut edges = links.links(End::Out, node)?;
                edges.extend(links.links(End::In, node)?);
                edges
            }
        })
    }

    pub fn in_edges(&self, node: RowId) -> Result<Vec<RowId>> {
        self.edge_rows(node, Direction::In)
    }

    pub fn out_edges(&self, node: RowId) -> Result<Vec<RowId>> {
        self.edge_rows(node, Direction::Out)
    }

    /// Returns the nodes across each incident edge, outgoing first.
    pub fn neighbors(&self, node: RowId) -> Result<Vec<RowId>> {
        self.edge_rows(node, Direction::Both)?
            .into_iter()
            .map(|edge| self.adjacent_node(edge, node))
            .collect()
    }

    // ---------------------------------------------------------------
    // Bookkeeping

    fn track(&self, group: Group, event: &TableEvent) -> Result<()> {
        match (group, event.kind, event.column) {
            (Group::Edges, EventKind::Insert | EventKind::Update, _)
                if self.inner.filing_suspended.get() => {}
            (Group::Nodes, EventKind::Insert, None) => {
                for node in event.rows.clone() {
                    let row = self.inner.links.add_node()?;
                    if row != node {
                        warn!(node, row, "adjacency row out of step with node row");
                    }
                }
                self.clear_spanning_tree();
            }
            (Group::Nodes, EventKind::Delete, None) => {
                for node in event.rows.clone() {
                    self.remove_incident_edges(node)?;
                    self.inner.links.remove_node(node)?;
                    if self.inner.root.get() == Some(node) {
                        self.inner.root.set(None);
                    }
                }
                self.clear_spanning_tree();
            }
            (Group::Edges, EventKind::Insert | EventKind::Update, None) => {
                for edge in event.rows.clone() {
                    self.sync_edge(edge)?;
                }
            }
            (Group::Edges, EventKind::Update, Some(col)) => {
                let field = self.inner.edges.column_name(col);
                let keys = &self.inner.keys;
                if field.as_deref() == Some(keys.source_key.as_str())
                    || field.as_deref() == Some(keys.target_key.as_str())
                {
                    for edge in event.rows.clone() {
                        self.sync_edge(edge)?;
                    }
                }
            }
            (Group::Edges, EventKind::Delete, None) => {
                for edge in event.rows.clone() {
                    self.unbind_edge(edge)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Files `edge` under the endpoints its key columns currently resolve to.
    pub(crate) fn sync_edge(&self, edge: RowId) -> Result<()> {
        let resolved = if self.is_valid_edge(edge) {
            self.resolve_edge(edge)
        } else {
            None
        };
        let bound = self.inner.ends.borrow().get(&edge).copied();
        if resolved == bound {
            return Ok(());
        }
        self.unbind_edge(edge)?;
        if let Some((source, target)) = resolved {
            self.bind_edge(edge, source, target)?;
        }
        Ok(())
    }

    fn bind_edge(&self, edge: RowId, source: RowId, target: RowId) -> Result<()> {
        let links = &self.inner.links;
        links.add_link(End::Out, source, edge)?;
        links.add_link(End::In, target, edge)?;
        self.inner.ends.borrow_mut().insert(edge, (source, target));
        self.refresh_child_index(target)?;
        self.clear_spanning_tree();
        Ok(())
    }

    fn unbind_edge(&self, edge: RowId) -> Result<()> {
        let Some((source, target)) = self.inner.ends.borrow_mut().remove(&edge) else {
            return Ok(());
        };
        let links = &self.inner.links;
        let position = links.remove_link(End::Out, source, edge)?;
        links.remove_link(End::In, target, edge)?;
        if let Some(position) = position {
            // later siblings moved up one slot
            let siblings = links.links(End::Out, source)?;
            for &sibling in siblings.iter().skip(position) {
                if let Some(child) = self.target_node(sibling) {
                    self.refresh_child_index(child)?;
                }
            }
        }
        if self.is_valid_node(target) {
            self.refresh_child_index(target)?;
        }
        self.clear_spanning_tree();
        Ok(())
    }

    /// Recomputes the position of `node` among the children of the source
    /// of its first incoming edge.
    fn refresh_child_index(&self, node: RowId) -> Result<()> {
        if self.inner.kind == GraphKind::Plain {
            return Ok(());
        }
        let links = &self.inner.links;
        let parent_edge = links.link(End::In, node, 0)?;
        let index = match parent_edge.and_then(|edge| Some((edge, self.source_node(edge)?))) {
            Some((edge, parent)) => links
                .links(End::Out, parent)?
                .iter()
                .position(|&sibling| sibling == edge),
            None => None,
        };
        links.set_child_index(node, index)
    }

    // ---------------------------------------------------------------
    // Spanning trees

    /// Returns a breadth-first spanning tree rooted at the first node.
    pub fn spanning_tree(&self) -> Result<SpanningTree> {
        let root = self
            .inner
            .nodes
            .minimum_row()
            .ok_or_else(|| Error::invalid_argument("an empty graph has no spanning tree"))?;
        self.spanning_tree_from(root)
    }

    /// Returns a breadth-first spanning tree rooted at `root`.
    ///
    /// The tree is cached and returned again while the graph's topology is
    /// unchanged and the same root is requested.
    pub fn spanning_tree_from(&self, root: RowId) -> Result<SpanningTree> {
        self.check_node(root)?;
        if let Some(cached) = self.inner.spanning.borrow().as_ref() {
            if cached.root() == Some(root) {
                return Ok(cached.clone());
            }
        }
        let tree = SpanningTree::build(self, root)?;
        debug!(root, edges = tree.edge_count(), "rebuilt spanning tree");
        *self.inner.spanning.borrow_mut() = Some(tree.clone());
        Ok(tree)
    }

    /// Drops the cached spanning tree.
    pub fn clear_spanning_tree(&self) {
        let dropped = self.inner.spanning.borrow_mut().take();
        drop(dropped);
    }

    // ---------------------------------------------------------------
    // Listeners

    /// Registers a graph listener, held weakly.
    pub fn add_graph_listener<L: GraphListener + 'static>(&self, listener: &Rc<L>) -> bool {
        let weak: Weak<dyn GraphListener> = Rc::<L>::downgrade(listener);
        self.inner.listeners.add(weak)
    }

    pub fn remove_graph_listener<L: GraphListener + 'static>(&self, listener: &Rc<L>) -> bool {
        let weak: Weak<dyn GraphListener> = Rc::<L>::downgrade(listener);
        self.inner.listeners.remove(&weak)
    }

    fn fire(&self, event: &GraphEvent) {
        for listener in self.inner.listeners.snapshot() {
            listener.graph_changed(self, event);
        }
    }
}

impl core::fmt::Debug for Graph {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Graph")
            .field("directed", &self.inner.directed)
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}

/// Returns a one-line description of the adjacency of `node`, for diagnostics.
pub(crate) fn describe_node(graph: &Graph, node: RowId) -> String {
    format!(
        "node {} (in {:?}, out {:?})",
        node,
        graph.in_edges(node).unwrap_or_default(),
        graph.out_edges(node).unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn diamond() -> (Graph, [RowId; 4]) {
        let graph = Graph::new(true);
        let a = graph.add_node().unwrap();
        let b = graph.add_node().unwrap();
        let c = graph.add_node().unwrap();
        let d = graph.add_node().unwrap();
        graph.add_edge(a, b).unwrap();
        graph.add_edge(a, c).unwrap();
        graph.add_edge(b, d).unwrap();
        graph.add_edge(c, d).unwrap();
        (graph, [a, b, c, d])
    }

    #[test]
    fn test_degrees() {
        let (graph, [a, b, _, d]) = diamond();
        assert_eq!(graph.out_degree(a).unwrap(), 2);
        assert_eq!(graph.in_degree(a).unwrap(), 0);
        assert_eq!(graph.in_degree(d).unwrap(), 2);
        assert_eq!(graph.degree(b).unwrap(), 2);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert!(graph.in_degree(9).unwrap_err().is_argument_error());
    }

    #[test]
    fn test_endpoints_and_lookup() {
        let (graph, [a, b, c, d]) = diamond();
        assert_eq!(graph.source_node(0), Some(a));
        assert_eq!(graph.target_node(0), Some(b));
        assert_eq!(graph.adjacent_node(0, b).unwrap(), a);
        assert!(graph.adjacent_node(0, d).is_err());
        assert_eq!(graph.edge(c, d), Some(3));
        assert_eq!(graph.edge(d, c), None);
        assert_eq!(graph.out_edges(a).unwrap(), vec![0, 1]);
        assert_eq!(graph.in_edges(d).unwrap(), vec![2, 3]);
        assert_eq!(graph.edge_rows(b, Direction::Both).unwrap(), vec![2, 0]);
        assert_eq!(graph.neighbors(b).unwrap(), vec![d, a]);
        assert_eq!(graph.node_key(c).unwrap(), 2);
        assert_eq!(graph.node_for_key(2), Some(c));
        assert_eq!(graph.node_for_key(-1), None);
    }

    #[test]
    fn test_undirected_edge_lookup() {
        let graph = Graph::new(false);
        let a = graph.add_node().unwrap();
        let b = graph.add_node().unwrap();
        let e = graph.add_edge(a, b).unwrap();
        assert_eq!(graph.edge(b, a), Some(e));
        assert!(!graph.is_directed());
    }

    #[test]
    fn test_remove_edge() {
        let (graph, [a, b, c, d]) = diamond();
        assert!(graph.remove_edge(0).unwrap());
        assert!(!graph.remove_edge(0).unwrap());
        assert_eq!(graph.out_edges(a).unwrap(), vec![1]);
        assert_eq!(graph.in_degree(b).unwrap(), 0);
        assert_eq!(graph.edge(a, b), None);
        assert_eq!(graph.edge(a, c), Some(1));
        assert_eq!(graph.in_edges(d).unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_remove_node_cascades() {
        let (graph, [a, b, c, d]) = diamond();
        assert!(graph.remove_node(b).unwrap());
        assert!(!graph.remove_node(b).unwrap());
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.out_edges(a).unwrap(), vec![1]);
        assert_eq!(graph.in_edges(d).unwrap(), vec![3]);
        assert_eq!(graph.neighbors(c).unwrap(), vec![d, a]);

        // the freed slot is reused with clean adjacency
        let e = graph.add_node().unwrap();
        assert_eq!(e, b);
        assert_eq!(graph.degree(e).unwrap(), 0);
    }

    #[test]
    fn test_direct_table_edits_are_tracked() {
        let (graph, [a, _, c, d]) = diamond();
        let edges = graph.edge_table();
        edges.set_int(3, "source", a as i32).unwrap();
        assert_eq!(graph.out_edges(c).unwrap(), Vec::<RowId>::new());
        assert_eq!(graph.out_edges(a).unwrap(), vec![0, 1, 3]);

        graph.node_table().remove_row(d).unwrap();
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.out_degree(a).unwrap(), 2);
    }

    #[test]
    fn test_self_loops_and_multi_edges() {
        let graph = Graph::new(true);
        let a = graph.add_node().unwrap();
        let b = graph.add_node().unwrap();
        let l = graph.add_edge(a, a).unwrap();
        graph.add_edge(a, b).unwrap();
        graph.add_edge(a, b).unwrap();
        assert_eq!(graph.in_degree(a).unwrap(), 1);
        assert_eq!(graph.out_degree(a).unwrap(), 3);
        assert_eq!(graph.in_degree(b).unwrap(), 2);
        assert_eq!(graph.adjacent_node(l, a).unwrap(), a);
        assert!(graph.remove_node(a).unwrap());
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.in_degree(b).unwrap(), 0);
    }

    #[test]
    fn test_with_tables_files_existing_edges() {
        let nodes = Table::new();
        nodes.add_column("label", DataType::String, None).unwrap();
        nodes.add_rows(3).unwrap();
        nodes.remove_row(1).unwrap();
        let edges = Table::new();
        edges.add_column("source", DataType::Long, None).unwrap();
        edges.add_column("target", DataType::Long, None).unwrap();
        let e = edges.add_row().unwrap();
        edges.set_long(e, "target", 2).unwrap();
        let dangling = edges.add_row().unwrap();
        edges.set_long(dangling, "target", 1).unwrap();

        let graph = Graph::with_tables(nodes, edges, true).unwrap();
        assert_eq!(graph.out_edges(0).unwrap(), vec![e]);
        assert_eq!(graph.in_degree(2).unwrap(), 1);
        assert_eq!(graph.source_node(dangling), None);

        let n = graph.add_node().unwrap();
        assert_eq!(n, 1);
        assert_eq!(graph.degree(n).unwrap(), 0);
    }

    #[test]
    fn test_node_keys() {
        let nodes = Table::new();
        nodes.add_column("id", DataType::Long, None).unwrap();
        let edges = Table::new();
        edges.add_column("from", DataType::Long, None).unwrap();
        edges.add_column("to", DataType::Long, None).unwrap();
        let keys = GraphKeys::new("from", "to").with_node_key("id");
        let graph = Graph::with_keys(nodes, edges, true, keys).unwrap();

        let a = graph.add_node().unwrap();
        graph.node_table().set_long(a, "id", 100).unwrap();
        let b = graph.add_node().unwrap();
        graph.node_table().set_long(b, "id", 200).unwrap();
        let e = graph.add_edge(a, b).unwrap();
        assert_eq!(graph.edge_table().get_long(e, "from").unwrap(), 100);
        assert_eq!(graph.node_for_key(200), Some(b));
        assert_eq!(graph.node_key(b).unwrap(), 200);
        assert_eq!(graph.target_node(e), Some(b));
    }

    #[test]
    fn test_key_validation() {
        let nodes = Table::new();
        let edges = Table::new();
        edges.add_column("source", DataType::String, None).unwrap();
        edges.add_column("target", DataType::Int, None).unwrap();
        let err = Graph::with_tables(nodes.clone(), edges, true).unwrap_err();
        assert!(err.is_argument_error());

        let edges = Table::new();
        edges.add_column("source", DataType::Int, None).unwrap();
        let err = Graph::with_tables(nodes, edges, true).unwrap_err();
        assert_eq!(err, Error::column_not_found("target"));
    }

    #[test]
    fn test_long_node_key_needs_long_edge_columns() {
        let nodes = Table::new();
        nodes.add_column("id", DataType::Long, None).unwrap();
        let edges = Table::new();
        edges.add_column("from", DataType::Int, None).unwrap();
        edges.add_column("to", DataType::Long, None).unwrap();
        let keys = GraphKeys::new("from", "to").with_node_key("id");
        let err = Graph::with_keys(nodes.clone(), edges, true, keys.clone()).unwrap_err();
        assert!(err.is_argument_error());

        // an Int node key fits either width
        let ids = Table::new();
        ids.add_column("id", DataType::Int, None).unwrap();
        let edges = Table::new();
        edges.add_column("from", DataType::Int, None).unwrap();
        edges.add_column("to", DataType::Long, None).unwrap();
        let graph = Graph::with_keys(ids, edges, true, keys).unwrap();
        let a = graph.add_node().unwrap();
        graph.node_table().set_int(a, "id", 5).unwrap();
        let b = graph.add_node().unwrap();
        graph.node_table().set_int(b, "id", 7).unwrap();
        let e = graph.add_edge(a, b).unwrap();
        assert_eq!(graph.edge_table().get_int(e, "from").unwrap(), 5);
        assert_eq!(graph.out_degree(a).unwrap(), 1);
        assert_eq!(graph.in_degree(b).unwrap(), 1);
    }

    #[test]
    fn test_zero_default_keys_file_only_final_endpoints() {
        let nodes = Table::new();
        nodes.add_rows(3).unwrap();
        let edges = Table::new();
        edges.add_column("source", DataType::Int, None).unwrap();
        edges.add_column("target", DataType::Int, None).unwrap();
        let graph = Graph::with_tables(nodes, edges, true).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let listener = Rc::new(move |g: &Graph, _: &GraphEvent| {
            sink.borrow_mut().push(g.degree(0).unwrap());
        });
        graph.add_graph_listener(&listener);

        let e = graph.add_edge(2, 1).unwrap();
        assert_eq!(*seen.borrow(), vec![0, 0, 0]);
        assert_eq!(graph.degree(0).unwrap(), 0);
        assert_eq!(graph.source_node(e), Some(2));
        assert_eq!(graph.target_node(e), Some(1));

        // keys equal to the column defaults fire no update at all
        let z = graph.add_edge(0, 0).unwrap();
        assert_eq!(graph.out_edges(0).unwrap(), vec![z]);
        assert_eq!(graph.in_edges(0).unwrap(), vec![z]);
    }

    #[test]
    fn test_graph_listener() {
        let (graph, [a, b, ..]) = diamond();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let listener = Rc::new(move |g: &Graph, e: &GraphEvent| {
            // adjacency is already current when listeners run
            if e.group == Group::Edges && e.column == Some(1) {
                assert_eq!(g.source_node(e.rows.start), Some(b));
            }
            sink.borrow_mut().push((e.group, e.kind));
        });
        graph.add_graph_listener(&listener);
        graph.add_edge(b, a).unwrap();
        graph.add_node().unwrap();
        let events = seen.borrow();
        assert_eq!(events[0], (Group::Edges, EventKind::Insert));
        assert_eq!(events.last(), Some(&(Group::Nodes, EventKind::Insert)));
    }

    #[test]
    fn test_clear() {
        let (graph, _) = diamond();
        graph.clear().unwrap();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        let a = graph.add_node().unwrap();
        assert_eq!(a, 0);
        assert_eq!(graph.degree(a).unwrap(), 0);
    }

    #[test]
    fn test_describe_node() {
        let (graph, [a, ..]) = diamond();
        assert_eq!(describe_node(&graph, a), "node 0 (in [], out [0, 1])");
    }
}
