//! Per-node adjacency bookkeeping.
//!
//! The adjacency table holds one row per node row with the node's in and out
//! degree and two edge-id arrays. Only the first `degree` entries of an array
//! are live; the rest is spare capacity filled with `-1`. Arrays grow to
//! `max(3 * len / 2, len + 1)` when full, and removal shifts later entries
//! left so the live prefix keeps insertion order.

use alloc::vec::Vec;
use core::cmp;
use tracing::trace;
use trellis_core::{ColumnDef, DataType, Result, RowId, Schema, Value};
use trellis_table::Table;

const IN_DEGREE: &str = "_indegree";
const OUT_DEGREE: &str = "_outdegree";
const IN_LINKS: &str = "_inlinks";
const OUT_LINKS: &str = "_outlinks";
const CHILD_INDEX: &str = "_childIndex";

/// Which adjacency array of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum End {
    /// Edges arriving at the node.
    In,
    /// Edges leaving the node.
    Out,
}

impl End {
    fn degree_field(self) -> &'static str {
        match self {
            End::In => IN_DEGREE,
            End::Out => OUT_DEGREE,
        }
    }

    fn links_field(self) -> &'static str {
        match self {
            End::In => IN_LINKS,
            End::Out => OUT_LINKS,
        }
    }
}

fn int_column(name: &str, default: i32) -> Option<ColumnDef> {
    ColumnDef::new(name, DataType::Int, Some(Value::Int(default))).ok()
}

pub(crate) struct Links {
    table: Table,
    tree: bool,
}

impl Links {
    /// Creates an empty adjacency table; trees also track each node's
    /// position among its siblings.
    pub(crate) fn new(tree: bool) -> Self {
        let mut defs = Vec::with_capacity(5);
        defs.extend(int_column(IN_DEGREE, 0));
        defs.extend(int_column(OUT_DEGREE, 0));
        defs.extend(ColumnDef::new(IN_LINKS, DataType::IntArray, None).ok());
        defs.extend(ColumnDef::new(OUT_LINKS, DataType::IntArray, None).ok());
        if tree {
            defs.extend(int_column(CHILD_INDEX, -1));
        }
        let schema: Schema = defs.into_iter().collect();
        let table = Table::from_schema(&schema);
        table.lock_schema();
        Self { table, tree }
    }

    pub(crate) fn add_node(&self) -> Result<RowId> {
        self.table.add_row()
    }

    pub(crate) fn remove_node(&self, node: RowId) -> Result<bool> {
        self.table.remove_row(node)
    }

    pub(crate) fn degree(&self, end: End, node: RowId) -> Result<usize> {
        let degree = self.table.get_int(node, end.degree_field())?;
        Ok(usize::try_from(degree).unwrap_or(0))
    }

    /// Returns the live edge ids of one array, in insertion order.
    pub(crate) fn links(&self, end: End, node: RowId) -> Result<Vec<RowId>> {
        let degree = self.degree(end, node)?;
        let links = self.table.get_int_array(node, end.links_field())?;
        Ok(links
            .iter()
            .take(degree)
            .filter_map(|&edge| usize::try_from(edge).ok())
            .collect())
    }

    /// Returns the `index`-th live edge id of one array.
    pub(crate) fn link(&self, end: End, node: RowId, index: usize) -> Result<Option<RowId>> {
        if index >= self.degree(end, node)? {
            return Ok(None);
        }
        let links = self.table.get_int_array(node, end.links_field())?;
        Ok(links.get(index).and_then(|&edge| usize::try_from(edge).ok()))
    }

    /// Appends `edge` to one array and returns its position.
    pub(crate) fn add_link(&self, end: End, node: RowId, edge: RowId) -> Result<usize> {
        let degree = self.degree(end, node)?;
        let grown = self.table.modify_int_array(node, end.links_field(), |links| {
            let mut grown = None;
            if degree >= links.len() {
                let capacity = cmp::max(cmp::max(3 * links.len() / 2, links.len() + 1), degree + 1);
                links.resize(capacity, -1);
                grown = Some(capacity);
            }
            links[degree] = edge as i32;
            grown
        })?;
        if let Some(capacity) = grown {
            trace!(node, capacity, "grew adjacency array");
        }
        self.table.set_int(node, end.degree_field(), (degree + 1) as i32)?;
        Ok(degree)
    }

    /// Removes `edge` from one array, shifting later entries left.
    ///
    /// Returns the position the edge held, or `None` if it was not present.
    pub(crate) fn remove_link(&self, end: End, node: RowId, edge: RowId) -> Result<Option<usize>> {
        let degree = self.degree(end, node)?;
        let position = self.table.modify_int_array(node, end.links_field(), |links| {
            let live = cmp::min(degree, links.len());
            let position = links[..live].iter().position(|&l| l == edge as i32)?;
            links.copy_within(position + 1..live, position);
            links[live - 1] = -1;
            Some(position)
        })?;
        if position.is_some() {
            self.table.set_int(node, end.degree_field(), (degree - 1) as i32)?;
        }
        Ok(position)
    }

    /// Returns the allocated length of one array, spare capacity included.
    #[cfg(test)]
    pub(crate) fn capacity(&self, end: End, node: RowId) -> Result<usize> {
        Ok(self.table.get_int_array(node, end.links_field())?.len())
    }

    pub(crate) fn child_index(&self, node: RowId) -> Result<Option<usize>> {
        if !self.tree {
            return Ok(None);
        }
        let index = self.table.get_int(node, CHILD_INDEX)?;
        Ok(usize::try_from(index).ok())
    }

    pub(crate) fn set_child_index(&self, node: RowId, index: Option<usize>) -> Result<()> {
        if !self.tree {
            return Ok(());
        }
        let index = index.map_or(-1, |i| i as i32);
        self.table.set_int(node, CHILD_INDEX, index)
    }
}
