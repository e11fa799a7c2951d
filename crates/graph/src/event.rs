//! Graph change events.

use crate::graph::Graph;
use core::ops::Range;
use trellis_core::RowId;
use trellis_table::{EventKind, TableEvent};

/// Which backing table of a graph changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Group {
    Nodes,
    Edges,
}

/// A node or edge table change, reported after the graph has updated its
/// adjacency bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphEvent {
    /// The table that changed.
    pub group: Group,
    /// What happened.
    pub kind: EventKind,
    /// Affected rows, half-open.
    pub rows: Range<RowId>,
    /// Affected column number, `None` for all columns.
    pub column: Option<usize>,
}

impl GraphEvent {
    pub(crate) fn from_table(group: Group, event: &TableEvent) -> Self {
        Self {
            group,
            kind: event.kind,
            rows: event.rows.clone(),
            column: event.column,
        }
    }
}

/// Receives graph change events.
pub trait GraphListener {
    fn graph_changed(&self, graph: &Graph, event: &GraphEvent);
}

impl<F> GraphListener for F
where
    F: Fn(&Graph, &GraphEvent),
{
    fn graph_changed(&self, graph: &Graph, event: &GraphEvent) {
        self(graph, event)
    }
}
