//! Trellis Graph - Graphs and trees over Trellis tables.
//!
//! This crate layers graph structure on top of `trellis-table`:
//!
//! - `Graph`: node and edge tables with incrementally maintained adjacency
//! - `Tree`: a rooted, ordered parent/child graph with sibling navigation
//! - `SpanningTree`: a read-only breadth-first tree derived from a graph
//!
//! # Example
//!
//! ```rust
//! use trellis_graph::Graph;
//!
//! let graph = Graph::new(true);
//! let a = graph.add_node().unwrap();
//! let b = graph.add_node().unwrap();
//! let c = graph.add_node().unwrap();
//! graph.add_edge(a, b).unwrap();
//! graph.add_edge(a, c).unwrap();
//!
//! assert_eq!(graph.out_degree(a).unwrap(), 2);
//! assert_eq!(graph.neighbors(a).unwrap(), vec![b, c]);
//!
//! let tree = graph.spanning_tree_from(a).unwrap();
//! assert_eq!(tree.children(a).unwrap(), vec![b, c]);
//! ```

#![no_std]

extern crate alloc;

pub mod event;
pub mod graph;
pub mod keys;
mod links;
pub mod spanning;
pub mod tree;

pub use event::{GraphEvent, GraphListener, Group};
pub use graph::{Direction, Graph};
pub use keys::GraphKeys;
pub use spanning::SpanningTree;
pub use tree::Tree;
