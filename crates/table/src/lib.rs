//! Trellis Table - Live columnar tables for Trellis.
//!
//! This crate provides the in-memory data layer:
//!
//! - `Table`: named, typed columns over reusable row slots, with change events
//! - `CascadedTable`: a live filtered and projected view over a parent table
//! - `TableIndex`: a sorted column index kept current by table events
//! - `Predicate`, `ColumnProjection` and `Sort` for selections and views
//!
//! # Example
//!
//! ```rust
//! use trellis_core::DataType;
//! use trellis_table::{CascadedTable, Table, Tuple};
//!
//! let people = Table::new();
//! people.add_column("name", DataType::String, None).unwrap();
//! people.add_column("age", DataType::Int, None).unwrap();
//!
//! let row = people.add_row().unwrap();
//! people.set_string(row, "name", "ada").unwrap();
//! people.set_int(row, "age", 36).unwrap();
//!
//! let adults = CascadedTable::with_filter(&people, |t: &Tuple<'_>| {
//!     t.get_int("age").map_or(false, |age| age > 15)
//! });
//! assert_eq!(adults.row_count(), 1);
//!
//! people.set_int(row, "age", 12).unwrap();
//! assert_eq!(adults.row_count(), 0);
//! ```

#![no_std]

extern crate alloc;

pub mod cascade;
pub mod column;
pub mod event;
pub mod index;
pub mod predicate;
pub mod rows;
pub mod sort;
pub mod table;
pub mod tuple;

pub use cascade::CascadedTable;
pub use column::Column;
pub use event::{ColumnListener, EventKind, ListenerList, TableEvent, TableListener};
pub use index::TableIndex;
pub use predicate::{AcceptAll, AlwaysTrue, ColumnProjection, NamedProjection, Predicate};
pub use rows::RowManager;
pub use sort::Sort;
pub use table::Table;
pub use tuple::Tuple;
