//! Trellis Core - Core types and schema definitions for Trellis tables.
//!
//! This crate provides the foundational types shared by the table and graph
//! layers:
//!
//! - `DataType`: Supported column types (Boolean, Int, Long, Float, Double, String, Date, IntArray, Object)
//! - `Value`: Runtime values that can be stored in a table cell
//! - `Schema`: Ordered, lockable column descriptors
//! - `Error`: Error types for table and graph operations
//!
//! # Example
//!
//! ```rust
//! use trellis_core::{DataType, Schema, Value};
//!
//! let schema = Schema::new()
//!     .with_column("name", DataType::String, None)
//!     .unwrap()
//!     .with_column("age", DataType::Int, Some(Value::Int(0)))
//!     .unwrap()
//!     .lock();
//!
//! assert_eq!(schema.column_index("age"), Some(1));
//! assert!(schema.is_locked());
//! ```

#![no_std]

extern crate alloc;

mod error;
pub mod schema;
mod types;
mod value;

pub use error::{Error, Result};
pub use schema::{ColumnDef, Schema};
pub use types::DataType;
pub use value::Value;

/// Row identifier within a table.
///
/// Row ids are dense slot numbers; a released slot is reused by the next
/// inserted row.
pub type RowId = usize;
