//! Trellis Index - Sorted multi-map indices for Trellis tables.
//!
//! This crate provides the ordered structures that back column indices:
//!
//! - `SortedIndex`: ordered key → rows multi-map with range scans
//! - `KeyRange`: inclusive/exclusive key bounds for range scans
//! - `Order` and `MultiKeyComparator`: sort orders over single and composite keys
//!
//! # Example
//!
//! ```rust
//! use trellis_index::{KeyRange, Order, SortedIndex};
//!
//! let mut index: SortedIndex<i32> = SortedIndex::new();
//! index.insert(10, 1);
//! index.insert(20, 2);
//! index.insert(5, 0);
//!
//! // Point query
//! assert_eq!(index.get(&10), Some(1));
//!
//! // Range query
//! let range = KeyRange::lower_bound(10, false);
//! assert_eq!(index.range(&range, Order::Asc), vec![1, 2]);
//! assert_eq!(index.range(&range, Order::Desc), vec![2, 1]);
//! ```

#![no_std]

extern crate alloc;

pub mod comparator;
pub mod range;
pub mod sorted;

pub use comparator::{MultiKeyComparator, Order};
pub use range::KeyRange;
pub use sorted::SortedIndex;
