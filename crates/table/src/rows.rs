//! Row slot tracking.
//!
//! `RowManager` records which row slots of a table are in use. New rows take
//! the lowest free slot, so a released row id is handed out again by the next
//! insertion.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use trellis_core::RowId;

/// Tracks valid rows and free slots of a table.
///
/// The highest tracked slot is always valid; releasing it trims the trailing
/// free slots, so `maximum_row` stays the highest valid row.
#[derive(Clone, Debug, Default)]
pub struct RowManager {
    valid: Vec<bool>,
    free: BTreeSet<RowId>,
    count: usize,
}

impl RowManager {
    /// Creates an empty row manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of valid rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.count
    }

    /// Returns whether `row` is currently valid.
    #[inline]
    pub fn is_valid_row(&self, row: RowId) -> bool {
        self.valid.get(row).copied().unwrap_or(false)
    }

    /// Allocates the lowest free row slot and marks it valid.
    pub fn add_row(&mut self) -> RowId {
        self.count += 1;
        match self.free.pop_first() {
            Some(row) => {
                self.valid[row] = true;
                row
            }
            None => {
                self.valid.push(true);
                self.valid.len() - 1
            }
        }
    }

    /// Marks `row` invalid and frees its slot. Returns false if it was not valid.
    pub fn release_row(&mut self, row: RowId) -> bool {
        if !self.is_valid_row(row) {
            return false;
        }
        self.valid[row] = false;
        self.count -= 1;
        self.free.insert(row);
        while self.valid.last() == Some(&false) {
            self.valid.pop();
            self.free.remove(&self.valid.len());
        }
        true
    }

    /// Returns the lowest valid row.
    pub fn minimum_row(&self) -> Option<RowId> {
        self.valid.iter().position(|v| *v)
    }

    /// Returns the highest valid row.
    #[inline]
    pub fn maximum_row(&self) -> Option<RowId> {
        self.valid.len().checked_sub(1)
    }

    /// Iterates valid rows in ascending order.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = RowId> + '_ {
        self.valid
            .iter()
            .enumerate()
            .filter_map(|(row, valid)| valid.then_some(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_add_rows() {
        let mut rows = RowManager::new();
        assert_eq!(rows.add_row(), 0);
        assert_eq!(rows.add_row(), 1);
        assert_eq!(rows.add_row(), 2);
        assert_eq!(rows.row_count(), 3);
        assert_eq!(rows.minimum_row(), Some(0));
        assert_eq!(rows.maximum_row(), Some(2));
    }

    #[test]
    fn test_lowest_slot_reused() {
        let mut rows = RowManager::new();
        for _ in 0..5 {
            rows.add_row();
        }
        assert!(rows.release_row(3));
        assert!(rows.release_row(1));
        assert!(!rows.release_row(1));
        assert_eq!(rows.add_row(), 1);
        assert_eq!(rows.add_row(), 3);
        assert_eq!(rows.add_row(), 5);
    }

    #[test]
    fn test_trailing_release_shrinks_maximum() {
        let mut rows = RowManager::new();
        for _ in 0..4 {
            rows.add_row();
        }
        rows.release_row(2);
        rows.release_row(3);
        assert_eq!(rows.maximum_row(), Some(1));
        assert_eq!(rows.add_row(), 2);
        rows.release_row(0);
        rows.release_row(1);
        rows.release_row(2);
        assert_eq!(rows.maximum_row(), None);
        assert_eq!(rows.minimum_row(), None);
        assert_eq!(rows.add_row(), 0);
    }

    #[test]
    fn test_iteration() {
        let mut rows = RowManager::new();
        for _ in 0..5 {
            rows.add_row();
        }
        rows.release_row(0);
        rows.release_row(3);
        assert_eq!(rows.rows().collect::<Vec<_>>(), vec![1, 2, 4]);
        assert_eq!(rows.rows().rev().collect::<Vec<_>>(), vec![4, 2, 1]);
    }

    #[test]
    fn test_invalid_rows() {
        let rows = RowManager::new();
        assert!(!rows.is_valid_row(0));
        let mut rows = rows;
        assert!(!rows.release_row(7));
    }
}
