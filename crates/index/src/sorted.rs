//! Ordered key → rows multi-map.
//!
//! `SortedIndex` keeps every row under its key, rows of one key in ascending
//! row order. Duplicate keys are allowed; a (key, row) pair is stored once.

use crate::comparator::Order;
use crate::range::KeyRange;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use trellis_core::RowId;

/// Sorted multi-map from keys to row ids.
#[derive(Clone, Debug)]
pub struct SortedIndex<K> {
    map: BTreeMap<K, Vec<RowId>>,
    len: usize,
}

impl<K: Ord + Clone> Default for SortedIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone> SortedIndex<K> {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
            len: 0,
        }
    }

    /// Returns the number of (key, row) entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the index holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of distinct keys.
    #[inline]
    pub fn unique_count(&self) -> usize {
        self.map.len()
    }

    /// Adds `row` under `key`. Returns false if the pair was already present.
    pub fn insert(&mut self, key: K, row: RowId) -> bool {
        let rows = self.map.entry(key).or_default();
        match rows.binary_search(&row) {
            Ok(_) => false,
            Err(pos) => {
                rows.insert(pos, row);
                self.len += 1;
                true
            }
        }
    }

    /// Removes `row` from under `key`. Returns false if the pair was absent.
    pub fn remove(&mut self, key: &K, row: RowId) -> bool {
        let Some(rows) = self.map.get_mut(key) else {
            return false;
        };
        let Ok(pos) = rows.binary_search(&row) else {
            return false;
        };
        rows.remove(pos);
        if rows.is_empty() {
            self.map.remove(key);
        }
        self.len -= 1;
        true
    }

    /// Returns the lowest row stored under `key`.
    pub fn get(&self, key: &K) -> Option<RowId> {
        self.map.get(key).and_then(|rows| rows.first().copied())
    }

    /// Returns every row stored under `key`.
    pub fn rows_for(&self, key: &K) -> Vec<RowId> {
        self.map.get(key).cloned().unwrap_or_default()
    }

    /// Returns the rows whose keys fall within `range`, ordered by key.
    ///
    /// Rows sharing a key are listed in ascending row order for `Order::Asc`
    /// and descending row order for `Order::Desc`.
    pub fn range(&self, range: &KeyRange<K>, order: Order) -> Vec<RowId> {
        if range.is_empty() {
            return Vec::new();
        }
        let entries = self.map.range::<K, _>(range.as_bounds());
        match order {
            Order::Asc => entries.flat_map(|(_, rows)| rows.iter().copied()).collect(),
            Order::Desc => entries
                .rev()
                .flat_map(|(_, rows)| rows.iter().rev().copied())
                .collect(),
        }
    }

    /// Returns every row, ordered by key.
    pub fn all(&self, order: Order) -> Vec<RowId> {
        self.range(&KeyRange::All, order)
    }

    /// Returns the smallest key.
    pub fn min_key(&self) -> Option<&K> {
        self.map.keys().next()
    }

    /// Returns the largest key.
    pub fn max_key(&self) -> Option<&K> {
        self.map.keys().next_back()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.map.clear();
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn sample() -> SortedIndex<i32> {
        let mut index = SortedIndex::new();
        index.insert(30, 2);
        index.insert(10, 0);
        index.insert(20, 1);
        index.insert(20, 3);
        index
    }

    #[test]
    fn test_insert_and_get() {
        let index = sample();
        assert_eq!(index.len(), 4);
        assert_eq!(index.unique_count(), 3);
        assert_eq!(index.get(&20), Some(1));
        assert_eq!(index.rows_for(&20), vec![1, 3]);
        assert_eq!(index.get(&99), None);
    }

    #[test]
    fn test_duplicate_pair_ignored() {
        let mut index = sample();
        assert!(!index.insert(20, 3));
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_remove() {
        let mut index = sample();
        assert!(index.remove(&20, 1));
        assert!(!index.remove(&20, 1));
        assert!(!index.remove(&40, 0));
        assert_eq!(index.rows_for(&20), vec![3]);
        assert!(index.remove(&20, 3));
        assert_eq!(index.unique_count(), 2);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_range_scans() {
        let index = sample();
        assert_eq!(index.all(Order::Asc), vec![0, 1, 3, 2]);
        assert_eq!(index.all(Order::Desc), vec![2, 3, 1, 0]);
        assert_eq!(index.range(&KeyRange::bound(15, 30, false, true), Order::Asc), vec![1, 3]);
        assert_eq!(index.range(&KeyRange::upper_bound(20, true), Order::Asc), vec![0]);
        assert!(index.range(&KeyRange::bound(30, 10, false, false), Order::Asc).is_empty());
        assert!(index.range(&KeyRange::bound(20, 20, true, true), Order::Asc).is_empty());
    }

    #[test]
    fn test_min_max_clear() {
        let mut index = sample();
        assert_eq!(index.min_key(), Some(&10));
        assert_eq!(index.max_key(), Some(&30));
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.min_key(), None);
    }
}
