//! Live sorted indices over table columns.
//!
//! A [`TableIndex`] is registered as a listener on its table and keeps a
//! value-to-rows mapping current as rows are inserted, deleted and updated.

use crate::event::{EventKind, TableEvent, TableListener};
use crate::table::Table;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;
use hashbrown::HashMap;
use trellis_core::{Result, RowId, Value};
use trellis_index::{KeyRange, Order, SortedIndex};

struct IndexState {
    sorted: SortedIndex<Value>,
    // row -> key it is currently filed under
    keys: HashMap<RowId, Value>,
}

/// A sorted index over one field of a table.
pub struct TableIndex {
    field: String,
    state: RefCell<IndexState>,
}

impl TableIndex {
    pub(crate) fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
            state: RefCell::new(IndexState {
                sorted: SortedIndex::new(),
                keys: HashMap::new(),
            }),
        }
    }

    /// Refiles every valid row of `table`.
    pub(crate) fn rebuild(&self, table: &Table) -> Result<()> {
        let mut entries = Vec::with_capacity(table.row_count());
        for row in table.rows() {
            entries.push((table.get(row, &self.field)?, row));
        }
        let mut state = self.state.borrow_mut();
        state.sorted.clear();
        state.keys.clear();
        for (key, row) in entries {
            state.sorted.insert(key.clone(), row);
            state.keys.insert(row, key);
        }
        Ok(())
    }

    fn insert_row(&self, table: &Table, row: RowId) {
        if let Ok(key) = table.get(row, &self.field) {
            let mut state = self.state.borrow_mut();
            state.sorted.insert(key.clone(), row);
            state.keys.insert(row, key);
        }
    }

    fn remove_row(&self, row: RowId) {
        let mut state = self.state.borrow_mut();
        if let Some(key) = state.keys.remove(&row) {
            state.sorted.remove(&key, row);
        }
    }

    fn reindex_row(&self, table: &Table, row: RowId) {
        self.remove_row(row);
        if table.is_valid_row(row) {
            self.insert_row(table, row);
        }
    }

    /// Returns the indexed field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the lowest row holding `key`.
    pub fn get(&self, key: &Value) -> Option<RowId> {
        self.state.borrow().sorted.get(key)
    }

    /// Returns every row holding `key`, ascending.
    pub fn rows_for(&self, key: &Value) -> Vec<RowId> {
        self.state.borrow().sorted.rows_for(key)
    }

    /// Returns the rows whose key falls within `range`.
    pub fn range(&self, range: &KeyRange<Value>, order: Order) -> Vec<RowId> {
        self.state.borrow().sorted.range(range, order)
    }

    /// Returns every indexed row in key order.
    pub fn all(&self, order: Order) -> Vec<RowId> {
        self.state.borrow().sorted.all(order)
    }

    /// Returns the number of indexed rows.
    pub fn len(&self) -> usize {
        self.state.borrow().sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of distinct keys.
    pub fn unique_count(&self) -> usize {
        self.state.borrow().sorted.unique_count()
    }

    /// Returns the smallest key.
    pub fn minimum(&self) -> Option<Value> {
        self.state.borrow().sorted.min_key().cloned()
    }

    /// Returns the largest key.
    pub fn maximum(&self) -> Option<Value> {
        self.state.borrow().sorted.max_key().cloned()
    }
}

impl TableListener for TableIndex {
    fn table_changed(&self, table: &Table, event: &TableEvent) {
        match (event.kind, event.column) {
            (EventKind::Insert, None) => {
                for row in event.rows.clone() {
                    self.insert_row(table, row);
                }
            }
            (EventKind::Delete, None) => {
                for row in event.rows.clone() {
                    self.remove_row(row);
                }
            }
            (EventKind::Update, None) => {
                for row in event.rows.clone() {
                    self.reindex_row(table, row);
                }
            }
            (EventKind::Update, Some(col)) => {
                if table.column_name(col).as_deref() == Some(self.field.as_str()) {
                    for row in event.rows.clone() {
                        self.reindex_row(table, row);
                    }
                }
            }
            _ => {}
        }
    }
}

impl core::fmt::Debug for TableIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TableIndex")
            .field("field", &self.field)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use trellis_core::DataType;

    fn scores() -> Table {
        let table = Table::new();
        table.add_column("score", DataType::Double, None).unwrap();
        for s in [3.0, 1.0, 2.0, 1.0] {
            let row = table.add_row().unwrap();
            table.set_double(row, "score", s).unwrap();
        }
        table
    }

    #[test]
    fn test_build_and_query() {
        let table = scores();
        let index = table.index("score").unwrap();
        assert_eq!(index.field(), "score");
        assert_eq!(index.len(), 4);
        assert_eq!(index.unique_count(), 3);
        assert_eq!(index.rows_for(&Value::Double(1.0)), vec![1, 3]);
        assert_eq!(index.minimum(), Some(Value::Double(1.0)));
        assert_eq!(index.maximum(), Some(Value::Double(3.0)));
        assert_eq!(index.all(Order::Desc), vec![0, 2, 3, 1]);
    }

    #[test]
    fn test_follows_updates() {
        let table = scores();
        let index = table.index("score").unwrap();
        table.set_double(3, "score", 5.0).unwrap();
        assert_eq!(index.rows_for(&Value::Double(1.0)), vec![1]);
        assert_eq!(index.maximum(), Some(Value::Double(5.0)));
        table.remove_row(1).unwrap();
        assert_eq!(index.minimum(), Some(Value::Double(2.0)));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_ignores_other_columns() {
        let table = scores();
        table.add_column("label", DataType::String, None).unwrap();
        let index = table.index("score").unwrap();
        table.set_string(0, "label", "x").unwrap();
        assert_eq!(index.len(), 4);
        assert_eq!(index.get(&Value::Double(3.0)), Some(0));
    }

    #[test]
    fn test_unknown_field() {
        let table = scores();
        assert!(table.index("missing").is_err());
    }
}
