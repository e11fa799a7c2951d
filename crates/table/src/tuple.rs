//! Row views.

use crate::table::Table;
use alloc::string::String;
use trellis_core::{Result, RowId, Value};

/// A borrowed view of one row of a table.
///
/// A tuple does not pin its row: once the row is removed, accessors fail with
/// an out-of-range error.
#[derive(Clone, Copy)]
pub struct Tuple<'a> {
    table: &'a Table,
    row: RowId,
}

impl<'a> Tuple<'a> {
    /// Creates a view of `row` in `table`.
    #[inline]
    pub fn new(table: &'a Table, row: RowId) -> Self {
        Self { table, row }
    }

    /// Returns the table the row belongs to.
    #[inline]
    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// Returns the row id.
    #[inline]
    pub fn row(&self) -> RowId {
        self.row
    }

    /// Returns true if the row is still valid.
    pub fn is_valid(&self) -> bool {
        self.table.is_valid_row(self.row)
    }

    pub fn get(&self, field: &str) -> Result<Value> {
        self.table.get(self.row, field)
    }

    pub fn get_int(&self, field: &str) -> Result<i32> {
        self.table.get_int(self.row, field)
    }

    pub fn get_long(&self, field: &str) -> Result<i64> {
        self.table.get_long(self.row, field)
    }

    pub fn get_float(&self, field: &str) -> Result<f32> {
        self.table.get_float(self.row, field)
    }

    pub fn get_double(&self, field: &str) -> Result<f64> {
        self.table.get_double(self.row, field)
    }

    pub fn get_boolean(&self, field: &str) -> Result<bool> {
        self.table.get_boolean(self.row, field)
    }

    pub fn get_string(&self, field: &str) -> Result<String> {
        self.table.get_string(self.row, field)
    }

    pub fn get_date(&self, field: &str) -> Result<i64> {
        self.table.get_date(self.row, field)
    }

    /// Writes a value through to the underlying table.
    pub fn set(&self, field: &str, value: impl Into<Value>) -> Result<()> {
        self.table.set(self.row, field, value)
    }
}

impl core::fmt::Debug for Tuple<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tuple").field("row", &self.row).finish()
    }
}
