//! Columnar tables.
//!
//! A `Table` is a cheap, clonable handle to shared table state: a list of
//! named typed columns, a row manager, lazily built column indices and the
//! registered listeners. Every mutation completes its bookkeeping, releases
//! all internal borrows, and then notifies listeners synchronously, so a
//! listener may freely read or mutate the table it is observing.

use crate::cascade::Cascade;
use crate::column::Column;
use crate::event::{ColumnListener, EventKind, ListenerList, TableEvent, TableListener};
use crate::index::TableIndex;
use crate::predicate::Predicate;
use crate::rows::RowManager;
use crate::sort::Sort;
use crate::tuple::Tuple;
use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::ops::Range;
use hashbrown::HashMap;
use tracing::debug;
use trellis_core::{ColumnDef, DataType, Error, Result, RowId, Schema, Value};
use trellis_index::{KeyRange, Order};

/// A column together with its descriptor and value-change listeners.
pub(crate) struct ColumnEntry {
    def: ColumnDef,
    column: Column,
    listeners: Rc<ListenerList<dyn ColumnListener>>,
}

impl ColumnEntry {
    fn new(def: ColumnDef, rows: usize) -> Self {
        let column = Column::new(def.data_type(), def.default_value().clone(), rows);
        Self {
            def,
            column,
            listeners: Rc::new(ListenerList::new()),
        }
    }
}

pub(crate) struct TableState {
    columns: Vec<ColumnEntry>,
    rows: RowManager,
    indices: HashMap<String, Rc<TableIndex>>,
    mod_count: u64,
    schema: Option<Schema>,
    locked: bool,
}

pub(crate) struct TableInner {
    state: RefCell<TableState>,
    listeners: ListenerList<dyn TableListener>,
    cascade: Option<Cascade>,
}

/// Where a field's values live.
pub(crate) enum Slot {
    /// A column owned by this table.
    Local(usize),
    /// A column inherited from the parent of a cascaded table.
    Inherited(Table),
}

/// A schema-typed, columnar table.
#[derive(Clone)]
pub struct Table {
    pub(crate) inner: Rc<TableInner>,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! typed_accessors {
    ($($(#[$doc:meta])* $get:ident, $set:ident, $ty:ty, $arg:ty, $variant:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $get(&self, row: RowId, field: &str) -> Result<$ty> {
                match self.slot(field)? {
                    Slot::Local(col) => self.read_local(row, col, |c, r| c.$get(r)),
                    Slot::Inherited(parent) => parent.$get(self.parent_row(row)?, field),
                }
            }

            $(#[$doc])*
            pub fn $set(&self, row: RowId, field: &str, value: $arg) -> Result<()> {
                self.write(row, field, Value::$variant(value.into()), true)
            }
        )*
    };
}

impl Table {
    /// Creates an empty table with no columns.
    pub fn new() -> Self {
        Self::assemble(Vec::new(), None)
    }

    /// Creates an empty table with the columns of `schema`.
    pub fn from_schema(schema: &Schema) -> Self {
        let columns = schema
            .columns()
            .iter()
            .map(|def| ColumnEntry::new(def.clone(), 0))
            .collect();
        Self::assemble(columns, None)
    }

    pub(crate) fn assemble(columns: Vec<ColumnEntry>, cascade: Option<Cascade>) -> Self {
        let state = TableState {
            columns,
            rows: RowManager::new(),
            indices: HashMap::new(),
            mod_count: 0,
            schema: None,
            locked: false,
        };
        Self {
            inner: Rc::new(TableInner {
                state: RefCell::new(state),
                listeners: ListenerList::new(),
                cascade,
            }),
        }
    }

    /// Returns true if both handles refer to the same table.
    #[inline]
    pub fn ptr_eq(&self, other: &Table) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    #[inline]
    pub(crate) fn cascade(&self) -> Option<&Cascade> {
        self.inner.cascade.as_ref()
    }

    /// Returns true if this table is a cascaded view over a parent table.
    #[inline]
    pub fn is_cascaded(&self) -> bool {
        self.inner.cascade.is_some()
    }

    fn ensure_not_cascaded(&self, operation: &str) -> Result<()> {
        if self.is_cascaded() {
            return Err(Error::unsupported(alloc::format!(
                "cannot {} a cascaded table; its rows follow the parent table",
                operation
            )));
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // Rows

    /// Returns the number of valid rows.
    pub fn row_count(&self) -> usize {
        self.inner.state.borrow().rows.row_count()
    }

    /// Returns true if `row` is a valid row.
    pub fn is_valid_row(&self, row: RowId) -> bool {
        self.inner.state.borrow().rows.is_valid_row(row)
    }

    /// Returns the lowest valid row.
    pub fn minimum_row(&self) -> Option<RowId> {
        self.inner.state.borrow().rows.minimum_row()
    }

    /// Returns the highest valid row.
    pub fn maximum_row(&self) -> Option<RowId> {
        self.inner.state.borrow().rows.maximum_row()
    }

    /// Returns the valid rows in ascending order.
    pub fn rows(&self) -> Vec<RowId> {
        self.inner.state.borrow().rows.rows().collect()
    }

    /// Returns the valid rows in descending order.
    pub fn rows_reversed(&self) -> Vec<RowId> {
        self.inner.state.borrow().rows.rows().rev().collect()
    }

    /// Returns a view of `row`.
    pub fn tuple(&self, row: RowId) -> Result<Tuple<'_>> {
        if !self.is_valid_row(row) {
            return Err(Error::row_out_of_range(row));
        }
        Ok(Tuple::new(self, row))
    }

    /// Returns the number of changes made to this table so far.
    pub fn modification_count(&self) -> u64 {
        self.inner.state.borrow().mod_count
    }

    /// Rows from the lowest to the highest valid row, for column events.
    pub(crate) fn row_span(&self) -> Range<RowId> {
        let state = self.inner.state.borrow();
        match (state.rows.minimum_row(), state.rows.maximum_row()) {
            (Some(min), Some(max)) => min..max + 1,
            _ => 0..0,
        }
    }

    /// Adds a row holding default values and returns its id.
    ///
    /// The lowest free row slot is reused. Fails on cascaded tables.
    pub fn add_row(&self) -> Result<RowId> {
        self.ensure_not_cascaded("add rows to")?;
        let row = self.allocate_row();
        self.fire(TableEvent::row(EventKind::Insert, row));
        Ok(row)
    }

    /// Adds `count` rows and returns their ids.
    pub fn add_rows(&self, count: usize) -> Result<Vec<RowId>> {
        self.ensure_not_cascaded("add rows to")?;
        let mut added = Vec::with_capacity(count);
        for _ in 0..count {
            let row = self.allocate_row();
            self.fire(TableEvent::row(EventKind::Insert, row));
            added.push(row);
        }
        Ok(added)
    }

    /// Removes a row. Returns false if `row` was not valid.
    ///
    /// Listeners receive the delete event while the row is still readable;
    /// the row is released and its cells reverted afterwards.
    pub fn remove_row(&self, row: RowId) -> Result<bool> {
        self.ensure_not_cascaded("remove rows from")?;
        Ok(self.release_row(row))
    }

    /// Removes every row, highest first.
    pub fn clear(&self) -> Result<()> {
        self.ensure_not_cascaded("clear")?;
        for row in self.rows_reversed() {
            self.release_row(row);
        }
        Ok(())
    }

    /// Takes a row slot and grows every column to cover it. Fires nothing.
    pub(crate) fn allocate_row(&self) -> RowId {
        let mut state = self.inner.state.borrow_mut();
        let TableState { rows, columns, .. } = &mut *state;
        let row = rows.add_row();
        let covered = rows.maximum_row().map_or(0, |max| max + 1);
        for entry in columns.iter_mut() {
            entry.column.set_maximum_row(covered);
        }
        row
    }

    /// Fires the delete event, then releases `row` and reverts its cells.
    pub(crate) fn release_row(&self, row: RowId) -> bool {
        if !self.is_valid_row(row) {
            return false;
        }
        self.fire(TableEvent::row(EventKind::Delete, row));
        let mut state = self.inner.state.borrow_mut();
        let TableState { rows, columns, .. } = &mut *state;
        if !rows.release_row(row) {
            return false;
        }
        for entry in columns.iter_mut() {
            entry.column.revert(row);
        }
        true
    }

    // ---------------------------------------------------------------
    // Columns

    /// Returns the number of columns owned by this table.
    pub(crate) fn local_column_count(&self) -> usize {
        self.inner.state.borrow().columns.len()
    }

    fn local_column(&self, field: &str) -> Option<usize> {
        self.inner
            .state
            .borrow()
            .columns
            .iter()
            .position(|e| e.def.name() == field)
    }

    pub(crate) fn local_names(&self) -> Vec<String> {
        self.inner
            .state
            .borrow()
            .columns
            .iter()
            .map(|e| e.def.name().to_string())
            .collect()
    }

    /// Returns the number of columns, inherited ones included.
    pub fn column_count(&self) -> usize {
        let inherited = self.cascade().map_or(0, |c| c.inherited.borrow().len());
        self.local_column_count() + inherited
    }

    /// Returns the name of column number `column`.
    pub fn column_name(&self, column: usize) -> Option<String> {
        let local = self.local_column_count();
        if column < local {
            return Some(self.inner.state.borrow().columns[column].def.name().to_string());
        }
        let cascade = self.cascade()?;
        let inherited = cascade.inherited.borrow();
        inherited.get(column - local).cloned()
    }

    /// Returns the column number of `field`.
    pub fn column_number(&self, field: &str) -> Option<usize> {
        if let Some(col) = self.local_column(field) {
            return Some(col);
        }
        let cascade = self.cascade()?;
        let inherited = cascade.inherited.borrow();
        let pos = inherited.iter().position(|n| n == field)?;
        Some(self.local_column_count() + pos)
    }

    /// Returns the names of every column in column-number order.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = self.local_names();
        if let Some(cascade) = self.cascade() {
            names.extend(cascade.inherited.borrow().iter().cloned());
        }
        names
    }

    /// Returns the descriptor of `field`.
    pub fn column_def(&self, field: &str) -> Option<ColumnDef> {
        match self.slot(field).ok()? {
            Slot::Local(col) => Some(self.inner.state.borrow().columns[col].def.clone()),
            Slot::Inherited(parent) => parent.column_def(field),
        }
    }

    /// Returns the type of `field`.
    pub fn column_type(&self, field: &str) -> Option<DataType> {
        self.column_def(field).map(|def| def.data_type())
    }

    /// Returns the default value of `field`.
    pub fn default_value(&self, field: &str) -> Option<Value> {
        self.column_def(field).map(|def| def.default_value().clone())
    }

    /// Returns a locked snapshot of the table's columns.
    ///
    /// The snapshot is cached until the column set changes.
    pub fn schema(&self) -> Schema {
        if let Some(schema) = &self.inner.state.borrow().schema {
            return schema.clone();
        }
        let schema: Schema = self
            .column_names()
            .iter()
            .filter_map(|name| self.column_def(name))
            .collect();
        let schema = schema.lock();
        self.inner.state.borrow_mut().schema = Some(schema.clone());
        schema
    }

    pub(crate) fn invalidate_schema(&self) {
        self.inner.state.borrow_mut().schema = None;
    }

    /// Rejects any further column additions or removals.
    pub fn lock_schema(&self) {
        self.inner.state.borrow_mut().locked = true;
    }

    /// Returns true if the column set is locked.
    pub fn is_schema_locked(&self) -> bool {
        self.inner.state.borrow().locked
    }

    /// Adds a column covering every current row with its default value.
    ///
    /// A cascaded table may add a column named like an inherited one; the
    /// local column then shadows the parent's.
    pub fn add_column(&self, name: &str, data_type: DataType, default: Option<Value>) -> Result<()> {
        let def = ColumnDef::new(name, data_type, default)?;
        let col = {
            let mut state = self.inner.state.borrow_mut();
            if state.locked {
                return Err(Error::SchemaLocked);
            }
            if state.columns.iter().any(|e| e.def.name() == name) {
                return Err(Error::duplicate_column(name));
            }
            let covered = state.rows.maximum_row().map_or(0, |max| max + 1);
            state.columns.push(ColumnEntry::new(def, covered));
            state.schema = None;
            state.columns.len() - 1
        };
        self.fire(TableEvent::column(EventKind::Insert, self.row_span(), col));
        if self.is_cascaded() {
            self.refilter_columns();
        }
        Ok(())
    }

    /// Adds every column of `schema`, stopping at the first failure.
    pub fn add_columns(&self, schema: &Schema) -> Result<()> {
        for def in schema.columns() {
            self.add_column(def.name(), def.data_type(), Some(def.default_value().clone()))?;
        }
        Ok(())
    }

    /// Removes a column owned by this table, together with its index.
    pub fn remove_column(&self, name: &str) -> Result<()> {
        let (col, index) = {
            let mut state = self.inner.state.borrow_mut();
            if state.locked {
                return Err(Error::SchemaLocked);
            }
            let col = state
                .columns
                .iter()
                .position(|e| e.def.name() == name)
                .ok_or_else(|| Error::column_not_found(name))?;
            state.columns.remove(col);
            state.schema = None;
            (col, state.indices.remove(name))
        };
        if let Some(index) = index {
            self.remove_table_listener(&index);
        }
        self.fire(TableEvent::column(EventKind::Delete, self.row_span(), col));
        if self.is_cascaded() {
            self.refilter_columns();
        }
        Ok(())
    }

    /// Resolves a field name to the table holding its values.
    pub(crate) fn slot(&self, field: &str) -> Result<Slot> {
        if let Some(col) = self.local_column(field) {
            return Ok(Slot::Local(col));
        }
        if let Some(cascade) = self.cascade() {
            if cascade.inherited.borrow().iter().any(|n| n == field) {
                return Ok(Slot::Inherited(cascade.parent.clone()));
            }
        }
        Err(Error::column_not_found(field))
    }

    /// Maps a row of a cascaded table to the parent row backing it.
    pub(crate) fn parent_row(&self, row: RowId) -> Result<RowId> {
        self.cascade()
            .and_then(|c| c.parent_of(row))
            .ok_or_else(|| Error::row_out_of_range(row))
    }

    /// Returns true if `field` can be read as `data_type`.
    pub fn can_get(&self, field: &str, data_type: DataType) -> bool {
        match self.slot(field) {
            Ok(Slot::Local(col)) => self.inner.state.borrow().columns[col].column.can_get(data_type),
            Ok(Slot::Inherited(parent)) => parent.can_get(field, data_type),
            Err(_) => false,
        }
    }

    /// Returns true if `field` accepts `data_type` values through a typed setter.
    pub fn can_set(&self, field: &str, data_type: DataType) -> bool {
        match self.slot(field) {
            Ok(Slot::Local(col)) => self.inner.state.borrow().columns[col].column.can_set(data_type),
            Ok(Slot::Inherited(parent)) => parent.can_set(field, data_type),
            Err(_) => false,
        }
    }

    // ---------------------------------------------------------------
    // Values

    fn read_local<T>(&self, row: RowId, col: usize, read: impl FnOnce(&Column, RowId) -> Result<T>) -> Result<T> {
        let state = self.inner.state.borrow();
        if !state.rows.is_valid_row(row) {
            return Err(Error::row_out_of_range(row));
        }
        let entry = state
            .columns
            .get(col)
            .ok_or_else(|| Error::column_out_of_range(col))?;
        read(&entry.column, row)
    }

    /// Returns the value of `field` at `row`.
    pub fn get(&self, row: RowId, field: &str) -> Result<Value> {
        match self.slot(field)? {
            Slot::Local(col) => self.read_local(row, col, |c, r| Ok(c.get(r))),
            Slot::Inherited(parent) => parent.get(self.parent_row(row)?, field),
        }
    }

    /// Sets the value of `field` at `row`, converting between numeric kinds.
    ///
    /// Writing an inherited field of a cascaded table writes the parent row.
    /// Nothing is fired if the value is unchanged.
    pub fn set(&self, row: RowId, field: &str, value: impl Into<Value>) -> Result<()> {
        self.write(row, field, value.into(), false)
    }

    /// Returns the value at column number `column`.
    pub fn get_at(&self, row: RowId, column: usize) -> Result<Value> {
        let name = self
            .column_name(column)
            .ok_or_else(|| Error::column_out_of_range(column))?;
        self.get(row, &name)
    }

    /// Sets the value at column number `column`.
    pub fn set_at(&self, row: RowId, column: usize, value: impl Into<Value>) -> Result<()> {
        let name = self
            .column_name(column)
            .ok_or_else(|| Error::column_out_of_range(column))?;
        self.write(row, &name, value.into(), false)
    }

    typed_accessors! {
        get_int, set_int, i32, i32, Int;
        get_long, set_long, i64, i64, Long;
        get_float, set_float, f32, f32, Float;
        get_double, set_double, f64, f64, Double;
        get_boolean, set_boolean, bool, bool, Boolean;
        get_string, set_string, String, &str, String;
        /// Dates are Unix timestamps in milliseconds.
        get_date, set_date, i64, i64, Date;
        get_int_array, set_int_array, Vec<i32>, Vec<i32>, IntArray;
    }

    fn write(&self, row: RowId, field: &str, value: Value, exact: bool) -> Result<()> {
        match self.slot(field)? {
            Slot::Local(col) => self.write_local(row, col, value, exact),
            Slot::Inherited(parent) => parent.write(self.parent_row(row)?, field, value, exact),
        }
    }

    fn write_local(&self, row: RowId, col: usize, value: Value, exact: bool) -> Result<()> {
        let (previous, listeners) = {
            let mut state = self.inner.state.borrow_mut();
            if !state.rows.is_valid_row(row) {
                return Err(Error::row_out_of_range(row));
            }
            let entry = state
                .columns
                .get_mut(col)
                .ok_or_else(|| Error::column_out_of_range(col))?;
            let changed = if exact {
                entry.column.set_exact(row, value)?
            } else {
                entry.column.set(row, value)?
            };
            match changed {
                Some(previous) => (previous, entry.listeners.clone()),
                None => return Ok(()),
            }
        };
        for listener in listeners.snapshot() {
            listener.column_changed(self, col, row, &previous);
        }
        self.fire(TableEvent::cell(EventKind::Update, row, col));
        Ok(())
    }

    /// Edits the integer array of `field` at `row` in place.
    ///
    /// `edit` runs while the table is borrowed and must not access it. An
    /// update event is fired afterwards; column listeners receive a copy of
    /// the array as it was before the edit.
    pub fn modify_int_array<R>(
        &self,
        row: RowId,
        field: &str,
        edit: impl FnOnce(&mut Vec<i32>) -> R,
    ) -> Result<R> {
        let col = match self.slot(field)? {
            Slot::Local(col) => col,
            Slot::Inherited(parent) => {
                return parent.modify_int_array(self.parent_row(row)?, field, edit)
            }
        };
        let (result, previous, listeners) = {
            let mut state = self.inner.state.borrow_mut();
            if !state.rows.is_valid_row(row) {
                return Err(Error::row_out_of_range(row));
            }
            let entry = state
                .columns
                .get_mut(col)
                .ok_or_else(|| Error::column_out_of_range(col))?;
            let listeners = entry.listeners.clone();
            let previous = (!listeners.is_empty()).then(|| entry.column.get(row));
            let result = edit(entry.column.int_array_mut(row)?);
            (result, previous, listeners)
        };
        if let Some(previous) = previous {
            for listener in listeners.snapshot() {
                listener.column_changed(self, col, row, &previous);
            }
        }
        self.fire(TableEvent::cell(EventKind::Update, row, col));
        Ok(result)
    }

    // ---------------------------------------------------------------
    // Listeners

    /// Registers a table listener, held weakly. Returns false if already registered.
    pub fn add_table_listener<L: TableListener + 'static>(&self, listener: &Rc<L>) -> bool {
        let weak: Weak<dyn TableListener> = Rc::<L>::downgrade(listener);
        self.inner.listeners.add(weak)
    }

    /// Unregisters a table listener.
    pub fn remove_table_listener<L: TableListener + 'static>(&self, listener: &Rc<L>) -> bool {
        let weak: Weak<dyn TableListener> = Rc::<L>::downgrade(listener);
        self.inner.listeners.remove(&weak)
    }

    /// Registers a value-change listener on `field`, held weakly.
    ///
    /// For an inherited field the listener is registered on the parent
    /// column and reports parent rows.
    pub fn add_column_listener<L: ColumnListener + 'static>(&self, field: &str, listener: &Rc<L>) -> Result<bool> {
        match self.slot(field)? {
            Slot::Local(col) => {
                let weak: Weak<dyn ColumnListener> = Rc::<L>::downgrade(listener);
                let listeners = self.inner.state.borrow().columns[col].listeners.clone();
                Ok(listeners.add(weak))
            }
            Slot::Inherited(parent) => parent.add_column_listener(field, listener),
        }
    }

    /// Unregisters a value-change listener from `field`.
    pub fn remove_column_listener<L: ColumnListener + 'static>(&self, field: &str, listener: &Rc<L>) -> Result<bool> {
        match self.slot(field)? {
            Slot::Local(col) => {
                let weak: Weak<dyn ColumnListener> = Rc::<L>::downgrade(listener);
                let listeners = self.inner.state.borrow().columns[col].listeners.clone();
                Ok(listeners.remove(&weak))
            }
            Slot::Inherited(parent) => parent.remove_column_listener(field, listener),
        }
    }

    /// Counts the change and delivers `event` to a snapshot of the listeners.
    pub(crate) fn fire(&self, event: TableEvent) {
        self.inner.state.borrow_mut().mod_count += 1;
        for listener in self.inner.listeners.snapshot() {
            listener.table_changed(self, &event);
        }
    }

    // ---------------------------------------------------------------
    // Indices

    /// Returns the index over `field`, building it on first request.
    pub fn index(&self, field: &str) -> Result<Rc<TableIndex>> {
        if let Some(index) = self.get_index(field) {
            return Ok(index);
        }
        self.slot(field)?;
        let index = Rc::new(TableIndex::new(field));
        index.rebuild(self)?;
        self.inner
            .state
            .borrow_mut()
            .indices
            .insert(field.to_string(), index.clone());
        self.add_table_listener(&index);
        debug!(field = field, entries = index.len(), "built column index");
        Ok(index)
    }

    /// Returns the index over `field` if one was built.
    pub fn get_index(&self, field: &str) -> Option<Rc<TableIndex>> {
        self.inner.state.borrow().indices.get(field).cloned()
    }

    /// Drops the index over `field`. Returns false if there was none.
    pub fn remove_index(&self, field: &str) -> bool {
        let removed = self.inner.state.borrow_mut().indices.remove(field);
        match removed {
            Some(index) => {
                self.remove_table_listener(&index);
                true
            }
            None => false,
        }
    }

    /// Returns every row ordered by `field`.
    pub fn rows_sorted_by(&self, field: &str, ascending: bool) -> Result<Vec<RowId>> {
        Ok(self.index(field)?.all(Order::from_ascending(ascending)))
    }

    /// Returns the rows whose `field` falls within `range`, ordered by `field`.
    pub fn range_sorted_by(&self, field: &str, range: &KeyRange<Value>, order: Order) -> Result<Vec<RowId>> {
        Ok(self.index(field)?.range(range, order))
    }

    // ---------------------------------------------------------------
    // Selection

    /// Returns the rows passing `filter`, ascending.
    pub fn rows_where(&self, filter: &dyn Predicate) -> Vec<RowId> {
        let rows = self.rows();
        if filter.is_always_true() {
            return rows;
        }
        rows.into_iter()
            .filter(|&row| filter.test(&Tuple::new(self, row)))
            .collect()
    }

    /// Copies the rows passing `filter` into a new, independent table.
    ///
    /// Rows are inserted in `sort` order, or ascending row order without one.
    pub fn select(&self, filter: &dyn Predicate, sort: Option<&Sort>) -> Result<Table> {
        let schema = self.schema();
        let mut rows = self.rows_where(filter);
        if let Some(sort) = sort {
            sort.sort_rows(self, &mut rows)?;
        }
        let selected = Table::from_schema(&schema);
        for row in rows {
            let target = selected.add_row()?;
            for (col, def) in schema.columns().iter().enumerate() {
                selected.write_local(target, col, self.get(row, def.name())?, false)?;
            }
        }
        Ok(selected)
    }

    /// Removes every row passing `filter` and returns how many were removed.
    pub fn remove_where(&self, filter: &dyn Predicate) -> Result<usize> {
        self.ensure_not_cascaded("remove rows from")?;
        let rows = self.rows_where(filter);
        Ok(rows
            .into_iter()
            .rev()
            .filter(|&row| self.release_row(row))
            .count())
    }

    /// Appends a copy of `tuple`, whose table's columns must all exist here.
    pub fn add_tuple(&self, tuple: &Tuple<'_>) -> Result<RowId> {
        let source = tuple.table().schema();
        if !self.schema().is_assignable_from(&source) {
            return Err(Error::invalid_argument(
                "tuple columns are not assignable to this table",
            ));
        }
        if !tuple.is_valid() {
            return Err(Error::row_out_of_range(tuple.row()));
        }
        let row = self.add_row()?;
        for def in source.columns() {
            self.set(row, def.name(), tuple.get(def.name())?)?;
        }
        Ok(row)
    }
}

impl core::fmt::Debug for Table {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Table")
            .field("columns", &self.column_names())
            .field("rows", &self.row_count())
            .field("cascaded", &self.is_cascaded())
            .finish()
    }
}
