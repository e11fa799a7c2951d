//! Live filtered views over a parent table.
//!
//! A [`CascadedTable`] shows the parent rows passing a row filter and the
//! parent columns accepted by a column projection. It listens to its parent
//! and stays consistent after every parent change. Inherited cells read from
//! and write to the parent; the view may add local columns of its own, which
//! shadow parent columns of the same name.

use crate::event::{EventKind, TableEvent, TableListener};
use crate::predicate::{AcceptAll, AlwaysTrue, ColumnProjection, Predicate};
use crate::table::{Slot, Table, TableInner};
use crate::tuple::Tuple;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::ops::Deref;
use hashbrown::HashMap;
use tracing::debug;
use trellis_core::RowId;

#[derive(Default)]
struct RowMapping {
    to_parent: HashMap<RowId, RowId>,
    to_child: HashMap<RowId, RowId>,
}

impl RowMapping {
    fn bind(&mut self, child: RowId, parent: RowId) {
        self.to_parent.insert(child, parent);
        self.to_child.insert(parent, child);
    }

    fn unbind(&mut self, child: RowId) {
        if let Some(parent) = self.to_parent.remove(&child) {
            self.to_child.remove(&parent);
        }
    }
}

/// Cascade state carried by a table built as a view.
pub(crate) struct Cascade {
    pub(crate) parent: Table,
    /// Inherited parent columns in parent order, numbered after the local ones.
    pub(crate) inherited: RefCell<Vec<String>>,
    filter: RefCell<Rc<dyn Predicate>>,
    projection: RefCell<Rc<dyn ColumnProjection>>,
    mapping: RefCell<RowMapping>,
    // Keeps the parent subscription alive; the parent only holds it weakly.
    observer: RefCell<Option<Rc<ParentObserver>>>,
}

impl Cascade {
    pub(crate) fn parent_of(&self, child: RowId) -> Option<RowId> {
        self.mapping.borrow().to_parent.get(&child).copied()
    }

    fn child_of(&self, parent: RowId) -> Option<RowId> {
        self.mapping.borrow().to_child.get(&parent).copied()
    }

    fn passes(&self, parent_row: RowId) -> bool {
        if !self.parent.is_valid_row(parent_row) {
            return false;
        }
        let filter = self.filter.borrow().clone();
        filter.is_always_true() || filter.test(&Tuple::new(&self.parent, parent_row))
    }
}

struct ParentObserver {
    child: Weak<TableInner>,
}

impl TableListener for ParentObserver {
    fn table_changed(&self, _parent: &Table, event: &TableEvent) {
        if let Some(inner) = self.child.upgrade() {
            Table { inner }.parent_changed(event);
        }
    }
}

impl Table {
    fn parent_changed(&self, event: &TableEvent) {
        let Some(cascade) = self.cascade() else {
            return;
        };
        match (event.kind, event.column) {
            (EventKind::Update, Some(col)) => {
                let field = cascade.parent.column_name(col);
                for parent_row in event.rows.clone() {
                    self.retest_parent_row(parent_row, field.as_deref());
                }
            }
            // whole-row updates carry nothing to re-test against
            (EventKind::Update, None) => {}
            (EventKind::Delete, None) => {
                for parent_row in event.rows.clone() {
                    if let Some(child) = cascade.child_of(parent_row) {
                        self.remove_cascaded_row(child);
                    }
                }
            }
            (EventKind::Insert, None) => {
                for parent_row in event.rows.clone() {
                    if cascade.child_of(parent_row).is_none() && cascade.passes(parent_row) {
                        self.add_cascaded_row(parent_row);
                    }
                }
            }
            (EventKind::Insert | EventKind::Delete, Some(_)) => self.refilter_columns(),
        }
    }

    fn retest_parent_row(&self, parent_row: RowId, field: Option<&str>) {
        let Some(cascade) = self.cascade() else {
            return;
        };
        match (cascade.child_of(parent_row), cascade.passes(parent_row)) {
            (Some(child), true) => {
                let Some(field) = field else {
                    return;
                };
                if matches!(self.slot(field), Ok(Slot::Inherited(_))) {
                    if let Some(col) = self.column_number(field) {
                        self.fire(TableEvent::cell(EventKind::Update, child, col));
                    }
                }
            }
            (Some(child), false) => self.remove_cascaded_row(child),
            (None, true) => {
                self.add_cascaded_row(parent_row);
            }
            (None, false) => {}
        }
    }

    fn add_cascaded_row(&self, parent_row: RowId) -> Option<RowId> {
        let cascade = self.cascade()?;
        let child = self.allocate_row();
        cascade.mapping.borrow_mut().bind(child, parent_row);
        self.fire(TableEvent::row(EventKind::Insert, child));
        Some(child)
    }

    fn remove_cascaded_row(&self, child: RowId) {
        // listeners see the delete while the row still maps to its parent
        self.release_row(child);
        if let Some(cascade) = self.cascade() {
            cascade.mapping.borrow_mut().unbind(child);
        }
    }

    /// Brings the child rows in line with the parent rows passing the filter.
    pub(crate) fn refilter_rows(&self) {
        let Some(cascade) = self.cascade() else {
            return;
        };
        let mut removed = 0usize;
        for child in self.rows_reversed() {
            let keep = cascade.parent_of(child).map_or(false, |p| cascade.passes(p));
            if !keep {
                self.remove_cascaded_row(child);
                removed += 1;
            }
        }
        let mut added = 0usize;
        for parent_row in cascade.parent.rows() {
            if cascade.child_of(parent_row).is_none() && cascade.passes(parent_row) {
                self.add_cascaded_row(parent_row);
                added += 1;
            }
        }
        debug!(removed, added, rows = self.row_count(), "refiltered cascaded rows");
    }

    /// Recomputes the inherited columns from the parent and the projection.
    pub(crate) fn refilter_columns(&self) {
        let Some(cascade) = self.cascade() else {
            return;
        };
        let local = self.local_names();
        let projection = cascade.projection.borrow().clone();
        let next: Vec<String> = cascade
            .parent
            .column_names()
            .into_iter()
            .filter(|name| !local.contains(name))
            .filter(|name| {
                cascade
                    .parent
                    .column_type(name)
                    .map_or(false, |dt| projection.include(name, dt))
            })
            .collect();
        let previous = cascade.inherited.replace(next.clone());
        if previous == next {
            return;
        }
        self.invalidate_schema();

        let base = local.len();
        let span = self.row_span();
        for (i, name) in previous.iter().enumerate().rev() {
            if !next.contains(name) {
                self.remove_index(name);
                self.fire(TableEvent::column(EventKind::Delete, span.clone(), base + i));
            }
        }
        for (i, name) in next.iter().enumerate() {
            if !previous.contains(name) {
                self.fire(TableEvent::column(EventKind::Insert, span.clone(), base + i));
            }
        }
        debug!(
            inherited = next.len(),
            local = base,
            "refiltered cascaded columns"
        );
    }
}

/// A live view of the parent rows passing a filter.
///
/// Rows cannot be added to or removed from the view directly; they follow
/// the parent. Dereferences to [`Table`] for reads, writes and listeners.
pub struct CascadedTable {
    table: Table,
    parent: Table,
}

impl CascadedTable {
    /// Creates a view of every row and column of `parent`.
    pub fn new(parent: &Table) -> Self {
        Self::with_options(parent, Rc::new(AlwaysTrue), Rc::new(AcceptAll))
    }

    /// Creates a view of the rows of `parent` passing `filter`.
    pub fn with_filter(parent: &Table, filter: impl Predicate + 'static) -> Self {
        Self::with_options(parent, Rc::new(filter), Rc::new(AcceptAll))
    }

    /// Creates a view with both a row filter and a column projection.
    pub fn with_options(
        parent: &Table,
        filter: Rc<dyn Predicate>,
        projection: Rc<dyn ColumnProjection>,
    ) -> Self {
        let cascade = Cascade {
            parent: parent.clone(),
            inherited: RefCell::new(Vec::new()),
            filter: RefCell::new(filter),
            projection: RefCell::new(projection),
            mapping: RefCell::new(RowMapping::default()),
            observer: RefCell::new(None),
        };
        let table = Table::assemble(Vec::new(), Some(cascade));
        let observer = Rc::new(ParentObserver {
            child: Rc::downgrade(&table.inner),
        });
        parent.add_table_listener(&observer);
        if let Some(cascade) = table.cascade() {
            *cascade.observer.borrow_mut() = Some(observer);
        }
        table.refilter_columns();
        table.refilter_rows();
        Self {
            table,
            parent: parent.clone(),
        }
    }

    /// Returns the view as a plain table handle.
    #[inline]
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Returns the parent table.
    #[inline]
    pub fn parent(&self) -> &Table {
        &self.parent
    }

    /// Returns the parent row backing `child`.
    pub fn parent_row(&self, child: RowId) -> Option<RowId> {
        self.table.cascade().and_then(|c| c.parent_of(child))
    }

    /// Returns the view row bound to `parent`, if the parent row is shown.
    pub fn child_row(&self, parent: RowId) -> Option<RowId> {
        self.table.cascade().and_then(|c| c.child_of(parent))
    }

    /// Returns the number of columns owned by the view.
    pub fn local_column_count(&self) -> usize {
        self.table.local_column_count()
    }

    /// Returns the names of the inherited parent columns.
    pub fn inherited_columns(&self) -> Vec<String> {
        self.table
            .cascade()
            .map(|c| c.inherited.borrow().clone())
            .unwrap_or_default()
    }

    /// Replaces the row filter and refilters.
    pub fn set_row_filter(&self, filter: impl Predicate + 'static) {
        if let Some(cascade) = self.table.cascade() {
            *cascade.filter.borrow_mut() = Rc::new(filter);
        }
        self.filter_rows();
    }

    /// Replaces the column projection and refilters the columns.
    pub fn set_column_projection(&self, projection: impl ColumnProjection + 'static) {
        if let Some(cascade) = self.table.cascade() {
            *cascade.projection.borrow_mut() = Rc::new(projection);
        }
        self.filter_columns();
    }

    /// Re-tests every parent row against the filter.
    ///
    /// Needed when the filter depends on state outside the parent table.
    pub fn filter_rows(&self) {
        self.table.refilter_rows();
    }

    /// Recomputes the inherited columns.
    pub fn filter_columns(&self) {
        self.table.refilter_columns();
    }

    /// Unwraps the view into its table handle.
    pub fn into_table(self) -> Table {
        self.table
    }
}

impl Deref for CascadedTable {
    type Target = Table;

    fn deref(&self) -> &Table {
        &self.table
    }
}

impl core::fmt::Debug for CascadedTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CascadedTable")
            .field("columns", &self.column_names())
            .field("rows", &self.row_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::NamedProjection;
    use alloc::string::ToString;
    use alloc::vec;
    use trellis_core::{DataType, Error, Value};

    fn people() -> Table {
        let table = Table::new();
        table.add_column("name", DataType::String, None).unwrap();
        table.add_column("age", DataType::Int, None).unwrap();
        for (name, age) in [("a", 10), ("b", 20), ("c", 30)] {
            let row = table.add_row().unwrap();
            table.set_string(row, "name", name).unwrap();
            table.set_int(row, "age", age).unwrap();
        }
        table
    }

    fn adults(parent: &Table) -> CascadedTable {
        CascadedTable::with_filter(parent, |t: &Tuple<'_>| {
            t.get_int("age").map_or(false, |a| a > 15)
        })
    }

    #[test]
    fn test_initial_view() {
        let parent = people();
        let view = adults(&parent);
        assert_eq!(view.row_count(), 2);
        assert_eq!(view.column_count(), 2);
        assert_eq!(view.local_column_count(), 0);
        assert_eq!(view.parent_row(0), Some(1));
        assert_eq!(view.parent_row(1), Some(2));
        assert_eq!(view.child_row(0), None);
        assert_eq!(view.get_string(1, "name").unwrap(), "c");
        assert!(view.parent().ptr_eq(&parent));
        assert!(view.is_cascaded());
    }

    #[test]
    fn test_follows_parent_updates() {
        let parent = people();
        let view = adults(&parent);

        parent.set_int(0, "age", 16).unwrap();
        assert_eq!(view.child_row(0), Some(2));

        parent.set_int(1, "age", 5).unwrap();
        assert_eq!(view.child_row(1), None);
        assert_eq!(view.rows(), vec![1, 2]);

        parent.remove_row(2).unwrap();
        assert_eq!(view.rows(), vec![2]);

        let row = parent.add_row().unwrap();
        parent.set_int(row, "age", 40).unwrap();
        assert!(view.child_row(row).is_some());
        assert_eq!(view.row_count(), 2);
    }

    #[test]
    fn test_write_through() {
        let parent = people();
        let view = adults(&parent);
        view.set_string(0, "name", "z").unwrap();
        assert_eq!(parent.get_string(1, "name").unwrap(), "z");

        // a write that fails the filter drops the row from the view
        view.set_int(0, "age", 1).unwrap();
        assert_eq!(parent.get_int(1, "age").unwrap(), 1);
        assert!(!view.is_valid_row(0));
    }

    #[test]
    fn test_forwards_updates_with_child_numbering() {
        let parent = people();
        let view = CascadedTable::with_options(
            &parent,
            Rc::new(AlwaysTrue),
            Rc::new(NamedProjection::include_only(["age"])),
        );
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let listener = Rc::new(move |_: &Table, e: &TableEvent| sink.borrow_mut().push(e.clone()));
        view.add_table_listener(&listener);

        parent.set_int(2, "age", 31).unwrap();
        parent.set_string(2, "name", "q").unwrap();
        assert_eq!(
            *events.borrow(),
            vec![TableEvent::cell(EventKind::Update, 2, 0)]
        );
    }

    #[test]
    fn test_rows_follow_parent_only() {
        let parent = people();
        let view = CascadedTable::new(&parent);
        assert!(view.add_row().unwrap_err().is_state_error());
        assert!(view.remove_row(0).unwrap_err().is_state_error());
        assert!(view.clear().is_err());
        assert_eq!(parent.row_count(), 3);
    }

    #[test]
    fn test_projection_and_shadowing() {
        let parent = people();
        let view = CascadedTable::with_options(
            &parent,
            Rc::new(AlwaysTrue),
            Rc::new(NamedProjection::exclude(["name"])),
        );
        assert_eq!(view.inherited_columns(), vec!["age".to_string()]);
        assert!(view.get(0, "name").is_err());

        view.add_column("age", DataType::Int, Some(Value::Int(-1))).unwrap();
        assert!(view.inherited_columns().is_empty());
        assert_eq!(view.local_column_count(), 1);
        assert_eq!(view.get_int(2, "age").unwrap(), -1);
        view.set_int(2, "age", 99).unwrap();
        assert_eq!(parent.get_int(2, "age").unwrap(), 30);

        view.set_column_projection(crate::predicate::AcceptAll);
        assert_eq!(view.column_names(), vec!["age".to_string(), "name".to_string()]);
    }

    #[test]
    fn test_parent_column_changes() {
        let parent = people();
        let view = CascadedTable::new(&parent);
        parent.add_column("score", DataType::Double, None).unwrap();
        assert_eq!(view.column_number("score"), Some(2));
        assert_eq!(view.get_double(0, "score").unwrap(), 0.0);

        parent.remove_column("name").unwrap();
        assert_eq!(view.column_names(), vec!["age".to_string(), "score".to_string()]);
        assert_eq!(
            view.get(0, "name").unwrap_err(),
            Error::column_not_found("name")
        );
    }

    #[test]
    fn test_set_row_filter() {
        let parent = people();
        let view = adults(&parent);
        view.set_row_filter(|t: &Tuple<'_>| t.get_string("name").map_or(false, |n| n == "a"));
        assert_eq!(view.row_count(), 1);
        let child = view.child_row(0).unwrap();
        assert_eq!(view.get_int(child, "age").unwrap(), 10);
    }

    #[test]
    fn test_dropping_view_unsubscribes() {
        let parent = people();
        let view = adults(&parent);
        drop(view);
        parent.set_int(0, "age", 50).unwrap();
        assert_eq!(parent.get_int(0, "age").unwrap(), 50);
    }

    #[test]
    fn test_view_of_view() {
        let parent = people();
        let view = adults(&parent);
        let inner = CascadedTable::with_filter(view.table(), |t: &Tuple<'_>| {
            t.get_int("age").map_or(false, |a| a > 25)
        });
        assert_eq!(inner.row_count(), 1);
        parent.set_int(1, "age", 26).unwrap();
        assert_eq!(inner.row_count(), 2);
        parent.remove_row(2).unwrap();
        assert_eq!(inner.row_count(), 1);
        inner.set_string(inner.rows()[0], "name", "deep").unwrap();
        assert_eq!(parent.get_string(1, "name").unwrap(), "deep");
    }
}
