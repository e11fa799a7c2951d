//! Change events and listener registration.
//!
//! Tables publish every structural and value change as a [`TableEvent`].
//! Listeners are held weakly: dropping the last strong reference to a listener
//! unregisters it. Dispatch iterates a snapshot of the listener list, so a
//! listener may register or unregister listeners (including itself) while an
//! event is being delivered.

use crate::table::Table;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::ops::Range;
use trellis_core::{RowId, Value};

/// Kind of change carried by a [`TableEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Rows or a column were added.
    Insert,
    /// Rows or a column are being removed.
    Delete,
    /// Cell values changed.
    Update,
}

/// A change to a contiguous range of rows, on one column or on all of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableEvent {
    /// What happened.
    pub kind: EventKind,
    /// Affected rows, half-open.
    pub rows: Range<RowId>,
    /// Affected column number, `None` for all columns.
    pub column: Option<usize>,
}

impl TableEvent {
    /// Creates an event covering every column of a single row.
    pub fn row(kind: EventKind, row: RowId) -> Self {
        Self {
            kind,
            rows: row..row + 1,
            column: None,
        }
    }

    /// Creates an event for a single cell.
    pub fn cell(kind: EventKind, row: RowId, column: usize) -> Self {
        Self {
            kind,
            rows: row..row + 1,
            column: Some(column),
        }
    }

    /// Creates an event for a whole column over `rows`.
    pub fn column(kind: EventKind, rows: Range<RowId>, column: usize) -> Self {
        Self {
            kind,
            rows,
            column: Some(column),
        }
    }

    /// Returns true if the event applies to every column.
    #[inline]
    pub fn is_all_columns(&self) -> bool {
        self.column.is_none()
    }
}

/// Receives table change events.
pub trait TableListener {
    fn table_changed(&self, table: &Table, event: &TableEvent);
}

impl<F> TableListener for F
where
    F: Fn(&Table, &TableEvent),
{
    fn table_changed(&self, table: &Table, event: &TableEvent) {
        self(table, event)
    }
}

/// Receives single-cell value changes together with the replaced value.
pub trait ColumnListener {
    fn column_changed(&self, table: &Table, column: usize, row: RowId, previous: &Value);
}

impl<F> ColumnListener for F
where
    F: Fn(&Table, usize, RowId, &Value),
{
    fn column_changed(&self, table: &Table, column: usize, row: RowId, previous: &Value) {
        self(table, column, row, previous)
    }
}

/// A list of weakly held listeners with snapshot dispatch.
pub struct ListenerList<L: ?Sized> {
    entries: RefCell<Vec<Weak<L>>>,
}

impl<L: ?Sized> Default for ListenerList<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> ListenerList<L> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Registers a listener. Returns false if it was already registered.
    pub fn add(&self, listener: Weak<L>) -> bool {
        let mut entries = self.entries.borrow_mut();
        if entries.iter().any(|w| Weak::ptr_eq(w, &listener)) {
            return false;
        }
        entries.push(listener);
        true
    }

    /// Unregisters a listener. Returns false if it was not registered.
    pub fn remove(&self, listener: &Weak<L>) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|w| !Weak::ptr_eq(w, listener));
        entries.len() != before
    }

    /// Returns the live listeners, dropping entries whose listener is gone.
    pub fn snapshot(&self) -> Vec<Rc<L>> {
        let mut entries = self.entries.borrow_mut();
        entries.retain(|w| w.strong_count() > 0);
        entries.iter().filter_map(Weak::upgrade).collect()
    }

    /// Returns the number of live listeners.
    pub fn len(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Returns true if no live listener is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Counter {
        fn bump(&self);
    }

    struct Hits(core::cell::Cell<u32>);

    impl Counter for Hits {
        fn bump(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_add_remove_dedup() {
        let list: ListenerList<dyn Counter> = ListenerList::new();
        let hits = Rc::new(Hits(core::cell::Cell::new(0)));
        let weak: Weak<dyn Counter> = Rc::downgrade(&hits) as Weak<dyn Counter>;
        assert!(list.add(weak.clone()));
        assert!(!list.add(weak.clone()));
        assert_eq!(list.len(), 1);
        for l in list.snapshot() {
            l.bump();
        }
        assert_eq!(hits.0.get(), 1);
        assert!(list.remove(&weak));
        assert!(list.is_empty());
    }

    #[test]
    fn test_dropped_listener_pruned() {
        let list: ListenerList<dyn Counter> = ListenerList::new();
        let hits = Rc::new(Hits(core::cell::Cell::new(0)));
        list.add(Rc::downgrade(&hits) as Weak<dyn Counter>);
        drop(hits);
        assert!(list.snapshot().is_empty());
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn test_event_constructors() {
        let e = TableEvent::row(EventKind::Insert, 4);
        assert_eq!(e.rows, 4..5);
        assert!(e.is_all_columns());
        let e = TableEvent::cell(EventKind::Update, 2, 1);
        assert_eq!(e.column, Some(1));
        let e = TableEvent::column(EventKind::Delete, 0..3, 0);
        assert!(!e.is_all_columns());
    }
}
