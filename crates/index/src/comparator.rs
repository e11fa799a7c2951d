//! Sort orders for index keys.
//!
//! This module provides the ordering applied to index scans and to composite
//! sort keys.

use alloc::vec::Vec;
use core::cmp::Ordering;

/// Sort order for index keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    /// Ascending order (smallest first)
    Asc,
    /// Descending order (largest first)
    Desc,
}

impl Order {
    /// Returns the order matching an `ascending` flag.
    #[inline]
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            Order::Asc
        } else {
            Order::Desc
        }
    }

    /// Applies this order to a comparison result.
    #[inline]
    pub fn apply(&self, ord: Ordering) -> Ordering {
        match self {
            Order::Asc => ord,
            Order::Desc => ord.reverse(),
        }
    }
}

/// A comparator for composite keys, one order per key component.
#[derive(Clone, Debug)]
pub struct MultiKeyComparator {
    orders: Vec<Order>,
}

impl MultiKeyComparator {
    /// Creates a new multi-key comparator with the given orders.
    pub fn new(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    /// Returns the orders of this comparator.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Compares two composite keys component by component.
    ///
    /// A missing component sorts before a present one.
    pub fn compare<K: Ord>(&self, a: &[K], b: &[K]) -> Ordering {
        for (i, order) in self.orders.iter().enumerate() {
            let cmp = match (a.get(i), b.get(i)) {
                (Some(av), Some(bv)) => order.apply(av.cmp(bv)),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            if cmp != Ordering::Equal {
                return cmp;
            }
        }
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_order_apply() {
        assert_eq!(Order::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(Order::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Order::from_ascending(false), Order::Desc);
    }

    #[test]
    fn test_multi_key_compare() {
        let cmp = MultiKeyComparator::new(vec![Order::Asc, Order::Desc]);
        assert_eq!(cmp.compare(&[1, 5], &[2, 0]), Ordering::Less);
        assert_eq!(cmp.compare(&[1, 5], &[1, 9]), Ordering::Greater);
        assert_eq!(cmp.compare(&[1, 5], &[1, 5]), Ordering::Equal);
        assert_eq!(cmp.compare::<i32>(&[1], &[1, 5]), Ordering::Less);
    }
}
