//! Key ranges for index scans.

use core::ops::Bound;

/// A key range for index queries.
#[derive(Clone, Debug, PartialEq)]
pub enum KeyRange<K> {
    /// All keys
    All,
    /// A single key (equality)
    Only(K),
    /// Keys >= lower bound
    LowerBound { value: K, exclusive: bool },
    /// Keys <= upper bound
    UpperBound { value: K, exclusive: bool },
    /// Keys between lower and upper bounds
    Bound {
        lower: K,
        upper: K,
        lower_exclusive: bool,
        upper_exclusive: bool,
    },
}

impl<K: Ord> KeyRange<K> {
    /// Creates a range for all keys.
    pub fn all() -> Self {
        KeyRange::All
    }

    /// Creates a range for a single key.
    pub fn only(key: K) -> Self {
        KeyRange::Only(key)
    }

    /// Creates a range with a lower bound.
    pub fn lower_bound(value: K, exclusive: bool) -> Self {
        KeyRange::LowerBound { value, exclusive }
    }

    /// Creates a range with an upper bound.
    pub fn upper_bound(value: K, exclusive: bool) -> Self {
        KeyRange::UpperBound { value, exclusive }
    }

    /// Creates a range with both bounds.
    pub fn bound(lower: K, upper: K, lower_exclusive: bool, upper_exclusive: bool) -> Self {
        KeyRange::Bound {
            lower,
            upper,
            lower_exclusive,
            upper_exclusive,
        }
    }

    /// Returns true if this range represents all values (unbounded).
    pub fn is_all(&self) -> bool {
        matches!(self, KeyRange::All)
    }

    /// Returns true if no key can fall inside this range.
    pub fn is_empty(&self) -> bool {
        match self {
            KeyRange::Bound {
                lower,
                upper,
                lower_exclusive,
                upper_exclusive,
            } => lower > upper || (lower == upper && (*lower_exclusive || *upper_exclusive)),
            _ => false,
        }
    }

    /// Returns the range as a pair of `Bound`s, suitable for `BTreeMap::range`.
    pub fn as_bounds(&self) -> (Bound<&K>, Bound<&K>) {
        fn edge<K>(value: &K, exclusive: bool) -> Bound<&K> {
            if exclusive {
                Bound::Excluded(value)
            } else {
                Bound::Included(value)
            }
        }
        match self {
            KeyRange::All => (Bound::Unbounded, Bound::Unbounded),
            KeyRange::Only(k) => (Bound::Included(k), Bound::Included(k)),
            KeyRange::LowerBound { value, exclusive } => (edge(value, *exclusive), Bound::Unbounded),
            KeyRange::UpperBound { value, exclusive } => (Bound::Unbounded, edge(value, *exclusive)),
            KeyRange::Bound {
                lower,
                upper,
                lower_exclusive,
                upper_exclusive,
            } => (edge(lower, *lower_exclusive), edge(upper, *upper_exclusive)),
        }
    }

    /// Checks if a key is within this range.
    pub fn contains(&self, key: &K) -> bool {
        match self {
            KeyRange::All => true,
            KeyRange::Only(k) => key == k,
            KeyRange::LowerBound { value, exclusive } => {
                if *exclusive {
                    key > value
                } else {
                    key >= value
                }
            }
            KeyRange::UpperBound { value, exclusive } => {
                if *exclusive {
                    key < value
                } else {
                    key <= value
                }
            }
            KeyRange::Bound {
                lower,
                upper,
                lower_exclusive,
                upper_exclusive,
            } => {
                let lower_ok = if *lower_exclusive {
                    key > lower
                } else {
                    key >= lower
                };
                let upper_ok = if *upper_exclusive {
                    key < upper
                } else {
                    key <= upper
                };
                lower_ok && upper_ok
            }
        }
    }
}
