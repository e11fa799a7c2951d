//! Row filters and column projections.
//!
//! Predicates decide which rows a cascaded view or a selection includes;
//! projections decide which parent columns a cascaded view inherits. Both are
//! implemented for plain closures.

use crate::tuple::Tuple;
use alloc::string::String;
use alloc::vec::Vec;
use trellis_core::DataType;

/// A boolean test over a row.
pub trait Predicate {
    /// Returns true if the row passes the filter.
    fn test(&self, tuple: &Tuple<'_>) -> bool;

    /// Returns true if the predicate accepts every row.
    fn is_always_true(&self) -> bool {
        false
    }
}

impl<F> Predicate for F
where
    F: Fn(&Tuple<'_>) -> bool,
{
    fn test(&self, tuple: &Tuple<'_>) -> bool {
        self(tuple)
    }
}

/// The predicate accepting every row.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysTrue;

impl Predicate for AlwaysTrue {
    #[inline]
    fn test(&self, _tuple: &Tuple<'_>) -> bool {
        true
    }

    #[inline]
    fn is_always_true(&self) -> bool {
        true
    }
}

/// Selects the parent columns a cascaded view inherits.
pub trait ColumnProjection {
    fn include(&self, name: &str, data_type: DataType) -> bool;
}

impl<F> ColumnProjection for F
where
    F: Fn(&str, DataType) -> bool,
{
    fn include(&self, name: &str, data_type: DataType) -> bool {
        self(name, data_type)
    }
}

/// The projection including every column.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAll;

impl ColumnProjection for AcceptAll {
    #[inline]
    fn include(&self, _name: &str, _data_type: DataType) -> bool {
        true
    }
}

/// A projection by column name, either an allow list or a deny list.
#[derive(Clone, Debug)]
pub struct NamedProjection {
    names: Vec<String>,
    include: bool,
}

impl NamedProjection {
    /// Includes only the named columns.
    pub fn include_only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            include: true,
        }
    }

    /// Includes every column except the named ones.
    pub fn exclude<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            include: false,
        }
    }
}

impl ColumnProjection for NamedProjection {
    fn include(&self, name: &str, _data_type: DataType) -> bool {
        self.names.iter().any(|n| n == name) == self.include
    }
}
