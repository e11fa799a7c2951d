//! Multi-field sort keys.

use crate::table::Table;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use trellis_core::{Error, Result, RowId, Value};
use trellis_index::{MultiKeyComparator, Order};

/// An ordered list of (field, order) sort keys, highest precedence first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sort {
    fields: Vec<(String, Order)>,
}

impl Sort {
    /// Creates an empty sort, which leaves row order unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts ascending on each of `fields`.
    pub fn ascending<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(|f| (f.into(), Order::Asc)).collect(),
        }
    }

    /// Appends a sort key.
    pub fn then(mut self, field: impl Into<String>, order: Order) -> Self {
        self.fields.push((field.into(), order));
        self
    }

    /// Parses a sort list such as `"name ASC, age DESC"`.
    ///
    /// The order suffix is optional and case-insensitive; fields without one
    /// sort ascending.
    pub fn parse(text: &str) -> Result<Self> {
        let mut sort = Sort::new();
        for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let mut tokens = part.split_whitespace();
            let field = tokens.next().unwrap_or(part);
            let order = match tokens.next().map(|t| t.to_ascii_uppercase()) {
                None => Order::Asc,
                Some(t) if t == "ASC" => Order::Asc,
                Some(t) if t == "DESC" => Order::Desc,
                Some(t) => {
                    return Err(Error::invalid_argument(format!(
                        "unknown sort order `{}` for field {}",
                        t, field
                    )))
                }
            };
            if tokens.next().is_some() {
                return Err(Error::invalid_argument(format!("malformed sort key: {}", part)));
            }
            sort.fields.push((field.to_string(), order));
        }
        Ok(sort)
    }

    /// Returns the sort keys.
    #[inline]
    pub fn fields(&self) -> &[(String, Order)] {
        &self.fields
    }

    /// Returns true if the sort has no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Stable-sorts `rows` of `table` by these sort keys.
    pub fn sort_rows(&self, table: &Table, rows: &mut Vec<RowId>) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        let mut keyed: Vec<(Vec<Value>, RowId)> = Vec::with_capacity(rows.len());
        for &row in rows.iter() {
            let key = self
                .fields
                .iter()
                .map(|(field, _)| table.get(row, field))
                .collect::<Result<Vec<_>>>()?;
            keyed.push((key, row));
        }
        let comparator = MultiKeyComparator::new(self.fields.iter().map(|(_, o)| *o).collect());
        keyed.sort_by(|a, b| comparator.compare(&a.0, &b.0));
        rows.clear();
        rows.extend(keyed.into_iter().map(|(_, row)| row));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let sort = Sort::parse("name ASC, age desc,  score").unwrap();
        assert_eq!(
            sort.fields(),
            &[
                ("name".to_string(), Order::Asc),
                ("age".to_string(), Order::Desc),
                ("score".to_string(), Order::Asc),
            ]
        );
        assert!(Sort::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert!(Sort::parse("name UP").unwrap_err().is_argument_error());
        assert!(Sort::parse("name ASC extra").is_err());
    }

    #[test]
    fn test_builder() {
        let sort = Sort::ascending(["a"]).then("b", Order::Desc);
        assert_eq!(sort.fields().len(), 2);
        assert_eq!(sort.fields()[1].1, Order::Desc);
    }
}
