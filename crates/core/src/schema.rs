//! Schema definitions for Trellis tables.
//!
//! A `Schema` is an ordered list of column descriptors (name, type, default).
//! Schemas can be locked, after which they reject further changes; tables hand
//! out locked snapshots of their current structure.

use crate::error::{Error, Result};
use crate::types::DataType;
use crate::value::Value;
use alloc::string::String;
use alloc::vec::Vec;

/// Descriptor of a single column.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnDef {
    name: String,
    data_type: DataType,
    default: Value,
}

impl ColumnDef {
    /// Creates a column descriptor, validating the default against the type.
    pub fn new(name: impl Into<String>, data_type: DataType, default: Option<Value>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::invalid_argument("column name cannot be empty"));
        }
        let default = check_default(data_type, default)?;
        Ok(Self {
            name,
            data_type,
            default,
        })
    }

    /// Returns the column name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the column type.
    #[inline]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Returns the default value.
    #[inline]
    pub fn default_value(&self) -> &Value {
        &self.default
    }
}

/// Resolves the default for a column of type `data_type`.
///
/// A missing default becomes the type's built-in default. Null is accepted for
/// column kinds whose built-in default is null.
pub fn check_default(data_type: DataType, default: Option<Value>) -> Result<Value> {
    match default {
        None => Ok(Value::default_for_type(data_type)),
        Some(Value::Null) if Value::default_for_type(data_type).is_null() => Ok(Value::Null),
        Some(value) => {
            let got = value.data_type();
            value
                .coerce(data_type)
                .ok_or_else(|| Error::type_mismatch(data_type, got))
        }
    }
}

/// An ordered, optionally locked list of column descriptors.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    columns: Vec<ColumnDef>,
    locked: bool,
}

impl Schema {
    /// Creates an empty, unlocked schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`Schema::add_column`].
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        data_type: DataType,
        default: Option<Value>,
    ) -> Result<Self> {
        self.add_column(name, data_type, default)?;
        Ok(self)
    }

    /// Adds a column to the end of the schema.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        data_type: DataType,
        default: Option<Value>,
    ) -> Result<()> {
        if self.locked {
            return Err(Error::SchemaLocked);
        }
        let def = ColumnDef::new(name, data_type, default)?;
        if self.column_index(def.name()).is_some() {
            return Err(Error::duplicate_column(def.name()));
        }
        self.columns.push(def);
        Ok(())
    }

    /// Locks the schema against further modification.
    pub fn lock(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Returns whether the schema is locked.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns the number of columns.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the column descriptors in order.
    #[inline]
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Returns the column descriptor at `index`.
    pub fn column(&self, index: usize) -> Option<&ColumnDef> {
        self.columns.get(index)
    }

    /// Returns the column name at `index`.
    pub fn column_name(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(|c| c.name())
    }

    /// Returns the position of the named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Returns the type of the named column.
    pub fn column_type(&self, name: &str) -> Option<DataType> {
        self.column_index(name).map(|i| self.columns[i].data_type())
    }

    /// Returns the default value of the named column.
    pub fn default_value(&self, name: &str) -> Option<&Value> {
        self.column_index(name).map(|i| self.columns[i].default_value())
    }

    /// Replaces the default value of the named column.
    pub fn set_default(&mut self, name: &str, default: Value) -> Result<()> {
        if self.locked {
            return Err(Error::SchemaLocked);
        }
        let index = self
            .column_index(name)
            .ok_or_else(|| Error::column_not_found(name))?;
        let column = &mut self.columns[index];
        column.default = check_default(column.data_type, Some(default))?;
        Ok(())
    }

    /// Returns whether every column of `other` has a same-named column here
    /// that can store its values.
    pub fn is_assignable_from(&self, other: &Schema) -> bool {
        other.columns.iter().all(|theirs| {
            self.column_index(theirs.name()).is_some_and(|i| {
                let ours = self.columns[i].data_type();
                ours.can_set(theirs.data_type())
            })
        })
    }
}

impl FromIterator<ColumnDef> for Schema {
    /// Collects descriptors into an unlocked schema; a descriptor whose name
    /// is already present is skipped.
    fn from_iter<I: IntoIterator<Item = ColumnDef>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for def in iter {
            if schema.column_index(def.name()).is_none() {
                schema.columns.push(def);
            }
        }
        schema
    }
}

impl PartialEq for Schema {
    /// Two schemas are equal when their column descriptors match in order;
    /// the lock flag is not part of equality.
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}
