//! Data type definitions for Trellis tables.
//!
//! This module defines the storage kinds a table column can hold, together with
//! the capability rules that decide which typed accessors a column supports.

/// Supported column data types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Boolean type (true/false)
    Boolean,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    /// 32-bit floating point number
    Float,
    /// 64-bit floating point number
    Double,
    /// UTF-8 string
    String,
    /// Date stored as Unix timestamp (milliseconds)
    Date,
    /// Growable array of 32-bit integers
    IntArray,
    /// Untyped column accepting any value
    Object,
}

impl DataType {
    /// Returns whether this type stores a number.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Int | DataType::Long | DataType::Float | DataType::Double
        )
    }

    /// Returns whether this type stores an integral number.
    #[inline]
    pub fn is_integral(&self) -> bool {
        matches!(self, DataType::Int | DataType::Long)
    }

    /// Returns whether values stored as `self` can be read as `target`.
    ///
    /// Numeric columns can be read through any numeric accessor; every other
    /// column is only readable through its own accessor. Object columns can be
    /// read through every accessor, with the stored value checked on access.
    pub fn can_get(&self, target: DataType) -> bool {
        if *self == target || *self == DataType::Object {
            return true;
        }
        self.is_numeric() && target.is_numeric()
    }

    /// Returns whether a column of this type accepts values of type `source`
    /// through a typed setter.
    pub fn can_set(&self, source: DataType) -> bool {
        *self == source || *self == DataType::Object
    }

    /// Returns the name used when this type is printed in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Boolean => "boolean",
            DataType::Int => "int",
            DataType::Long => "long",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::String => "string",
            DataType::Date => "date",
            DataType::IntArray => "int[]",
            DataType::Object => "object",
        }
    }
}

impl core::fmt::Display for DataType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_types() {
        assert!(DataType::Int.is_numeric());
        assert!(DataType::Double.is_numeric());
        assert!(!DataType::String.is_numeric());
        assert!(!DataType::Date.is_numeric());
        assert!(DataType::Long.is_integral());
        assert!(!DataType::Float.is_integral());
    }

    #[test]
    fn test_can_get() {
        assert!(DataType::Int.can_get(DataType::Double));
        assert!(DataType::Double.can_get(DataType::Int));
        assert!(!DataType::String.can_get(DataType::Int));
        assert!(!DataType::Int.can_get(DataType::String));
        assert!(DataType::Object.can_get(DataType::String));
    }

    #[test]
    fn test_can_set() {
        assert!(DataType::Int.can_set(DataType::Int));
        assert!(!DataType::Int.can_set(DataType::Long));
        assert!(!DataType::Double.can_set(DataType::Float));
        assert!(DataType::Object.can_set(DataType::Boolean));
    }

    #[test]
    fn test_display() {
        assert_eq!(alloc::format!("{}", DataType::IntArray), "int[]");
    }
}
