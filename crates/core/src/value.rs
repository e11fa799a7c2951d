//! Value type definitions for Trellis tables.
//!
//! This module defines the `Value` enum which represents any value that can be
//! stored in a table cell.

use crate::types::DataType;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::hash::{Hash, Hasher};

/// A value that can be stored in a table cell.
#[derive(Clone, Debug)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// 32-bit signed integer
    Int(i32),
    /// 64-bit signed integer
    Long(i64),
    /// 32-bit floating point
    Float(f32),
    /// 64-bit floating point
    Double(f64),
    /// UTF-8 string
    String(String),
    /// Date stored as Unix timestamp in milliseconds
    Date(i64),
    /// Array of 32-bit integers
    IntArray(Vec<i32>),
}

impl Value {
    /// Returns the data type of this value, or None if it's Null.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(DataType::Boolean),
            Value::Int(_) => Some(DataType::Int),
            Value::Long(_) => Some(DataType::Long),
            Value::Float(_) => Some(DataType::Float),
            Value::Double(_) => Some(DataType::Double),
            Value::String(_) => Some(DataType::String),
            Value::Date(_) => Some(DataType::Date),
            Value::IntArray(_) => Some(DataType::IntArray),
        }
    }

    /// Returns true if this value is Null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this value is a number.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::Int(_) | Value::Long(_) | Value::Float(_) | Value::Double(_)
        )
    }

    /// Returns the boolean value if this is a Boolean, None otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a String, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Returns the timestamp if this is a Date, None otherwise.
    pub fn as_date(&self) -> Option<i64> {
        match self {
            Value::Date(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the array if this is an IntArray, None otherwise.
    pub fn as_int_array(&self) -> Option<&[i32]> {
        match self {
            Value::IntArray(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Converts a numeric value to i32, truncating wider numbers.
    pub fn to_i32(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Long(v) => Some(*v as i32),
            Value::Float(v) => Some(*v as i32),
            Value::Double(v) => Some(*v as i32),
            _ => None,
        }
    }

    /// Converts a numeric value to i64.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v as i64),
            Value::Long(v) => Some(*v),
            Value::Float(v) => Some(*v as i64),
            Value::Double(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Converts a numeric value to f32.
    pub fn to_f32(&self) -> Option<f32> {
        match self {
            Value::Int(v) => Some(*v as f32),
            Value::Long(v) => Some(*v as f32),
            Value::Float(v) => Some(*v),
            Value::Double(v) => Some(*v as f32),
            _ => None,
        }
    }

    /// Converts a numeric value to f64.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Long(v) => Some(*v as f64),
            Value::Float(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Converts this value into one storable in a column of type `target`.
    ///
    /// Numbers convert freely between numeric kinds. Other values only convert
    /// to their own kind, and anything converts to `Object`.
    pub fn coerce(self, target: DataType) -> Option<Value> {
        if target == DataType::Object || self.data_type() == Some(target) {
            return Some(self);
        }
        match target {
            DataType::Int => self.to_i32().map(Value::Int),
            DataType::Long => self.to_i64().map(Value::Long),
            DataType::Float => self.to_f32().map(Value::Float),
            DataType::Double => self.to_f64().map(Value::Double),
            _ => None,
        }
    }

    /// Creates the built-in default value for the given data type.
    pub fn default_for_type(dt: DataType) -> Self {
        match dt {
            DataType::Boolean => Value::Boolean(false),
            DataType::Int => Value::Int(0),
            DataType::Long => Value::Long(0),
            DataType::Float => Value::Float(0.0),
            DataType::Double => Value::Double(0.0),
            DataType::String => Value::String(String::new()),
            DataType::Date => Value::Date(0),
            DataType::IntArray => Value::IntArray(Vec::new()),
            DataType::Object => Value::Null,
        }
    }

    /// Returns a type ordering value for comparing different types.
    fn type_order(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Boolean(_) => 1,
            Value::Int(_) | Value::Long(_) | Value::Float(_) | Value::Double(_) => 2,
            Value::String(_) => 3,
            Value::Date(_) => 4,
            Value::IntArray(_) => 5,
        }
    }
}

/// Orders two floats with NaN greater than every other value.
fn cmp_f64(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => (a.is_nan() && b.is_nan()) || a == b,
            (Value::Double(a), Value::Double(b)) => (a.is_nan() && b.is_nan()) || a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::IntArray(a), Value::IntArray(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Long(a), Value::Long(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::IntArray(a), Value::IntArray(b)) => a.cmp(b),
            // Cross-type numeric comparisons
            (a, b) if a.is_numeric() && b.is_numeric() => match (a, b) {
                (Value::Int(_) | Value::Long(_), Value::Int(_) | Value::Long(_)) => {
                    a.to_i64().cmp(&b.to_i64())
                }
                _ => cmp_f64(a.to_f64().unwrap_or(f64::NAN), b.to_f64().unwrap_or(f64::NAN)),
            },
            // Different types: order by type discriminant
            _ => self.type_order().cmp(&other.type_order()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Boolean(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Long(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Double(f) => f.to_bits().hash(state),
            Value::String(s) => s.hash(state),
            Value::Date(d) => d.hash(state),
            Value::IntArray(a) => a.hash(state),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<i32>> for Value {
    fn from(v: Vec<i32>) -> Self {
        Value::IntArray(v)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_value_data_type() {
        assert_eq!(Value::Null.data_type(), None);
        assert_eq!(Value::Int(1).data_type(), Some(DataType::Int));
        assert_eq!(Value::from("x").data_type(), Some(DataType::String));
        assert_eq!(Value::from(vec![1, 2]).data_type(), Some(DataType::IntArray));
    }

    #[test]
    fn test_numeric_conversions() {
        assert_eq!(Value::Double(2.9).to_i32(), Some(2));
        assert_eq!(Value::Int(7).to_f64(), Some(7.0));
        assert_eq!(Value::Long(1 << 40).to_i64(), Some(1 << 40));
        assert_eq!(Value::from("7").to_i32(), None);
    }

    #[test]
    fn test_coerce() {
        assert_eq!(Value::Int(3).coerce(DataType::Double), Some(Value::Double(3.0)));
        assert_eq!(Value::Double(3.5).coerce(DataType::Long), Some(Value::Long(3)));
        assert_eq!(Value::from("a").coerce(DataType::Int), None);
        assert_eq!(Value::from("a").coerce(DataType::Object), Some(Value::from("a")));
        assert_eq!(Value::Boolean(true).coerce(DataType::Boolean), Some(Value::Boolean(true)));
    }

    #[test]
    fn test_value_ordering() {
        assert!(Value::Null < Value::Int(0));
        assert!(Value::Int(1) < Value::Int(2));
        assert!(Value::Int(5) < Value::Long(6));
        assert!(Value::Float(1.5) < Value::Int(2));
        assert!(Value::Double(f64::NAN) > Value::Double(1e300));
        assert!(Value::from("a") < Value::from("b"));
    }

    #[test]
    fn test_nan_equality() {
        assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
        assert_ne!(Value::Int(1), Value::Long(1));
    }

    #[test]
    fn test_default_for_type() {
        assert_eq!(Value::default_for_type(DataType::Int), Value::Int(0));
        assert_eq!(Value::default_for_type(DataType::String), Value::from(""));
        assert_eq!(Value::default_for_type(DataType::Object), Value::Null);
        assert_eq!(Value::default_for_type(DataType::IntArray), Value::IntArray(vec![]));
    }

    #[test]
    fn test_from_option() {
        let v: Value = Option::<i32>::None.into();
        assert!(v.is_null());
        let v: Value = Some(3i64).into();
        assert_eq!(v, Value::Long(3));
    }
}
