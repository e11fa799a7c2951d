//! Typed column storage.
//!
//! A `Column` is a growable buffer of one storage kind plus a default value.
//! Rows that were never written, or that were reverted, read as the default.
//! Typed accessors are guarded by the capability rules of [`DataType`]:
//! numeric columns read through any numeric accessor, typed writes require
//! the exact kind, and the generic [`Column::set`] converts between numbers.

use alloc::string::String;
use alloc::vec::Vec;
use trellis_core::{DataType, Error, Result, RowId, Value};

/// Storage buffer, one arm per storage kind.
#[derive(Clone, Debug)]
enum Buffer {
    Boolean(Vec<bool>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    String(Vec<String>),
    Date(Vec<i64>),
    IntArray(Vec<Vec<i32>>),
    Object(Vec<Value>),
}

impl Buffer {
    fn empty(data_type: DataType) -> Self {
        match data_type {
            DataType::Boolean => Buffer::Boolean(Vec::new()),
            DataType::Int => Buffer::Int(Vec::new()),
            DataType::Long => Buffer::Long(Vec::new()),
            DataType::Float => Buffer::Float(Vec::new()),
            DataType::Double => Buffer::Double(Vec::new()),
            DataType::String => Buffer::String(Vec::new()),
            DataType::Date => Buffer::Date(Vec::new()),
            DataType::IntArray => Buffer::IntArray(Vec::new()),
            DataType::Object => Buffer::Object(Vec::new()),
        }
    }

    fn len(&self) -> usize {
        match self {
            Buffer::Boolean(v) => v.len(),
            Buffer::Int(v) => v.len(),
            Buffer::Long(v) => v.len(),
            Buffer::Float(v) => v.len(),
            Buffer::Double(v) => v.len(),
            Buffer::String(v) => v.len(),
            Buffer::Date(v) => v.len(),
            Buffer::IntArray(v) => v.len(),
            Buffer::Object(v) => v.len(),
        }
    }
}

/// A typed, growable column with a default value.
#[derive(Clone, Debug)]
pub struct Column {
    data_type: DataType,
    default: Value,
    buffer: Buffer,
}

impl Column {
    /// Creates a column covering `rows` rows, all holding `default`.
    ///
    /// `default` must already be storable in the column; see
    /// [`trellis_core::schema::check_default`].
    pub fn new(data_type: DataType, default: Value, rows: usize) -> Self {
        let mut column = Self {
            data_type,
            default,
            buffer: Buffer::empty(data_type),
        };
        column.resize(rows);
        column
    }

    /// Returns the storage kind.
    #[inline]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Returns the default value.
    #[inline]
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Returns the number of rows the buffer currently covers.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Ensures the buffer covers `rows` rows.
    ///
    /// Growth is amortized: the buffer grows to at least one and a half times
    /// its current size, new slots holding the default.
    pub fn set_maximum_row(&mut self, rows: usize) {
        let len = self.buffer.len();
        if rows > len {
            self.resize((3 * len / 2 + 1).max(rows));
        }
    }

    fn resize(&mut self, rows: usize) {
        let default = &self.default;
        match &mut self.buffer {
            Buffer::Boolean(v) => v.resize(rows, default.as_bool().unwrap_or_default()),
            Buffer::Int(v) => v.resize(rows, default.to_i32().unwrap_or_default()),
            Buffer::Long(v) => v.resize(rows, default.to_i64().unwrap_or_default()),
            Buffer::Float(v) => v.resize(rows, default.to_f32().unwrap_or_default()),
            Buffer::Double(v) => v.resize(rows, default.to_f64().unwrap_or_default()),
            Buffer::String(v) => v.resize(rows, default.as_str().unwrap_or_default().into()),
            Buffer::Date(v) => v.resize(rows, default.as_date().unwrap_or_default()),
            Buffer::IntArray(v) => {
                v.resize(rows, default.as_int_array().unwrap_or_default().to_vec())
            }
            Buffer::Object(v) => v.resize(rows, default.clone()),
        }
    }

    /// Returns the value stored at `row`, or the default past the buffer end.
    pub fn get(&self, row: RowId) -> Value {
        if row >= self.buffer.len() {
            return self.default.clone();
        }
        match &self.buffer {
            Buffer::Boolean(v) => Value::Boolean(v[row]),
            Buffer::Int(v) => Value::Int(v[row]),
            Buffer::Long(v) => Value::Long(v[row]),
            Buffer::Float(v) => Value::Float(v[row]),
            Buffer::Double(v) => Value::Double(v[row]),
            Buffer::String(v) => Value::String(v[row].clone()),
            Buffer::Date(v) => Value::Date(v[row]),
            Buffer::IntArray(v) => Value::IntArray(v[row].clone()),
            Buffer::Object(v) => v[row].clone(),
        }
    }

    /// Returns whether this column can be read as `target`.
    #[inline]
    pub fn can_get(&self, target: DataType) -> bool {
        self.data_type.can_get(target)
    }

    /// Returns whether this column accepts `source` values through a typed setter.
    #[inline]
    pub fn can_set(&self, source: DataType) -> bool {
        self.data_type.can_set(source)
    }

    fn read_as(&self, row: RowId, target: DataType) -> Result<Value> {
        if !self.can_get(target) {
            return Err(Error::type_mismatch(self.data_type, Some(target)));
        }
        Ok(self.get(row))
    }

    fn mismatch(&self, value: &Value) -> Error {
        Error::type_mismatch(self.data_type, value.data_type())
    }

    pub fn get_int(&self, row: RowId) -> Result<i32> {
        let value = self.read_as(row, DataType::Int)?;
        value.to_i32().ok_or_else(|| self.mismatch(&value))
    }

    pub fn get_long(&self, row: RowId) -> Result<i64> {
        let value = self.read_as(row, DataType::Long)?;
        value.to_i64().ok_or_else(|| self.mismatch(&value))
    }

    pub fn get_float(&self, row: RowId) -> Result<f32> {
        let value = self.read_as(row, DataType::Float)?;
        value.to_f32().ok_or_else(|| self.mismatch(&value))
    }

    pub fn get_double(&self, row: RowId) -> Result<f64> {
        let value = self.read_as(row, DataType::Double)?;
        value.to_f64().ok_or_else(|| self.mismatch(&value))
    }

    pub fn get_boolean(&self, row: RowId) -> Result<bool> {
        let value = self.read_as(row, DataType::Boolean)?;
        value.as_bool().ok_or_else(|| self.mismatch(&value))
    }

    pub fn get_string(&self, row: RowId) -> Result<String> {
        match self.read_as(row, DataType::String)? {
            Value::String(s) => Ok(s),
            other => Err(self.mismatch(&other)),
        }
    }

    pub fn get_date(&self, row: RowId) -> Result<i64> {
        let value = self.read_as(row, DataType::Date)?;
        value.as_date().ok_or_else(|| self.mismatch(&value))
    }

    pub fn get_int_array(&self, row: RowId) -> Result<Vec<i32>> {
        match self.read_as(row, DataType::IntArray)? {
            Value::IntArray(a) => Ok(a),
            other => Err(self.mismatch(&other)),
        }
    }

    /// Stores `value` at `row`, converting between numeric kinds.
    ///
    /// Returns the previous value if the stored value changed, `None` if the
    /// new value equals the old one.
    pub fn set(&mut self, row: RowId, value: Value) -> Result<Option<Value>> {
        let got = value.data_type();
        let value = value
            .coerce(self.data_type)
            .ok_or_else(|| Error::type_mismatch(self.data_type, got))?;
        self.store(row, value)
    }

    /// Stores `value` at `row`, requiring its kind to be accepted as-is.
    pub fn set_exact(&mut self, row: RowId, value: Value) -> Result<Option<Value>> {
        match value.data_type() {
            Some(dt) if self.can_set(dt) => self.store(row, value),
            None if self.data_type == DataType::Object => self.store(row, value),
            got => Err(Error::type_mismatch(self.data_type, got)),
        }
    }

    /// Resets `row` to the default, returning the previous value if it changed.
    pub fn revert(&mut self, row: RowId) -> Option<Value> {
        if row >= self.buffer.len() {
            return None;
        }
        let default = self.default.clone();
        self.store(row, default).ok().flatten()
    }

    /// Gives mutable access to the array stored at `row`.
    pub fn int_array_mut(&mut self, row: RowId) -> Result<&mut Vec<i32>> {
        self.set_maximum_row(row + 1);
        match &mut self.buffer {
            Buffer::IntArray(v) => Ok(&mut v[row]),
            _ => Err(Error::type_mismatch(self.data_type, Some(DataType::IntArray))),
        }
    }

    fn store(&mut self, row: RowId, value: Value) -> Result<Option<Value>> {
        self.set_maximum_row(row + 1);
        let previous = self.get(row);
        if previous == value {
            return Ok(None);
        }
        let data_type = self.data_type;
        match (&mut self.buffer, value) {
            (Buffer::Boolean(v), Value::Boolean(x)) => v[row] = x,
            (Buffer::Int(v), Value::Int(x)) => v[row] = x,
            (Buffer::Long(v), Value::Long(x)) => v[row] = x,
            (Buffer::Float(v), Value::Float(x)) => v[row] = x,
            (Buffer::Double(v), Value::Double(x)) => v[row] = x,
            (Buffer::String(v), Value::String(x)) => v[row] = x,
            (Buffer::Date(v), Value::Date(x)) => v[row] = x,
            (Buffer::IntArray(v), Value::IntArray(x)) => v[row] = x,
            (Buffer::Object(v), x) => v[row] = x,
            (_, other) => return Err(Error::type_mismatch(data_type, other.data_type())),
        }
        Ok(Some(previous))
    }
}
