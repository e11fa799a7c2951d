//! Error types for Trellis tables and graphs.

use crate::types::DataType;
use crate::RowId;
use alloc::string::String;
use thiserror::Error;

/// Result type alias for Trellis operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for table, view and graph operations.
///
/// Every error is a contract violation surfaced synchronously to the caller;
/// the failed operation leaves the structure unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A column cannot hold or produce a value of the requested type.
    #[error("type mismatch: {column} column cannot handle {got}")]
    TypeMismatch { column: DataType, got: String },
    /// The row is not a valid row of the table.
    #[error("row {row} out of range")]
    RowOutOfRange { row: RowId },
    /// The column number does not exist.
    #[error("column index {index} out of range")]
    ColumnOutOfRange { index: usize },
    /// No column has the given name.
    #[error("unknown column: {column}")]
    ColumnNotFound { column: String },
    /// A column with the given name already exists.
    #[error("duplicate column name: {column}")]
    DuplicateColumn { column: String },
    /// The schema or table structure is locked.
    #[error("schema is locked")]
    SchemaLocked,
    /// An argument does not refer to something owned by the receiver.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
    /// The receiver does not support the operation.
    #[error("unsupported operation: {message}")]
    Unsupported { message: String },
    /// The receiver is a read-only derived structure.
    #[error("read-only derived structure: {message}")]
    ReadOnly { message: String },
}

impl Error {
    /// Creates a type mismatch error.
    pub fn type_mismatch(column: DataType, got: Option<DataType>) -> Self {
        Error::TypeMismatch {
            column,
            got: match got {
                Some(dt) => dt.name().into(),
                None => "null".into(),
            },
        }
    }

    /// Creates a row out of range error.
    pub fn row_out_of_range(row: RowId) -> Self {
        Error::RowOutOfRange { row }
    }

    /// Creates a column out of range error.
    pub fn column_out_of_range(index: usize) -> Self {
        Error::ColumnOutOfRange { index }
    }

    /// Creates a column not found error.
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Error::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Creates a duplicate column error.
    pub fn duplicate_column(column: impl Into<String>) -> Self {
        Error::DuplicateColumn {
            column: column.into(),
        }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an unsupported operation error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Error::Unsupported {
            message: message.into(),
        }
    }

    /// Creates a read-only error.
    pub fn read_only(message: impl Into<String>) -> Self {
        Error::ReadOnly {
            message: message.into(),
        }
    }

    /// Returns true for errors caused by a bad identifier or name.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Error::RowOutOfRange { .. }
                | Error::ColumnOutOfRange { .. }
                | Error::ColumnNotFound { .. }
                | Error::DuplicateColumn { .. }
                | Error::InvalidArgument { .. }
        )
    }

    /// Returns true for errors caused by the receiver's state.
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            Error::SchemaLocked | Error::Unsupported { .. } | Error::ReadOnly { .. }
        )
    }

    /// Returns true for type errors.
    pub fn is_type_error(&self) -> bool {
        matches!(self, Error::TypeMismatch { .. })
    }
}
