//! Error types for table operations

use thiserror::Error;

use crate::model::{CellValue, ValueKind};

/// Errors raised by column, row, and table operations
///
/// Every operation validates before it mutates, so a returned error
/// means the table is exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("Column '{0}' already exists")]
    DuplicateColumn(String),

    #[error("Column '{0}' does not exist")]
    UnknownColumn(String),

    #[error("Index {index} is out of range (count = {bound})")]
    IndexOutOfRange { index: usize, bound: usize },

    #[error("Column '{column}' holds {expected} values, got {actual_kind} value '{actual}'", actual_kind = .actual.kind())]
    TypeMismatch {
        column: String,
        expected: ValueKind,
        actual: CellValue,
    },
}

pub type Result<T> = std::result::Result<T, TableError>;
