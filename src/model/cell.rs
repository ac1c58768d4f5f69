//! Typed value slots

use std::sync::Arc;

use crate::error::{Result, TableError};

use super::column::Column;
use super::value::{CellValue, TypedValue};

/// A single value bound to one column
///
/// `set_value` is the one place a value gets stored, and it only accepts
/// values whose kind matches the column.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    column: Arc<Column>,
    value: CellValue,
}

impl Cell {
    pub(crate) fn new(column: Arc<Column>) -> Self {
        let value = column.default_value().clone();
        Self { column, value }
    }

    /// The column this cell belongs to
    pub fn column(&self) -> &Column {
        &self.column
    }

    /// Type-erased read
    pub fn value(&self) -> &CellValue {
        &self.value
    }

    /// Typed read; fails if `T` is not the column's type
    pub fn get<T: TypedValue>(&self) -> Result<&T> {
        T::from_cell_value(&self.value).ok_or_else(|| TableError::TypeMismatch {
            column: self.column.name().to_string(),
            expected: T::KIND,
            actual: self.value.clone(),
        })
    }

    /// Type-erased write
    ///
    /// Rejects values of another kind and keeps the current value.
    pub fn set_value(&mut self, value: impl Into<CellValue>) -> Result<()> {
        let value = value.into();
        let expected = self.column.kind();
        if value.kind() != expected {
            return Err(TableError::TypeMismatch {
                column: self.column.name().to_string(),
                expected,
                actual: value,
            });
        }
        self.value = value;
        Ok(())
    }

    /// Typed write
    pub fn set<T: TypedValue>(&mut self, value: T) -> Result<()> {
        self.set_value(value)
    }

    /// Restore the column default
    pub fn reset(&mut self) {
        self.value = self.column.default_value().clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ValueKind;

    fn int_cell() -> Cell {
        Arc::new(Column::new("count", 0)).create_cell()
    }

    #[test]
    fn test_set_matching_kind() {
        let mut cell = int_cell();
        cell.set_value(12).unwrap();
        assert_eq!(cell.value(), &CellValue::Int(12));
        assert_eq!(cell.get::<i64>().unwrap(), &12);
    }

    #[test]
    fn test_mismatch_keeps_prior_value() {
        let mut cell = int_cell();
        cell.set(3i64).unwrap();

        let err = cell.set_value("three").unwrap_err();
        assert_eq!(
            err,
            TableError::TypeMismatch {
                column: "count".to_string(),
                expected: ValueKind::Int,
                actual: CellValue::from("three"),
            }
        );
        assert_eq!(cell.value(), &CellValue::Int(3));
    }

    #[test]
    fn test_float_is_not_coerced_into_int() {
        let mut cell = int_cell();
        assert!(cell.set_value(1.0).is_err());
        assert_eq!(cell.value(), &CellValue::Int(0));
    }

    #[test]
    fn test_typed_read_of_wrong_type() {
        let cell = int_cell();
        assert!(matches!(
            cell.get::<String>(),
            Err(TableError::TypeMismatch { expected: ValueKind::String, .. })
        ));
    }

    #[test]
    fn test_reset() {
        let mut cell = int_cell();
        cell.set_value(9).unwrap();
        cell.reset();
        assert_eq!(cell.value(), &CellValue::Int(0));
    }
}
