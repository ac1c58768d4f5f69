//! Rows: ordered, name-addressed cells

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{Result, TableError};

use super::cell::Cell;
use super::column::Column;
use super::value::CellValue;

static NEXT_ROW_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a row, used for removal by identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl RowId {
    fn next() -> Self {
        RowId(NEXT_ROW_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A row in a table
///
/// Holds one cell per column, keyed by column name, in column order.
/// Callers change cell values through [`Row::set`] and [`Row::set_at`];
/// only the owning table changes which cells a row has.
///
/// Cells are never handed out mutably, so a cell cannot be swapped for one
/// bound to another column:
///
/// ```compile_fail
/// let mut row = celltable::Row::new([celltable::Column::new("id", 0)]).unwrap();
/// let _cell = row.get_mut("id");
/// ```
#[derive(Debug)]
pub struct Row {
    id: RowId,
    cells: IndexMap<String, Cell>,
}

impl Row {
    /// Create a row with one default-valued cell per column, in order
    pub fn new<I>(columns: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Arc<Column>>,
    {
        let mut row = Self::empty();
        for column in columns {
            let column: Arc<Column> = column.into();
            row.add_cell(column.create_cell())?;
        }
        Ok(row)
    }

    fn empty() -> Self {
        Self {
            id: RowId::next(),
            cells: IndexMap::new(),
        }
    }

    /// Row for a schema whose names are already known to be unique
    pub(crate) fn shaped(columns: &[Arc<Column>]) -> Self {
        let mut row = Self::empty();
        row.reorder(columns);
        row
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get a cell by column name
    pub fn get(&self, column_name: &str) -> Result<&Cell> {
        self.cells
            .get(column_name)
            .ok_or_else(|| TableError::UnknownColumn(column_name.to_string()))
    }

    pub(crate) fn get_mut(&mut self, column_name: &str) -> Result<&mut Cell> {
        self.cells
            .get_mut(column_name)
            .ok_or_else(|| TableError::UnknownColumn(column_name.to_string()))
    }

    /// Get a cell by position
    pub fn get_at(&self, index: usize) -> Result<&Cell> {
        let bound = self.cells.len();
        self.cells
            .get_index(index)
            .map(|(_, cell)| cell)
            .ok_or(TableError::IndexOutOfRange { index, bound })
    }

    pub(crate) fn get_at_mut(&mut self, index: usize) -> Result<&mut Cell> {
        let bound = self.cells.len();
        self.cells
            .get_index_mut(index)
            .map(|(_, cell)| cell)
            .ok_or(TableError::IndexOutOfRange { index, bound })
    }

    /// Get a value by column name
    pub fn value(&self, column_name: &str) -> Result<&CellValue> {
        self.get(column_name).map(Cell::value)
    }

    /// Set a value by column name, checked against the column's kind
    pub fn set(&mut self, column_name: &str, value: impl Into<CellValue>) -> Result<()> {
        self.get_mut(column_name)?.set_value(value)
    }

    /// Set a value by position, checked against the column's kind
    pub fn set_at(&mut self, index: usize, value: impl Into<CellValue>) -> Result<()> {
        self.get_at_mut(index)?.set_value(value)
    }

    pub fn contains(&self, column_name: &str) -> bool {
        self.cells.contains_key(column_name)
    }

    /// Get the column descriptor of a cell
    pub fn column(&self, column_name: &str) -> Result<&Column> {
        self.get(column_name).map(Cell::column)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    /// Values in cell order
    pub fn values(&self) -> Vec<CellValue> {
        self.cells.values().map(|cell| cell.value().clone()).collect()
    }

    pub(crate) fn add_cell(&mut self, cell: Cell) -> Result<()> {
        let name = cell.column().name();
        if self.cells.contains_key(name) {
            return Err(TableError::DuplicateColumn(name.to_string()));
        }
        self.cells.insert(name.to_string(), cell);
        Ok(())
    }

    pub(crate) fn remove_cell(&mut self, column_name: &str) -> Result<Cell> {
        self.cells
            .shift_remove(column_name)
            .ok_or_else(|| TableError::UnknownColumn(column_name.to_string()))
    }

    /// Rebuild the cell order to follow `columns`, matching by name
    ///
    /// Names the row lacks get a default cell; cells for names not in
    /// `columns` are dropped.
    pub(crate) fn reorder(&mut self, columns: &[Arc<Column>]) {
        let mut old = std::mem::take(&mut self.cells);
        self.cells.reserve(columns.len());
        for column in columns {
            let cell = old
                .swap_remove(column.name())
                .unwrap_or_else(|| column.create_cell());
            self.cells.insert(column.name().to_string(), cell);
        }
    }
}

/// Cloning copies the cells but gives the copy its own identity
impl Clone for Row {
    fn clone(&self) -> Self {
        Self {
            id: RowId::next(),
            cells: self.cells.clone(),
        }
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Cell;
    type IntoIter = indexmap::map::Values<'a, String, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.values()
    }
}
