//! Tables: the schema and the rows that follow it

use std::sync::Arc;

use log::debug;

use crate::error::{Result, TableError};

use super::cell::Cell;
use super::column::Column;
use super::row::{Row, RowId};
use super::value::CellValue;

/// A table of typed columns and rows
///
/// The table owns the column list (the schema) and every row. Schema
/// changes go through the table, which updates all rows before
/// returning, so every row always has exactly one cell per column, in
/// column order.
///
/// Rows held by a table are only reachable for reading; values are written
/// through [`Table::set_value`] and [`Table::set_value_at`].
///
/// ```compile_fail
/// let mut table = celltable::Table::new("t");
/// let _row = table.row_mut(0);
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<Arc<Column>>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column descriptors in schema order
    pub fn columns(&self) -> impl ExactSizeIterator<Item = &Column> {
        self.columns.iter().map(|column| column.as_ref())
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name()).collect()
    }

    /// Get column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|column| column.name() == name)
            .map(|column| column.as_ref())
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
    }

    /// Get column by position
    pub fn column_at(&self, index: usize) -> Result<&Column> {
        self.columns
            .get(index)
            .map(|column| column.as_ref())
            .ok_or(TableError::IndexOutOfRange {
                index,
                bound: self.columns.len(),
            })
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.column_position(name).is_some()
    }

    /// Position of a column, or `None` if the table has no such column
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name() == name)
    }

    /// Append a column and give every existing row a default cell for it
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        default: impl Into<CellValue>,
    ) -> Result<()> {
        let column = Column::new(name, default);
        // checked against every row too, so a failure leaves no row changed
        if self.contains_column(column.name())
            || self.rows.iter().any(|row| row.contains(column.name()))
        {
            return Err(TableError::DuplicateColumn(column.name().to_string()));
        }

        let column = Arc::new(column);
        for row in &mut self.rows {
            row.add_cell(column.create_cell())?;
        }
        debug!(
            "table '{}': added column {} to {} rows",
            self.name,
            column,
            self.rows.len()
        );
        self.columns.push(column);
        Ok(())
    }

    /// Remove a column and its cell from every row
    pub fn remove_column(&mut self, name: &str) -> Result<Column> {
        let position = self
            .column_position(name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))?;
        if self.rows.iter().any(|row| !row.contains(name)) {
            return Err(TableError::UnknownColumn(name.to_string()));
        }

        for row in &mut self.rows {
            row.remove_cell(name)?;
        }
        let column = self.columns.remove(position);
        debug!("table '{}': removed column {}", self.name, column);
        Ok(Arc::unwrap_or_clone(column))
    }

    /// Move a column to `new_index` and rebuild every row to match
    ///
    /// Cells are matched to columns by name, so values always stay with
    /// their column. Row order and row identities are kept.
    pub fn set_column_position(&mut self, name: &str, new_index: usize) -> Result<()> {
        let position = self
            .column_position(name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))?;
        if new_index >= self.columns.len() {
            return Err(TableError::IndexOutOfRange {
                index: new_index,
                bound: self.columns.len(),
            });
        }
        if position == new_index {
            return Ok(());
        }

        let column = self.columns.remove(position);
        self.columns.insert(new_index, column);
        for row in &mut self.rows {
            row.reorder(&self.columns);
        }
        debug!(
            "table '{}': moved column '{}' from {} to {}",
            self.name, name, position, new_index
        );
        Ok(())
    }

    /// Create a detached row shaped like the current schema
    pub fn create_row(&self) -> Row {
        Row::shaped(&self.columns)
    }

    /// Append a copy of `row`; see [`Table::insert_row_at`]
    pub fn insert_row(&mut self, row: &Row) -> Result<usize> {
        self.insert_row_at(row, self.rows.len())
    }

    /// Insert a copy of `row` at `index`
    ///
    /// Values are copied for every column name the table and `row` have in
    /// common; other columns keep their defaults. Returns the number of
    /// copied values.
    ///
    /// **If `row` shares no column name with the table, nothing is inserted
    /// and `Ok(0)` is returned.** Check the count when that matters.
    pub fn insert_row_at(&mut self, row: &Row, index: usize) -> Result<usize> {
        if index > self.rows.len() {
            return Err(TableError::IndexOutOfRange {
                index,
                bound: self.rows.len(),
            });
        }

        let mut new_row = self.create_row();
        let mut copied = 0;
        for column in &self.columns {
            if let Ok(source) = row.get(column.name()) {
                new_row.set(column.name(), source.value().clone())?;
                copied += 1;
            }
        }

        if copied == 0 {
            debug!(
                "table '{}': row shares no columns with the schema, not inserted",
                self.name
            );
            return Ok(0);
        }
        self.rows.insert(index, new_row);
        Ok(copied)
    }

    /// Remove the row at `index`
    pub fn remove_row(&mut self, index: usize) -> Result<Row> {
        if index >= self.rows.len() {
            return Err(TableError::IndexOutOfRange {
                index,
                bound: self.rows.len(),
            });
        }
        Ok(self.rows.remove(index))
    }

    /// Remove a row by identity; `false` if the table does not hold it
    pub fn remove_row_by_id(&mut self, id: RowId) -> bool {
        match self.row_position(id) {
            Some(index) => {
                self.rows.remove(index);
                true
            }
            None => false,
        }
    }

    /// Position of a row by identity
    pub fn row_position(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == id)
    }

    pub fn row(&self, index: usize) -> Result<&Row> {
        let bound = self.rows.len();
        self.rows
            .get(index)
            .ok_or(TableError::IndexOutOfRange { index, bound })
    }

    pub(crate) fn row_mut(&mut self, index: usize) -> Result<&mut Row> {
        let bound = self.rows.len();
        self.rows
            .get_mut(index)
            .ok_or(TableError::IndexOutOfRange { index, bound })
    }

    pub fn rows(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Get a cell by row and column position
    pub fn cell_at(&self, row_index: usize, column_index: usize) -> Result<&Cell> {
        self.row(row_index)?.get_at(column_index)
    }

    /// Get a value by row position and column name
    pub fn value(&self, row_index: usize, column_name: &str) -> Result<&CellValue> {
        self.row(row_index)?.value(column_name)
    }

    /// Set a value by row position and column name
    pub fn set_value(
        &mut self,
        row_index: usize,
        column_name: &str,
        value: impl Into<CellValue>,
    ) -> Result<()> {
        self.row_mut(row_index)?.set(column_name, value)
    }

    /// Set a value by row and column position
    pub fn set_value_at(
        &mut self,
        row_index: usize,
        column_index: usize,
        value: impl Into<CellValue>,
    ) -> Result<()> {
        self.row_mut(row_index)?.set_at(column_index, value)
    }

    /// First row matching `predicate`
    pub fn find_row<P>(&self, mut predicate: P) -> Option<&Row>
    where
        P: FnMut(&Row) -> bool,
    {
        self.rows.iter().find(|&row| predicate(row))
    }

    /// Position of the first row matching `predicate`
    pub fn find_row_index<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(&Row) -> bool,
    {
        self.rows.iter().position(predicate)
    }

    /// Header row of column names followed by every row's values
    pub fn to_grid(&self) -> Vec<Vec<CellValue>> {
        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(
            self.columns
                .iter()
                .map(|column| CellValue::from(column.name()))
                .collect(),
        );
        grid.extend(self.rows.iter().map(Row::values));
        grid
    }
}

impl From<&Table> for Vec<Vec<CellValue>> {
    fn from(table: &Table) -> Self {
        table.to_grid()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ValueKind;

    fn sample() -> Table {
        let mut table = Table::new("people");
        table.add_column("id", 0).unwrap();
        table.add_column("label", "").unwrap();
        table
    }

    fn push(table: &mut Table, id: i64, label: &str) {
        let mut row = table.create_row();
        row.set("id", id).unwrap();
        row.set("label", label).unwrap();
        assert_eq!(table.insert_row(&row).unwrap(), 2);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut table = sample();
        assert_eq!(
            table.add_column("id", 0).unwrap_err(),
            TableError::DuplicateColumn("id".to_string())
        );
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_insert_scenario() {
        let mut table = sample();
        let mut row = table.create_row();
        row.set("id", 5).unwrap();
        row.set("label", "x").unwrap();

        assert_eq!(table.insert_row(&row).unwrap(), 2);
        assert_eq!(table.row_count(), 1);
        assert_eq!(
            table.row(0).unwrap().values(),
            vec![CellValue::Int(5), CellValue::from("x")]
        );
    }

    #[test]
    fn test_add_column_extends_existing_rows() {
        let mut table = sample();
        push(&mut table, 1, "a");
        push(&mut table, 2, "b");

        table.add_column("score", 1.5).unwrap();
        for row in &table {
            assert_eq!(row.len(), 3);
            assert_eq!(row.value("score").unwrap(), &CellValue::Float(1.5));
        }
        assert_eq!(table.create_row().value("score").unwrap(), &CellValue::Float(1.5));
    }

    #[test]
    fn test_remove_column() {
        let mut table = sample();
        push(&mut table, 1, "a");

        let removed = table.remove_column("id").unwrap();
        assert_eq!(removed.name(), "id");
        assert_eq!(table.column_names(), vec!["label"]);
        assert!(!table.row(0).unwrap().contains("id"));
        assert_eq!(
            table.remove_column("id").unwrap_err(),
            TableError::UnknownColumn("id".to_string())
        );
    }

    #[test]
    fn test_readd_resets_values() {
        let mut table = sample();
        push(&mut table, 42, "a");

        table.remove_column("id").unwrap();
        table.add_column("id", 0).unwrap();
        assert_eq!(table.value(0, "id").unwrap(), &CellValue::Int(0));
    }

    #[test]
    fn test_insert_with_partial_overlap() {
        let mut table = sample();
        let mut foreign = Row::new([Column::new("label", ""), Column::new("other", true)]).unwrap();
        foreign.set("label", "only label").unwrap();

        assert_eq!(table.insert_row(&foreign).unwrap(), 1);
        assert_eq!(
            table.row(0).unwrap().values(),
            vec![CellValue::Int(0), CellValue::from("only label")]
        );
    }

    #[test]
    fn test_insert_with_no_overlap_is_noop() {
        let mut table = sample();
        let foreign = Row::new([Column::new("other", true)]).unwrap();
        assert_eq!(table.insert_row(&foreign).unwrap(), 0);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_insert_kind_conflict_inserts_nothing() {
        let mut table = sample();
        let mut foreign = Row::new([Column::new("id", "text id")]).unwrap();
        foreign.set("id", "abc").unwrap();

        let err = table.insert_row(&foreign).unwrap_err();
        assert!(matches!(err, TableError::TypeMismatch { expected: ValueKind::Int, .. }));
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_insert_at_position() {
        let mut table = sample();
        push(&mut table, 1, "a");
        push(&mut table, 3, "c");

        let mut row = table.create_row();
        row.set("id", 2).unwrap();
        assert_eq!(table.insert_row_at(&row, 1).unwrap(), 2);
        let ids: Vec<_> = table.rows().map(|r| r.values()[0].clone()).collect();
        assert_eq!(ids, vec![CellValue::Int(1), CellValue::Int(2), CellValue::Int(3)]);

        assert_eq!(
            table.insert_row_at(&row, 5).unwrap_err(),
            TableError::IndexOutOfRange { index: 5, bound: 3 }
        );
    }

    #[test]
    fn test_remove_rows() {
        let mut table = sample();
        push(&mut table, 1, "a");
        push(&mut table, 2, "b");

        let id = table.row(1).unwrap().id();
        let detached = table.create_row();
        assert!(!table.remove_row_by_id(detached.id()));
        assert!(table.remove_row_by_id(id));
        assert_eq!(table.row_count(), 1);

        assert!(table.remove_row(1).is_err());
        let removed = table.remove_row(0).unwrap();
        assert_eq!(removed.value("label").unwrap(), &CellValue::from("a"));
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_set_column_position() {
        let mut table = sample();
        table.add_column("done", false).unwrap();
        push(&mut table, 1, "a");
        table.set_value(0, "done", true).unwrap();
        let row_id = table.row(0).unwrap().id();

        table.set_column_position("done", 0).unwrap();
        assert_eq!(table.column_names(), vec!["done", "id", "label"]);
        assert_eq!(
            table.row(0).unwrap().values(),
            vec![CellValue::Bool(true), CellValue::Int(1), CellValue::from("a")]
        );
        assert_eq!(table.row(0).unwrap().id(), row_id);

        assert_eq!(
            table.set_column_position("done", 3).unwrap_err(),
            TableError::IndexOutOfRange { index: 3, bound: 3 }
        );
        assert_eq!(
            table.set_column_position("nope", 0).unwrap_err(),
            TableError::UnknownColumn("nope".to_string())
        );
    }

    #[test]
    fn test_lookups() {
        let mut table = sample();
        push(&mut table, 1, "a");
        push(&mut table, 2, "b");

        assert_eq!(table.column_position("label"), Some(1));
        assert_eq!(table.column_position("nope"), None);
        assert_eq!(table.column_at(0).unwrap().name(), "id");
        assert!(table.column_at(2).is_err());
        assert_eq!(table.cell_at(1, 1).unwrap().value(), &CellValue::from("b"));

        let found = table.find_row(|row| row.value("label").ok() == Some(&CellValue::from("b")));
        assert_eq!(found.map(|row| row.values()[0].clone()), Some(CellValue::Int(2)));
        assert_eq!(table.find_row_index(|row| row.value("id").ok() == Some(&CellValue::Int(1))), Some(0));
        assert!(table.find_row(|_| false).is_none());
    }

    #[test]
    fn test_set_value_at() {
        let mut table = sample();
        push(&mut table, 1, "a");

        table.set_value_at(0, 1, "b").unwrap();
        assert_eq!(table.value(0, "label").unwrap(), &CellValue::from("b"));
        assert!(table.set_value_at(0, 0, "one").is_err());
        assert_eq!(table.value(0, "id").unwrap(), &CellValue::Int(1));
        assert_eq!(
            table.set_value_at(0, 2, 1).unwrap_err(),
            TableError::IndexOutOfRange { index: 2, bound: 2 }
        );
    }

    #[test]
    fn test_schema_change_checks_every_row_first() {
        let mut table = sample();
        push(&mut table, 1, "a");
        push(&mut table, 2, "b");
        // a second row that lost its "id" cell and gained a "flag" cell
        table.row_mut(1).unwrap().remove_cell("id").unwrap();
        let flag = Arc::new(Column::new("flag", true));
        table.row_mut(1).unwrap().add_cell(flag.create_cell()).unwrap();

        assert_eq!(
            table.remove_column("id").unwrap_err(),
            TableError::UnknownColumn("id".to_string())
        );
        assert_eq!(table.column_names(), vec!["id", "label"]);
        assert!(table.row(0).unwrap().contains("id"));

        assert_eq!(
            table.add_column("flag", false).unwrap_err(),
            TableError::DuplicateColumn("flag".to_string())
        );
        assert_eq!(table.column_names(), vec!["id", "label"]);
        assert_eq!(table.row(0).unwrap().len(), 2);
    }

    #[test]
    fn test_grid() {
        let mut table = sample();
        push(&mut table, 1, "a");

        let grid: Vec<Vec<CellValue>> = (&table).into();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0], vec![CellValue::from("id"), CellValue::from("label")]);
        assert_eq!(grid[1], table.row(0).unwrap().values());
    }
}
