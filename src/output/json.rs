//! JSON output format

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::model::{CellValue, Table, ValueKind};

use super::{OutputFormatter, Progress};

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }

    fn write<T: Serialize>(&self, value: &T, writer: &mut dyn Write) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, value)?;
        } else {
            serde_json::to_writer(&mut *writer, value)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonColumn<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    kind: ValueKind,
}

#[derive(Serialize)]
struct JsonTable<'a> {
    name: &'a str,
    columns: Vec<JsonColumn<'a>>,
    rows: Vec<Vec<CellValue>>,
}

impl<'a> JsonTable<'a> {
    fn build(table: &'a Table, progress: &mut Progress<'_>) -> Self {
        let columns = table
            .columns()
            .map(|column| JsonColumn {
                name: column.name(),
                kind: column.kind(),
            })
            .collect();
        progress.advance(table.column_count());

        let mut grid = table.to_grid().into_iter();
        // Header row is already carried by `columns`
        grid.next();
        let rows = grid
            .inspect(|values| progress.advance(values.len()))
            .collect();

        Self {
            name: table.name(),
            columns,
            rows,
        }
    }
}

impl OutputFormatter for JsonOutput {
    fn render_table(
        &self,
        table: &Table,
        progress: &mut Progress<'_>,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let output = JsonTable::build(table, progress);
        self.write(&output, writer)
    }

    fn render_workbook(
        &self,
        tables: &[&Table],
        progress: &mut Progress<'_>,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let output: Vec<JsonTable<'_>> = tables
            .iter()
            .map(|table| JsonTable::build(table, progress))
            .collect();
        self.write(&output, writer)
    }
}
