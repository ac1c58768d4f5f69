//! CSV output format

use std::io::Write;

use anyhow::Result;

use crate::model::Table;

use super::{OutputFormatter, Progress};

/// CSV output: a header record of column names, then one record per row
pub struct CsvOutput {
    delimiter: u8,
}

impl CsvOutput {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for CsvOutput {
    fn render_table(
        &self,
        table: &Table,
        progress: &mut Progress<'_>,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(&mut *writer);

        for record in table.to_grid() {
            csv_writer.write_record(record.iter().map(|value| value.display().into_owned()))?;
            progress.advance(record.len());
        }
        csv_writer.flush()?;
        Ok(())
    }
}
