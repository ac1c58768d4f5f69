//! Excel workbook output: one worksheet per table

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::model::{CellValue, Table};

use super::{OutputFormatter, Progress};

/// Excel output formatter
///
/// Each table becomes a worksheet named after the table, holding the
/// header row followed by the rows. Cell styling is left to Excel's
/// defaults; only dates get a number format so they read back as dates.
pub struct XlsxOutput {
    date_format: Format,
    datetime_format: Format,
}

impl XlsxOutput {
    pub fn new() -> Self {
        Self {
            date_format: Format::new().set_num_format("yyyy-mm-dd"),
            datetime_format: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
        }
    }

    fn worksheet(&self, table: &Table, progress: &mut Progress<'_>) -> Result<Worksheet> {
        let mut worksheet = Worksheet::new();
        worksheet
            .set_name(table.name())
            .with_context(|| format!("Invalid worksheet name: {}", table.name()))?;

        for (r, record) in table.to_grid().iter().enumerate() {
            let row = u32::try_from(r).context("Too many rows for a worksheet")?;
            for (c, value) in record.iter().enumerate() {
                let col = u16::try_from(c).context("Too many columns for a worksheet")?;
                self.write_value(&mut worksheet, row, col, value)
                    .with_context(|| {
                        format!("Failed to write cell ({}, {}) of {}", r, c, table.name())
                    })?;
            }
            progress.advance(record.len());
        }
        Ok(worksheet)
    }

    fn write_value(
        &self,
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        value: &CellValue,
    ) -> Result<()> {
        match value {
            CellValue::Bool(b) => worksheet.write_boolean(row, col, *b)?,
            CellValue::Int(i) => worksheet.write_number(row, col, *i as f64)?,
            CellValue::Float(f) => worksheet.write_number(row, col, *f)?,
            CellValue::String(s) => worksheet.write_string(row, col, s.as_str())?,
            CellValue::Date(d) => worksheet.write_number_with_format(
                row,
                col,
                date_serial(d.and_time(NaiveTime::MIN)),
                &self.date_format,
            )?,
            CellValue::DateTime(dt) => worksheet.write_number_with_format(
                row,
                col,
                date_serial(*dt),
                &self.datetime_format,
            )?,
        };
        Ok(())
    }

    fn save(&self, worksheets: Vec<Worksheet>, writer: &mut dyn Write) -> Result<()> {
        let mut workbook = Workbook::new();
        for worksheet in worksheets {
            workbook.push_worksheet(worksheet);
        }
        let buffer = workbook.save_to_buffer().context("Failed to build workbook")?;
        writer.write_all(&buffer)?;
        Ok(())
    }
}

impl Default for XlsxOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for XlsxOutput {
    fn render_table(
        &self,
        table: &Table,
        progress: &mut Progress<'_>,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let worksheet = self.worksheet(table, progress)?;
        self.save(vec![worksheet], writer)
    }

    fn render_workbook(
        &self,
        tables: &[&Table],
        progress: &mut Progress<'_>,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let worksheets = tables
            .iter()
            .map(|table| self.worksheet(table, progress))
            .collect::<Result<Vec<_>>>()?;
        self.save(worksheets, writer)
    }
}

/// Days since 1899-12-30, with the time of day as the fraction
fn date_serial(dt: NaiveDateTime) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN);
    let elapsed = dt - epoch;
    elapsed.num_milliseconds() as f64 / 86_400_000.0
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};

    use super::super::test_support::sample_table;
    use super::super::{export_table, export_workbook};
    use super::*;

    fn read_back(bytes: Vec<u8>) -> Xlsx<Cursor<Vec<u8>>> {
        open_workbook_from_rs(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_single_table_sheet() {
        let table = sample_table("people");
        let mut out = Vec::new();
        export_table(&table, &XlsxOutput::new(), &mut out, None).unwrap();

        let mut workbook = read_back(out);
        assert_eq!(workbook.sheet_names(), vec!["people".to_string()]);
        let range = workbook.worksheet_range("people").unwrap();
        assert_eq!(range.get_size(), (3, 2));
        assert_eq!(range.get_value((0, 0)), Some(&Data::String("id".to_string())));
        assert_eq!(range.get_value((1, 0)), Some(&Data::Float(1.0)));
        assert_eq!(range.get_value((2, 1)), Some(&Data::String("<beta>".to_string())));
    }

    #[test]
    fn test_workbook_has_sheet_per_table() {
        let a = sample_table("a");
        let mut b = Table::new("b");
        b.add_column("ok", false).unwrap();
        let mut row = b.create_row();
        row.set("ok", true).unwrap();
        b.insert_row(&row).unwrap();

        let mut seen = Vec::new();
        let mut callback = |p: f64| seen.push(p);
        let mut out = Vec::new();
        export_workbook(&[&a, &b], &XlsxOutput::new(), &mut out, Some(&mut callback)).unwrap();

        // 3 grid rows of a, 2 of b, then completion
        assert_eq!(seen.len(), 6);
        assert_eq!(seen.last().copied(), Some(1.0));

        let mut workbook = read_back(out);
        assert_eq!(workbook.sheet_names(), vec!["a".to_string(), "b".to_string()]);
        let range = workbook.worksheet_range("b").unwrap();
        assert_eq!(range.get_value((1, 0)), Some(&Data::Bool(true)));
    }

    #[test]
    fn test_invalid_sheet_name() {
        let table = sample_table("bad/name");
        let mut out = Vec::new();
        let err = export_table(&table, &XlsxOutput::new(), &mut out, None).unwrap_err();
        assert!(err.to_string().contains("bad/name"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_date_serial() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(date_serial(day.and_time(NaiveTime::MIN)), 45292.0);
        let noon = day.and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(date_serial(noon), 45292.5);
    }
}
