//! Excel workbook loader (xlsx, xls, ods)

use std::path::Path;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::Config;
use crate::model::{CellValue, Table};

use super::{build_table, header_name, Loader};

/// Loader for spreadsheet files
pub struct ExcelLoader;

impl Loader for ExcelLoader {
    fn load(&self, path: &Path, config: &Config) -> Result<Table> {
        let mut workbook = open_workbook_auto(path)
            .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

        let sheet_name = match config.sheet_name {
            Some(ref name) => name.clone(),
            None => match workbook.sheet_names().first() {
                Some(first) => first.clone(),
                None => bail!("No sheets found in workbook"),
            },
        };

        let range: Range<Data> = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

        let name = config.table_name.clone().unwrap_or(sheet_name);
        parse_range(name, &range)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "xlsx" | "xls" | "ods" | "xlsm")
    }
}

fn parse_range(name: String, range: &Range<Data>) -> Result<Table> {
    let mut rows = range.rows();

    // First row is header
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .enumerate()
            .map(|(i, cell)| header_name(cell_to_string(cell), i))
            .collect(),
        None => bail!("Empty sheet"),
    };

    let records = rows
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    build_table(name, headers, records)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

fn convert_cell(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(CellValue::String(s.clone())),
        Data::Float(f) => {
            // Whole numbers are stored as floats
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                Some(CellValue::Int(*f as i64))
            } else {
                Some(CellValue::Float(*f))
            }
        }
        Data::Int(i) => Some(CellValue::Int(*i)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(dt) => Some(serial_to_value(dt.as_f64())),
        Data::DateTimeIso(s) => Some(parse_date_text(s)),
        Data::DurationIso(s) => Some(CellValue::String(s.clone())),
        Data::Error(e) => Some(CellValue::String(format!("#{:?}", e))),
    }
}

/// Excel serial dates count days from 1899-12-30
fn serial_to_value(serial: f64) -> CellValue {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).map(|d| d.and_time(NaiveTime::MIN));
    let millis = (serial * 86_400_000.0).round() as i64;
    match epoch.and_then(|e| e.checked_add_signed(Duration::milliseconds(millis))) {
        Some(dt) if dt.time() == NaiveTime::MIN => CellValue::Date(dt.date()),
        Some(dt) => CellValue::DateTime(dt),
        None => CellValue::Float(serial),
    }
}

fn parse_date_text(s: &str) -> CellValue {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        CellValue::DateTime(dt)
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        CellValue::DateTime(dt)
    } else if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        CellValue::Date(d)
    } else {
        CellValue::String(s.to_string())
    }
}
