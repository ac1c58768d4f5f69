//! Loader layer: building typed tables from tabular files
//!
//! Each loader reads raw values, then [`build_table`] infers one value
//! kind per column and fills the table through the regular row API.

mod csv;
mod excel;
mod json;

use std::path::Path;

use anyhow::{bail, Result};
use chrono::NaiveTime;
use log::debug;

use crate::config::Config;
use crate::model::{CellValue, Table, ValueKind};

pub use self::csv::CsvLoader;
pub use self::excel::ExcelLoader;
pub use self::json::JsonLoader;

/// Trait for loading tabular data files
pub trait Loader: Send + Sync {
    /// Load a file into a Table
    fn load(&self, path: &Path, config: &Config) -> Result<Table>;

    /// Check if this loader can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory for picking a loader by file extension
pub struct LoaderFactory {
    loaders: Vec<Box<dyn Loader>>,
}

impl Default for LoaderFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl LoaderFactory {
    /// Create a new loader factory with all supported loaders
    pub fn new() -> Self {
        Self {
            loaders: vec![
                Box::new(CsvLoader),
                Box::new(ExcelLoader),
                Box::new(JsonLoader),
            ],
        }
    }

    /// Get a loader for the given file path
    ///
    /// Files without an extension are sniffed with [`detect_format`].
    pub fn get_loader(&self, path: &Path) -> Result<&dyn Loader> {
        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext.to_lowercase(),
            None => detect_format(path).unwrap_or("csv").to_string(),
        };

        for loader in &self.loaders {
            if loader.supports_extension(&ext) {
                return Ok(loader.as_ref());
            }
        }

        bail!("Unsupported file format: {}", ext)
    }

    /// Load a file using the appropriate loader
    pub fn load(&self, path: &Path, config: &Config) -> Result<Table> {
        let loader = self.get_loader(path)?;
        loader.load(path, config)
    }

    /// Load the configured input file
    pub fn load_input(&self, config: &Config) -> Result<Table> {
        self.load(&config.input, config)
    }
}

/// Detect file format from content (for files without extension)
pub fn detect_format(path: &Path) -> Option<&'static str> {
    use std::fs::File;
    use std::io::Read;

    let mut file = File::open(path).ok()?;
    let mut buffer = [0u8; 512];
    let bytes_read = file.read(&mut buffer).ok()?;
    let head = &buffer[..bytes_read];

    // Excel ZIP format (xlsx)
    if head.starts_with(b"PK\x03\x04") {
        return Some("xlsx");
    }

    // Old Excel format (xls)
    if head.starts_with(b"\xD0\xCF\x11\xE0") {
        return Some("xls");
    }

    let first = head.iter().find(|b| !b.is_ascii_whitespace())?;
    if *first == b'[' || *first == b'{' {
        return Some("json");
    }

    Some("csv")
}

/// Parse raw text into the narrowest value kind that accepts it
///
/// Empty text, `null`, and `NA` are missing values.
pub fn parse_text(text: &str) -> Option<CellValue> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") || trimmed == "NA" {
        return None;
    }

    const CANDIDATES: [ValueKind; 5] = [
        ValueKind::Bool,
        ValueKind::Int,
        ValueKind::Float,
        ValueKind::Date,
        ValueKind::DateTime,
    ];
    CANDIDATES
        .iter()
        .find_map(|kind| kind.parse(trimmed))
        .or_else(|| Some(CellValue::String(trimmed.to_string())))
}

/// Name for the n-th (0-based) column when the header has none
pub(crate) fn header_name(name: String, index: usize) -> String {
    if name.trim().is_empty() {
        format!("Column{}", index + 1)
    } else {
        name
    }
}

/// Build a typed table from a header and raw records
///
/// Each column gets the widest kind of its values (`String` when it has
/// none); missing values keep the column default.
pub fn build_table(
    name: impl Into<String>,
    headers: Vec<String>,
    records: Vec<Vec<Option<CellValue>>>,
) -> Result<Table> {
    let mut kinds: Vec<Option<ValueKind>> = vec![None; headers.len()];
    for record in &records {
        for (kind, value) in kinds.iter_mut().zip(record) {
            if let Some(value) = value {
                *kind = Some(ValueKind::widen(*kind, value.kind()));
            }
        }
    }

    let mut table = Table::new(name);
    if headers.is_empty() && !records.is_empty() {
        bail!(
            "Table '{}' has {} data rows but no columns",
            table.name(),
            records.len()
        );
    }
    for (header, kind) in headers.into_iter().zip(&kinds) {
        let kind = kind.unwrap_or(ValueKind::String);
        debug!("table '{}': column '{}' inferred as {}", table.name(), header, kind);
        table.add_column(header, kind.default_value())?;
    }

    for record in records {
        let mut row = table.create_row();
        for (index, value) in record.into_iter().enumerate().take(table.column_count()) {
            if let Some(value) = value {
                let kind = table.column_at(index)?.kind();
                row.set_at(index, convert(value, kind))?;
            }
        }
        table.insert_row(&row)?;
    }

    Ok(table)
}

/// Convert a value to the kind its column was widened to
fn convert(value: CellValue, kind: ValueKind) -> CellValue {
    match (value, kind) {
        (CellValue::Int(i), ValueKind::Float) => CellValue::Float(i as f64),
        (CellValue::Date(d), ValueKind::DateTime) => CellValue::DateTime(d.and_time(NaiveTime::MIN)),
        (CellValue::String(s), _) => CellValue::String(s),
        (value, ValueKind::String) => CellValue::String(value.display().into_owned()),
        (value, _) => value,
    }
}

/// Table name from config, else the file stem
pub(crate) fn table_name(path: &Path, config: &Config) -> String {
    config.table_name.clone().unwrap_or_else(|| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("table")
            .to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;

    #[test]
    fn test_parse_text() {
        assert_eq!(parse_text(""), None);
        assert_eq!(parse_text("null"), None);
        assert_eq!(parse_text("true"), Some(CellValue::Bool(true)));
        assert_eq!(parse_text("42"), Some(CellValue::Int(42)));
        assert_eq!(parse_text("3.5"), Some(CellValue::Float(3.5)));
        assert_eq!(
            parse_text("2024-01-02"),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 2).map(CellValue::Date)
        );
        assert_eq!(parse_text(" hello "), Some(CellValue::from("hello")));
    }

    #[test]
    fn test_build_table_infers_kinds() {
        let headers = vec!["n".to_string(), "x".to_string(), "mixed".to_string(), "empty".to_string()];
        let records = vec![
            vec![Some(CellValue::Int(1)), Some(CellValue::Int(2)), Some(CellValue::Bool(true)), None],
            vec![None, Some(CellValue::Float(2.5)), Some(CellValue::Int(7)), None],
        ];

        let table = build_table("t", headers, records).unwrap();
        let kinds: Vec<_> = table.columns().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![ValueKind::Int, ValueKind::Float, ValueKind::String, ValueKind::String]
        );
        assert_eq!(
            table.row(0).unwrap().values(),
            vec![
                CellValue::Int(1),
                CellValue::Float(2.0),
                CellValue::from("true"),
                CellValue::from("")
            ]
        );
        assert_eq!(table.value(1, "n").unwrap(), &CellValue::Int(0));
    }

    #[test]
    fn test_build_table_duplicate_header() {
        let err = build_table("t", vec!["a".to_string(), "a".to_string()], Vec::new()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TableError>(),
            Some(&TableError::DuplicateColumn("a".to_string()))
        );
    }

    #[test]
    fn test_build_table_rows_without_columns() {
        let records = vec![vec![Some(CellValue::Int(1))], vec![]];
        let err = build_table("t", Vec::new(), records).unwrap_err();
        assert!(err.to_string().contains("2 data rows but no columns"));

        let empty = build_table("t", Vec::new(), Vec::new()).unwrap();
        assert_eq!(empty.column_count(), 0);
        assert_eq!(empty.row_count(), 0);
    }

    #[test]
    fn test_header_name() {
        assert_eq!(header_name(String::new(), 2), "Column3");
        assert_eq!(header_name("id".to_string(), 0), "id");
    }
}
