//! CSV file loader

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::model::Table;

use super::{build_table, header_name, parse_text, table_name, Loader};

/// Loader for CSV and TSV files
pub struct CsvLoader;

impl Loader for CsvLoader {
    fn load(&self, path: &Path, config: &Config) -> Result<Table> {
        let file =
            File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
        let delimiter = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
            _ => b',',
        };
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(BufReader::new(file));

        let headers: Vec<String> = csv_reader
            .headers()
            .context("Failed to read CSV headers")?
            .iter()
            .enumerate()
            .map(|(i, name)| header_name(name.trim().to_string(), i))
            .collect();

        let mut records = Vec::new();
        for (line_num, result) in csv_reader.records().enumerate() {
            // +2 for 1-indexing and header
            let record = result.with_context(|| format!("Failed to read CSV row {}", line_num + 2))?;
            records.push(record.iter().map(parse_text).collect());
        }

        build_table(table_name(path, config), headers, records)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "csv" | "tsv" | "txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, ValueKind};
    use std::io::Write;

    #[test]
    fn test_load_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "id,name,score").unwrap();
        writeln!(file, "1,alice,3.5").unwrap();
        writeln!(file, "2,bob,").unwrap();
        writeln!(file, "3").unwrap();

        let table = CsvLoader.load(file.path(), &Config::default()).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column("score").unwrap().kind(), ValueKind::Float);
        assert_eq!(table.value(1, "score").unwrap(), &CellValue::Float(0.0));
        assert_eq!(table.value(2, "name").unwrap(), &CellValue::from(""));
    }

    #[test]
    fn test_table_name_override() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "a").unwrap();

        let config = Config::default().with_table_name("custom".to_string());
        let table = CsvLoader.load(file.path(), &config).unwrap();
        assert_eq!(table.name(), "custom");
        assert_eq!(table.row_count(), 0);
    }
}
