//! JSON array loader

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexSet;
use serde_json::Value;

use crate::config::Config;
use crate::model::{CellValue, Table};

use super::{build_table, table_name, Loader};

/// Loader for JSON files holding an array of objects
pub struct JsonLoader;

impl Loader for JsonLoader {
    fn load(&self, path: &Path, config: &Config) -> Result<Table> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open JSON file: {}", path.display()))?;
        let reader = BufReader::new(file);

        let value: Value = serde_json::from_reader(reader).context("Failed to parse JSON file")?;

        // Handle both arrays and single objects
        let array = match value {
            Value::Array(arr) => arr,
            Value::Object(_) => vec![value],
            _ => bail!("JSON must be an array or object"),
        };

        // Collect all unique keys across all objects to build column list
        let mut column_names: IndexSet<String> = IndexSet::new();
        for item in &array {
            match item {
                Value::Object(obj) => {
                    column_names.extend(obj.keys().cloned());
                }
                _ => bail!("JSON array items must be objects"),
            }
        }

        let records = array
            .iter()
            .filter_map(Value::as_object)
            .map(|obj| {
                column_names
                    .iter()
                    .map(|key| json_value_to_cell(obj.get(key)))
                    .collect()
            })
            .collect();

        build_table(
            table_name(path, config),
            column_names.into_iter().collect(),
            records,
        )
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "json")
    }
}

fn json_value_to_cell(value: Option<&Value>) -> Option<CellValue> {
    match value? {
        Value::Null => None,
        Value::Bool(b) => Some(CellValue::Bool(*b)),
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => CellValue::Int(i),
            None => n
                .as_f64()
                .map(CellValue::Float)
                .unwrap_or_else(|| CellValue::String(n.to_string())),
        }),
        Value::String(s) => {
            // Try parsing as date/datetime
            if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return Some(CellValue::Date(date));
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                return Some(CellValue::DateTime(dt));
            }
            Some(CellValue::String(s.clone()))
        }
        // Nested values are kept as their JSON text
        nested @ (Value::Array(_) | Value::Object(_)) => Some(CellValue::String(nested.to_string())),
    }
}
