//! Configuration handling for celltable

use std::path::PathBuf;

use crate::model::{CellValue, ValueKind};

/// Output format for exported tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Html,
    Csv,
    Xlsx,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            "csv" => Ok(OutputFormat::Csv),
            "xlsx" | "excel" => Ok(OutputFormat::Xlsx),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// A column to add: `name:kind` or `name:kind=default`
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub default: CellValue,
}

impl std::str::FromStr for ColumnSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, rest) = s
            .split_once(':')
            .ok_or_else(|| format!("Expected name:kind[=default], got: {}", s))?;
        if name.is_empty() {
            return Err(format!("Missing column name in: {}", s));
        }

        let (kind, default) = match rest.split_once('=') {
            Some((kind, default)) => (kind, Some(default)),
            None => (rest, None),
        };
        let kind: ValueKind = kind.parse()?;
        let default = match default {
            Some(text) => kind
                .parse(text)
                .ok_or_else(|| format!("'{}' is not a valid {} value", text, kind))?,
            None => kind.default_value(),
        };

        Ok(ColumnSpec {
            name: name.to_string(),
            default,
        })
    }
}

/// A column move: `name=index`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMove {
    pub name: String,
    pub index: usize,
}

impl std::str::FromStr for ColumnMove {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, index) = s
            .rsplit_once('=')
            .ok_or_else(|| format!("Expected name=index, got: {}", s))?;
        let index = index
            .trim()
            .parse()
            .map_err(|_| format!("Invalid column index: {}", index))?;
        Ok(ColumnMove {
            name: name.to_string(),
            index,
        })
    }
}

/// Configuration for load, edit, and export
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the input file
    pub input: PathBuf,
    /// Where to write the output; stdout when unset
    pub output: Option<PathBuf>,
    /// Output format
    pub output_format: OutputFormat,
    /// For Excel files: which sheet to load
    pub sheet_name: Option<String>,
    /// Table name; defaults to the file stem or sheet name
    pub table_name: Option<String>,
    /// Columns to remove after loading
    pub drop_columns: Vec<String>,
    /// Columns to append after loading
    pub add_columns: Vec<ColumnSpec>,
    /// Column moves, applied in order
    pub column_moves: Vec<ColumnMove>,
    /// Colored terminal output
    pub color: bool,
    /// Report export progress on stderr
    pub show_progress: bool,
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: None,
            output_format: OutputFormat::default(),
            sheet_name: None,
            table_name: None,
            drop_columns: Vec::new(),
            add_columns: Vec::new(),
            column_moves: Vec::new(),
            color: true,
            show_progress: false,
            pretty: true,
        }
    }
}

impl Config {
    /// Create a new Config for an input file
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            ..Default::default()
        }
    }

    /// Set output file
    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = Some(output);
        self
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set Excel sheet name
    pub fn with_sheet_name(mut self, name: String) -> Self {
        self.sheet_name = Some(name);
        self
    }

    /// Set table name
    pub fn with_table_name(mut self, name: String) -> Self {
        self.table_name = Some(name);
        self
    }

    /// Set columns to drop
    pub fn with_drop_columns(mut self, columns: Vec<String>) -> Self {
        self.drop_columns = columns;
        self
    }

    /// Set columns to add
    pub fn with_add_columns(mut self, columns: Vec<ColumnSpec>) -> Self {
        self.add_columns = columns;
        self
    }

    /// Set column moves
    pub fn with_column_moves(mut self, moves: Vec<ColumnMove>) -> Self {
        self.column_moves = moves;
        self
    }

    /// Enable or disable colored output
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Enable progress reporting
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Enable pretty JSON
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("CSV".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!("xlsx".parse::<OutputFormat>(), Ok(OutputFormat::Xlsx));
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_column_spec() {
        let spec: ColumnSpec = "done:bool=yes".parse().unwrap();
        assert_eq!(spec.name, "done");
        assert_eq!(spec.default, CellValue::Bool(true));

        let spec: ColumnSpec = "score:float".parse().unwrap();
        assert_eq!(spec.default, CellValue::Float(0.0));

        let spec: ColumnSpec = "note:string=a=b".parse().unwrap();
        assert_eq!(spec.default, CellValue::from("a=b"));

        assert!("count:int=many".parse::<ColumnSpec>().is_err());
        assert!("count".parse::<ColumnSpec>().is_err());
        assert!(":int".parse::<ColumnSpec>().is_err());
    }

    #[test]
    fn test_column_move() {
        let mv: ColumnMove = "a=b=2".parse().unwrap();
        assert_eq!(mv.name, "a=b");
        assert_eq!(mv.index, 2);
        assert!("name=x".parse::<ColumnMove>().is_err());
    }
}
