//! Output formatting for tables
//!
//! Formatters only read a table through its grid (`Table::to_grid`), its
//! counts, and its column descriptors.

mod csv;
mod html;
mod json;
mod terminal;
mod xlsx;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::info;
use rustc_hash::FxHashSet;

use crate::config::{Config, OutputFormat};
use crate::model::Table;

pub use self::csv::CsvOutput;
pub use html::HtmlOutput;
pub use json::JsonOutput;
pub use terminal::TerminalOutput;
pub use xlsx::XlsxOutput;

/// Progress of an export, reported as a fraction in `(0, 1]`
///
/// Work is counted in grid cells: `(row_count + 1) * column_count` per
/// table. While writing, the callback sees at most `0.99`; `finish`
/// reports exactly `1.0` once the output has been flushed.
pub struct Progress<'a> {
    callback: Option<&'a mut dyn FnMut(f64)>,
    total: usize,
    done: usize,
}

impl<'a> Progress<'a> {
    const WRITE_SHARE: f64 = 0.99;

    /// Track progress over `tables`
    pub fn new(tables: &[&Table], callback: Option<&'a mut dyn FnMut(f64)>) -> Self {
        Self {
            callback,
            total: tables.iter().map(|table| Self::work_of(table)).sum(),
            done: 0,
        }
    }

    /// No reporting
    pub fn silent() -> Self {
        Self {
            callback: None,
            total: 0,
            done: 0,
        }
    }

    /// Units of work for one table
    pub fn work_of(table: &Table) -> usize {
        (table.row_count() + 1) * table.column_count()
    }

    /// Record `units` finished cells
    pub fn advance(&mut self, units: usize) {
        if units == 0 || self.total == 0 {
            return;
        }
        self.done = (self.done + units).min(self.total);
        let fraction = Self::WRITE_SHARE * self.done as f64 / self.total as f64;
        self.report(fraction);
    }

    /// Report completion
    pub fn finish(&mut self) {
        self.done = self.total;
        self.report(1.0);
    }

    fn report(&mut self, fraction: f64) {
        if let Some(callback) = self.callback.as_deref_mut() {
            callback(fraction);
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render one table to a writer
    fn render_table(
        &self,
        table: &Table,
        progress: &mut Progress<'_>,
        writer: &mut dyn Write,
    ) -> Result<()>;

    /// Render several tables into one document
    fn render_workbook(
        &self,
        tables: &[&Table],
        progress: &mut Progress<'_>,
        writer: &mut dyn Write,
    ) -> Result<()> {
        for (i, table) in tables.iter().enumerate() {
            if i > 0 {
                writeln!(writer)?;
            }
            self.render_table(table, progress, writer)?;
        }
        Ok(())
    }
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on the configured format
    pub fn create(config: &Config) -> Box<dyn OutputFormatter> {
        match config.output_format {
            OutputFormat::Terminal => Box::new(TerminalOutput::new().with_color(config.color)),
            OutputFormat::Json => Box::new(if config.pretty {
                JsonOutput::new()
            } else {
                JsonOutput::compact()
            }),
            OutputFormat::Html => Box::new(HtmlOutput::new()),
            OutputFormat::Csv => Box::new(CsvOutput::new()),
            OutputFormat::Xlsx => Box::new(XlsxOutput::new()),
        }
    }
}

/// Export a single table
pub fn export_table(
    table: &Table,
    formatter: &dyn OutputFormatter,
    writer: &mut dyn Write,
    callback: Option<&mut dyn FnMut(f64)>,
) -> Result<()> {
    let mut progress = Progress::new(&[table], callback);
    info!(
        "exporting table '{}' ({} rows, {} columns)",
        table.name(),
        table.row_count(),
        table.column_count()
    );
    formatter.render_table(table, &mut progress, writer)?;
    writer.flush()?;
    progress.finish();
    Ok(())
}

/// Export several tables into one document
///
/// Table names must be unique; this is checked before anything is written.
pub fn export_workbook(
    tables: &[&Table],
    formatter: &dyn OutputFormatter,
    writer: &mut dyn Write,
    callback: Option<&mut dyn FnMut(f64)>,
) -> Result<()> {
    let mut seen = FxHashSet::default();
    for table in tables {
        if !seen.insert(table.name()) {
            bail!("Duplicate table name in workbook: {}", table.name());
        }
    }

    let mut progress = Progress::new(tables, callback);
    info!("exporting workbook of {} tables", tables.len());
    formatter.render_workbook(tables, &mut progress, writer)?;
    writer.flush()?;
    progress.finish();
    Ok(())
}

/// Export tables to the configured destination (file or stdout)
pub fn render(
    tables: &[&Table],
    config: &Config,
    callback: Option<&mut dyn FnMut(f64)>,
) -> Result<()> {
    match config.output {
        Some(ref path) => render_to_file(tables, config, path, callback),
        None => render_to_stdout(tables, config, callback),
    }
}

/// Export tables to stdout
pub fn render_to_stdout(
    tables: &[&Table],
    config: &Config,
    callback: Option<&mut dyn FnMut(f64)>,
) -> Result<()> {
    let formatter = OutputFactory::create(config);
    let stdout = std::io::stdout();
    let mut writer = stdout.lock();
    dispatch(tables, formatter.as_ref(), &mut writer, callback)
}

/// Export tables to a file
pub fn render_to_file(
    tables: &[&Table],
    config: &Config,
    path: &Path,
    callback: Option<&mut dyn FnMut(f64)>,
) -> Result<()> {
    let formatter = OutputFactory::create(config);
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    dispatch(tables, formatter.as_ref(), &mut writer, callback)
        .with_context(|| format!("Failed to write output file: {}", path.display()))
}

fn dispatch(
    tables: &[&Table],
    formatter: &dyn OutputFormatter,
    writer: &mut dyn Write,
    callback: Option<&mut dyn FnMut(f64)>,
) -> Result<()> {
    match tables {
        [table] => export_table(table, formatter, writer, callback),
        _ => export_workbook(tables, formatter, writer, callback),
    }
}
