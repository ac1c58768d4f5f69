//! celltable - load, reshape, and export typed tables

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use celltable::config::{ColumnMove, ColumnSpec, Config, OutputFormat};
use celltable::edit::apply_edits;
use celltable::loader::LoaderFactory;
use celltable::output::render;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
    Html,
    Csv,
    Xlsx,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Html => OutputFormat::Html,
            CliOutputFormat::Csv => OutputFormat::Csv,
            CliOutputFormat::Xlsx => OutputFormat::Xlsx,
        }
    }
}

/// Load tabular files as typed tables, reshape them, and export them
#[derive(Parser, Debug)]
#[command(name = "celltable")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file(s) (CSV, TSV, JSON, Excel); several files export as one workbook
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliOutputFormat,

    /// Write output to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// For Excel files: which sheet to load
    #[arg(long)]
    sheet: Option<String>,

    /// Table name (defaults to the file stem or sheet name)
    #[arg(long)]
    name: Option<String>,

    /// Column(s) to remove (comma-separated)
    #[arg(long, value_delimiter = ',')]
    drop: Vec<String>,

    /// Column to append, as name:kind[=default] (kinds: bool, int, float, string, date, datetime)
    #[arg(long = "add")]
    add: Vec<ColumnSpec>,

    /// Move a column, as name=index
    #[arg(long = "move")]
    moves: Vec<ColumnMove>,

    /// Report export progress on stderr
    #[arg(long)]
    progress: bool,

    /// Compact JSON output
    #[arg(long)]
    compact: bool,

    /// Disable colored terminal output
    #[arg(long)]
    no_color: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if cli.name.is_some() && cli.files.len() > 1 {
        bail!("--name applies to a single input file, got {}", cli.files.len());
    }

    let config = Config {
        input: cli.files[0].clone(),
        output: cli.output,
        output_format: cli.format.into(),
        sheet_name: cli.sheet,
        table_name: cli.name,
        drop_columns: cli.drop,
        add_columns: cli.add,
        column_moves: cli.moves,
        color: !cli.no_color,
        show_progress: cli.progress,
        pretty: !cli.compact,
    };

    let factory = LoaderFactory::new();
    let mut tables = Vec::with_capacity(cli.files.len());
    for file in &cli.files {
        let file_config = Config {
            input: file.clone(),
            ..config.clone()
        };
        let mut table = factory
            .load_input(&file_config)
            .with_context(|| format!("Failed to load file: {}", file.display()))?;
        apply_edits(&mut table, &file_config)
            .with_context(|| format!("Failed to edit table: {}", table.name()))?;
        tables.push(table);
    }

    let tables: Vec<_> = tables.iter().collect();
    if config.show_progress {
        let mut report = |fraction: f64| {
            let mut stderr = std::io::stderr();
            let _ = write!(stderr, "\rProgress: {:5.1}%", fraction * 100.0);
            if fraction >= 1.0 {
                let _ = writeln!(stderr);
            }
        };
        render(&tables, &config, Some(&mut report))
    } else {
        render(&tables, &config, None)
    }
}
