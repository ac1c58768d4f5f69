//! HTML page output

use std::io::Write;

use anyhow::Result;

use crate::model::Table;

use super::{OutputFormatter, Progress};

/// Standalone HTML page with one `<table>` per exported table
pub struct HtmlOutput;

impl HtmlOutput {
    pub fn new() -> Self {
        Self
    }

    fn write_page(
        &self,
        title: &str,
        tables: &[&Table],
        progress: &mut Progress<'_>,
        writer: &mut dyn Write,
    ) -> Result<()> {
        writeln!(writer, "<!DOCTYPE html>")?;
        writeln!(writer, "<html lang=\"en\">")?;
        writeln!(writer, "<head>")?;
        writeln!(writer, "  <meta charset=\"UTF-8\">")?;
        writeln!(writer, "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">")?;
        writeln!(writer, "  <title>{}</title>", html_escape(title))?;
        writeln!(writer, "  <style>")?;
        writeln!(writer, "{}", CSS_STYLES)?;
        writeln!(writer, "  </style>")?;
        writeln!(writer, "</head>")?;
        writeln!(writer, "<body>")?;

        for table in tables {
            write_section(writer, table, progress)?;
        }

        writeln!(writer, "</body>")?;
        writeln!(writer, "</html>")?;
        Ok(())
    }
}

impl Default for HtmlOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for HtmlOutput {
    fn render_table(
        &self,
        table: &Table,
        progress: &mut Progress<'_>,
        writer: &mut dyn Write,
    ) -> Result<()> {
        self.write_page(table.name(), &[table], progress, writer)
    }

    fn render_workbook(
        &self,
        tables: &[&Table],
        progress: &mut Progress<'_>,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let title = tables
            .iter()
            .map(|table| table.name())
            .collect::<Vec<_>>()
            .join(", ");
        self.write_page(&title, tables, progress, writer)
    }
}

fn write_section(writer: &mut dyn Write, table: &Table, progress: &mut Progress<'_>) -> Result<()> {
    let grid = table.to_grid();

    writeln!(writer, "  <div class=\"section\">")?;
    writeln!(writer, "    <h2>{}</h2>", html_escape(table.name()))?;
    writeln!(writer, "    <table>")?;

    // Header
    if let Some(header) = grid.first() {
        writeln!(writer, "      <tr>")?;
        for (name, column) in header.iter().zip(table.columns()) {
            writeln!(
                writer,
                "        <th title=\"{}\">{}</th>",
                column.kind(),
                html_escape(name.display())
            )?;
        }
        writeln!(writer, "      </tr>")?;
        progress.advance(header.len());
    }

    // Rows
    for row in grid.iter().skip(1) {
        writeln!(writer, "      <tr>")?;
        for value in row {
            writeln!(writer, "        <td>{}</td>", html_escape(value.display()))?;
        }
        writeln!(writer, "      </tr>")?;
        progress.advance(row.len());
    }

    writeln!(writer, "    </table>")?;
    writeln!(writer, "  </div>")?;
    Ok(())
}

fn html_escape(s: impl AsRef<str>) -> String {
    s.as_ref()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const CSS_STYLES: &str = r#"
    :root {
      --bg: #1a1b26;
      --fg: #a9b1d6;
      --accent: #7aa2f7;
      --border: #414868;
    }

    * { box-sizing: border-box; margin: 0; padding: 0; }

    body {
      font-family: 'JetBrains Mono', 'Fira Code', monospace;
      background: var(--bg);
      color: var(--fg);
      padding: 2rem;
      line-height: 1.6;
    }

    .section {
      margin-bottom: 2rem;
    }

    .section h2 {
      color: var(--accent);
      font-size: 1.25rem;
      margin-bottom: 1rem;
      padding-bottom: 0.5rem;
      border-bottom: 1px solid var(--border);
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th, td {
      text-align: center;
      vertical-align: middle;
      padding: 0.75rem;
      border: 1px solid var(--border);
    }

    th {
      background: rgba(255,255,255,0.05);
      border-bottom: 3px double var(--fg);
      font-weight: 600;
    }
"#;
