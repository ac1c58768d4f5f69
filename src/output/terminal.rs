//! Box-drawn terminal output

use std::io::Write;

use anyhow::Result;
use termcolor::{Ansi, ColorSpec, NoColor, WriteColor};

use crate::model::Table;

use super::{OutputFormatter, Progress};

/// Terminal output with an optional bold header
pub struct TerminalOutput {
    color: bool,
}

impl TerminalOutput {
    pub fn new() -> Self {
        Self { color: true }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn write_table(
        &self,
        table: &Table,
        progress: &mut Progress<'_>,
        writer: &mut dyn WriteColor,
    ) -> Result<()> {
        writeln!(
            writer,
            "{} ({} rows × {} columns)",
            table.name(),
            table.row_count(),
            table.column_count()
        )?;

        if table.column_count() == 0 {
            writeln!(writer, "(no columns)")?;
            return Ok(());
        }

        let data: Vec<Vec<String>> = table
            .to_grid()
            .iter()
            .map(|values| values.iter().map(|v| v.display().into_owned()).collect())
            .collect();
        let widths = column_widths(&data);

        writeln!(writer, "{}", border(&widths, '┌', '┬', '┐'))?;

        // Header row
        if let Some(header) = data.first() {
            writer.set_color(ColorSpec::new().set_bold(true))?;
            write!(writer, "{}", line(header, &widths))?;
            writer.reset()?;
            writeln!(writer)?;
            progress.advance(header.len());
        }

        writeln!(writer, "{}", border(&widths, '├', '┼', '┤'))?;

        // Data rows
        for row in data.iter().skip(1) {
            writeln!(writer, "{}", line(row, &widths))?;
            progress.advance(row.len());
        }

        writeln!(writer, "{}", border(&widths, '└', '┴', '┘'))?;
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TerminalOutput {
    fn render_table(
        &self,
        table: &Table,
        progress: &mut Progress<'_>,
        writer: &mut dyn Write,
    ) -> Result<()> {
        if self.color {
            self.write_table(table, progress, &mut Ansi::new(writer))
        } else {
            self.write_table(table, progress, &mut NoColor::new(writer))
        }
    }
}

/// Widest value per column, in characters
fn column_widths(data: &[Vec<String>]) -> Vec<usize> {
    let col_count = data.first().map_or(0, Vec::len);
    let mut widths = vec![0; col_count];
    for row in data {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }
    widths
}

fn border(widths: &[usize], left: char, middle: char, right: char) -> String {
    let mut output = String::new();
    output.push(left);
    for (i, width) in widths.iter().enumerate() {
        output.push_str(&"─".repeat(width + 2));
        if i < widths.len() - 1 {
            output.push(middle);
        }
    }
    output.push(right);
    output
}

fn line(cells: &[String], widths: &[usize]) -> String {
    let mut output = String::from("│");
    for (i, cell) in cells.iter().enumerate() {
        let width = widths.get(i).copied().unwrap_or(0);
        output.push_str(&format!(" {:width$} │", cell, width = width));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::super::test_support::sample_table;
    use super::*;

    fn render(output: &TerminalOutput, table: &Table) -> String {
        let mut out = Vec::new();
        output
            .render_table(table, &mut Progress::silent(), &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_plain_box() {
        let table = sample_table("people");
        let text = render(&TerminalOutput::new().with_color(false), &table);

        let expected = "\
people (2 rows × 2 columns)
┌────┬────────┐
│ id │ label  │
├────┼────────┤
│ 1  │ alpha  │
│ 2  │ <beta> │
└────┴────────┘
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_colored_header_uses_ansi() {
        let table = sample_table("people");
        let text = render(&TerminalOutput::new(), &table);
        assert!(text.contains("\x1b["));
        assert!(text.contains("│ 2  │ <beta> │"));
    }

    #[test]
    fn test_no_columns() {
        let table = Table::new("empty");
        let text = render(&TerminalOutput::new().with_color(false), &table);
        assert_eq!(text, "empty (0 rows × 0 columns)\n(no columns)\n");
    }
}
