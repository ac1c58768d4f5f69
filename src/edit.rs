//! Schema edits requested through configuration

use log::debug;

use crate::config::Config;
use crate::error::Result;
use crate::model::Table;

/// Apply the configured schema edits to a table
///
/// Drops run first, then additions, then moves in the order given, so a
/// move can target a column added in the same run.
pub fn apply_edits(table: &mut Table, config: &Config) -> Result<()> {
    for name in &config.drop_columns {
        table.remove_column(name)?;
    }

    for spec in &config.add_columns {
        table.add_column(spec.name.as_str(), spec.default.clone())?;
    }

    for mv in &config.column_moves {
        table.set_column_position(&mv.name, mv.index)?;
    }

    debug!(
        "table '{}': schema after edits: {:?}",
        table.name(),
        table.column_names()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnMove, ColumnSpec};
    use crate::error::TableError;
    use crate::model::CellValue;

    fn table() -> Table {
        let mut table = Table::new("t");
        table.add_column("a", 1).unwrap();
        table.add_column("b", "x").unwrap();
        let row = table.create_row();
        table.insert_row(&row).unwrap();
        table
    }

    #[test]
    fn test_drop_add_move() {
        let mut table = table();
        let config = Config::default()
            .with_drop_columns(vec!["a".to_string()])
            .with_add_columns(vec!["flag:bool=true".parse::<ColumnSpec>().unwrap()])
            .with_column_moves(vec!["flag=0".parse::<ColumnMove>().unwrap()]);

        apply_edits(&mut table, &config).unwrap();
        assert_eq!(table.column_names(), vec!["flag", "b"]);
        assert_eq!(
            table.row(0).unwrap().values(),
            vec![CellValue::Bool(true), CellValue::from("x")]
        );
    }

    #[test]
    fn test_unknown_drop_fails() {
        let mut table = table();
        let config = Config::default().with_drop_columns(vec!["zzz".to_string()]);
        assert_eq!(
            apply_edits(&mut table, &config).unwrap_err(),
            TableError::UnknownColumn("zzz".to_string())
        );
    }
}
