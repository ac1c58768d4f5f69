//! Data model: values, columns, cells, rows, and tables

mod cell;
mod column;
mod row;
mod table;
mod value;

pub use cell::Cell;
pub use column::{Column, ColumnId};
pub use row::{Row, RowId};
pub use table::Table;
pub use value::{CellValue, TypedValue, ValueKind};
