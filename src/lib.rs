//! celltable - In-memory tables with typed columns
//!
//! Columns have a fixed value kind; rows and cells are reached through a
//! type-erased interface, and every write is checked against the kind of
//! its column.
//!
//! ```
//! use celltable::{CellValue, Table};
//!
//! let mut table = Table::new("people");
//! table.add_column("id", 0).unwrap();
//! table.add_column("label", "").unwrap();
//!
//! let mut row = table.create_row();
//! row.set("id", 5).unwrap();
//! row.set("label", "x").unwrap();
//! assert!(row.set("id", "five").is_err());
//!
//! assert_eq!(table.insert_row(&row).unwrap(), 2);
//! assert_eq!(table.row(0).unwrap().values(), vec![CellValue::Int(5), CellValue::from("x")]);
//! ```

pub mod config;
pub mod edit;
pub mod error;
pub mod loader;
pub mod model;
pub mod output;

pub use config::Config;
pub use error::{Result, TableError};
pub use model::{Cell, CellValue, Column, Row, Table, TypedValue, ValueKind};
