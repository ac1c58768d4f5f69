//! Column descriptors

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::cell::Cell;
use super::value::{CellValue, ValueKind};

static NEXT_COLUMN_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a column descriptor
///
/// Two columns with the same name created at different times have
/// different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnId(u64);

impl ColumnId {
    fn next() -> Self {
        ColumnId(NEXT_COLUMN_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Column descriptor: name, value kind, and default value
///
/// The kind is taken from the default value and never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    id: ColumnId,
    name: String,
    default: CellValue,
}

impl Column {
    /// Create a column whose kind is the kind of `default`
    pub fn new(name: impl Into<String>, default: impl Into<CellValue>) -> Self {
        Self {
            id: ColumnId::next(),
            name: name.into(),
            default: default.into(),
        }
    }

    /// Create a column of `kind` holding that kind's zero value by default
    pub fn with_kind(name: impl Into<String>, kind: ValueKind) -> Self {
        Self::new(name, kind.default_value())
    }

    pub fn id(&self) -> ColumnId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.default.kind()
    }

    pub fn default_value(&self) -> &CellValue {
        &self.default
    }

    /// Create a cell bound to this column, holding the default value
    pub fn create_cell(self: &Arc<Self>) -> Cell {
        Cell::new(Arc::clone(self))
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.kind())
    }
}
