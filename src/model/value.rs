//! Cell values and their kinds

use std::borrow::Cow;
use std::hash::{Hash, Hasher};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// The kind of value a column accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    String,
    Date,
    DateTime,
}

impl ValueKind {
    /// All kinds, in declaration order
    pub const ALL: [ValueKind; 6] = [
        ValueKind::Bool,
        ValueKind::Int,
        ValueKind::Float,
        ValueKind::String,
        ValueKind::Date,
        ValueKind::DateTime,
    ];

    /// The zero value of this kind
    pub fn default_value(self) -> CellValue {
        match self {
            ValueKind::Bool => CellValue::Bool(false),
            ValueKind::Int => CellValue::Int(0),
            ValueKind::Float => CellValue::Float(0.0),
            ValueKind::String => CellValue::String(String::new()),
            ValueKind::Date => CellValue::Date(NaiveDate::default()),
            ValueKind::DateTime => CellValue::DateTime(NaiveDateTime::default()),
        }
    }

    /// Parse text into a value of exactly this kind
    pub fn parse(self, text: &str) -> Option<CellValue> {
        let trimmed = text.trim();
        match self {
            ValueKind::Bool => {
                if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("yes") {
                    Some(CellValue::Bool(true))
                } else if trimmed.eq_ignore_ascii_case("false")
                    || trimmed.eq_ignore_ascii_case("no")
                {
                    Some(CellValue::Bool(false))
                } else {
                    None
                }
            }
            ValueKind::Int => trimmed.parse::<i64>().ok().map(CellValue::Int),
            ValueKind::Float => trimmed.parse::<f64>().ok().map(CellValue::Float),
            ValueKind::String => Some(CellValue::String(text.to_string())),
            ValueKind::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .map(CellValue::Date),
            ValueKind::DateTime => NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S"))
                .ok()
                .map(CellValue::DateTime),
        }
    }

    /// Widen an inferred kind to accommodate another kind
    ///
    /// `None` means nothing has been seen yet.
    pub fn widen(current: Option<ValueKind>, other: ValueKind) -> ValueKind {
        let Some(current) = current else {
            return other;
        };
        if current == other {
            return current;
        }

        match (current, other) {
            (ValueKind::Int, ValueKind::Float) | (ValueKind::Float, ValueKind::Int) => {
                ValueKind::Float
            }
            (ValueKind::Date, ValueKind::DateTime) | (ValueKind::DateTime, ValueKind::Date) => {
                ValueKind::DateTime
            }
            _ => ValueKind::String,
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueKind::Bool => write!(f, "bool"),
            ValueKind::Int => write!(f, "int"),
            ValueKind::Float => write!(f, "float"),
            ValueKind::String => write!(f, "string"),
            ValueKind::Date => write!(f, "date"),
            ValueKind::DateTime => write!(f, "datetime"),
        }
    }
}

impl std::str::FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bool" => Ok(ValueKind::Bool),
            "int" => Ok(ValueKind::Int),
            "float" => Ok(ValueKind::Float),
            "string" => Ok(ValueKind::String),
            "date" => Ok(ValueKind::Date),
            "datetime" => Ok(ValueKind::DateTime),
            _ => Err(format!("Unknown value kind: {}", s)),
        }
    }
}

/// A single value, tagged with its kind
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Bool(b) => b.hash(state),
            CellValue::Int(i) => i.hash(state),
            // equal floats hash alike: -0.0 folds into 0.0, every NaN into one NaN
            CellValue::Float(f) => {
                let f = if *f == 0.0 {
                    0.0
                } else if f.is_nan() {
                    f64::NAN
                } else {
                    *f
                };
                f.to_bits().hash(state)
            }
            CellValue::String(s) => s.hash(state),
            CellValue::Date(d) => d.hash(state),
            CellValue::DateTime(dt) => dt.hash(state),
        }
    }
}

impl CellValue {
    /// The kind tag of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            CellValue::Bool(_) => ValueKind::Bool,
            CellValue::Int(_) => ValueKind::Int,
            CellValue::Float(_) => ValueKind::Float,
            CellValue::String(_) => ValueKind::String,
            CellValue::Date(_) => ValueKind::Date,
            CellValue::DateTime(_) => ValueKind::DateTime,
        }
    }

    /// Convert to a display string
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => Cow::Owned(f.to_string()),
            CellValue::String(s) => Cow::Borrowed(s.as_str()),
            CellValue::Date(d) => Cow::Owned(d.to_string()),
            CellValue::DateTime(dt) => Cow::Owned(dt.to_string()),
        }
    }

    /// Borrow the concrete value if it is of type `T`
    pub fn as_typed<T: TypedValue>(&self) -> Option<&T> {
        T::from_cell_value(self)
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Int(i64::from(i))
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

/// A Rust type that maps onto exactly one [`ValueKind`]
///
/// This is the statically-typed side of cell access: code that knows a
/// column's type reads and writes through `T` instead of [`CellValue`].
pub trait TypedValue: Into<CellValue> + Sized {
    const KIND: ValueKind;

    fn from_cell_value(value: &CellValue) -> Option<&Self>;
}

macro_rules! typed_value {
    ($ty:ty, $variant:ident) => {
        impl TypedValue for $ty {
            const KIND: ValueKind = ValueKind::$variant;

            fn from_cell_value(value: &CellValue) -> Option<&Self> {
                match value {
                    CellValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

typed_value!(bool, Bool);
typed_value!(i64, Int);
typed_value!(f64, Float);
typed_value!(String, String);
typed_value!(NaiveDate, Date);
typed_value!(NaiveDateTime, DateTime);
