//! Core value and identifier types
//!
//! Values are the unit of storage in every column. They are hashable so a
//! value can key a hash index bucket directly.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{ColumnarError, Result};

/// Stable, monotonically assigned position of a row across all columns
pub type RowKey = u64;

/// Identifier of a client session. `NO_SESSION` marks committed data.
pub type SessionId = u32;

/// Owner id carried by committed rows
pub const NO_SESSION: SessionId = 0;

/// Identifier of a table inside an engine's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableId(pub u64);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A caller session. Cheap to copy; the id is all the storage layer needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Session {
    id: SessionId,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }
}

// =============================================================================
// Column Types
// =============================================================================

/// Declared type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Boolean,
    Int,
    BigInt,
    Double,
    Varchar,
}

/// Column definition inside a table descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

// =============================================================================
// Values
// =============================================================================

/// A single typed cell value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i32),
    BigInt(i64),
    Double(f64),
    Varchar(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Type of this value, `None` for NULL
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(ColumnType::Boolean),
            Value::Int(_) => Some(ColumnType::Int),
            Value::BigInt(_) => Some(ColumnType::BigInt),
            Value::Double(_) => Some(ColumnType::Double),
            Value::Varchar(_) => Some(ColumnType::Varchar),
        }
    }

    /// Convert to the given column type.
    ///
    /// NULL converts to anything. Narrowing conversions fail when the value
    /// does not fit.
    pub fn convert_to(&self, target: ColumnType) -> Result<Value> {
        if self.column_type().map_or(true, |t| t == target) {
            return Ok(self.clone());
        }

        let converted = match (self, target) {
            (_, ColumnType::Varchar) => Some(Value::Varchar(self.to_string())),

            (Value::Int(v), ColumnType::Boolean) => Some(Value::Boolean(*v != 0)),
            (Value::BigInt(v), ColumnType::Boolean) => Some(Value::Boolean(*v != 0)),
            (Value::Varchar(s), ColumnType::Boolean) => parse_bool(s).map(Value::Boolean),

            (Value::Boolean(b), ColumnType::Int) => Some(Value::Int(i32::from(*b))),
            (Value::BigInt(v), ColumnType::Int) => i32::try_from(*v).ok().map(Value::Int),
            (Value::Double(v), ColumnType::Int) => double_to_i64(*v)
                .and_then(|v| i32::try_from(v).ok())
                .map(Value::Int),
            (Value::Varchar(s), ColumnType::Int) => s.trim().parse().ok().map(Value::Int),

            (Value::Boolean(b), ColumnType::BigInt) => Some(Value::BigInt(i64::from(*b))),
            (Value::Int(v), ColumnType::BigInt) => Some(Value::BigInt(i64::from(*v))),
            (Value::Double(v), ColumnType::BigInt) => double_to_i64(*v).map(Value::BigInt),
            (Value::Varchar(s), ColumnType::BigInt) => s.trim().parse().ok().map(Value::BigInt),

            (Value::Boolean(b), ColumnType::Double) => Some(Value::Double(f64::from(u8::from(*b)))),
            (Value::Int(v), ColumnType::Double) => Some(Value::Double(f64::from(*v))),
            (Value::BigInt(v), ColumnType::Double) => Some(Value::Double(*v as f64)),
            (Value::Varchar(s), ColumnType::Double) => s.trim().parse().ok().map(Value::Double),

            _ => None,
        };

        converted.ok_or_else(|| ColumnarError::TypeConversion {
            value: self.to_string(),
            target,
        })
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "1" => Some(true),
        "false" | "f" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn double_to_i64(v: f64) -> Option<i64> {
    let rounded = v.round();
    if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
        Some(rounded as i64)
    } else {
        None
    }
}

// Doubles compare by bit pattern so that every value can key a bucket.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::Varchar(a), Value::Varchar(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Boolean(v) => v.hash(state),
            Value::Int(v) => v.hash(state),
            Value::BigInt(v) => v.hash(state),
            Value::Double(v) => v.to_bits().hash(state),
            Value::Varchar(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(v) => write!(f, "{}", if *v { "TRUE" } else { "FALSE" }),
            Value::Int(v) => write!(f, "{}", v),
            Value::BigInt(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Varchar(v) => write!(f, "{}", v),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Varchar(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Varchar(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
