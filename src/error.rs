//! Error types for AtlasCol
//!
//! Provides a unified error type for all table and index operations.

use thiserror::Error;

use crate::types::{ColumnType, RowKey, TableId};

/// Result type alias using ColumnarError
pub type Result<T> = std::result::Result<T, ColumnarError>;

/// Unified error type for AtlasCol operations
#[derive(Debug, Error)]
pub enum ColumnarError {
    // -------------------------------------------------------------------------
    // Row Errors
    // -------------------------------------------------------------------------
    #[error("Row not found: key {0}")]
    RowNotFound(RowKey),

    /// A delete targeted a key outside the allocated key space, or a slot
    /// that was already tombstoned. Unreachable with a well-behaved caller.
    #[error("Row not found when deleting: key {key} (allocated keys: {allocated})")]
    RowNotFoundWhenDeleting { key: RowKey, allocated: u64 },

    #[error("Column count mismatch: expected {expected}, got {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },

    #[error("Cannot convert {value} to {target:?}")]
    TypeConversion { value: String, target: ColumnType },

    // -------------------------------------------------------------------------
    // Schema Errors
    // -------------------------------------------------------------------------
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Index not found: {0}")]
    IndexNotFound(String),

    #[error("Index already exists: {0}")]
    DuplicateIndex(String),

    #[error("Table not found: {0}")]
    TableNotFound(TableId),

    #[error("Table already exists: {0}")]
    DuplicateTable(String),

    // -------------------------------------------------------------------------
    // Contract Errors
    // -------------------------------------------------------------------------
    #[error("Feature not supported: {0}")]
    Unsupported(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
