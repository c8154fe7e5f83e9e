//! Table Module
//!
//! A column-oriented in-memory table. Actual storage takes place in the
//! scan index; the table routes every change to all of its indexes.
//!
//! ## Responsibilities
//! - Coerce incoming values to the declared column types
//! - Keep the scan index and every hash index consistent
//! - Create, drop and rename secondary indexes
//! - Commit or roll back a session's pending changes
//!
//! ## Index Ordering
//! ```text
//! add_row:     scan (assigns key) ──► hash indexes
//! remove_row:  hash indexes ──► scan (tombstone)
//! ```

mod columnar;

pub use columnar::ColumnarTable;

use serde::{Deserialize, Serialize};

use crate::types::{ColumnDef, ColumnType};

/// Everything needed to create a table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    /// Requested persistence. Storage is memory-resident regardless.
    pub persist_data: bool,
}

impl TableDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            persist_data: false,
        }
    }

    /// Append a column
    pub fn column(mut self, name: impl Into<String>, column_type: ColumnType) -> Self {
        self.columns.push(ColumnDef::new(name, column_type));
        self
    }

    pub fn persist_data(mut self, persist: bool) -> Self {
        self.persist_data = persist;
        self
    }
}
