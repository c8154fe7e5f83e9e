//! Row representation
//!
//! A row is what the host hands to `add` and what a cursor yields back:
//! the column values plus the bookkeeping the storage layer attaches
//! (key, deleted flag, owning session).

use serde::{Deserialize, Serialize};

use crate::types::{RowKey, SessionId, Value, NO_SESSION};

/// Reserved key of the Tombstone sentinel. Never allocated to a real row.
pub const TOMBSTONE_KEY: RowKey = RowKey::MAX;

/// A row of typed values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    key: RowKey,
    values: Vec<Value>,
    deleted: bool,
    session_id: SessionId,
}

impl Row {
    /// Create a row that has not been stored yet (key 0 until `add`)
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            key: 0,
            values,
            deleted: false,
            session_id: NO_SESSION,
        }
    }

    /// Create a row with an already assigned key
    pub fn with_key(key: RowKey, values: Vec<Value>) -> Self {
        Self {
            key,
            ..Self::new(values)
        }
    }

    /// The sentinel returned in place of a removed row. Carries no values.
    pub fn tombstone() -> Self {
        Self::with_key(TOMBSTONE_KEY, Vec::new())
    }

    /// Build a search row for an equality probe on one column.
    /// All other columns are NULL.
    pub fn probe(column_count: usize, column_id: usize, value: Value) -> Self {
        let mut values = vec![Value::Null; column_count];
        if column_id < column_count {
            values[column_id] = value;
        }
        Self::new(values)
    }

    pub fn is_tombstone(&self) -> bool {
        self.key == TOMBSTONE_KEY
    }

    /// False while another session still owns the row as an uncommitted insert
    pub fn is_visible_to(&self, session_id: SessionId) -> bool {
        self.session_id == NO_SESSION || self.session_id == session_id
    }

    /// A row without column data (the tombstone, or a cleared slot)
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn key(&self) -> RowKey {
        self.key
    }

    pub fn set_key(&mut self, key: RowKey) {
        self.key = key;
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Value at a column position, `None` past the last column
    pub fn value(&self, column_id: usize) -> Option<&Value> {
        self.values.get(column_id)
    }

    pub fn column_count(&self) -> usize {
        self.values.len()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn set_deleted(&mut self, deleted: bool) {
        self.deleted = deleted;
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn set_session_id(&mut self, session_id: SessionId) {
        self.session_id = session_id;
    }

    /// Mark the row committed (no owning session)
    pub fn commit(&mut self) {
        self.session_id = NO_SESSION;
    }
}
