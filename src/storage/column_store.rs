//! Column store implementation
//!
//! One `Vec<Value>` per column, indexed by row key.

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::error::{ColumnarError, Result};
use crate::row::Row;
use crate::types::{RowKey, Value};

/// Positional row storage transposed into column arrays
///
/// ## Invariants
/// - Every column sequence has exactly `next_key` entries
/// - A key in `tombstones` always reads back as the Tombstone sentinel
/// - `next_key` only grows, except on `truncate`
#[derive(Debug)]
pub struct ColumnStore {
    /// Column names, in table column order
    column_names: Vec<String>,

    /// One sequence per column, parallel to `column_names`
    columns: Vec<Vec<Value>>,

    /// Logically removed keys
    tombstones: HashSet<RowKey>,

    /// Next key to allocate (= length of every column)
    next_key: RowKey,

    /// Approximate bytes held by live values
    memory_used: usize,
}

impl ColumnStore {
    /// Create an empty store with the given column names
    pub fn new(column_names: Vec<String>) -> Self {
        let columns = column_names.iter().map(|_| Vec::new()).collect();
        Self {
            column_names,
            columns,
            tombstones: HashSet::new(),
            next_key: 0,
            memory_used: 0,
        }
    }

    /// Append a row, returning its newly assigned key
    pub fn add(&mut self, values: Vec<Value>) -> Result<RowKey> {
        if values.len() != self.columns.len() {
            return Err(ColumnarError::ColumnCountMismatch {
                expected: self.columns.len(),
                actual: values.len(),
            });
        }

        let key = self.next_key;
        for (column, value) in self.columns.iter_mut().zip(values) {
            self.memory_used += value_size(&value);
            column.push(value);
        }
        self.next_key += 1;

        Ok(key)
    }

    /// Reconstruct the row stored at `key`
    ///
    /// Returns:
    /// - `None`: key was never allocated (end of key space)
    /// - `Some(tombstone)`: key was removed
    /// - `Some(row)`: live row
    pub fn get_row(&self, key: RowKey) -> Option<Row> {
        if key >= self.next_key {
            return None;
        }
        if self.tombstones.contains(&key) {
            return Some(Row::tombstone());
        }

        let pos = key as usize;
        let values = self
            .columns
            .iter()
            .map(|column| column[pos].clone())
            .collect();

        Some(Row::with_key(key, values))
    }

    /// Tombstone `key` and clear its slot in every column
    pub fn remove(&mut self, key: RowKey) -> Result<()> {
        if key >= self.next_key || self.tombstones.contains(&key) {
            return Err(ColumnarError::RowNotFoundWhenDeleting {
                key,
                allocated: self.next_key,
            });
        }

        self.tombstones.insert(key);
        let pos = key as usize;
        for column in &mut self.columns {
            let old = std::mem::replace(&mut column[pos], Value::Null);
            self.memory_used -= value_size(&old);
        }

        Ok(())
    }

    /// Drop every row and restart keys at 0
    pub fn truncate(&mut self) {
        for column in &mut self.columns {
            column.clear();
        }
        self.tombstones.clear();
        self.next_key = 0;
        self.memory_used = 0;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn next_key(&self) -> RowKey {
        self.next_key
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Raw sequence for a column, cleared slots included
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        let pos = self.column_names.iter().position(|n| n == name)?;
        Some(&self.columns[pos])
    }

    pub fn is_removed(&self, key: RowKey) -> bool {
        self.tombstones.contains(&key)
    }

    pub fn tombstone_count(&self) -> usize {
        self.tombstones.len()
    }

    /// Number of allocated keys that are not tombstoned
    pub fn live_count(&self) -> u64 {
        self.next_key - self.tombstones.len() as u64
    }

    pub fn memory_used(&self) -> usize {
        self.memory_used
    }

    /// Render every column sequence, one line per column
    pub fn dump(&self) -> String {
        let mut out = String::from("columnStore: [\n");
        for (name, column) in self.column_names.iter().zip(&self.columns) {
            let cells: Vec<String> = column.iter().map(ToString::to_string).collect();
            let _ = writeln!(out, "  {}: [{}]", name, cells.join(", "));
        }
        out.push(']');
        out
    }
}

/// Serialized size of a value, used as its memory estimate
fn value_size(value: &Value) -> usize {
    bincode::serialized_size(value).map_or(0, |n| n as usize)
}
