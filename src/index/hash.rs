//! Columnar hash index
//!
//! Equality lookups on a single column. Buckets map a column value to the
//! keys of the rows holding it, in insertion order.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::{ColumnarError, Result};
use crate::row::Row;
use crate::types::{ColumnType, RowKey, Session, TableId, Value};

use super::{Cursor, Index, IndexCondition, IndexType, RowSource, SingleRowCursor, UNUSABLE_COST};

/// Secondary equality index on one column
///
/// ## Invariants
/// - A row key sits in at most one bucket: the one for its current value
/// - Empty buckets are removed
pub struct HashIndex {
    table: TableId,
    name: String,

    /// Position of the indexed column in the table
    column_id: usize,
    column_type: ColumnType,

    buckets: HashMap<Value, Vec<RowKey>>,
    row_count: u64,
}

impl HashIndex {
    pub fn new(table: TableId, name: &str, column_id: usize, column_type: ColumnType) -> Self {
        info!(table = %table, name, column_id, "creating columnar hash index");

        Self {
            table,
            name: name.to_string(),
            column_id,
            column_type,
            buckets: HashMap::new(),
            row_count: 0,
        }
    }

    /// Keys stored under `value`, in insertion order
    pub fn bucket(&self, value: &Value) -> Option<&[RowKey]> {
        self.buckets.get(value).map(Vec::as_slice)
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn column_id(&self) -> usize {
        self.column_id
    }

    pub fn table(&self) -> TableId {
        self.table
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn clear(&mut self) {
        self.buckets.clear();
        self.row_count = 0;
    }

    fn indexed_value<'r>(&self, row: &'r Row) -> Result<&'r Value> {
        row.value(self.column_id).ok_or_else(|| {
            ColumnarError::Internal(format!(
                "row {} has no column {} for index {}",
                row.key(),
                self.column_id,
                self.name
            ))
        })
    }
}

impl Index for HashIndex {
    fn name(&self) -> &str {
        &self.name
    }

    fn index_type(&self) -> IndexType {
        IndexType::Hash
    }

    fn column_ids(&self) -> Vec<usize> {
        vec![self.column_id]
    }

    fn add(&mut self, _session: &Session, row: &mut Row) -> Result<()> {
        let value = self.indexed_value(row)?.clone();
        self.buckets.entry(value).or_default().push(row.key());
        self.row_count += 1;
        Ok(())
    }

    fn remove(&mut self, _session: &Session, row: &Row) -> Result<()> {
        let value = self.indexed_value(row)?;
        if let Some(bucket) = self.buckets.get_mut(value) {
            if let Some(pos) = bucket.iter().position(|&k| k == row.key()) {
                bucket.remove(pos);
                self.row_count -= 1;
            }
            if bucket.is_empty() {
                self.buckets.remove(value);
            }
        }
        Ok(())
    }

    /// Equality lookup. Only the first key of the matching bucket is
    /// returned; later rows sharing the value are not reachable here.
    fn find<'a>(
        &'a self,
        session: &Session,
        rows: &'a dyn RowSource,
        first: Option<&Row>,
        last: Option<&Row>,
    ) -> Result<Box<dyn Cursor + 'a>> {
        let (first, _last) = match (first, last) {
            (Some(first), Some(last)) => (first, last),
            (first, last) => {
                return Err(ColumnarError::Internal(format!(
                    "hash index {} needs both bounds: {:?} {:?}",
                    self.name, first, last
                )))
            }
        };

        // the probe may arrive as a different type (int for a bigint column)
        let probe = self.indexed_value(first)?.convert_to(self.column_type)?;

        let row = self
            .buckets
            .get(&probe)
            .and_then(|bucket| bucket.first())
            .and_then(|&key| rows.get_row(session, key))
            .filter(|row| !row.is_tombstone() && row.is_visible_to(session.id()));

        debug!(index = %self.name, probe = %probe, found = row.is_some(), "hash lookup");
        Ok(Box::new(SingleRowCursor::new(row)))
    }

    fn get_cost(&self, _session: &Session, masks: Option<&[u32]>) -> f64 {
        let equality = masks
            .and_then(|masks| masks.get(self.column_id))
            .map_or(false, |&mask| {
                mask & IndexCondition::EQUALITY == IndexCondition::EQUALITY
            });

        if equality {
            2.0
        } else {
            UNUSABLE_COST
        }
    }

    fn get_row_count(&self, _session: &Session) -> u64 {
        self.get_row_count_approximation()
    }

    fn get_row_count_approximation(&self) -> u64 {
        self.row_count
    }

    fn truncate(&mut self, _session: &Session) {
        self.clear();
    }

    fn remove_index(&mut self, _session: &Session) {
        self.clear();
    }

    fn close(&mut self, _session: &Session) {
        self.clear();
    }

    fn check_rename(&self) -> Result<()> {
        // always permitted
        Ok(())
    }

    fn need_rebuild(&self) -> bool {
        true
    }

    fn find_first_or_last<'a>(
        &'a self,
        _session: &Session,
        _first: bool,
    ) -> Result<Box<dyn Cursor + 'a>> {
        Err(ColumnarError::Unsupported("ColumnarHash".to_string()))
    }

    fn can_scan(&self) -> bool {
        false
    }

    fn plan_sql(&self) -> String {
        self.name.clone()
    }
}
