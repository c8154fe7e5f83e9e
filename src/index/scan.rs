//! Columnar scan index
//!
//! Although it is called an index, a scan index is only an iterator over
//! the table's physical storage. It cannot look rows up by value.

use std::collections::btree_map;

use tracing::{debug, info, trace};

use crate::config::Config;
use crate::error::{ColumnarError, Result};
use crate::mvcc::{Operation, VersionTracker};
use crate::row::Row;
use crate::storage::ColumnStore;
use crate::types::{RowKey, Session, TableId};

use super::{Cursor, Index, IndexType, RowSource, ScanCursor};

/// Primary index: owns the column store and the version tracker
pub struct ScanIndex {
    table: TableId,
    table_name: String,
    name: String,

    store: ColumnStore,
    tracker: VersionTracker,

    /// Rows added minus rows removed, all sessions included
    row_count: u64,

    multi_version: bool,
    debug_dump: bool,
    cost_row_offset: f64,
}

impl ScanIndex {
    pub fn new(
        table: TableId,
        table_name: &str,
        column_names: Vec<String>,
        config: &Config,
    ) -> Self {
        info!(table = %table, name = table_name, "creating columnar scan index");

        Self {
            table,
            table_name: table_name.to_string(),
            name: format!("{}_DATA", table_name),
            store: ColumnStore::new(column_names),
            tracker: VersionTracker::new(config.multi_version),
            row_count: 0,
            multi_version: config.multi_version,
            debug_dump: config.debug_dump,
            cost_row_offset: config.cost_row_offset,
        }
    }

    /// Reconstruct the row at `key`
    ///
    /// In multi-version mode a row still pending as an insert carries the
    /// id of the session that inserted it.
    pub fn get_row(&self, key: RowKey) -> Option<Row> {
        let mut row = self.store.get_row(key)?;
        if self.debug_dump {
            debug!(key, row = ?row.values(), "get_row");
        }
        if let Some(pending) = self.tracker.pending(key) {
            if !pending.is_deleted() && !row.is_tombstone() {
                row.set_session_id(pending.session_id());
            }
        }
        Some(row)
    }

    /// Next stored row after `row` (or the first one when `row` is `None`),
    /// skipping tombstones and cleared slots
    pub fn get_next_row(&self, row: Option<&Row>) -> Option<Row> {
        let mut key = row.map_or(0, |r| r.key() + 1);
        loop {
            let next = self.get_row(key)?;
            if !next.is_empty() && !next.is_tombstone() {
                return Some(next);
            }
            key += 1;
        }
    }

    /// Pending delta rows, in key order
    pub fn delta(&self) -> btree_map::Values<'_, RowKey, Row> {
        self.tracker.delta()
    }

    /// Pending rows owned by one session
    pub fn pending_for(&self, session: &Session) -> Vec<Row> {
        self.tracker.pending_for(session.id())
    }

    /// Open a cursor without going through the `Index` trait
    pub fn scan(&self, session: &Session) -> ScanCursor<'_> {
        ScanCursor::new(*session, self, self.multi_version)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn table(&self) -> TableId {
        self.table
    }

    pub fn store(&self) -> &ColumnStore {
        &self.store
    }

    pub fn tracker(&self) -> &VersionTracker {
        &self.tracker
    }

    pub fn is_multi_version(&self) -> bool {
        self.multi_version
    }

    pub fn next_key(&self) -> RowKey {
        self.store.next_key()
    }

    pub fn memory_used(&self) -> usize {
        self.store.memory_used()
    }
}

impl RowSource for ScanIndex {
    fn get_row(&self, _session: &Session, key: RowKey) -> Option<Row> {
        ScanIndex::get_row(self, key)
    }
}

impl Index for ScanIndex {
    fn name(&self) -> &str {
        &self.name
    }

    fn index_type(&self) -> IndexType {
        IndexType::Scan
    }

    fn column_ids(&self) -> Vec<usize> {
        // the scan index cannot use any column
        Vec::new()
    }

    fn add(&mut self, session: &Session, row: &mut Row) -> Result<()> {
        let key = self.store.add(row.values().to_vec())?;
        row.set_key(key);
        row.set_deleted(false);

        if self.debug_dump {
            trace!("{}", self.store.dump());
        }

        if self.multi_version {
            row.set_session_id(session.id());
            self.tracker.record_add(session, row);
        }
        self.row_count += 1;
        Ok(())
    }

    fn remove(&mut self, session: &Session, row: &Row) -> Result<()> {
        self.store.remove(row.key())?;
        debug!(table = %self.table, key = row.key(), session = session.id(), "row removed");

        if self.multi_version {
            let mut removed = row.clone();
            removed.set_session_id(session.id());
            self.tracker.record_remove(session, &removed);
        }
        self.row_count -= 1;
        Ok(())
    }

    fn find<'a>(
        &'a self,
        session: &Session,
        _rows: &'a dyn RowSource,
        _first: Option<&Row>,
        _last: Option<&Row>,
    ) -> Result<Box<dyn Cursor + 'a>> {
        Ok(Box::new(self.scan(session)))
    }

    fn get_cost(&self, _session: &Session, _masks: Option<&[u32]>) -> f64 {
        self.row_count as f64 + self.cost_row_offset
    }

    fn get_row_count(&self, session: &Session) -> u64 {
        self.tracker.row_count(session, self.row_count)
    }

    fn get_row_count_approximation(&self) -> u64 {
        self.row_count
    }

    fn truncate(&mut self, _session: &Session) {
        info!(table = %self.table, name = %self.name, "truncating scan index");
        self.store.truncate();
        self.tracker.clear();
        self.row_count = 0;
    }

    fn remove_index(&mut self, session: &Session) {
        self.truncate(session);
    }

    fn close(&mut self, _session: &Session) {
        // nothing to do
    }

    fn commit(&mut self, operation: Operation, row: &Row) {
        self.tracker.commit(operation, row);
    }

    fn check_rename(&self) -> Result<()> {
        Err(ColumnarError::Unsupported("SCAN".to_string()))
    }

    fn need_rebuild(&self) -> bool {
        false
    }

    fn find_first_or_last<'a>(
        &'a self,
        _session: &Session,
        _first: bool,
    ) -> Result<Box<dyn Cursor + 'a>> {
        Err(ColumnarError::Unsupported("SCAN".to_string()))
    }

    fn can_scan(&self) -> bool {
        true
    }

    fn plan_sql(&self) -> String {
        format!("{}.tableScan", self.table_name)
    }
}
