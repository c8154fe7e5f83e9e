//! Columnar table implementation

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ColumnarError, Result};
use crate::index::{Cursor, HashIndex, Index, ScanCursor, ScanIndex};
use crate::mvcc::Operation;
use crate::row::Row;
use crate::types::{ColumnDef, RowKey, Session, TableId, Value};

use super::TableDescriptor;

/// In-memory table storing its data column by column
///
/// The table holds no lock of its own. Callers serialize structural
/// changes (add, remove, truncate) against readers; the engine does this
/// by keeping each table behind a `RwLock`.
pub struct ColumnarTable {
    id: TableId,
    name: String,
    columns: Vec<ColumnDef>,
    multi_version: bool,

    /// Mandatory primary index, owns the storage
    scan: ScanIndex,

    /// Secondary equality indexes
    hash_indexes: Vec<HashIndex>,
}

impl ColumnarTable {
    /// Create an empty table from a descriptor
    pub fn new(id: TableId, descriptor: TableDescriptor, config: &Config) -> Self {
        info!(table = %id, name = %descriptor.name, columns = descriptor.columns.len(), "creating columnar table");

        if descriptor.persist_data {
            warn!(name = %descriptor.name, "persistence requested, table stays in memory");
        }

        let column_names = descriptor.columns.iter().map(|c| c.name.clone()).collect();
        let scan = ScanIndex::new(id, &descriptor.name, column_names, config);

        Self {
            id,
            name: descriptor.name,
            columns: descriptor.columns,
            multi_version: config.multi_version,
            scan,
            hash_indexes: Vec::new(),
        }
    }

    // =========================================================================
    // Row Operations
    // =========================================================================

    /// Insert a row, returning its key
    pub fn add_row(&mut self, session: &Session, values: Vec<Value>) -> Result<RowKey> {
        if values.len() != self.columns.len() {
            return Err(ColumnarError::ColumnCountMismatch {
                expected: self.columns.len(),
                actual: values.len(),
            });
        }

        let values = values
            .iter()
            .zip(&self.columns)
            .map(|(value, column)| value.convert_to(column.column_type))
            .collect::<Result<Vec<_>>>()?;

        let mut row = Row::new(values);
        self.scan.add(session, &mut row)?;
        for index in &mut self.hash_indexes {
            index.add(session, &mut row)?;
        }

        Ok(row.key())
    }

    /// Remove the row at `key`, returning its last values
    pub fn remove_row(&mut self, session: &Session, key: RowKey) -> Result<Row> {
        let row = self
            .scan
            .get_row(key)
            .filter(|row| !row.is_tombstone())
            .ok_or(ColumnarError::RowNotFoundWhenDeleting {
                key,
                allocated: self.scan.next_key(),
            })?;

        for index in &mut self.hash_indexes {
            index.remove(session, &row)?;
        }
        self.scan.remove(session, &row)?;

        Ok(row)
    }

    /// Row at `key`; the Tombstone sentinel if it was removed
    pub fn get_row(&self, _session: &Session, key: RowKey) -> Result<Row> {
        self.scan.get_row(key).ok_or(ColumnarError::RowNotFound(key))
    }

    /// Full scan in key order
    pub fn scan(&self, session: &Session) -> ScanCursor<'_> {
        self.scan.scan(session)
    }

    /// Open a cursor on the named index
    pub fn find(
        &self,
        session: &Session,
        index_name: &str,
        first: Option<&Row>,
        last: Option<&Row>,
    ) -> Result<Box<dyn Cursor + '_>> {
        let index = self.index(index_name)?;
        index.find(session, &self.scan, first, last)
    }

    /// Equality lookup through the hash index on `column`
    pub fn find_equal(&self, session: &Session, column: &str, value: Value) -> Result<Option<Row>> {
        let column_id = self.column_id(column)?;
        let index = self
            .hash_indexes
            .iter()
            .find(|index| index.column_id() == column_id)
            .ok_or_else(|| ColumnarError::IndexNotFound(format!("hash index on {}", column)))?;

        let probe = Row::probe(self.columns.len(), column_id, value);
        let mut cursor = index.find(session, &self.scan, Some(&probe), Some(&probe))?;
        let found = if cursor.next() { cursor.get().cloned() } else { None };
        Ok(found)
    }

    // =========================================================================
    // Transaction Operations
    // =========================================================================

    /// Make every pending change of `session` visible to all sessions
    ///
    /// Returns the number of rows committed.
    pub fn commit(&mut self, session: &Session) -> usize {
        let pending = self.scan.pending_for(session);
        for row in &pending {
            self.commit_row(pending_operation(row), row);
        }
        debug!(table = %self.id, session = session.id(), rows = pending.len(), "session committed");
        pending.len()
    }

    /// Undo every pending change of `session`
    ///
    /// Pending inserts are removed again. Pending deletes are re-inserted
    /// under fresh keys and committed straight away. Returns the number of
    /// rows rolled back.
    pub fn rollback(&mut self, session: &Session) -> Result<usize> {
        let pending = self.scan.pending_for(session);
        for row in &pending {
            match pending_operation(row) {
                Operation::Insert => {
                    self.remove_row(session, row.key())?;
                }
                Operation::Delete => {
                    let key = self.add_row(session, row.values().to_vec())?;
                    let restored = self.get_row(session, key)?;
                    self.commit_row(Operation::Insert, &restored);
                    self.commit_row(Operation::Delete, row);
                }
            }
        }
        debug!(table = %self.id, session = session.id(), rows = pending.len(), "session rolled back");
        Ok(pending.len())
    }

    fn commit_row(&mut self, operation: Operation, row: &Row) {
        self.scan.commit(operation, row);
        for index in &mut self.hash_indexes {
            index.commit(operation, row);
        }
    }

    // =========================================================================
    // Index Management
    // =========================================================================

    /// Create a hash index on `column` and fill it from the stored rows
    pub fn add_index(&mut self, session: &Session, name: &str, column: &str) -> Result<()> {
        if self.has_index(name) {
            return Err(ColumnarError::DuplicateIndex(name.to_string()));
        }

        let column_id = self.column_id(column)?;
        let column_type = self.columns[column_id].column_type;
        let mut index = HashIndex::new(self.id, name, column_id, column_type);

        let mut cursor_row: Option<Row> = None;
        while let Some(row) = self.scan.get_next_row(cursor_row.as_ref()) {
            let mut entry = row.clone();
            index.add(session, &mut entry)?;
            cursor_row = Some(row);
        }

        info!(table = %self.id, index = name, column, rows = index.get_row_count_approximation(), "index added");
        self.hash_indexes.push(index);
        Ok(())
    }

    /// Drop a secondary index. The scan index cannot be dropped.
    pub fn drop_index(&mut self, session: &Session, name: &str) -> Result<()> {
        if name == self.scan.name() {
            return Err(ColumnarError::Unsupported(format!("drop {}", name)));
        }
        let pos = self.hash_index_position(name)?;
        let mut index = self.hash_indexes.remove(pos);
        index.remove_index(session);
        info!(table = %self.id, index = name, "index dropped");
        Ok(())
    }

    /// Rename an index, if the index permits it
    pub fn rename_index(&mut self, name: &str, new_name: &str) -> Result<()> {
        if name == self.scan.name() {
            return self.scan.check_rename();
        }
        if self.has_index(new_name) {
            return Err(ColumnarError::DuplicateIndex(new_name.to_string()));
        }
        let pos = self.hash_index_position(name)?;
        let index = &mut self.hash_indexes[pos];
        index.check_rename()?;
        index.set_name(new_name);
        Ok(())
    }

    /// Look an index up by name
    pub fn index(&self, name: &str) -> Result<&dyn Index> {
        if name == self.scan.name() {
            return Ok(&self.scan);
        }
        self.hash_indexes
            .iter()
            .find(|index| index.name() == name)
            .map(|index| index as &dyn Index)
            .ok_or_else(|| ColumnarError::IndexNotFound(name.to_string()))
    }

    /// All indexes, scan index first. This is what a planner ranks.
    pub fn indexes(&self) -> Vec<&dyn Index> {
        let mut indexes: Vec<&dyn Index> = vec![&self.scan];
        indexes.extend(self.hash_indexes.iter().map(|index| index as &dyn Index));
        indexes
    }

    pub fn hash_index(&self, name: &str) -> Option<&HashIndex> {
        self.hash_indexes.iter().find(|index| index.name() == name)
    }

    fn has_index(&self, name: &str) -> bool {
        name == self.scan.name() || self.hash_index(name).is_some()
    }

    fn hash_index_position(&self, name: &str) -> Result<usize> {
        self.hash_indexes
            .iter()
            .position(|index| index.name() == name)
            .ok_or_else(|| ColumnarError::IndexNotFound(name.to_string()))
    }

    // =========================================================================
    // Table Lifecycle
    // =========================================================================

    /// Remove every row from every index; keys restart at 0
    pub fn truncate(&mut self, session: &Session) {
        self.scan.truncate(session);
        for index in &mut self.hash_indexes {
            index.truncate(session);
        }
    }

    pub fn close(&mut self, session: &Session) {
        self.scan.close(session);
        for index in &mut self.hash_indexes {
            index.close(session);
        }
    }

    /// Drop all indexes along with their data
    pub fn remove(&mut self, session: &Session) {
        for index in &mut self.hash_indexes {
            index.remove_index(session);
        }
        self.hash_indexes.clear();
        self.scan.remove_index(session);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Position of a column by name (case-insensitive)
    pub fn column_id(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(column))
            .ok_or_else(|| ColumnarError::ColumnNotFound(column.to_string()))
    }

    pub fn is_multi_version(&self) -> bool {
        self.multi_version
    }

    pub fn scan_index(&self) -> &ScanIndex {
        &self.scan
    }

    /// Row count as seen by `session`
    pub fn row_count(&self, session: &Session) -> u64 {
        self.scan.get_row_count(session)
    }

    pub fn row_count_approximation(&self) -> u64 {
        self.scan.get_row_count_approximation()
    }

    pub fn memory_used(&self) -> usize {
        self.scan.memory_used()
    }

    pub fn disk_space_used(&self) -> u64 {
        0
    }
}

fn pending_operation(row: &Row) -> Operation {
    if row.is_deleted() {
        Operation::Delete
    } else {
        Operation::Insert
    }
}
