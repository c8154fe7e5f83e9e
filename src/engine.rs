//! Engine Module
//!
//! The table engine: an arena of columnar tables keyed by stable ids.
//!
//! ## Responsibilities
//! - Create tables from descriptors and hand back a handle
//! - Resolve tables by id or name
//! - Allocate session ids
//! - Apply database-wide configuration (multi-version mode) to every table

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::config::Config;
use crate::error::{ColumnarError, Result};
use crate::table::{ColumnarTable, TableDescriptor};
use crate::types::{Session, TableId};

/// Shared, lockable table
pub type SharedTable = Arc<RwLock<ColumnarTable>>;

/// Returned by `create_table`: the new table's id and a handle to it
#[derive(Clone)]
pub struct TableHandle {
    pub id: TableId,
    pub table: SharedTable,
}

/// Tables by id, plus a name lookup
#[derive(Default)]
struct Catalog {
    tables: HashMap<TableId, SharedTable>,
    names: HashMap<String, TableId>,
}

/// The columnar table engine
///
/// ## Concurrency Model
///
/// - **Catalog** (create/drop/lookup): behind one `RwLock`
/// - **Tables**: each behind its own `RwLock`
///   - Structural changes (add/remove/truncate) take the write lock
///   - Scans and lookups share the read lock
///   - A cursor borrows the table, so the read guard lives as long as it
///
/// Indexes never point back at their table; they are reached through it.
pub struct Engine {
    config: Config,
    catalog: RwLock<Catalog>,
    next_table_id: AtomicU64,
    next_session_id: AtomicU32,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        info!(multi_version = config.multi_version, "columnar engine started");

        Self {
            config,
            catalog: RwLock::new(Catalog::default()),
            next_table_id: AtomicU64::new(1),
            next_session_id: AtomicU32::new(1),
        }
    }

    /// Create a table. Names are unique, case-insensitive.
    pub fn create_table(&self, descriptor: TableDescriptor) -> Result<TableHandle> {
        let name_key = descriptor.name.to_ascii_uppercase();
        let mut catalog = self.catalog.write();
        if catalog.names.contains_key(&name_key) {
            return Err(ColumnarError::DuplicateTable(descriptor.name));
        }

        let id = TableId(self.next_table_id.fetch_add(1, Ordering::SeqCst));
        let table = Arc::new(RwLock::new(ColumnarTable::new(id, descriptor, &self.config)));

        catalog.tables.insert(id, Arc::clone(&table));
        catalog.names.insert(name_key, id);

        Ok(TableHandle { id, table })
    }

    /// Get a table by id
    pub fn table(&self, id: TableId) -> Result<SharedTable> {
        self.catalog
            .read()
            .tables
            .get(&id)
            .cloned()
            .ok_or(ColumnarError::TableNotFound(id))
    }

    /// Get a table by name
    pub fn table_by_name(&self, name: &str) -> Option<TableHandle> {
        let catalog = self.catalog.read();
        let id = *catalog.names.get(&name.to_ascii_uppercase())?;
        let table = Arc::clone(catalog.tables.get(&id)?);
        Some(TableHandle { id, table })
    }

    /// Drop a table and release its storage
    pub fn drop_table(&self, session: &Session, id: TableId) -> Result<()> {
        let shared = {
            let mut catalog = self.catalog.write();
            let table = catalog
                .tables
                .remove(&id)
                .ok_or(ColumnarError::TableNotFound(id))?;
            catalog.names.retain(|_, table_id| *table_id != id);
            table
        };

        let mut table = shared.write();
        table.remove(session);
        info!(table = %id, name = table.name(), "table dropped");
        Ok(())
    }

    pub fn table_count(&self) -> usize {
        self.catalog.read().tables.len()
    }

    /// Allocate a fresh session (ids start at 1; 0 means "no owner")
    pub fn open_session(&self) -> Session {
        Session::new(self.next_session_id.fetch_add(1, Ordering::SeqCst))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
