//! Index Module
//!
//! The host-facing index contract and its two implementations.
//!
//! ## Responsibilities
//! - `ScanIndex`: the mandatory primary index of every table. Owns the
//!   column store and the version tracker; forward iteration only.
//! - `HashIndex`: optional secondary equality index on one column.
//! - Cursors over either index, bound to one caller session.
//!
//! ## Planner Contract
//! The host passes one mask per column describing which comparisons its
//! predicate applies (see [`IndexCondition`]). Each index answers with a
//! comparable cost; the host picks the cheapest.
//!
//! ```text
//! ScanIndex  cost = row_count + cost_row_offset
//! HashIndex  cost = 2                 (EQUALITY on every indexed column)
//!                 = i64::MAX          (anything else)
//! ```

mod cursor;
mod hash;
mod scan;

pub use cursor::{Cursor, ScanCursor, SingleRowCursor};
pub use hash::HashIndex;
pub use scan::ScanIndex;

use crate::error::Result;
use crate::mvcc::Operation;
use crate::row::Row;
use crate::types::{RowKey, Session};

/// Per-column comparison mask bits
pub struct IndexCondition;

impl IndexCondition {
    pub const EQUALITY: u32 = 1;
    pub const START: u32 = 2;
    pub const END: u32 = 4;
    pub const RANGE: u32 = Self::START | Self::END;
    pub const ALWAYS_FALSE: u32 = 8;
}

/// Cost reported by an index that cannot serve the predicate
pub const UNUSABLE_COST: f64 = i64::MAX as f64;

/// Kind of index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    Scan,
    Hash,
}

/// Resolves row keys to rows. Implemented by the scan index so secondary
/// indexes can fetch rows without holding a reference to their table.
pub trait RowSource {
    /// Row at `key` as seen by `session`; `None` past the key space
    fn get_row(&self, session: &Session, key: RowKey) -> Option<Row>;
}

/// Capability interface every index exposes to the host
pub trait Index {
    fn name(&self) -> &str;

    fn index_type(&self) -> IndexType;

    /// Table column positions this index is keyed on
    fn column_ids(&self) -> Vec<usize>;

    /// Add a row. The scan index assigns the row key; secondary indexes
    /// must be called after it.
    fn add(&mut self, session: &Session, row: &mut Row) -> Result<()>;

    /// Remove a row
    fn remove(&mut self, session: &Session, row: &Row) -> Result<()>;

    /// Open a cursor over the rows between `first` and `last`
    fn find<'a>(
        &'a self,
        session: &Session,
        rows: &'a dyn RowSource,
        first: Option<&Row>,
        last: Option<&Row>,
    ) -> Result<Box<dyn Cursor + 'a>>;

    /// Estimated cost for a predicate described by per-column masks.
    /// `None` means the host's condition is always false.
    fn get_cost(&self, session: &Session, masks: Option<&[u32]>) -> f64;

    fn get_row_count(&self, session: &Session) -> u64;

    fn get_row_count_approximation(&self) -> u64;

    fn truncate(&mut self, session: &Session);

    /// Drop the whole index
    fn remove_index(&mut self, session: &Session);

    fn close(&mut self, session: &Session);

    /// A session's change to `row` became durable
    fn commit(&mut self, _operation: Operation, _row: &Row) {}

    /// Fails when the index may not be renamed
    fn check_rename(&self) -> Result<()>;

    fn need_rebuild(&self) -> bool;

    fn can_get_first_or_last(&self) -> bool {
        false
    }

    fn find_first_or_last<'a>(
        &'a self,
        session: &Session,
        first: bool,
    ) -> Result<Box<dyn Cursor + 'a>>;

    fn can_scan(&self) -> bool;

    /// Storage is memory-resident only
    fn disk_space_used(&self) -> u64 {
        0
    }

    /// Text shown in a query plan
    fn plan_sql(&self) -> String;
}
