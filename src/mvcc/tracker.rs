//! Version tracker implementation

use std::collections::{btree_map, BTreeMap, HashMap};

use crate::row::Row;
use crate::types::{RowKey, Session, SessionId};

use super::Operation;

/// Delta and per-session count adjustments for one index
#[derive(Debug, Default)]
pub struct VersionTracker {
    enabled: bool,

    /// Uncommitted rows keyed by row identity. A deleted entry carries the
    /// values the row had before removal.
    delta: BTreeMap<RowKey, Row>,

    /// Pending row-count adjustment per session
    session_row_count: HashMap<SessionId, i64>,

    /// Sum of all pending adjustments
    row_count_diff: i64,
}

impl VersionTracker {
    /// Create a tracker. A disabled tracker ignores every update.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record an insert by `session`
    ///
    /// If the same row is already pending as a delete, both cancel out.
    pub fn record_add(&mut self, session: &Session, row: &Row) {
        if !self.enabled {
            return;
        }
        self.toggle(row.clone());
        self.increment(session.id(), 1);
    }

    /// Record a delete by `session`
    ///
    /// If the same row is still pending as an insert, both cancel out.
    pub fn record_remove(&mut self, session: &Session, row: &Row) {
        if !self.enabled {
            return;
        }
        let mut removed = row.clone();
        removed.set_deleted(true);
        self.toggle(removed);
        self.increment(session.id(), -1);
    }

    /// Make a pending change durable
    ///
    /// Drops the row from the delta and reverses the owning session's
    /// adjustment, so the change now counts for everybody.
    pub fn commit(&mut self, operation: Operation, row: &Row) {
        if !self.enabled {
            return;
        }
        self.delta.remove(&row.key());
        let count = match operation {
            Operation::Delete => 1,
            Operation::Insert => -1,
        };
        self.increment(row.session_id(), count);
    }

    /// Row count as seen by `session`, given the index's raw row count
    pub fn row_count(&self, session: &Session, row_count: u64) -> u64 {
        if !self.enabled {
            return row_count;
        }
        let own = self
            .session_row_count
            .get(&session.id())
            .copied()
            .unwrap_or(0);
        let visible = row_count as i64 + own - self.row_count_diff;
        visible.max(0) as u64
    }

    /// Pending adjustment for one session
    pub fn pending_adjustment(&self, session_id: SessionId) -> i64 {
        self.session_row_count.get(&session_id).copied().unwrap_or(0)
    }

    /// Sum of pending adjustments across sessions
    pub fn row_count_diff(&self) -> i64 {
        self.row_count_diff
    }

    /// Iterate the pending rows in key order. Empty when nothing is pending.
    pub fn delta(&self) -> btree_map::Values<'_, RowKey, Row> {
        self.delta.values()
    }

    /// The pending entry for `key`, if any
    pub fn pending(&self, key: RowKey) -> Option<&Row> {
        self.delta.get(&key)
    }

    /// Pending rows owned by `session_id`, in key order
    pub fn pending_for(&self, session_id: SessionId) -> Vec<Row> {
        self.delta
            .values()
            .filter(|row| row.session_id() == session_id)
            .cloned()
            .collect()
    }

    pub fn delta_len(&self) -> usize {
        self.delta.len()
    }

    /// Forget everything (truncate)
    pub fn clear(&mut self) {
        self.delta.clear();
        self.session_row_count.clear();
        self.row_count_diff = 0;
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn toggle(&mut self, row: Row) {
        if self.delta.remove(&row.key()).is_none() {
            self.delta.insert(row.key(), row);
        }
    }

    fn increment(&mut self, session_id: SessionId, count: i64) {
        *self.session_row_count.entry(session_id).or_insert(0) += count;
        self.row_count_diff += count;
    }
}
