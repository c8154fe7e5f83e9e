//! Cursors
//!
//! Forward-only iterators bound to one session. `previous` is never
//! supported.

use std::collections::btree_map;

use crate::error::{ColumnarError, Result};
use crate::row::Row;
use crate::types::{RowKey, Session};

use super::ScanIndex;

/// A restartable forward-only iterator over index results
pub trait Cursor {
    /// Current row; `None` before the first `next` and after exhaustion
    fn get(&self) -> Option<&Row>;

    /// Same as `get` for these indexes
    fn search_row(&self) -> Option<&Row> {
        self.get()
    }

    /// Advance. Returns false once the cursor is exhausted.
    fn next(&mut self) -> bool;

    /// Backward iteration is not supported
    fn previous(&mut self) -> Result<bool>;

    /// Drain the remaining rows
    fn remaining(&mut self) -> Vec<Row> {
        let mut rows = Vec::new();
        while self.next() {
            if let Some(row) = self.get() {
                rows.push(row.clone());
            }
        }
        rows
    }
}

// =============================================================================
// Scan Cursor
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Yielding pending deletes of other sessions (multi-version only)
    Delta,
    /// Walking the column store by increasing key
    Base,
    Exhausted,
}

/// Cursor over a scan index
///
/// ## States
/// ```text
/// Delta ──(delta empty)──► Base ──(key space end)──► Exhausted
/// ```
/// Single-version cursors start directly in `Base`.
pub struct ScanCursor<'a> {
    index: &'a ScanIndex,
    session: Session,
    multi_version: bool,
    state: ScanState,
    delta: btree_map::Values<'a, RowKey, Row>,
    row: Option<Row>,
}

impl<'a> ScanCursor<'a> {
    pub(crate) fn new(session: Session, index: &'a ScanIndex, multi_version: bool) -> Self {
        let state = if multi_version {
            ScanState::Delta
        } else {
            ScanState::Base
        };
        Self {
            index,
            session,
            multi_version,
            state,
            delta: index.delta(),
            row: None,
        }
    }

    fn next_multi_version(&mut self) -> bool {
        loop {
            match self.state {
                ScanState::Delta => match self.delta.next() {
                    None => {
                        self.state = ScanState::Base;
                        self.row = None;
                    }
                    // Rows still live are reached by the base scan, and our
                    // own deletes are already gone for us. What is left are
                    // rows deleted by other sessions, still visible here.
                    Some(row) if !row.is_deleted() || row.session_id() == self.session.id() => {}
                    Some(row) => {
                        self.row = Some(row.clone());
                        return true;
                    }
                },
                ScanState::Base => {
                    self.row = self.index.get_next_row(self.row.as_ref());
                    match &self.row {
                        None => {
                            self.state = ScanState::Exhausted;
                            return false;
                        }
                        Some(row) if !row.is_visible_to(self.session.id()) => {}
                        Some(_) => return true,
                    }
                }
                ScanState::Exhausted => return false,
            }
        }
    }

    fn next_single_version(&mut self) -> bool {
        if self.state == ScanState::Exhausted {
            return false;
        }
        self.row = self.index.get_next_row(self.row.as_ref());
        if self.row.is_none() {
            self.state = ScanState::Exhausted;
        }
        self.row.is_some()
    }
}

impl Cursor for ScanCursor<'_> {
    fn get(&self) -> Option<&Row> {
        self.row.as_ref()
    }

    fn next(&mut self) -> bool {
        if self.multi_version {
            self.next_multi_version()
        } else {
            self.next_single_version()
        }
    }

    fn previous(&mut self) -> Result<bool> {
        Err(ColumnarError::Internal(
            "scan cursor cannot move backwards".to_string(),
        ))
    }
}

// =============================================================================
// Single Row Cursor
// =============================================================================

/// Cursor over zero or one row
#[derive(Debug)]
pub struct SingleRowCursor {
    pending: Option<Row>,
    row: Option<Row>,
}

impl SingleRowCursor {
    pub fn new(row: Option<Row>) -> Self {
        Self {
            pending: row,
            row: None,
        }
    }
}

impl Cursor for SingleRowCursor {
    fn get(&self) -> Option<&Row> {
        self.row.as_ref()
    }

    fn next(&mut self) -> bool {
        self.row = self.pending.take();
        self.row.is_some()
    }

    fn previous(&mut self) -> Result<bool> {
        Err(ColumnarError::Internal(
            "single row cursor cannot move backwards".to_string(),
        ))
    }
}
