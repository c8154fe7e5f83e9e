//! MVCC Module
//!
//! Per-index bookkeeping for multi-version visibility.
//!
//! ## Responsibilities
//! - Track rows added or removed but not yet committed (the delta)
//! - Track a signed row-count adjustment per session
//! - Fold committed changes back into the shared view
//!
//! ## Row Count Visibility
//! ```text
//! visible(session) = row_count + pending[session] - Σ pending[*]
//! ```
//! A session sees its own in-flight inserts and deletes, never anyone else's.
//!
//! In single-version mode the tracker is inert: every call is a no-op and
//! the delta is always empty.

mod tracker;

pub use tracker::VersionTracker;

/// Kind of change being committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    Delete,
}
