//! Tests for VersionTracker
//!
//! These tests verify:
//! - Inert behaviour in single-version mode
//! - Per-session row count visibility
//! - Commit folding for inserts and deletes
//! - Add/remove cancellation inside the delta

use atlascol::mvcc::{Operation, VersionTracker};
use atlascol::{Row, Session, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn owned_row(key: u64, session: &Session) -> Row {
    let mut row = Row::with_key(key, vec![Value::Int(key as i32)]);
    row.set_session_id(session.id());
    row
}

// =============================================================================
// Single-Version Tests
// =============================================================================

#[test]
fn test_disabled_tracker_is_inert() {
    let mut tracker = VersionTracker::new(false);
    let s1 = Session::new(1);
    let row = owned_row(0, &s1);

    tracker.record_add(&s1, &row);
    tracker.record_remove(&s1, &row);
    tracker.commit(Operation::Insert, &row);

    assert!(!tracker.is_enabled());
    assert_eq!(tracker.delta_len(), 0);
    assert_eq!(tracker.delta().count(), 0);
    assert_eq!(tracker.row_count(&s1, 5), 5);
    assert_eq!(tracker.row_count_diff(), 0);
}

// =============================================================================
// Visibility Tests
// =============================================================================

#[test]
fn test_uncommitted_insert_visible_to_owner_only() {
    let mut tracker = VersionTracker::new(true);
    let s1 = Session::new(1);
    let s2 = Session::new(2);

    tracker.record_add(&s1, &owned_row(0, &s1));

    // raw row count already includes the pending insert
    assert_eq!(tracker.row_count(&s1, 1), 1);
    assert_eq!(tracker.row_count(&s2, 1), 0);
    assert_eq!(tracker.pending_adjustment(1), 1);
    assert_eq!(tracker.row_count_diff(), 1);
}

#[test]
fn test_uncommitted_delete_visible_to_owner_only() {
    let mut tracker = VersionTracker::new(true);
    let s1 = Session::new(1);
    let s2 = Session::new(2);

    // one committed row, deleted by s1 but not yet committed
    tracker.record_remove(&s1, &owned_row(0, &s1));

    assert_eq!(tracker.row_count(&s1, 0), 0);
    assert_eq!(tracker.row_count(&s2, 0), 1);

    let pending = tracker.pending(0).unwrap();
    assert!(pending.is_deleted());
    assert_eq!(pending.session_id(), 1);
}

#[test]
fn test_sessions_see_only_their_own_changes() {
    let mut tracker = VersionTracker::new(true);
    let s1 = Session::new(1);
    let s2 = Session::new(2);
    let s3 = Session::new(3);

    // 10 committed rows; s1 inserts 2, s2 deletes 1
    tracker.record_add(&s1, &owned_row(10, &s1));
    tracker.record_add(&s1, &owned_row(11, &s1));
    tracker.record_remove(&s2, &owned_row(3, &s2));
    let raw = 10 + 2 - 1;

    assert_eq!(tracker.row_count(&s1, raw), 12);
    assert_eq!(tracker.row_count(&s2, raw), 9);
    assert_eq!(tracker.row_count(&s3, raw), 10);
}

// =============================================================================
// Commit Tests
// =============================================================================

#[test]
fn test_commit_insert_makes_row_visible_to_all() {
    let mut tracker = VersionTracker::new(true);
    let s1 = Session::new(1);
    let s2 = Session::new(2);
    let row = owned_row(0, &s1);

    tracker.record_add(&s1, &row);
    tracker.commit(Operation::Insert, &row);

    assert_eq!(tracker.delta_len(), 0);
    assert_eq!(tracker.row_count(&s1, 1), 1);
    assert_eq!(tracker.row_count(&s2, 1), 1);
    assert_eq!(tracker.row_count_diff(), 0);
}

#[test]
fn test_commit_delete_hides_row_from_all() {
    let mut tracker = VersionTracker::new(true);
    let s1 = Session::new(1);
    let s2 = Session::new(2);
    let row = owned_row(0, &s1);

    tracker.record_remove(&s1, &row);
    tracker.commit(Operation::Delete, &row);

    assert_eq!(tracker.delta_len(), 0);
    assert_eq!(tracker.row_count(&s1, 0), 0);
    assert_eq!(tracker.row_count(&s2, 0), 0);
    assert_eq!(tracker.pending_adjustment(1), 0);
}

// =============================================================================
// Delta Tests
// =============================================================================

#[test]
fn test_remove_after_add_cancels() {
    let mut tracker = VersionTracker::new(true);
    let s1 = Session::new(1);
    let row = owned_row(4, &s1);

    tracker.record_add(&s1, &row);
    tracker.record_remove(&s1, &row);

    assert_eq!(tracker.delta_len(), 0);
    assert!(tracker.pending(4).is_none());
    assert_eq!(tracker.pending_adjustment(1), 0);
    assert_eq!(tracker.row_count_diff(), 0);
}

#[test]
fn test_add_after_remove_cancels() {
    let mut tracker = VersionTracker::new(true);
    let s1 = Session::new(1);
    let row = owned_row(2, &s1);

    tracker.record_remove(&s1, &row);
    tracker.record_add(&s1, &row);

    assert_eq!(tracker.delta_len(), 0);
}

#[test]
fn test_delta_iterates_in_key_order() {
    let mut tracker = VersionTracker::new(true);
    let s1 = Session::new(1);

    for key in [5, 1, 3] {
        tracker.record_add(&s1, &owned_row(key, &s1));
    }

    let keys: Vec<u64> = tracker.delta().map(|r| r.key()).collect();
    assert_eq!(keys, vec![1, 3, 5]);

    // restartable: a second pass sees the same rows
    assert_eq!(tracker.delta().count(), 3);
}

#[test]
fn test_pending_for_filters_by_session() {
    let mut tracker = VersionTracker::new(true);
    let s1 = Session::new(1);
    let s2 = Session::new(2);

    tracker.record_add(&s1, &owned_row(0, &s1));
    tracker.record_add(&s2, &owned_row(1, &s2));
    tracker.record_remove(&s1, &owned_row(7, &s1));

    let mine: Vec<u64> = tracker.pending_for(1).iter().map(|r| r.key()).collect();
    assert_eq!(mine, vec![0, 7]);
    assert_eq!(tracker.pending_for(2).len(), 1);
    assert!(tracker.pending_for(3).is_empty());
}

#[test]
fn test_clear_forgets_everything() {
    let mut tracker = VersionTracker::new(true);
    let s1 = Session::new(1);

    tracker.record_add(&s1, &owned_row(0, &s1));
    tracker.clear();

    assert_eq!(tracker.delta_len(), 0);
    assert_eq!(tracker.row_count_diff(), 0);
    assert_eq!(tracker.row_count(&s1, 0), 0);
}
