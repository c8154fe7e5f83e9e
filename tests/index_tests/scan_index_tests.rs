//! Tests for ScanIndex
//!
//! These tests verify:
//! - Key assignment and row counting
//! - Iteration order and tombstone skipping
//! - Multi-version row counts per session
//! - Capability flags and cost reporting
//! - Truncate
//! - Debug dump mode

use atlascol::index::{Cursor, Index, IndexType, ScanIndex};
use atlascol::types::TableId;
use atlascol::{ColumnarError, Config, Row, Session, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn new_index(multi_version: bool) -> ScanIndex {
    let config = Config::builder().multi_version(multi_version).build();
    ScanIndex::new(
        TableId(1),
        "T",
        vec!["A".to_string(), "B".to_string()],
        &config,
    )
}

fn add(index: &mut ScanIndex, session: &Session, a: i32, b: &str) -> Row {
    let mut row = Row::new(vec![Value::Int(a), Value::from(b)]);
    index.add(session, &mut row).unwrap();
    row
}

fn all_keys(index: &ScanIndex) -> Vec<u64> {
    let mut keys = Vec::new();
    let mut current: Option<Row> = None;
    while let Some(row) = index.get_next_row(current.as_ref()) {
        keys.push(row.key());
        current = Some(row);
    }
    keys
}

// =============================================================================
// Add / Remove Tests
// =============================================================================

#[test]
fn test_add_sets_row_key() {
    let mut index = new_index(false);
    let s = Session::new(1);

    let first = add(&mut index, &s, 1, "a");
    let second = add(&mut index, &s, 2, "b");

    assert_eq!(first.key(), 0);
    assert_eq!(second.key(), 1);
    assert!(!second.is_deleted());
    assert_eq!(index.next_key(), 2);
    assert_eq!(index.get_row_count_approximation(), 2);
}

#[test]
fn test_add_wrong_arity_fails() {
    let mut index = new_index(false);
    let s = Session::new(1);

    let mut row = Row::new(vec![Value::Int(1)]);
    assert!(matches!(
        index.add(&s, &mut row),
        Err(ColumnarError::ColumnCountMismatch { .. })
    ));
    assert_eq!(index.get_row_count_approximation(), 0);
}

#[test]
fn test_remove_tombstones_row() {
    let mut index = new_index(false);
    let s = Session::new(1);

    add(&mut index, &s, 1, "a");
    let second = add(&mut index, &s, 2, "b");
    add(&mut index, &s, 3, "c");

    index.remove(&s, &second).unwrap();

    assert!(index.get_row(1).unwrap().is_tombstone());
    assert_eq!(index.get_row(2).unwrap().values(), &[Value::Int(3), Value::from("c")]);
    assert_eq!(index.get_row_count_approximation(), 2);
    assert_eq!(index.get_row_count(&s), 2);
}

#[test]
fn test_remove_unallocated_key_fails() {
    let mut index = new_index(false);
    let s = Session::new(1);
    add(&mut index, &s, 1, "a");

    let ghost = Row::with_key(9, vec![Value::Int(0), Value::Null]);
    assert!(matches!(
        index.remove(&s, &ghost),
        Err(ColumnarError::RowNotFoundWhenDeleting { key: 9, allocated: 1 })
    ));
    assert_eq!(index.get_row_count_approximation(), 1);
}

// =============================================================================
// Iteration Tests
// =============================================================================

#[test]
fn test_get_next_row_skips_tombstones() {
    let mut index = new_index(false);
    let s = Session::new(1);

    let rows: Vec<Row> = (0..5).map(|i| add(&mut index, &s, i, "x")).collect();
    index.remove(&s, &rows[0]).unwrap();
    index.remove(&s, &rows[2]).unwrap();
    index.remove(&s, &rows[4]).unwrap();

    assert_eq!(all_keys(&index), vec![1, 3]);
}

#[test]
fn test_get_next_row_empty_index() {
    let index = new_index(false);
    assert!(index.get_next_row(None).is_none());
}

#[test]
fn test_get_row_past_end() {
    let mut index = new_index(false);
    let s = Session::new(1);
    add(&mut index, &s, 1, "a");

    assert!(index.get_row(1).is_none());
}

// =============================================================================
// Multi-Version Tests
// =============================================================================

#[test]
fn test_multi_version_row_count_per_session() {
    let mut index = new_index(true);
    let s1 = Session::new(1);
    let s2 = Session::new(2);

    let row = add(&mut index, &s1, 1, "a");
    assert_eq!(row.session_id(), 1);

    assert_eq!(index.get_row_count(&s1), 1);
    assert_eq!(index.get_row_count(&s2), 0);
    assert_eq!(index.get_row_count_approximation(), 1);

    index.commit(atlascol::mvcc::Operation::Insert, &row);

    assert_eq!(index.get_row_count(&s1), 1);
    assert_eq!(index.get_row_count(&s2), 1);
}

#[test]
fn test_multi_version_pending_row_carries_owner() {
    let mut index = new_index(true);
    let s1 = Session::new(1);

    let row = add(&mut index, &s1, 1, "a");
    assert_eq!(index.get_row(0).unwrap().session_id(), 1);

    index.commit(atlascol::mvcc::Operation::Insert, &row);
    assert_eq!(index.get_row(0).unwrap().session_id(), 0);
}

#[test]
fn test_single_version_ignores_sessions() {
    let mut index = new_index(false);
    let s1 = Session::new(1);
    let s2 = Session::new(2);

    add(&mut index, &s1, 1, "a");

    assert_eq!(index.get_row_count(&s2), 1);
    assert_eq!(index.get_row(0).unwrap().session_id(), 0);
    assert_eq!(index.delta().count(), 0);
}

// =============================================================================
// Capability Tests
// =============================================================================

#[test]
fn test_capabilities() {
    let index = new_index(false);
    let s = Session::new(1);

    assert_eq!(index.name(), "T_DATA");
    assert_eq!(index.index_type(), IndexType::Scan);
    assert!(index.column_ids().is_empty());
    assert!(index.can_scan());
    assert!(!index.need_rebuild());
    assert!(!index.can_get_first_or_last());
    assert_eq!(index.disk_space_used(), 0);
    assert_eq!(index.plan_sql(), "T.tableScan");
    assert!(matches!(index.check_rename(), Err(ColumnarError::Unsupported(_))));
    assert!(matches!(
        index.find_first_or_last(&s, true),
        Err(ColumnarError::Unsupported(_))
    ));
}

#[test]
fn test_cost_tracks_row_count() {
    let mut index = new_index(false);
    let s = Session::new(1);

    assert_eq!(index.get_cost(&s, None), 1000.0);
    add(&mut index, &s, 1, "a");
    add(&mut index, &s, 2, "b");
    assert_eq!(index.get_cost(&s, Some(&[1, 1][..])), 1002.0);
}

// =============================================================================
// Truncate Tests
// =============================================================================

#[test]
fn test_truncate_restarts_keys() {
    let mut index = new_index(true);
    let s = Session::new(1);

    add(&mut index, &s, 1, "a");
    add(&mut index, &s, 2, "b");
    index.truncate(&s);

    assert_eq!(index.get_row_count_approximation(), 0);
    assert_eq!(index.get_row_count(&s), 0);
    assert_eq!(index.delta().count(), 0);
    assert_eq!(index.memory_used(), 0);

    let row = add(&mut index, &s, 3, "c");
    assert_eq!(row.key(), 0);
}

#[test]
fn test_remove_index_truncates() {
    let mut index = new_index(false);
    let s = Session::new(1);

    add(&mut index, &s, 1, "a");
    index.remove_index(&s);

    assert_eq!(index.get_row_count_approximation(), 0);
    assert!(index.get_row(0).is_none());
}

#[test]
fn test_close_keeps_rows() {
    let mut index = new_index(false);
    let s = Session::new(1);

    add(&mut index, &s, 1, "a");
    index.close(&s);

    assert_eq!(index.get_row_count_approximation(), 1);
}

// =============================================================================
// Debug Dump Tests
// =============================================================================

#[test]
fn test_debug_dump_mode() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();

    let config = Config::builder().multi_version(true).debug_dump(true).build();
    let mut index = ScanIndex::new(TableId(1), "T", vec!["A".to_string(), "B".to_string()], &config);
    let s = Session::new(1);

    add(&mut index, &s, 1, "a");
    add(&mut index, &s, 2, "b");

    let row = index.get_row(1).unwrap();
    assert_eq!(row.values(), &[Value::Int(2), Value::from("b")]);
    assert_eq!(row.session_id(), 1);

    let keys: Vec<u64> = index.scan(&s).remaining().iter().map(|r| r.key()).collect();
    assert_eq!(keys, vec![0, 1]);
    assert_eq!(index.store().dump(), "columnStore: [\n  A: [1, 2]\n  B: [a, b]\n]");
}
