//! Storage Module
//!
//! Memory-resident, column-transposed row storage.
//!
//! ## Responsibilities
//! - Assign row keys (monotonic, never reused until truncate)
//! - Keep one append-only sequence per column, all the same length
//! - Tombstone removed rows without shifting any other row
//! - Track approximate memory use
//!
//! ## Layout
//! ```text
//!            key:   0      1      2      3
//!          ┌──────┬──────┬──────┬──────┐
//!   A      │  1   │ NULL │  2   │  0   │
//!          ├──────┼──────┼──────┼──────┤
//!   B      │ "1"  │ NULL │ "0"  │ "0"  │
//!          ├──────┼──────┼──────┼──────┤
//!   C      │  1   │ NULL │ -1   │  1   │
//!          └──────┴──────┴──────┴──────┘
//!   tombstones: {1}            next_key: 4
//! ```
//!
//! Tombstoned slots are never reclaimed; only `truncate` frees memory.

mod column_store;

pub use column_store::ColumnStore;
