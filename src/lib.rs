//! # AtlasCol
//!
//! An in-memory column-oriented table store with:
//! - Column-transposed, append-only storage with stable row keys
//! - Tombstoned deletes that never shift other rows
//! - Multi-version visibility of uncommitted changes per session
//! - A single-column hash index for equality lookups
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Engine                               │
//! │              (arena of tables, session ids)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    ColumnarTable                             │
//! │          (routes add/remove to every index)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  ScanIndex  │          │  HashIndex  │
//!   │  (primary)  │          │ (equality)  │
//!   └──────┬──────┘          └─────────────┘
//!          │
//!    ┌─────┴───────────┐
//!    ▼                 ▼
//! ┌─────────────┐ ┌────────────────┐
//! │ ColumnStore │ │ VersionTracker │
//! └─────────────┘ └────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod types;
pub mod row;

pub mod storage;
pub mod mvcc;
pub mod index;
pub mod table;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ColumnarError, Result};
pub use config::Config;
pub use engine::{Engine, TableHandle};
pub use index::{Cursor, Index};
pub use row::Row;
pub use table::{ColumnarTable, TableDescriptor};
pub use types::{ColumnType, RowKey, Session, Value};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of AtlasCol
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
