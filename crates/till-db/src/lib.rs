//! # till-db: SQLite Store for Till
//!
//! Local SQLite storage for the catalog, receipts, stock entries,
//! reconciliation log and staff, through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Till Data Flow                                 │
//! │                                                                         │
//! │  TransactionCommitter (till-commit)                                    │
//! │       │  Arc<dyn ReceiptStore>, Arc<dyn InventoryStore>, ...           │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     till-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │  │   │
//! │  │   │               │    │ CatalogRepo    │   │              │  │   │
//! │  │   │ SqlitePool    │◄───│ ReceiptRepo    │   │ 001_initial  │  │   │
//! │  │   │ store traits  │    │ StockRepo ...  │   │              │  │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (WAL), or `:memory:` for tests                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - `store` - `till-commit` store traits implemented on [`Database`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use till_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("till.db")).await?;
//! let store = Arc::new(db.clone());
//! let committer = TransactionCommitter::new(context, store.clone(), store.clone())
//!     .with_reconciliation_log(store);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::{
    CatalogRepository, ReceiptRepository, ReconciliationRepository, StaffRepository,
    StockRepository,
};
