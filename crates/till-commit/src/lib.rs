//! # till-commit: Transaction Commit for Till
//!
//! Store contracts plus the two write paths that use them: committing a
//! sale and receiving stock.
//!
//! ## Module Organization
//! - [`store`] - Async traits for catalog, receipts, inventory, printing, reconciliation
//! - [`committer`] - `TransactionCommitter` and its outcome types
//! - [`receiving`] - Stock-in batches applied as inventory increments
//! - [`error`] - `CommitError`
//! - `memory` - In-memory store (tests, or the `memory` feature)
//!
//! ## Outcomes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Err(Validation)    nothing written, ledger unchanged                   │
//! │  Err(Persistence)   receipt not written, inventory unchanged            │
//! │  Ok(outcome)        receipt written, ledger reset                       │
//! │     warning: None           every decrement applied                     │
//! │     warning: Some(..)       named lines left stale, see reconciliation  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod committer;
pub mod error;
pub mod receiving;
pub mod store;

#[cfg(any(test, feature = "memory"))]
pub mod memory;

pub use committer::{
    CommitOutcome, CommitStatus, DecrementFailure, ReconciliationWarning, TransactionCommitter,
};
pub use error::{CommitError, CommitResult};
pub use receiving::{receive_stock, ReceivedStock};
pub use store::{
    CatalogStore, InventoryStore, ReceiptPrinter, ReceiptStore, ReconciliationLog,
    StaffDirectory, StoreError, StoreResult,
};
