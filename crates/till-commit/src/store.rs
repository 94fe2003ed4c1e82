//! # Store Contracts
//!
//! The external services a register talks to, as async traits.
//!
//! ## Contract Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        External Interfaces                              │
//! │                                                                         │
//! │  CatalogStore       shop id ─────────────────► Vec<CatalogItem>         │
//! │  ReceiptStore       SaleRecord ──────────────► receipt id               │
//! │                     receipt id ──────────────► Option<Receipt>          │
//! │  InventoryStore     item id + quantity ──────► new on-hand (decrement)  │
//! │                     StockEntry ──────────────► new on-hand (increment)  │
//! │  ReceiptPrinter     Receipt ─────────────────► side effect only         │
//! │  ReconciliationLog  failed decrement ────────► recorded for follow-up   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each call is atomic for the one record it touches and nothing more.
//! There is no transaction spanning a receipt and its inventory updates.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use till_core::{CatalogItem, Receipt, ReconciliationEntry, SaleRecord, StaffMember, StockEntry};

/// Result type alias for store calls.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Store Error
// =============================================================================

/// A failed call to an external store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or was busy. Trying again may work.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The call did not complete in time. Trying again may work.
    #[error("Store timed out after {0} ms")]
    Timeout(u64),

    /// The record the call targets does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A concurrent writer kept winning; the update was not applied.
    #[error("Conflicting update on {entity} {id}")]
    Conflict { entity: String, id: String },

    /// The store refused the payload. Trying again will not help.
    #[error("Store rejected the request: {0}")]
    Rejected(String),

    /// Anything else.
    #[error("Store error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        StoreError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Returns true if the same call may succeed when repeated.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StoreError::Unavailable(_) | StoreError::Timeout(_) | StoreError::Conflict { .. }
        )
    }
}

// =============================================================================
// Traits
// =============================================================================

/// Read access to a shop's catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn load_catalog(&self, shop_id: &str) -> StoreResult<Vec<CatalogItem>>;
}

/// Receipt persistence.
#[async_trait]
pub trait ReceiptStore: Send + Sync {
    /// Persists a sale and returns the system-assigned receipt id.
    async fn save_receipt(&self, sale: &SaleRecord) -> StoreResult<String>;

    async fn get_receipt(&self, id: &str) -> StoreResult<Option<Receipt>>;

    /// All receipts for a shop, newest first.
    async fn list_receipts(&self, shop_id: &str) -> StoreResult<Vec<Receipt>>;
}

/// On-hand quantity updates.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Reduces an item's on-hand quantity and returns the new value.
    async fn decrement_stock(&self, item_id: &str, quantity: Decimal) -> StoreResult<Decimal>;

    /// Records a stock-in entry, raises the item's on-hand quantity by the
    /// entry's amount and returns the new value.
    async fn receive_stock(&self, entry: &StockEntry) -> StoreResult<Decimal>;
}

/// Receipt printing or export.
#[async_trait]
pub trait ReceiptPrinter: Send + Sync {
    async fn print_receipt(&self, receipt: &Receipt) -> StoreResult<()>;
}

/// Follow-up list of inventory decrements that failed after a sale.
#[async_trait]
pub trait ReconciliationLog: Send + Sync {
    async fn record(&self, entry: &ReconciliationEntry) -> StoreResult<()>;

    async fn list_unresolved(&self) -> StoreResult<Vec<ReconciliationEntry>>;

    /// Marks an entry resolved. Returns false when no open entry has that id.
    async fn resolve(&self, id: &str) -> StoreResult<bool>;
}

/// Staff directory, for attributing sales.
#[async_trait]
pub trait StaffDirectory: Send + Sync {
    async fn list_staff(&self, shop_id: &str) -> StoreResult<Vec<StaffMember>>;
}
