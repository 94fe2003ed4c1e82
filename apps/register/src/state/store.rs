//! # Store State
//!
//! The external stores the register talks to, as shared trait objects.
//!
//! ## Thread Safety
//! Every store is `Send + Sync` behind an `Arc`. The SQLite `Database`
//! has an internal connection pool, so commands can call it concurrently
//! without explicit locking.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn reload_catalog(stores: &StoreState, ...) -> Result<.., ApiError> {
//!     let items = stores.catalog.load_catalog(shop_id).await?;
//!     ...
//! }
//! ```

use std::sync::Arc;

use till_commit::{CatalogStore, InventoryStore, ReceiptStore, ReconciliationLog, StaffDirectory};
use till_db::Database;

#[derive(Clone)]
pub struct StoreState {
    pub catalog: Arc<dyn CatalogStore>,
    pub receipts: Arc<dyn ReceiptStore>,
    pub inventory: Arc<dyn InventoryStore>,
    pub reconciliation: Arc<dyn ReconciliationLog>,
    pub staff: Arc<dyn StaffDirectory>,
}

impl StoreState {
    /// Uses one backend for every store.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: CatalogStore
            + ReceiptStore
            + InventoryStore
            + ReconciliationLog
            + StaffDirectory
            + 'static,
    {
        StoreState {
            catalog: store.clone(),
            receipts: store.clone(),
            inventory: store.clone(),
            reconciliation: store.clone(),
            staff: store,
        }
    }

    pub fn from_database(db: Database) -> Self {
        Self::shared(Arc::new(db))
    }
}
