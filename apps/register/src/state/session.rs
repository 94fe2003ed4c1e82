//! # Session State
//!
//! The ledger being rung up and the catalog snapshot it draws from.
//!
//! ## Thread Safety
//! The ledger is behind an async `Mutex`:
//! 1. Edits and the commit all go through the same lock
//! 2. A commit holds the lock across its store calls, so a second submit
//!    waits and then sees the fresh, empty ledger
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session State Operations                             │
//! │                                                                         │
//! │  Operator Action         Command                 State Change           │
//! │  ───────────────         ───────                 ────────────           │
//! │                                                                         │
//! │  Scan barcode ──────────► scan_item() ──────────► ledger.scan()         │
//! │  Edit quantity ─────────► edit_line() ──────────► ledger.edit_line()    │
//! │  Receive goods ─────────► receive_stock() ──────► catalog replaced      │
//! │  Submit ────────────────► commit_sale() ────────► ledger reset          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tokio::sync::{Mutex, MutexGuard, RwLock};

use till_core::{Catalog, Ledger};

pub struct SessionState {
    ledger: Mutex<Ledger>,
    catalog: RwLock<Catalog>,
}

impl SessionState {
    pub fn new(catalog: Catalog) -> Self {
        SessionState {
            ledger: Mutex::new(Ledger::new()),
            catalog: RwLock::new(catalog),
        }
    }

    /// Executes a function with read access to the ledger.
    pub async fn with_ledger<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Ledger) -> R,
    {
        let ledger = self.ledger.lock().await;
        f(&ledger)
    }

    /// Executes a function with write access to the ledger.
    pub async fn with_ledger_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Ledger) -> R,
    {
        let mut ledger = self.ledger.lock().await;
        f(&mut ledger)
    }

    /// Executes a function with write access to the ledger and read access
    /// to the catalog.
    pub async fn with_ledger_and_catalog<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Ledger, &Catalog) -> R,
    {
        let mut ledger = self.ledger.lock().await;
        let catalog = self.catalog.read().await;
        f(&mut ledger, &catalog)
    }

    /// Holds the ledger for an async operation (the commit).
    pub async fn lock_ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().await
    }

    pub async fn with_catalog<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Catalog) -> R,
    {
        let catalog = self.catalog.read().await;
        f(&catalog)
    }

    /// Swaps in a freshly loaded catalog. Lines already in the ledger keep
    /// their snapshots.
    pub async fn replace_catalog(&self, catalog: Catalog) {
        *self.catalog.write().await = catalog;
    }
}
