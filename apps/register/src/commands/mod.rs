//! # Register Commands
//!
//! Everything the shell can ask the register to do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs            ◄─── You are here (exports)
//! ├── ledger.rs         ◄─── Scan, select, edit lines, adjustments
//! ├── catalog.rs        ◄─── Catalog reload and name search
//! ├── checkout.rs       ◄─── Commit the sale
//! ├── stock.rs          ◄─── Stock-in batches
//! ├── report.rs         ◄─── Sales summary, receipt lookup
//! └── reconciliation.rs ◄─── Unapplied stock decrements
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Shell line: "scan 8964000111"                                          │
//! │         │                                                               │
//! │         │ (parsed into shell::Command)                                  │
//! │         ▼                                                               │
//! │  async fn scan_item(                                                    │
//! │      session: &SessionState,   ◄── ledger + catalog snapshot            │
//! │      code: &str,               ◄── from the shell line                  │
//! │  ) -> Result<LedgerResponse, ApiError>                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Shell prints the ledger, or "error [NOT_FOUND]: ..."                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs the session
//! async fn scan_item(session: &SessionState, code: &str)
//!
//! // Needs stores too
//! async fn set_staff(session: &SessionState, stores: &StoreState, shop_id: &str, name: &str)
//!
//! // Needs the committer
//! async fn commit_sale(session: &SessionState, committer: &TransactionCommitter, ...)
//! ```

pub mod catalog;
pub mod checkout;
pub mod ledger;
pub mod reconciliation;
pub mod report;
pub mod stock;
