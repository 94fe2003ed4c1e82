//! # Till Register Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Till Register                                    │
//! │                                                                         │
//! │  stdin ──► shell.rs ──► commands/ ──► till-core (ledger, totals)        │
//! │                              │                                          │
//! │                              └──────► till-commit (commit, stock-in)    │
//! │                                             │                           │
//! │                                             ▼                           │
//! │                                      till-db (SQLite, WAL)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The actual setup is in lib.rs for testability.

#[tokio::main]
async fn main() {
    if let Err(e) = till_register::run().await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
