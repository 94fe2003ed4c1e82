//! # till-core: Pure Business Logic for Till
//!
//! This crate holds the line-item ledger and everything it needs to
//! compute totals and freeze a sale into a receipt. It performs no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Till Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Register (apps/register)                     │   │
//! │  │    scan / select ──► edit lines ──► tender ──► commit          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────────┐   │   │
//! │  │   │  ledger  │  │  money   │  │ catalog  │  │ stock/report │   │   │
//! │  │   │ LineItem │  │  Money   │  │ snapshot │  │  stock-in    │   │   │
//! │  │   │  Totals  │  │ Decimal  │  │  lookup  │  │  summary     │   │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        till-commit (store traits, TransactionCommitter)         │   │
//! │  │        till-db     (SQLite adapter for those traits)            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`ledger`] - The in-progress sale: lines, totals, snapshot, reset
//! - [`catalog`] - Read-only catalog snapshot and lookups
//! - [`money`] - Decimal money, rounded only for presentation
//! - [`types`] - Domain types (CatalogItem, SaleRecord, Receipt, ...)
//! - [`stock`] - Stock-in form rows and batch validation
//! - [`report`] - Daily sales summary (profit, margin) over persisted receipts
//! - [`validation`] - Lenient parsing and business rule validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::{Catalog, CatalogItem, Ledger, Money, UnitOfMeasure};
//! use rust_decimal::Decimal;
//!
//! let soap = CatalogItem {
//!     id: "soap".to_string(),
//!     shop_id: "shop-1".to_string(),
//!     name: "Soap".to_string(),
//!     code: Some("SOAP".to_string()),
//!     price: Money::from_major(50),
//!     cost_price: None,
//!     quantity: Decimal::from(20),
//!     unit: UnitOfMeasure::Units,
//!     category: "Toiletries".to_string(),
//! };
//! let catalog = Catalog::new(vec![soap]);
//!
//! let mut ledger = Ledger::new();
//! ledger.scan("soap", &catalog).unwrap();
//! ledger.scan("SOAP", &catalog).unwrap();
//! ledger.set_tendered_input("120");
//!
//! let totals = ledger.compute_totals();
//! assert_eq!(totals.payable.to_string(), "100.00");
//! assert_eq!(totals.change_returned.to_string(), "20.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod ledger;
pub mod money;
pub mod report;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::Catalog;
pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{generate_transaction_id, Ledger, LineField, LineItem, Totals, DEFAULT_CUSTOMER};
pub use money::Money;
pub use report::{ReceiptHeadline, SalesPeriod, SalesSummary};
pub use stock::{StockInBatch, StockInLine, StockInRow};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Shop id used by the seed data and by a register with no shop configured.
pub const DEFAULT_SHOP_ID: &str = "shop-default";

/// Cashier label printed on receipts when none is configured.
pub const DEFAULT_CASHIER_NAME: &str = "Cashier";

/// Manager label printed on receipts when none is configured.
pub const DEFAULT_MANAGER_NAME: &str = "Manager";
