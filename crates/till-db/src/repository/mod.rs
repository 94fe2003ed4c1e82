//! # Repository Module
//!
//! Database repository implementations for Till.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Store trait call (till-commit)                                        │
//! │       │                                                                 │
//! │       │  inventory.decrement_stock("soap", 3)                          │
//! │       ▼                                                                 │
//! │  Database (store.rs) ──► db.catalog().decrement("soap", 3)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CatalogRepository ──► SQL ──► SQLite                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`] - Items, lookups, version-guarded stock updates
//! - [`ReceiptRepository`] - Receipts and their frozen lines
//! - [`StockRepository`] - Stock-in entries
//! - [`ReconciliationRepository`] - Failed decrements awaiting correction
//! - [`StaffRepository`] - Staff directory

pub mod catalog;
pub mod receipt;
pub mod reconciliation;
pub mod staff;
pub mod stock;

pub use catalog::CatalogRepository;
pub use receipt::ReceiptRepository;
pub use reconciliation::ReconciliationRepository;
pub use staff::StaffRepository;
pub use stock::StockRepository;

use std::str::FromStr;

use rust_decimal::Decimal;
use till_core::Money;

use crate::error::{DbError, DbResult};

/// Reads a decimal TEXT column.
pub(crate) fn parse_decimal(field: &str, value: &str) -> DbResult<Decimal> {
    Decimal::from_str(value).map_err(|_| DbError::invalid_data(field, value))
}

pub(crate) fn parse_money(field: &str, value: &str) -> DbResult<Money> {
    parse_decimal(field, value).map(Money::new)
}

pub(crate) fn parse_optional_money(field: &str, value: Option<&str>) -> DbResult<Option<Money>> {
    value.map(|v| parse_money(field, v)).transpose()
}

/// Writes a decimal TEXT column.
pub(crate) fn money_text(money: Money) -> String {
    money.amount().to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::{Path, PathBuf};

    use rust_decimal::Decimal;
    use till_core::{CatalogItem, Money, UnitOfMeasure, DEFAULT_CATEGORY};

    use crate::{Database, DbConfig};

    pub(crate) async fn memory_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub(crate) fn item(id: &str, name: &str, price: &str, on_hand: i64) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            shop_id: "shop-1".to_string(),
            name: name.to_string(),
            code: Some(id.to_uppercase()),
            price: Money::parse_lenient(price),
            cost_price: None,
            quantity: Decimal::from(on_hand),
            unit: UnitOfMeasure::Units,
            category: DEFAULT_CATEGORY.to_string(),
        }
    }

    /// A file-backed database with a real multi-connection pool.
    pub(crate) async fn file_db(name: &str) -> (Database, PathBuf) {
        let path = std::env::temp_dir().join(format!(
            "till-{}-{}.db",
            name,
            uuid::Uuid::new_v4().simple()
        ));
        let db = Database::new(DbConfig::new(&path).max_connections(5))
            .await
            .unwrap();
        (db, path)
    }

    pub(crate) async fn remove_file_db(db: Database, path: &Path) {
        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let mut file = path.as_os_str().to_owned();
            file.push(suffix);
            let _ = std::fs::remove_file(PathBuf::from(file));
        }
    }

    pub(crate) async fn seeded_db() -> Database {
        let db = memory_db().await;
        db.catalog().insert(&item("oil", "Oil 1L", "200", 10)).await.unwrap();
        db.catalog().insert(&item("soap", "Soap", "50", 20)).await.unwrap();
        db
    }
}
