//! # Store Trait Implementations
//!
//! Plugs [`Database`] into the `till-commit` contracts so a register can
//! hand it straight to a `TransactionCommitter`.

use async_trait::async_trait;
use rust_decimal::Decimal;

use till_commit::{
    CatalogStore, InventoryStore, ReceiptStore, ReconciliationLog, StaffDirectory, StoreError,
    StoreResult,
};
use till_core::{CatalogItem, Receipt, ReconciliationEntry, SaleRecord, StaffMember, StockEntry};

use crate::pool::Database;

#[async_trait]
impl CatalogStore for Database {
    async fn load_catalog(&self, shop_id: &str) -> StoreResult<Vec<CatalogItem>> {
        self.catalog()
            .list_for_shop(shop_id)
            .await
            .map_err(StoreError::from)
    }
}

#[async_trait]
impl ReceiptStore for Database {
    async fn save_receipt(&self, sale: &SaleRecord) -> StoreResult<String> {
        self.receipts().insert(sale).await.map_err(StoreError::from)
    }

    async fn get_receipt(&self, id: &str) -> StoreResult<Option<Receipt>> {
        self.receipts().get_by_id(id).await.map_err(StoreError::from)
    }

    async fn list_receipts(&self, shop_id: &str) -> StoreResult<Vec<Receipt>> {
        self.receipts()
            .list_for_shop(shop_id)
            .await
            .map_err(StoreError::from)
    }
}

#[async_trait]
impl InventoryStore for Database {
    async fn decrement_stock(&self, item_id: &str, quantity: Decimal) -> StoreResult<Decimal> {
        self.catalog()
            .decrement(item_id, quantity)
            .await
            .map_err(StoreError::from)
    }

    async fn receive_stock(&self, entry: &StockEntry) -> StoreResult<Decimal> {
        self.stock().receive(entry).await.map_err(StoreError::from)
    }
}

#[async_trait]
impl ReconciliationLog for Database {
    async fn record(&self, entry: &ReconciliationEntry) -> StoreResult<()> {
        self.reconciliation()
            .insert(entry)
            .await
            .map_err(StoreError::from)
    }

    async fn list_unresolved(&self) -> StoreResult<Vec<ReconciliationEntry>> {
        self.reconciliation()
            .list_unresolved()
            .await
            .map_err(StoreError::from)
    }

    async fn resolve(&self, id: &str) -> StoreResult<bool> {
        self.reconciliation().resolve(id).await.map_err(StoreError::from)
    }
}

#[async_trait]
impl StaffDirectory for Database {
    async fn list_staff(&self, shop_id: &str) -> StoreResult<Vec<StaffMember>> {
        self.staff()
            .list_for_shop(shop_id)
            .await
            .map_err(StoreError::from)
    }
}

// =============================================================================
// End-to-End Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal_macros::dec;
    use till_commit::{receive_stock, CommitStatus, TransactionCommitter};
    use till_core::{
        Catalog, Ledger, LineField, Money, ShopContext, ShopProfile, StockInBatch, StockInRow,
    };

    use super::*;
    use crate::repository::test_support::{item, seeded_db};

    fn context() -> ShopContext {
        ShopContext {
            shop_id: "shop-1".to_string(),
            profile: ShopProfile {
                name: "Corner Store".to_string(),
                ..Default::default()
            },
            cashier_name: "Cashier".to_string(),
            manager_name: "Manager".to_string(),
        }
    }

    fn committer(db: &Database) -> TransactionCommitter {
        let store = Arc::new(db.clone());
        TransactionCommitter::new(context(), store.clone(), store.clone())
            .with_reconciliation_log(store)
    }

    async fn catalog(db: &Database) -> Catalog {
        Catalog::new(db.load_catalog("shop-1").await.unwrap())
    }

    #[tokio::test]
    async fn test_commit_saves_receipt_and_decrements_stock() {
        let db = seeded_db().await;
        let catalog = catalog(&db).await;

        let mut ledger = Ledger::new();
        ledger.scan("SOAP", &catalog).unwrap();
        ledger.scan("SOAP", &catalog).unwrap();
        ledger.select("Oil 1L", &catalog).unwrap();
        ledger.set_tendered_input("500");

        let outcome = committer(&db).commit(&mut ledger).await.unwrap();

        assert_eq!(outcome.status(), CommitStatus::Committed);
        assert!(ledger.is_empty());

        let stored = db.get_receipt(outcome.receipt_id()).await.unwrap().unwrap();
        assert_eq!(stored.sale.items.len(), 2);
        assert_eq!(stored.sale.payable, Money::from_major(300));
        assert_eq!(stored.sale.change, Money::from_major(200));

        let soap = db.catalog().get_by_id("soap").await.unwrap().unwrap();
        let oil = db.catalog().get_by_id("oil").await.unwrap().unwrap();
        assert_eq!(soap.quantity, dec!(18));
        assert_eq!(oil.quantity, dec!(9));
    }

    #[tokio::test]
    async fn test_missing_item_becomes_reconciliation_entry() {
        let db = seeded_db().await;

        // A line for an item the database has never seen
        let mut catalog_items = db.load_catalog("shop-1").await.unwrap();
        catalog_items.push(item("ghost", "Ghost Item", "10", 5));
        let catalog = Catalog::new(catalog_items);

        let mut ledger = Ledger::new();
        ledger.scan("SOAP", &catalog).unwrap();
        ledger.scan("GHOST", &catalog).unwrap();
        ledger.edit_line(1, LineField::Quantity, "4").unwrap();

        let outcome = committer(&db).commit(&mut ledger).await.unwrap();

        assert_eq!(outcome.status(), CommitStatus::CommittedWithWarnings);
        let warning = outcome.warning.as_ref().unwrap();
        assert_eq!(warning.item_names(), vec!["Ghost Item"]);
        assert!(db.get_receipt(outcome.receipt_id()).await.unwrap().is_some());

        let open = db.list_unresolved().await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].item_id, "ghost");
        assert_eq!(open[0].quantity, dec!(4));
        assert_eq!(open[0].receipt_id, outcome.receipt_id());

        let soap = db.catalog().get_by_id("soap").await.unwrap().unwrap();
        assert_eq!(soap.quantity, dec!(19));
    }

    #[tokio::test]
    async fn test_receive_stock_batch() {
        let db = seeded_db().await;

        let mut row = StockInRow::new("oil", "6");
        row.cost_price = Some("175".to_string());
        let batch = StockInBatch {
            rows: vec![row, StockInRow::new("soap", "0")],
            supplier: Some("Metro".to_string()),
            note: None,
        };

        let received = receive_stock(&db, "shop-1", &batch).await.unwrap();

        assert_eq!(received.len(), 1);
        assert_eq!(received[0].on_hand, dec!(16));
        let oil = db.catalog().get_by_id("oil").await.unwrap().unwrap();
        assert_eq!(oil.cost_price, Some(Money::from_major(175)));
        assert_eq!(db.stock().list_for_item("oil").await.unwrap().len(), 1);
    }
}
