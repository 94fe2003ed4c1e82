//! # In-Memory Store
//!
//! A single `MemoryStore` implementing every store trait, with switches to
//! make individual calls fail. Used by tests and demos that should not need
//! a database.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use till_core::{
    CatalogItem, Money, Receipt, ReconciliationEntry, SaleRecord, StaffMember, StockEntry,
    UnitOfMeasure, DEFAULT_CATEGORY,
};

use crate::store::{
    CatalogStore, InventoryStore, ReceiptPrinter, ReceiptStore, ReconciliationLog,
    StaffDirectory, StoreError, StoreResult,
};

#[derive(Default)]
struct Inner {
    items: Vec<CatalogItem>,
    receipts: Vec<Receipt>,
    stock_entries: Vec<StockEntry>,
    reconciliation: Vec<ReconciliationEntry>,
    staff: Vec<StaffMember>,
    printed: Vec<String>,
    failing_items: HashSet<String>,
    receipt_failure: Option<StoreError>,
    print_failure: bool,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<CatalogItem>) -> Self {
        MemoryStore {
            inner: Mutex::new(Inner {
                items,
                ..Default::default()
            }),
        }
    }

    pub async fn add_staff(&self, member: StaffMember) {
        self.inner.lock().await.staff.push(member);
    }

    /// Makes every decrement and stock-in for `item_id` fail.
    pub async fn fail_decrements_for(&self, item_id: &str) {
        self.inner.lock().await.failing_items.insert(item_id.to_string());
    }

    pub async fn fail_receipt_saves(&self, err: StoreError) {
        self.inner.lock().await.receipt_failure = Some(err);
    }

    pub async fn fail_prints(&self) {
        self.inner.lock().await.print_failure = true;
    }

    pub async fn items(&self) -> Vec<CatalogItem> {
        self.inner.lock().await.items.clone()
    }

    pub async fn on_hand(&self, item_id: &str) -> Option<Decimal> {
        let inner = self.inner.lock().await;
        inner.items.iter().find(|i| i.id == item_id).map(|i| i.quantity)
    }

    pub async fn receipts(&self) -> Vec<Receipt> {
        self.inner.lock().await.receipts.clone()
    }

    pub async fn stock_entries(&self) -> Vec<StockEntry> {
        self.inner.lock().await.stock_entries.clone()
    }

    /// Ids of printed receipts, in print order.
    pub async fn printed(&self) -> Vec<String> {
        self.inner.lock().await.printed.clone()
    }
}

impl Inner {
    fn adjust(&mut self, item_id: &str, delta: Decimal) -> StoreResult<Decimal> {
        if self.failing_items.contains(item_id) {
            return Err(StoreError::Unavailable(format!("write to {} refused", item_id)));
        }
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| StoreError::not_found("item", item_id))?;
        item.quantity += delta;
        Ok(item.quantity)
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn load_catalog(&self, shop_id: &str) -> StoreResult<Vec<CatalogItem>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .items
            .iter()
            .filter(|i| i.shop_id == shop_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReceiptStore for MemoryStore {
    async fn save_receipt(&self, sale: &SaleRecord) -> StoreResult<String> {
        let mut inner = self.inner.lock().await;
        if let Some(err) = &inner.receipt_failure {
            return Err(err.clone());
        }
        let id = format!("rcpt-{}", inner.receipts.len() + 1);
        inner.receipts.push(Receipt {
            id: id.clone(),
            sale: sale.clone(),
        });
        Ok(id)
    }

    async fn get_receipt(&self, id: &str) -> StoreResult<Option<Receipt>> {
        let inner = self.inner.lock().await;
        Ok(inner.receipts.iter().find(|r| r.id == id).cloned())
    }

    async fn list_receipts(&self, shop_id: &str) -> StoreResult<Vec<Receipt>> {
        let inner = self.inner.lock().await;
        let mut receipts: Vec<Receipt> = inner
            .receipts
            .iter()
            .filter(|r| r.sale.shop_id == shop_id)
            .cloned()
            .collect();
        receipts.sort_by(|a, b| b.sale.created_at.cmp(&a.sale.created_at));
        Ok(receipts)
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn decrement_stock(&self, item_id: &str, quantity: Decimal) -> StoreResult<Decimal> {
        self.inner.lock().await.adjust(item_id, -quantity)
    }

    async fn receive_stock(&self, entry: &StockEntry) -> StoreResult<Decimal> {
        let mut inner = self.inner.lock().await;
        let on_hand = inner.adjust(&entry.item_id, entry.quantity)?;
        if let Some(cost) = entry.cost_price {
            if let Some(item) = inner.items.iter_mut().find(|i| i.id == entry.item_id) {
                item.cost_price = Some(cost);
            }
        }
        inner.stock_entries.push(entry.clone());
        Ok(on_hand)
    }
}

#[async_trait]
impl ReceiptPrinter for MemoryStore {
    async fn print_receipt(&self, receipt: &Receipt) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        if inner.print_failure {
            return Err(StoreError::Unavailable("printer offline".to_string()));
        }
        inner.printed.push(receipt.id.clone());
        Ok(())
    }
}

#[async_trait]
impl ReconciliationLog for MemoryStore {
    async fn record(&self, entry: &ReconciliationEntry) -> StoreResult<()> {
        self.inner.lock().await.reconciliation.push(entry.clone());
        Ok(())
    }

    async fn list_unresolved(&self) -> StoreResult<Vec<ReconciliationEntry>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .reconciliation
            .iter()
            .filter(|e| e.resolved_at.is_none())
            .cloned()
            .collect())
    }

    async fn resolve(&self, id: &str) -> StoreResult<bool> {
        let mut inner = self.inner.lock().await;
        match inner
            .reconciliation
            .iter_mut()
            .find(|e| e.id == id && e.resolved_at.is_none())
        {
            Some(entry) => {
                entry.resolved_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl StaffDirectory for MemoryStore {
    async fn list_staff(&self, _shop_id: &str) -> StoreResult<Vec<StaffMember>> {
        Ok(self.inner.lock().await.staff.clone())
    }
}

/// A discrete-unit catalog item in `shop-1`.
pub fn test_item(id: &str, name: &str, price: i64, on_hand: i64) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        shop_id: "shop-1".to_string(),
        name: name.to_string(),
        code: Some(id.to_uppercase()),
        price: Money::from_major(price),
        cost_price: None,
        quantity: Decimal::from(on_hand),
        unit: UnitOfMeasure::Units,
        category: DEFAULT_CATEGORY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_resolve_only_open_entries() {
        let store = MemoryStore::new();
        let entry = ReconciliationEntry {
            id: "rec-1".to_string(),
            receipt_id: "rcpt-1".to_string(),
            item_id: "soap".to_string(),
            item_name: "Soap".to_string(),
            quantity: dec!(3),
            reason: "offline".to_string(),
            created_at: Utc::now(),
            resolved_at: None,
        };
        store.record(&entry).await.unwrap();

        assert!(store.resolve("rec-1").await.unwrap());
        assert!(!store.resolve("rec-1").await.unwrap());
        assert!(store.list_unresolved().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_decrement_unknown_item() {
        let store = MemoryStore::new();
        let err = store.decrement_stock("ghost", dec!(1)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
