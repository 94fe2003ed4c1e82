//! # Stock Repository
//!
//! Stock-in entries. Recording an entry and raising the item's quantity
//! happen in one transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use till_core::StockEntry;

use super::catalog::{adjust_quantity, set_cost_price, MAX_UPDATE_ATTEMPTS};
use super::{money_text, parse_decimal, parse_optional_money};
use crate::error::{DbError, DbResult};

#[derive(Debug, FromRow)]
struct StockEntryRow {
    id: String,
    shop_id: String,
    item_id: String,
    quantity: String,
    cost_price: Option<String>,
    supplier: Option<String>,
    note: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<StockEntryRow> for StockEntry {
    type Error = DbError;

    fn try_from(row: StockEntryRow) -> DbResult<Self> {
        Ok(StockEntry {
            quantity: parse_decimal("quantity", &row.quantity)?,
            cost_price: parse_optional_money("cost_price", row.cost_price.as_deref())?,
            id: row.id,
            shop_id: row.shop_id,
            item_id: row.item_id,
            supplier: row.supplier,
            note: row.note,
            created_at: row.created_at,
        })
    }
}

/// Repository for stock-in entries.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Records the entry and adds its quantity to the item.
    ///
    /// A cost price on the entry replaces the item's cost price.
    /// Returns the item's new on-hand quantity.
    pub async fn receive(&self, entry: &StockEntry) -> DbResult<Decimal> {
        debug!(item_id = %entry.item_id, quantity = %entry.quantity, "Receiving stock");

        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            let mut tx = self.pool.begin().await?;

            let Some(on_hand) = adjust_quantity(&mut *tx, &entry.item_id, entry.quantity).await?
            else {
                tx.rollback().await?;
                debug!(item_id = %entry.item_id, attempt, "Stock-in lost a version race, retrying");
                continue;
            };

            if let Some(cost) = entry.cost_price {
                set_cost_price(&mut *tx, &entry.item_id, &money_text(cost)).await?;
            }

            sqlx::query(
                r#"
                INSERT INTO stock_entries (
                    id, shop_id, item_id, quantity, cost_price, supplier, note, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&entry.id)
            .bind(&entry.shop_id)
            .bind(&entry.item_id)
            .bind(entry.quantity.to_string())
            .bind(entry.cost_price.map(money_text))
            .bind(&entry.supplier)
            .bind(&entry.note)
            .bind(entry.created_at)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            return Ok(on_hand);
        }

        Err(DbError::conflict("item", &entry.item_id))
    }

    /// Entries for one item, newest first.
    pub async fn list_for_item(&self, item_id: &str) -> DbResult<Vec<StockEntry>> {
        let rows: Vec<StockEntryRow> = sqlx::query_as(
            "SELECT * FROM stock_entries WHERE item_id = ?1 ORDER BY created_at DESC",
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(StockEntry::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::seeded_db;
    use rust_decimal_macros::dec;
    use till_core::Money;

    fn entry(item_id: &str, quantity: Decimal, cost: Option<Money>) -> StockEntry {
        StockEntry {
            id: uuid::Uuid::new_v4().to_string(),
            shop_id: "shop-1".to_string(),
            item_id: item_id.to_string(),
            quantity,
            cost_price: cost,
            supplier: Some("Metro".to_string()),
            note: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_receive_raises_quantity_and_records_entry() {
        let db = seeded_db().await;

        let on_hand = db
            .stock()
            .receive(&entry("oil", dec!(12), Some(Money::from_major(170))))
            .await
            .unwrap();
        assert_eq!(on_hand, dec!(22));

        let oil = db.catalog().get_by_id("oil").await.unwrap().unwrap();
        assert_eq!(oil.quantity, dec!(22));
        assert_eq!(oil.cost_price, Some(Money::from_major(170)));

        let entries = db.stock().list_for_item("oil").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].supplier.as_deref(), Some("Metro"));
    }

    #[tokio::test]
    async fn test_receive_unknown_item_writes_nothing() {
        let db = seeded_db().await;

        let err = db.stock().receive(&entry("ghost", dec!(1), None)).await.unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
        assert!(db.stock().list_for_item("ghost").await.unwrap().is_empty());
    }
}
