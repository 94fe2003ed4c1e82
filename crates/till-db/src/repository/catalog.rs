//! # Catalog Repository
//!
//! Items and their on-hand quantities.
//!
//! ## Stock Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Version-Guarded Read-Modify-Write                          │
//! │                                                                         │
//! │  SELECT quantity, version FROM items WHERE id = ?   → ("20", 7)        │
//! │       │                                                                 │
//! │       ▼   new = 20 − 3  (Decimal, outside SQL)                          │
//! │  UPDATE items SET quantity = '17', version = 8                         │
//! │   WHERE id = ? AND version = 7                                         │
//! │       │                                                                 │
//! │       ├── 1 row  → done                                                │
//! │       └── 0 rows → another register got there first, read again       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Quantities are decimal TEXT, so SQLite cannot do the arithmetic itself.
//! The version check keeps two concurrent sales from both writing a value
//! computed from the same stale read.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::{debug, warn};

use till_core::validation::{validate_item_name, validate_scan_code};
use till_core::{CatalogItem, UnitOfMeasure};

use super::{money_text, parse_decimal, parse_money, parse_optional_money};
use crate::error::{DbError, DbResult};

/// How many times a stock update re-reads after losing a version race.
pub const MAX_UPDATE_ATTEMPTS: u32 = 5;

#[derive(Debug, FromRow)]
struct ItemRow {
    id: String,
    shop_id: String,
    name: String,
    code: Option<String>,
    price: String,
    cost_price: Option<String>,
    quantity: String,
    unit: UnitOfMeasure,
    category: String,
}

impl TryFrom<ItemRow> for CatalogItem {
    type Error = DbError;

    fn try_from(row: ItemRow) -> DbResult<Self> {
        Ok(CatalogItem {
            price: parse_money("price", &row.price)?,
            cost_price: parse_optional_money("cost_price", row.cost_price.as_deref())?,
            quantity: parse_decimal("quantity", &row.quantity)?,
            id: row.id,
            shop_id: row.shop_id,
            name: row.name,
            code: row.code,
            unit: row.unit,
            category: row.category,
        })
    }
}

/// Repository for catalog items.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// All items of a shop, sorted by name.
    pub async fn list_for_shop(&self, shop_id: &str) -> DbResult<Vec<CatalogItem>> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            r#"
            SELECT id, shop_id, name, code, price, cost_price, quantity, unit, category
            FROM items
            WHERE shop_id = ?1
            ORDER BY name
            "#,
        )
        .bind(shop_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(shop_id = %shop_id, count = rows.len(), "Loaded catalog");
        rows.into_iter().map(CatalogItem::try_from).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CatalogItem>> {
        let row: Option<ItemRow> = sqlx::query_as(
            r#"
            SELECT id, shop_id, name, code, price, cost_price, quantity, unit, category
            FROM items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CatalogItem::try_from).transpose()
    }

    /// Looks up an item by scan code, ignoring case.
    pub async fn get_by_code(&self, shop_id: &str, code: &str) -> DbResult<Option<CatalogItem>> {
        let row: Option<ItemRow> = sqlx::query_as(
            r#"
            SELECT id, shop_id, name, code, price, cost_price, quantity, unit, category
            FROM items
            WHERE shop_id = ?1 AND code = ?2 COLLATE NOCASE
            "#,
        )
        .bind(shop_id)
        .bind(code.trim())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CatalogItem::try_from).transpose()
    }

    /// Inserts an item after checking its name and scan code.
    pub async fn insert(&self, item: &CatalogItem) -> DbResult<()> {
        validate_item_name(&item.name)?;
        if let Some(code) = &item.code {
            validate_scan_code(code)?;
        }
        debug!(id = %item.id, name = %item.name, "Inserting item");
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO items (
                id, shop_id, name, code, price, cost_price, quantity, unit, category,
                version, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, ?10, ?10)
            "#,
        )
        .bind(&item.id)
        .bind(&item.shop_id)
        .bind(&item.name)
        .bind(&item.code)
        .bind(money_text(item.price))
        .bind(item.cost_price.map(money_text))
        .bind(item.quantity.to_string())
        .bind(item.unit)
        .bind(&item.category)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn count(&self, shop_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE shop_id = ?1")
            .bind(shop_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Reduces on-hand quantity and returns the new value.
    ///
    /// Stock may go negative (the sale already happened); that is logged.
    pub async fn decrement(&self, id: &str, quantity: Decimal) -> DbResult<Decimal> {
        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            let mut conn = self.pool.acquire().await?;
            if let Some(on_hand) = adjust_quantity(&mut conn, id, -quantity).await? {
                if on_hand < Decimal::ZERO {
                    warn!(id = %id, on_hand = %on_hand, "Stock is negative");
                }
                return Ok(on_hand);
            }
            debug!(id = %id, attempt, "Stock update lost a version race, retrying");
        }

        Err(DbError::conflict("item", id))
    }
}

/// Applies `delta` to an item's quantity if nobody changed it since the read.
///
/// ## Returns
/// - `Ok(Some(new_quantity))` when the update applied
/// - `Ok(None)` when the version moved underneath us
/// - `Err(NotFound)` when the item does not exist
pub(crate) async fn adjust_quantity(
    conn: &mut SqliteConnection,
    id: &str,
    delta: Decimal,
) -> DbResult<Option<Decimal>> {
    let (quantity, version) = read_stock(conn, id).await?;
    write_stock(conn, id, quantity + delta, version).await
}

/// Current on-hand quantity and version of an item.
async fn read_stock(conn: &mut SqliteConnection, id: &str) -> DbResult<(Decimal, i64)> {
    let current: Option<(String, i64)> =
        sqlx::query_as("SELECT quantity, version FROM items WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

    let (quantity, version) = current.ok_or_else(|| DbError::not_found("item", id))?;
    Ok((parse_decimal("quantity", &quantity)?, version))
}

/// Writes `updated` only if the row still carries `version`.
async fn write_stock(
    conn: &mut SqliteConnection,
    id: &str,
    updated: Decimal,
    version: i64,
) -> DbResult<Option<Decimal>> {
    let result = sqlx::query(
        r#"
        UPDATE items
        SET quantity = ?1, version = version + 1, updated_at = ?2
        WHERE id = ?3 AND version = ?4
        "#,
    )
    .bind(updated.to_string())
    .bind(Utc::now())
    .bind(id)
    .bind(version)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    Ok(Some(updated))
}

/// Overwrites an item's cost price (latest purchase price wins).
pub(crate) async fn set_cost_price(
    conn: &mut SqliteConnection,
    id: &str,
    cost_price: &str,
) -> DbResult<()> {
    sqlx::query("UPDATE items SET cost_price = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(cost_price)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{file_db, item, memory_db, remove_file_db, seeded_db};
    use rust_decimal_macros::dec;
    use till_core::Money;

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = seeded_db().await;

        let items = db.catalog().list_for_shop("shop-1").await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Oil 1L");
        assert_eq!(items[0].price, Money::from_major(200));
        assert_eq!(db.catalog().count("shop-1").await.unwrap(), 2);
        assert!(db.catalog().list_for_shop("shop-2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fractional_values_round_trip_exactly() {
        let db = memory_db().await;
        let mut rice = item("rice", "Rice", "1.99", 0);
        rice.quantity = dec!(12.375);
        rice.cost_price = Some(Money::new(dec!(1.4525)));
        rice.unit = UnitOfMeasure::Kg;
        db.catalog().insert(&rice).await.unwrap();

        let loaded = db.catalog().get_by_id("rice").await.unwrap().unwrap();
        assert_eq!(loaded, rice);
    }

    #[tokio::test]
    async fn test_get_by_code_ignores_case() {
        let db = seeded_db().await;
        let found = db.catalog().get_by_code("shop-1", "soap").await.unwrap();
        assert_eq!(found.map(|i| i.id), Some("soap".to_string()));
        assert!(db.catalog().get_by_code("shop-1", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_code_is_rejected() {
        let db = seeded_db().await;
        let mut clash = item("soap-2", "Soap Large", "80", 1);
        clash.code = Some("soap".to_string());

        let err = db.catalog().insert(&clash).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_decrement() {
        let db = seeded_db().await;

        assert_eq!(db.catalog().decrement("soap", dec!(3)).await.unwrap(), dec!(17));
        assert_eq!(db.catalog().decrement("soap", dec!(0.5)).await.unwrap(), dec!(16.5));

        let soap = db.catalog().get_by_id("soap").await.unwrap().unwrap();
        assert_eq!(soap.quantity, dec!(16.5));
    }

    #[tokio::test]
    async fn test_decrement_may_go_negative() {
        let db = seeded_db().await;
        assert_eq!(db.catalog().decrement("oil", dec!(12)).await.unwrap(), dec!(-2));
    }

    #[tokio::test]
    async fn test_decrement_unknown_item() {
        let db = seeded_db().await;
        let err = db.catalog().decrement("ghost", dec!(1)).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_adjust_reads_current_version() {
        let db = seeded_db().await;
        let mut conn = db.pool().acquire().await.unwrap();

        sqlx::query("UPDATE items SET version = version + 1 WHERE id = 'soap'")
            .execute(&mut *conn)
            .await
            .unwrap();

        // A fresh read sees the new version and applies
        let applied = adjust_quantity(&mut conn, "soap", dec!(-1)).await.unwrap();
        assert_eq!(applied, Some(dec!(19)));
    }

    #[tokio::test]
    async fn test_stale_version_write_is_refused() {
        let db = seeded_db().await;
        let mut conn = db.pool().acquire().await.unwrap();

        let (quantity, version) = read_stock(&mut conn, "soap").await.unwrap();

        // Another register sells one in between
        assert_eq!(
            adjust_quantity(&mut conn, "soap", dec!(-1)).await.unwrap(),
            Some(dec!(19))
        );

        let stale = write_stock(&mut conn, "soap", quantity - dec!(2), version)
            .await
            .unwrap();
        assert_eq!(stale, None);

        let (quantity, _) = read_stock(&mut conn, "soap").await.unwrap();
        assert_eq!(quantity, dec!(19));
    }

    #[tokio::test]
    async fn test_invalid_name_or_code_is_rejected() {
        let db = memory_db().await;

        let blank = item("blank", "   ", "10", 1);
        let err = db.catalog().insert(&blank).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        let mut spaced = item("spaced", "Spaced Code", "10", 1);
        spaced.code = Some("ABC 123".to_string());
        let err = db.catalog().insert(&spaced).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        assert_eq!(db.catalog().count("shop-1").await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_decrements_lose_nothing() {
        let (db, path) = file_db("race").await;
        db.catalog().insert(&item("soap", "Soap", "50", 100)).await.unwrap();

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let catalog = db.catalog();
                tokio::spawn(async move { catalog.decrement("soap", dec!(1)).await })
            })
            .collect();

        let mut applied = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => applied += 1,
                Err(DbError::Conflict { .. }) => {}
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        let soap = db.catalog().get_by_id("soap").await.unwrap().unwrap();
        assert!(applied > 0);
        assert_eq!(soap.quantity, Decimal::from(100 - applied));

        remove_file_db(db, &path).await;
    }
}
