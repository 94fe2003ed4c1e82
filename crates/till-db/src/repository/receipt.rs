//! # Receipt Repository
//!
//! Receipts are written once and never updated.
//!
//! ```text
//! SaleRecord ──► BEGIN
//!                  INSERT receipts        (header, totals, shop snapshot JSON)
//!                  INSERT receipt_items   (one row per line, in ledger order)
//!                COMMIT ──► receipt id
//! ```

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use till_core::{
    PaymentMethod, Receipt, ReceiptItem, SaleRecord, ShopProfile, StaffMember, UnitOfMeasure,
};

use super::{money_text, parse_decimal, parse_money};
use crate::error::DbResult;

#[derive(Debug, FromRow)]
struct ReceiptRow {
    id: String,
    shop_id: String,
    transaction_id: String,
    customer: String,
    cashier_name: String,
    manager_name: String,
    payment_method: PaymentMethod,
    total_amount: String,
    discount: String,
    tax: String,
    payable: String,
    cash_given: String,
    change_amount: String,
    employee_id: Option<String>,
    employee_name: Option<String>,
    shop_snapshot: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct ReceiptItemRow {
    item_id: String,
    name: String,
    code: Option<String>,
    price: String,
    quantity: String,
    cost_price: String,
    unit: UnitOfMeasure,
    category: String,
}

impl TryFrom<ReceiptItemRow> for ReceiptItem {
    type Error = crate::error::DbError;

    fn try_from(row: ReceiptItemRow) -> DbResult<Self> {
        Ok(ReceiptItem {
            price: parse_money("price", &row.price)?,
            quantity: parse_decimal("quantity", &row.quantity)?,
            cost_price: parse_money("cost_price", &row.cost_price)?,
            item_id: row.item_id,
            name: row.name,
            code: row.code,
            unit: row.unit,
            category: row.category,
        })
    }
}

impl ReceiptRow {
    fn into_receipt(self, items: Vec<ReceiptItem>) -> DbResult<Receipt> {
        let shop: ShopProfile = serde_json::from_str(&self.shop_snapshot)?;
        let employee = match (self.employee_id, self.employee_name) {
            (Some(id), Some(name)) => Some(StaffMember { id, name }),
            _ => None,
        };

        Ok(Receipt {
            id: self.id,
            sale: SaleRecord {
                shop_id: self.shop_id,
                shop,
                transaction_id: self.transaction_id,
                cashier_name: self.cashier_name,
                manager_name: self.manager_name,
                customer: self.customer,
                items,
                total_amount: parse_money("total_amount", &self.total_amount)?,
                discount: parse_money("discount", &self.discount)?,
                tax: parse_money("tax", &self.tax)?,
                payable: parse_money("payable", &self.payable)?,
                payment_method: self.payment_method,
                cash_given: parse_money("cash_given", &self.cash_given)?,
                change: parse_money("change_amount", &self.change_amount)?,
                employee,
                created_at: self.created_at,
            },
        })
    }
}

/// Repository for receipts.
#[derive(Debug, Clone)]
pub struct ReceiptRepository {
    pool: SqlitePool,
}

impl ReceiptRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReceiptRepository { pool }
    }

    /// Writes a receipt and its lines atomically. Returns the new receipt id.
    pub async fn insert(&self, sale: &SaleRecord) -> DbResult<String> {
        let id = Uuid::new_v4().to_string();
        debug!(id = %id, transaction_id = %sale.transaction_id, "Inserting receipt");

        let shop_snapshot = serde_json::to_string(&sale.shop)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO receipts (
                id, shop_id, transaction_id, customer, cashier_name, manager_name,
                payment_method, total_amount, discount, tax, payable, cash_given,
                change_amount, employee_id, employee_name, shop_snapshot, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
            "#,
        )
        .bind(&id)
        .bind(&sale.shop_id)
        .bind(&sale.transaction_id)
        .bind(&sale.customer)
        .bind(&sale.cashier_name)
        .bind(&sale.manager_name)
        .bind(sale.payment_method)
        .bind(money_text(sale.total_amount))
        .bind(money_text(sale.discount))
        .bind(money_text(sale.tax))
        .bind(money_text(sale.payable))
        .bind(money_text(sale.cash_given))
        .bind(money_text(sale.change))
        .bind(sale.employee.as_ref().map(|e| e.id.clone()))
        .bind(sale.employee.as_ref().map(|e| e.name.clone()))
        .bind(shop_snapshot)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in sale.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO receipt_items (
                    receipt_id, position, item_id, name, code, price, quantity,
                    cost_price, unit, category
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )
            .bind(&id)
            .bind(position as i64)
            .bind(&item.item_id)
            .bind(&item.name)
            .bind(&item.code)
            .bind(money_text(item.price))
            .bind(item.quantity.to_string())
            .bind(money_text(item.cost_price))
            .bind(item.unit)
            .bind(&item.category)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(id)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Receipt>> {
        let row: Option<ReceiptRow> = sqlx::query_as("SELECT * FROM receipts WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let items = self.items_for(&row.id).await?;
                row.into_receipt(items).map(Some)
            }
            None => Ok(None),
        }
    }

    /// All receipts of a shop, newest first.
    pub async fn list_for_shop(&self, shop_id: &str) -> DbResult<Vec<Receipt>> {
        let rows: Vec<ReceiptRow> = sqlx::query_as(
            "SELECT * FROM receipts WHERE shop_id = ?1 ORDER BY created_at DESC",
        )
        .bind(shop_id)
        .fetch_all(&self.pool)
        .await?;

        let mut receipts = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.items_for(&row.id).await?;
            receipts.push(row.into_receipt(items)?);
        }
        Ok(receipts)
    }

    pub async fn count(&self, shop_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM receipts WHERE shop_id = ?1")
            .bind(shop_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn items_for(&self, receipt_id: &str) -> DbResult<Vec<ReceiptItem>> {
        let rows: Vec<ReceiptItemRow> = sqlx::query_as(
            r#"
            SELECT item_id, name, code, price, quantity, cost_price, unit, category
            FROM receipt_items
            WHERE receipt_id = ?1
            ORDER BY position
            "#,
        )
        .bind(receipt_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ReceiptItem::try_from).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
