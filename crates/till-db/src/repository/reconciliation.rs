//! # Reconciliation Repository
//!
//! Stock decrements that failed after their receipt was saved. Each open
//! entry means the item's on-hand quantity is too high by `quantity`.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::info;

use till_core::ReconciliationEntry;

use super::parse_decimal;
use crate::error::{DbError, DbResult};

#[derive(Debug, FromRow)]
struct ReconciliationRow {
    id: String,
    receipt_id: String,
    item_id: String,
    item_name: String,
    quantity: String,
    reason: String,
    created_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReconciliationRow> for ReconciliationEntry {
    type Error = DbError;

    fn try_from(row: ReconciliationRow) -> DbResult<Self> {
        Ok(ReconciliationEntry {
            quantity: parse_decimal("quantity", &row.quantity)?,
            id: row.id,
            receipt_id: row.receipt_id,
            item_id: row.item_id,
            item_name: row.item_name,
            reason: row.reason,
            created_at: row.created_at,
            resolved_at: row.resolved_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ReconciliationRepository {
    pool: SqlitePool,
}

impl ReconciliationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReconciliationRepository { pool }
    }

    pub async fn insert(&self, entry: &ReconciliationEntry) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reconciliation_entries (
                id, receipt_id, item_id, item_name, quantity, reason, created_at, resolved_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.receipt_id)
        .bind(&entry.item_id)
        .bind(&entry.item_name)
        .bind(entry.quantity.to_string())
        .bind(&entry.reason)
        .bind(entry.created_at)
        .bind(entry.resolved_at)
        .execute(&self.pool)
        .await?;

        info!(receipt_id = %entry.receipt_id, item_id = %entry.item_id, "Reconciliation entry recorded");
        Ok(())
    }

    /// Open entries, oldest first.
    pub async fn list_unresolved(&self) -> DbResult<Vec<ReconciliationEntry>> {
        let rows: Vec<ReconciliationRow> = sqlx::query_as(
            "SELECT * FROM reconciliation_entries WHERE resolved_at IS NULL ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ReconciliationEntry::try_from).collect()
    }

    /// Marks an open entry resolved. Returns false if there was none.
    pub async fn resolve(&self, id: &str) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE reconciliation_entries SET resolved_at = ?1 WHERE id = ?2 AND resolved_at IS NULL",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
