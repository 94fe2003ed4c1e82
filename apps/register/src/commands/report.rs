//! Sales reporting commands.

use chrono::{Local, NaiveDate};

use till_core::{Receipt, SalesPeriod, SalesSummary};

use crate::error::ApiError;
use crate::state::StoreState;

/// Totals for the receipts saved on `day`, by the register's local clock.
pub async fn sales_summary(
    stores: &StoreState,
    shop_id: &str,
    day: NaiveDate,
) -> Result<SalesSummary, ApiError> {
    let period = SalesPeriod::day(day, &Local)
        .ok_or_else(|| ApiError::validation(format!("No local midnight on {}", day)))?;
    let receipts = stores.receipts.list_receipts(shop_id).await?;
    Ok(SalesSummary::from_receipts(&receipts, &period))
}

pub async fn get_receipt(stores: &StoreState, id: &str) -> Result<Receipt, ApiError> {
    stores
        .receipts
        .get_receipt(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Receipt", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use till_commit::memory::MemoryStore;

    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_empty_shop_summary() {
        let stores = StoreState::shared(Arc::new(MemoryStore::new()));

        let today = Local::now().date_naive();

        let summary = sales_summary(&stores, "shop-1", today).await.unwrap();

        assert_eq!(summary.receipt_count, 0);
        assert!(summary.recent.is_empty());
        assert!(summary.period.contains(chrono::Utc::now()));
    }

    #[tokio::test]
    async fn test_missing_receipt_is_not_found() {
        let stores = StoreState::shared(Arc::new(MemoryStore::new()));

        let err = get_receipt(&stores, "nope").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
