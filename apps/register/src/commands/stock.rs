//! Stock-in commands.

use serde::Serialize;
use tracing::warn;

use till_commit::{receive_stock, CommitError, ReceivedStock};
use till_core::StockInBatch;

use crate::commands::catalog::reload_catalog;
use crate::error::ApiError;
use crate::state::{SessionState, StoreState};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockInResponse {
    pub received: Vec<ReceivedStock>,
}

/// Records a delivery and refreshes the catalog snapshot.
///
/// Blank or zero-quantity rows are dropped. If a row fails, the rows
/// before it stay applied and the error says how many there were.
pub async fn receive_stock_batch(
    session: &SessionState,
    stores: &StoreState,
    shop_id: &str,
    batch: &StockInBatch,
) -> Result<StockInResponse, ApiError> {
    let result = receive_stock(&*stores.inventory, shop_id, batch).await;

    // Partial batches still moved stock.
    if !matches!(result, Err(CommitError::Validation(_))) {
        if let Err(e) = reload_catalog(session, stores, shop_id).await {
            warn!(error = %e, "Catalog refresh after stock-in failed");
        }
    }

    Ok(StockInResponse { received: result? })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rust_decimal_macros::dec;
    use till_commit::memory::{test_item, MemoryStore};
    use till_core::{Catalog, Money, StockInRow};

    use crate::error::ErrorCode;

    fn setup() -> (Arc<MemoryStore>, SessionState, StoreState) {
        let store = Arc::new(MemoryStore::with_items(vec![
            test_item("oil", "Oil 1L", 200, 10),
            test_item("soap", "Soap", 50, 20),
        ]));
        let stores = StoreState::shared(Arc::clone(&store));
        (store, SessionState::new(Catalog::default()), stores)
    }

    #[tokio::test]
    async fn test_receive_updates_catalog() {
        let (store, session, stores) = setup();
        let batch = StockInBatch {
            rows: vec![
                StockInRow {
                    item_id: Some("oil".to_string()),
                    quantity: "5".to_string(),
                    cost_price: Some("160".to_string()),
                },
                StockInRow::default(),
            ],
            supplier: Some("Metro".to_string()),
            note: None,
        };

        let response = receive_stock_batch(&session, &stores, "shop-1", &batch)
            .await
            .unwrap();

        assert_eq!(response.received.len(), 1);
        assert_eq!(store.on_hand("oil").await, Some(dec!(15)));

        let oil = session
            .with_catalog(|c| c.find_by_id("oil").cloned())
            .await
            .unwrap();
        assert_eq!(oil.quantity, dec!(15));
        assert_eq!(oil.cost_price, Some(Money::from_major(160)));
    }

    #[tokio::test]
    async fn test_empty_batch_is_validation_error() {
        let (store, session, stores) = setup();
        let batch = StockInBatch {
            rows: vec![StockInRow::new("oil", "0")],
            ..Default::default()
        };

        let err = receive_stock_batch(&session, &stores, "shop-1", &batch)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(store.stock_entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_item_stops_batch() {
        let (store, session, stores) = setup();
        let batch = StockInBatch {
            rows: vec![
                StockInRow::new("soap", "4"),
                StockInRow::new("ghost", "1"),
                StockInRow::new("oil", "1"),
            ],
            ..Default::default()
        };

        let err = receive_stock_batch(&session, &stores, "shop-1", &batch)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::StockError);
        assert_eq!(store.on_hand("soap").await, Some(dec!(24)));
        assert_eq!(store.on_hand("oil").await, Some(dec!(10)));
        let soap = session.with_catalog(|c| c.find_by_id("soap").map(|i| i.quantity)).await;
        assert_eq!(soap, Some(dec!(24)));
    }
}
