//! # Stock Receiving
//!
//! Applies a stock-in batch to the inventory store.
//!
//! ```text
//! StockInBatch ──► validated() ──► row 1 ──► row 2 ──► ... ──► row N
//!                     │              │         │
//!                     │              ok        fails ──► Err(StockIn { applied: 1 })
//!                     ▼
//!              EmptyStockBatch
//! ```
//!
//! Rows are applied one at a time, in input order. The first failure stops
//! the batch; rows already applied stay applied.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use till_core::{StockEntry, StockInBatch};

use crate::error::{CommitError, CommitResult};
use crate::store::InventoryStore;

/// A stock-in row that was applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedStock {
    pub entry: StockEntry,
    /// On-hand quantity after the increment.
    pub on_hand: Decimal,
}

/// Validates a stock-in batch and applies each row as an inventory increment.
///
/// ## Errors
/// - `Validation(EmptyStockBatch)` when no row names an item with a positive
///   quantity; nothing is written
/// - `StockIn` when a row fails; earlier rows remain applied
pub async fn receive_stock(
    inventory: &dyn InventoryStore,
    shop_id: &str,
    batch: &StockInBatch,
) -> CommitResult<Vec<ReceivedStock>> {
    let lines = batch.validated()?;
    let supplier = batch.supplier();
    let note = batch.note();

    let mut received = Vec::with_capacity(lines.len());
    for line in lines {
        let entry = StockEntry {
            id: Uuid::new_v4().to_string(),
            shop_id: shop_id.to_string(),
            item_id: line.item_id,
            quantity: line.quantity,
            cost_price: line.cost_price,
            supplier: supplier.clone(),
            note: note.clone(),
            created_at: Utc::now(),
        };

        match inventory.receive_stock(&entry).await {
            Ok(on_hand) => received.push(ReceivedStock { entry, on_hand }),
            Err(source) => {
                warn!(item_id = %entry.item_id, applied = received.len(), error = %source, "Stock-in stopped");
                return Err(CommitError::StockIn {
                    applied: received.len(),
                    item_id: entry.item_id,
                    source,
                });
            }
        }
    }

    info!(shop_id = %shop_id, rows = received.len(), "Stock received");
    Ok(received)
}
