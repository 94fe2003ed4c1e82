//! Commands for stock decrements that did not land.
//!
//! When a sale is saved but a stock update fails, the committer logs the
//! line here. Staff fix the count by hand and mark the entry resolved.

use tracing::info;

use till_core::ReconciliationEntry;

use crate::error::ApiError;
use crate::state::StoreState;

/// Unresolved entries, oldest first.
pub async fn list_open(stores: &StoreState) -> Result<Vec<ReconciliationEntry>, ApiError> {
    Ok(stores.reconciliation.list_unresolved().await?)
}

pub async fn resolve(stores: &StoreState, id: &str) -> Result<(), ApiError> {
    if !stores.reconciliation.resolve(id).await? {
        return Err(ApiError::not_found("Open reconciliation entry", id));
    }
    info!(id = %id, "Reconciliation entry resolved");
    Ok(())
}
