//! Catalog commands.

use tracing::{debug, info};

use till_core::{Catalog, CatalogItem};

use crate::error::ApiError;
use crate::state::{SessionState, StoreState};

/// Reloads the shop's catalog from the store and swaps it into the session.
///
/// Returns the number of items loaded.
pub async fn reload_catalog(
    session: &SessionState,
    stores: &StoreState,
    shop_id: &str,
) -> Result<usize, ApiError> {
    let items = stores.catalog.load_catalog(shop_id).await?;
    let catalog = Catalog::new(items);
    let count = catalog.len();

    session.replace_catalog(catalog).await;
    info!(shop_id = %shop_id, items = count, "Catalog loaded");
    Ok(count)
}

/// Items whose name contains `query`, for picking by name.
pub async fn search_catalog(session: &SessionState, query: &str) -> Vec<CatalogItem> {
    debug!(query = %query, "search_catalog command");
    session
        .with_catalog(|catalog| catalog.search(query).into_iter().cloned().collect())
        .await
}
