//! # Checkout Command
//!
//! Commits the sale being rung.
//!
//! ## Commit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Flow                                        │
//! │                                                                         │
//! │  commit_sale()                                                          │
//! │       │                                                                 │
//! │       ├── lock ledger (held until the commit returns)                   │
//! │       │                                                                 │
//! │       ├── committer.commit()                                            │
//! │       │      ├── Validation ──────► error, ledger untouched             │
//! │       │      ├── Persistence ─────► error, ledger untouched             │
//! │       │      └── saved ───────────► stock decremented, ledger reset     │
//! │       │                                                                 │
//! │       └── reload catalog (on-hand figures moved)                        │
//! │                                                                         │
//! │  CommitResponse { status: committed | committed_with_warnings, ... }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{info, warn};

use till_commit::{CommitOutcome, CommitStatus, TransactionCommitter};
use till_core::Money;

use crate::commands::catalog::reload_catalog;
use crate::error::ApiError;
use crate::state::{SessionState, StoreState};

/// Result of a successful commit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResponse {
    pub receipt_id: String,
    pub transaction_id: String,
    pub status: CommitStatus,
    pub payable: Money,
    pub change: Money,
    /// Set when the receipt was saved but some stock updates were not.
    pub warning: Option<String>,
    /// Items whose stock update has to be reconciled by hand.
    pub unsynced_items: Vec<String>,
}

impl From<&CommitOutcome> for CommitResponse {
    fn from(outcome: &CommitOutcome) -> Self {
        let sale = &outcome.receipt.sale;
        CommitResponse {
            receipt_id: outcome.receipt_id().to_string(),
            transaction_id: sale.transaction_id.clone(),
            status: outcome.status(),
            payable: sale.payable,
            change: sale.change,
            warning: outcome.warning.as_ref().map(|w| w.to_string()),
            unsynced_items: outcome
                .warning
                .as_ref()
                .map(|w| w.item_names().into_iter().map(str::to_string).collect())
                .unwrap_or_default(),
        }
    }
}

/// Commits the current ledger as a sale.
///
/// The ledger is locked for the whole commit; a second submit waits and
/// then finds an empty ledger.
pub async fn commit_sale(
    session: &SessionState,
    committer: &TransactionCommitter,
    stores: &StoreState,
    shop_id: &str,
) -> Result<CommitResponse, ApiError> {
    let response = {
        let mut ledger = session.lock_ledger().await;
        let outcome = committer.commit(&mut ledger).await?;
        CommitResponse::from(&outcome)
    };

    info!(
        receipt_id = %response.receipt_id,
        status = ?response.status,
        "commit_sale command"
    );

    if let Err(e) = reload_catalog(session, stores, shop_id).await {
        warn!(error = %e, "Catalog refresh after commit failed");
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rust_decimal_macros::dec;
    use till_commit::memory::{test_item, MemoryStore};
    use till_commit::{InventoryStore, ReceiptStore, ReconciliationLog};
    use till_core::Catalog;

    use crate::commands::ledger::{edit_line, get_ledger, scan_item, set_tendered};
    use crate::error::ErrorCode;
    use crate::state::RegisterConfig;

    struct Fixture {
        store: Arc<MemoryStore>,
        session: SessionState,
        stores: StoreState,
        committer: TransactionCommitter,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::with_items(vec![
            test_item("oil", "Oil 1L", 200, 10),
            test_item("soap", "Soap", 50, 20),
        ]));
        let stores = StoreState::shared(Arc::clone(&store));
        let session = SessionState::new(Catalog::default());
        reload_catalog(&session, &stores, "shop-1").await.unwrap();

        let config = RegisterConfig {
            shop_id: "shop-1".to_string(),
            ..Default::default()
        };
        let receipts: Arc<dyn ReceiptStore> = store.clone();
        let inventory: Arc<dyn InventoryStore> = store.clone();
        let log: Arc<dyn ReconciliationLog> = store.clone();
        let committer = TransactionCommitter::new(config.shop_context(), receipts, inventory)
            .with_reconciliation_log(log);

        Fixture {
            store,
            session,
            stores,
            committer,
        }
    }

    #[tokio::test]
    async fn test_empty_ledger_is_rejected() {
        let f = fixture().await;

        let err = commit_sale(&f.session, &f.committer, &f.stores, "shop-1")
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(f.store.receipts().await.is_empty());
    }

    #[tokio::test]
    async fn test_commit_saves_and_refreshes_catalog() {
        let f = fixture().await;
        scan_item(&f.session, "soap").await.unwrap();
        edit_line(&f.session, 0, "qty", "2").await.unwrap();
        scan_item(&f.session, "oil").await.unwrap();
        set_tendered(&f.session, "500").await;
        let before = get_ledger(&f.session).await.transaction_id;

        let response = commit_sale(&f.session, &f.committer, &f.stores, "shop-1")
            .await
            .unwrap();

        assert_eq!(response.status, CommitStatus::Committed);
        assert_eq!(response.transaction_id, before);
        assert_eq!(response.payable, Money::from_major(300));
        assert_eq!(response.change, Money::from_major(200));
        assert!(response.warning.is_none());

        let ledger = get_ledger(&f.session).await;
        assert!(ledger.lines.is_empty());
        assert_ne!(ledger.transaction_id, before);

        let soap = f
            .session
            .with_catalog(|c| c.find_by_id("soap").map(|i| i.quantity))
            .await;
        assert_eq!(soap, Some(dec!(18)));
    }

    #[tokio::test]
    async fn test_failed_decrement_is_a_warning() {
        let f = fixture().await;
        f.store.fail_decrements_for("soap").await;
        scan_item(&f.session, "soap").await.unwrap();
        scan_item(&f.session, "oil").await.unwrap();

        let response = commit_sale(&f.session, &f.committer, &f.stores, "shop-1")
            .await
            .unwrap();

        assert_eq!(response.status, CommitStatus::CommittedWithWarnings);
        assert_eq!(response.unsynced_items, vec!["Soap".to_string()]);
        assert!(response.warning.unwrap().contains("Soap"));
        assert_eq!(f.store.on_hand("oil").await, Some(dec!(9)));
        assert_eq!(f.store.on_hand("soap").await, Some(dec!(20)));
        assert!(get_ledger(&f.session).await.lines.is_empty());
    }
}
