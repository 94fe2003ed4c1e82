//! # Transaction Committer
//!
//! Packages a finished ledger into a persisted receipt and applies the
//! matching inventory decrements.
//!
//! ## Commit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        commit(&mut ledger)                              │
//! │                                                                         │
//! │  1. validate ──── empty / negative discount or tax ──► Err(Validation)  │
//! │        │                                                                │
//! │  2. snapshot ──── SaleRecord (value copies, ledger's transaction id)    │
//! │        │                                                                │
//! │  3. save_receipt ─── fails ──────────────────────────► Err(Persistence) │
//! │        │                                     (no inventory touched)     │
//! │        ▼                                                                │
//! │  4. decrement_stock × N ─── issued together, all awaited                │
//! │        │        └── failures collected, written to reconciliation log   │
//! │        ▼                                                                │
//! │  5. print (spawned, never awaited by the commit)                        │
//! │        │                                                                │
//! │  6. ledger.reset()                                                      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  Ok(CommitOutcome { receipt, warning })                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Once the receipt is written there is no rollback. A failed decrement
//! leaves the catalog quantity stale; the outcome names every such line.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use till_core::{Ledger, Receipt, ReceiptItem, ReconciliationEntry, ShopContext};

use crate::error::{CommitError, CommitResult};
use crate::store::{InventoryStore, ReceiptPrinter, ReceiptStore, ReconciliationLog, StoreError};

// =============================================================================
// Outcome Types
// =============================================================================

/// One inventory decrement that did not apply.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecrementFailure {
    pub item_id: String,
    pub item_name: String,
    pub quantity: Decimal,
    pub reason: String,
    pub retryable: bool,
}

/// The receipt was saved but some stock levels were not updated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationWarning {
    pub receipt_id: String,
    pub failures: Vec<DecrementFailure>,
}

impl ReconciliationWarning {
    /// Names of the lines whose stock was not updated, in ledger order.
    pub fn item_names(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.item_name.as_str()).collect()
    }
}

impl fmt::Display for ReconciliationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Receipt {} saved, but stock was not updated for: {}",
            self.receipt_id,
            self.item_names().join(", ")
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitStatus {
    Committed,
    CommittedWithWarnings,
}

/// What a successful commit produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitOutcome {
    pub receipt: Receipt,
    pub warning: Option<ReconciliationWarning>,
}

impl CommitOutcome {
    pub fn receipt_id(&self) -> &str {
        &self.receipt.id
    }

    pub fn status(&self) -> CommitStatus {
        match self.warning {
            Some(_) => CommitStatus::CommittedWithWarnings,
            None => CommitStatus::Committed,
        }
    }
}

// =============================================================================
// Committer
// =============================================================================

/// Commits ledgers for one shop.
///
/// ## Example
/// ```rust,ignore
/// let committer = TransactionCommitter::new(context, receipts, inventory)
///     .with_printer(printer)
///     .with_reconciliation_log(log);
///
/// let outcome = committer.commit(&mut ledger).await?;
/// if let Some(warning) = &outcome.warning {
///     show_banner(warning.to_string());
/// }
/// ```
#[derive(Clone)]
pub struct TransactionCommitter {
    context: ShopContext,
    receipts: Arc<dyn ReceiptStore>,
    inventory: Arc<dyn InventoryStore>,
    printer: Option<Arc<dyn ReceiptPrinter>>,
    reconciliation: Option<Arc<dyn ReconciliationLog>>,
}

impl TransactionCommitter {
    pub fn new(
        context: ShopContext,
        receipts: Arc<dyn ReceiptStore>,
        inventory: Arc<dyn InventoryStore>,
    ) -> Self {
        TransactionCommitter {
            context,
            receipts,
            inventory,
            printer: None,
            reconciliation: None,
        }
    }

    /// Prints every committed receipt in the background.
    pub fn with_printer(mut self, printer: Arc<dyn ReceiptPrinter>) -> Self {
        self.printer = Some(printer);
        self
    }

    /// Records failed decrements for later correction.
    pub fn with_reconciliation_log(mut self, log: Arc<dyn ReconciliationLog>) -> Self {
        self.reconciliation = Some(log);
        self
    }

    pub fn context(&self) -> &ShopContext {
        &self.context
    }

    /// Commits the ledger. See the module docs for the full sequence.
    ///
    /// ## Errors
    /// - `Validation`: the ledger was left untouched, nothing was written
    /// - `Persistence`: the ledger was left untouched, no inventory changed
    ///
    /// On `Ok` the ledger has been reset for the next sale.
    pub async fn commit(&self, ledger: &mut Ledger) -> CommitResult<CommitOutcome> {
        ledger.validate_for_commit()?;

        let sale = ledger.to_sale_record(&self.context, Utc::now());
        let transaction_id = sale.transaction_id.clone();

        let receipt_id = self.receipts.save_receipt(&sale).await.map_err(|e| {
            error!(transaction_id = %transaction_id, error = %e, "Receipt save failed");
            CommitError::Persistence(e)
        })?;

        info!(
            receipt_id = %receipt_id,
            transaction_id = %transaction_id,
            lines = sale.items.len(),
            payable = %sale.payable,
            "Receipt saved"
        );

        let receipt = Receipt {
            id: receipt_id,
            sale,
        };

        let failures = self.apply_decrements(&receipt.sale.items).await;
        let warning = if failures.is_empty() {
            None
        } else {
            self.record_for_reconciliation(&receipt.id, &failures).await;
            Some(ReconciliationWarning {
                receipt_id: receipt.id.clone(),
                failures,
            })
        };

        if let Some(printer) = &self.printer {
            spawn_print(Arc::clone(printer), receipt.clone());
        }

        ledger.reset();

        Ok(CommitOutcome { receipt, warning })
    }

    /// Issues every decrement at once and returns the ones that failed.
    async fn apply_decrements(&self, items: &[ReceiptItem]) -> Vec<DecrementFailure> {
        let sold: Vec<&ReceiptItem> = items
            .iter()
            .filter(|item| {
                if item.quantity > Decimal::ZERO {
                    return true;
                }
                if item.quantity < Decimal::ZERO {
                    warn!(item_id = %item.item_id, quantity = %item.quantity, "Negative quantity line not decremented");
                }
                false
            })
            .collect();

        let results = join_all(sold.iter().map(|item| {
            let inventory = Arc::clone(&self.inventory);
            async move {
                let result = inventory.decrement_stock(&item.item_id, item.quantity).await;
                (*item, result)
            }
        }))
        .await;

        results
            .into_iter()
            .filter_map(|(item, result)| match result {
                Ok(on_hand) => {
                    if on_hand < Decimal::ZERO {
                        warn!(item_id = %item.item_id, on_hand = %on_hand, "Stock went negative");
                    }
                    debug!(item_id = %item.item_id, on_hand = %on_hand, "Stock decremented");
                    None
                }
                Err(e) => {
                    warn!(item_id = %item.item_id, item = %item.name, error = %e, "Stock decrement failed");
                    Some(failure(item, &e))
                }
            })
            .collect()
    }

    async fn record_for_reconciliation(&self, receipt_id: &str, failures: &[DecrementFailure]) {
        let Some(log) = &self.reconciliation else {
            return;
        };

        for failure in failures {
            let entry = ReconciliationEntry {
                id: Uuid::new_v4().to_string(),
                receipt_id: receipt_id.to_string(),
                item_id: failure.item_id.clone(),
                item_name: failure.item_name.clone(),
                quantity: failure.quantity,
                reason: failure.reason.clone(),
                created_at: Utc::now(),
                resolved_at: None,
            };
            if let Err(e) = log.record(&entry).await {
                error!(receipt_id = %receipt_id, item_id = %entry.item_id, error = %e, "Could not record reconciliation entry");
            }
        }
    }
}

fn failure(item: &ReceiptItem, err: &StoreError) -> DecrementFailure {
    DecrementFailure {
        item_id: item.item_id.clone(),
        item_name: item.name.clone(),
        quantity: item.quantity,
        reason: err.to_string(),
        retryable: err.is_retryable(),
    }
}

fn spawn_print(printer: Arc<dyn ReceiptPrinter>, receipt: Receipt) {
    tokio::spawn(async move {
        match printer.print_receipt(&receipt).await {
            Ok(()) => debug!(receipt_id = %receipt.id, "Receipt printed"),
            Err(e) => warn!(receipt_id = %receipt.id, error = %e, "Receipt print failed"),
        }
    });
}

// =============================================================================
// Unit Tests
// =============================================================================
