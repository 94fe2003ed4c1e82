//! # Commit Error Types
//!
//! ```text
//! commit() outcome                  How it surfaces
//! ───────────────────────────────   ──────────────────────────────────────
//! empty ledger / bad input          Err(CommitError::Validation)
//! receipt write failed              Err(CommitError::Persistence)
//! receipt saved, decrements failed  Ok(CommitOutcome { warning: Some(..) })
//! everything applied                Ok(CommitOutcome { warning: None })
//! ```

use thiserror::Error;

use till_core::ValidationError;

use crate::store::StoreError;

/// Result type alias for commit operations.
pub type CommitResult<T> = Result<T, CommitError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CommitError {
    /// Input was rejected before anything was written.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The receipt could not be written. Nothing else was touched.
    #[error("Failed to save receipt: {0}")]
    Persistence(#[source] StoreError),

    /// A stock-in batch stopped part way.
    ///
    /// Rows before `item_id` were applied and stay applied.
    #[error("Stock update failed for {item_id} after {applied} row(s) were applied: {source}")]
    StockIn {
        applied: usize,
        item_id: String,
        #[source]
        source: StoreError,
    },
}

impl CommitError {
    /// Returns true if repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            CommitError::Validation(_) => false,
            CommitError::Persistence(e) => e.is_retryable(),
            CommitError::StockIn { source, .. } => source.is_retryable(),
        }
    }
}
