//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  till-core errors (this file)                                          │
//! │  ├── CoreError        - Ledger / catalog lookup failures               │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  till-commit errors (separate crate)                                   │
//! │  ├── StoreError       - External store call failed                     │
//! │  └── CommitError      - Validation | Persistence                       │
//! │                                                                         │
//! │  till-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Register app errors                                                   │
//! │  └── ApiError         - What the operator sees (serialized)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Ledger and catalog errors.
///
/// These are operator mistakes that can be corrected and retried;
/// none of them leave partial state behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A line index does not exist in the ledger.
    ///
    /// ## When This Occurs
    /// - The operator edits or removes a row that was already removed
    /// - A stale index arrives after the ledger was reset by a commit
    #[error("Line {index} does not exist (ledger has {len} lines)")]
    LineNotFound { index: usize, len: usize },

    /// No catalog item carries the scanned code.
    #[error("No catalog item with code '{0}'")]
    UnknownCode(String),

    /// No catalog item has the selected name.
    #[error("Product not found in stock: {0}")]
    UnknownProduct(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These block an operation before any side effect happens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The ledger has no lines to commit.
    #[error("Please add at least one item")]
    EmptyLedger,

    /// A stock-in batch has no usable rows.
    #[error("Add at least one item and quantity")]
    EmptyStockBatch,

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
