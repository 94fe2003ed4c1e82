//! # API Error Type
//!
//! Unified error type for register commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Register                           │
//! │                                                                         │
//! │  Shell line ("scan 123")                                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │  CoreError::UnknownCode ───────────────► NOT_FOUND               │  │
//! │  │  CommitError::Validation ──────────────► VALIDATION_ERROR        │  │
//! │  │  CommitError::Persistence ─────────────► PERSISTENCE_ERROR       │  │
//! │  │  StoreError (retryable) ───────────────► STORE_UNAVAILABLE       │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  "error [NOT_FOUND]: No catalog item with code '123'"                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A commit that saved the receipt but missed some stock updates is not an
//! error; it comes back as a successful response carrying a warning.

use serde::Serialize;
use till_commit::{CommitError, StoreError};
use till_core::{CoreError, ValidationError};
use till_db::DbError;

use crate::state::ConfigError;

/// API error returned from register commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Please add at least one item",
///   "retryable": false
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Whether repeating the same command may succeed
    pub retryable: bool,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Item, line, receipt or staff member not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// The receipt could not be saved; nothing was written
    PersistenceError,

    /// A stock-in batch stopped part way
    StockError,

    /// The store is busy or unreachable
    StoreUnavailable,

    /// Database operation failed
    DatabaseError,

    /// Configuration is missing or invalid
    ConfigError,

    /// Internal error
    Internal,
}

impl ErrorCode {
    /// The serialized form, e.g. `NOT_FOUND`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::PersistenceError => "PERSISTENCE_ERROR",
            ErrorCode::StockError => "STOCK_ERROR",
            ErrorCode::StoreUnavailable => "STORE_UNAVAILABLE",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            retryable: false,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    fn retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LineNotFound { .. } | CoreError::UnknownCode(_) | CoreError::UnknownProduct(_) => {
                ApiError::new(ErrorCode::NotFound, err.to_string())
            }
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let retryable = err.is_retryable();
        let code = match &err {
            StoreError::NotFound { .. } => ErrorCode::NotFound,
            StoreError::Unavailable(_) | StoreError::Timeout(_) | StoreError::Conflict { .. } => {
                ErrorCode::StoreUnavailable
            }
            StoreError::Rejected(_) => ErrorCode::ValidationError,
            StoreError::Internal(e) => {
                tracing::error!("Store error: {}", e);
                ErrorCode::Internal
            }
        };
        ApiError::new(code, err.to_string()).retryable(retryable)
    }
}

/// Converts commit errors to API errors.
impl From<CommitError> for ApiError {
    fn from(err: CommitError) -> Self {
        let retryable = err.is_retryable();
        match err {
            CommitError::Validation(e) => ApiError::from(e),
            CommitError::Persistence(_) => {
                ApiError::new(ErrorCode::PersistenceError, err.to_string()).retryable(retryable)
            }
            CommitError::StockIn { .. } => {
                ApiError::new(ErrorCode::StockError, err.to_string()).retryable(retryable)
            }
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            other => {
                tracing::error!("Database error: {}", other);
                ApiError::from(StoreError::from(other))
            }
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}
