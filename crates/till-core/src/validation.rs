//! # Validation Module
//!
//! Input validation utilities for Till.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Operator input (free-form text fields)                       │
//! │  ├── parse_decimal_lenient: garbage becomes 0, never NaN               │
//! │  └── Totals stay computable while the operator is still typing         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Commit gate                                                  │
//! │  ├── THIS MODULE: business rule validation                             │
//! │  └── Empty ledger, negative discount/tax                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store (NOT NULL / UNIQUE constraints)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Lenient Parsing
// =============================================================================

/// Parses free-form numeric text, treating anything unparsable as zero.
///
/// ## Rules
/// - Surrounding whitespace is ignored
/// - Plain decimals (`"12.50"`) and scientific notation (`"1e3"`) are accepted
/// - Empty input, `"NaN"`, `"abc"` all become `0`
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use till_core::validation::parse_decimal_lenient;
///
/// assert_eq!(parse_decimal_lenient("2.5"), Decimal::new(25, 1));
/// assert_eq!(parse_decimal_lenient("two"), Decimal::ZERO);
/// ```
pub fn parse_decimal_lenient(input: &str) -> Decimal {
    let input = input.trim();
    if input.is_empty() {
        return Decimal::ZERO;
    }

    Decimal::from_str(input)
        .or_else(|_| Decimal::from_scientific(input))
        .unwrap_or(Decimal::ZERO)
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product display name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_item_name;
///
/// assert!(validate_item_name("Oil 1L").is_ok());
/// assert!(validate_item_name("  ").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a scan code (SKU / barcode).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 64 characters
/// - No whitespace inside the code
pub fn validate_scan_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: 64,
        });
    }

    if code.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates that an amount is not negative.
///
/// ## Rules
/// - Zero is allowed (discount and tax default to zero)
///
/// ## Example
/// ```rust
/// use till_core::money::Money;
/// use till_core::validation::validate_non_negative;
///
/// assert!(validate_non_negative("discount", Money::zero()).is_ok());
/// assert!(validate_non_negative("discount", Money::from_major(-1)).is_err());
/// ```
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a stock-in quantity.
///
/// ## Rules
/// - Must be strictly positive
pub fn validate_stock_quantity(quantity: Decimal) -> ValidationResult<()> {
    if quantity <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
