//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Weighed goods make integer cents awkward too:                          │
//! │    0.375 kg × 1.99/kg = 0.74625  → rounding per line drifts the total  │
//! │                                                                         │
//! │  OUR SOLUTION: Decimal at full precision                                │
//! │    Every line is accumulated exactly (base-10, 28 digits)              │
//! │    Rounding to 2 places happens ONLY when a value is presented         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use till_core::money::Money;
//!
//! let price = Money::from_minor(1099); // 10.99
//! let line = price.times(Decimal::new(3, 0));
//! assert_eq!(line.to_string(), "32.97");
//! ```

use rust_decimal::prelude::RoundingStrategy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::validation::parse_decimal_lenient;

/// Number of decimal places used when a value is presented.
pub const DISPLAY_SCALE: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value kept at full decimal precision.
///
/// ## Design Decisions
/// - **Decimal (signed)**: balances go negative when the customer underpays
/// - **Single field tuple struct**: zero-cost abstraction over `Decimal`
/// - **No implicit rounding**: arithmetic never rounds, [`Money::rounded`] does
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  CatalogItem.price ──► LineItem.sale_price ──► LineItem.line_total      │
/// │                                                                         │
/// │  Σ line totals ──► total_amount ──► payable ──► balance / change        │
/// │                                                                         │
/// │  Receipt snapshot stores the same full-precision values                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from minor units (cents, paisa).
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(550).to_string(), "5.50");
    /// ```
    pub fn from_minor(minor: i64) -> Self {
        Money(Decimal::new(minor, DISPLAY_SCALE))
    }

    /// Creates a Money value from whole major units.
    pub fn from_major(major: i64) -> Self {
        Money(Decimal::from(major))
    }

    /// Parses operator input, treating anything unparsable as zero.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// assert_eq!(Money::parse_lenient("12.5"), Money::from_minor(1250));
    /// assert_eq!(Money::parse_lenient("abc"), Money::zero());
    /// assert_eq!(Money::parse_lenient(""), Money::zero());
    /// ```
    pub fn parse_lenient(input: &str) -> Self {
        Money(parse_decimal_lenient(input))
    }

    /// Returns the underlying full-precision amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns the amount rounded for presentation (2 places, half away from zero).
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Clamps negative values to zero.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(-5).non_negative(), Money::zero());
    /// assert_eq!(Money::from_major(5).non_negative(), Money::from_major(5));
    /// ```
    #[inline]
    pub fn non_negative(&self) -> Self {
        if self.is_negative() {
            Money::zero()
        } else {
            *self
        }
    }

    /// Multiplies money by a (possibly fractional) quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Rice 1kg @ 180.00
    /// Quantity: 2.5 (weighed)
    ///      │
    ///      ▼
    /// times(2.5) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line Total: 450.00
    /// ```
    #[inline]
    pub fn times(&self, quantity: Decimal) -> Self {
        Money(self.0 * quantity)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the presentation value: rounded to 2 places, no currency symbol.
///
/// ## Note
/// Currency symbols are a shop setting and are applied by the register app.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded())
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a decimal quantity.
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, quantity: Decimal) -> Self {
        self.times(quantity)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(1099);
        assert_eq!(money.amount(), dec!(10.99));
    }

    #[test]
    fn test_display_rounds_only_at_presentation() {
        assert_eq!(Money::new(dec!(10.994)).to_string(), "10.99");
        assert_eq!(Money::new(dec!(10.995)).to_string(), "11.00");
        assert_eq!(Money::from_major(5).to_string(), "5.00");
        assert_eq!(Money::new(dec!(-5.5)).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_major(10);
        let b = Money::from_major(5);

        assert_eq!(a + b, Money::from_major(15));
        assert_eq!(a - b, Money::from_major(5));
        assert_eq!(a * dec!(3), Money::from_major(30));
        assert_eq!(-a, Money::from_major(-10));
    }

    #[test]
    fn test_weighed_quantity() {
        let per_kg = Money::new(dec!(1.99));
        let line = per_kg.times(dec!(0.375));
        assert_eq!(line.amount(), dec!(0.74625));
        assert_eq!(line.to_string(), "0.75");
    }

    /// Accumulating unrounded thirds stays exact until presentation
    #[test]
    fn test_full_precision_accumulation() {
        let third = Money::new(dec!(10) / dec!(3));
        let total: Money = [third, third, third].iter().sum();
        assert_eq!(total.to_string(), "10.00");
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_major(-1);
        assert!(negative.is_negative());
        assert_eq!(negative.abs(), Money::from_major(1));
        assert_eq!(negative.non_negative(), Money::zero());
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(Money::parse_lenient(" 200 "), Money::from_major(200));
        assert_eq!(Money::parse_lenient("NaN"), Money::zero());
        assert_eq!(Money::parse_lenient("1e3"), Money::from_major(1000));
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Money::new(dec!(12.50))).unwrap();
        assert_eq!(json, "\"12.50\"");
    }
}
