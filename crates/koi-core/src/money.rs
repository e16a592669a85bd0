//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A checkout message built from floats can print $13.000000000000002    │
//! │  unless every caller remembers to round.                                │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    500 cents × 2 + 300 cents = 1300 cents → "$13.00"                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use koi_core::money::Money;
//!
//! let line = Money::from_cents(500).multiply_quantity(2);
//! let total: Money = [line, Money::from_cents(300)].into_iter().sum();
//!
//! assert_eq!(total.cents(), 1300);
//! assert_eq!(total.to_string(), "$13.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Matches the catalog's price column
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serializes as a bare integer**: `{"unitPrice": 500}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use koi_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use koi_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(500); // $5.00
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total.cents(), 1000); // $10.00
    /// ```
    ///
    /// ## User Workflow
    /// ```text
    /// Line item: Green Tea $5.00
    /// Quantity: 2
    ///      │
    ///      ▼
    /// multiply_quantity(2) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Checkout line: "• Green Tea (2x) - $10.00"
    /// ```
    ///
    /// Saturates at the `i64` bounds, like quantities do at `u32::MAX`.
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders `$D.CC`, the format used in the checkout message.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

/// Summing line subtotals into a cart total.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(5)), "$0.05");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_add_saturates() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);
        assert_eq!((a + b).cents(), 1500);

        let huge = Money::from_cents(i64::MAX);
        assert_eq!((huge + b).cents(), i64::MAX);
    }

    #[test]
    fn test_sum_of_line_totals() {
        let lines = [Money::from_cents(1000), Money::from_cents(300)];
        let total: Money = lines.iter().copied().sum();
        assert_eq!(total.cents(), 1300);

        let empty: Money = std::iter::empty::<Money>().sum();
        assert_eq!(empty, Money::zero());
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(299);
        let line_total = unit_price.multiply_quantity(3);
        assert_eq!(line_total.cents(), 897);
    }

    #[test]
    fn test_multiply_quantity_saturates() {
        let price = Money::from_cents(i64::MAX / 2);
        assert_eq!(price.multiply_quantity(u32::MAX).cents(), i64::MAX);

        let refund = Money::from_cents(i64::MIN / 2);
        assert_eq!(refund.multiply_quantity(u32::MAX).cents(), i64::MIN);
    }

    #[test]
    fn test_serializes_as_integer_cents() {
        let json = serde_json::to_string(&Money::from_cents(1300)).unwrap();
        assert_eq!(json, "1300");
    }
}
