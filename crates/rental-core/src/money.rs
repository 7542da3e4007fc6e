//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A rental total is rate × quantity × days summed over many lines.       │
//! │  Every one of those steps is exact in integer minor units.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rental_core::money::Money;
//!
//! let rate = Money::from_cents(5000);
//! let line = rate.multiply_quantity(2);          // 10000
//! let day = line + Money::from_cents(3000);      // 13000
//! assert_eq!(day.multiply_days(3).cents(), 39000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::CURRENCY;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic stays closed under subtraction
/// - **Single field tuple struct**: serializes as a bare JSON integer
/// - **sqlx transparent**: stored as an INTEGER column
///
/// ## Where Money is Used
/// ```text
/// CatalogItem.daily_rate ──► PricedLineItem.unit_price (frozen at booking)
///                       └──► QuoteItem.item_total ──► Quote.total
/// Order.total_amount = Σ(unit_price × quantity) × days
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from the smallest currency unit.
    ///
    /// ## Example
    /// ```rust
    /// use rental_core::money::Money;
    ///
    /// let rate = Money::from_cents(450000); // 4,500.00
    /// assert_eq!(rate.cents(), 450000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in the smallest currency unit.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiplies a daily rate by a quantity of vehicles.
    ///
    /// ## Example
    /// ```rust
    /// use rental_core::money::Money;
    ///
    /// let line = Money::from_cents(5000).multiply_quantity(2);
    /// assert_eq!(line.cents(), 10000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Multiplies a one-day cost by the rental length.
    #[inline]
    pub const fn multiply_days(&self, days: i64) -> Self {
        Money(self.0 * days)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount with the currency tag, for logs and messages.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{} {}.{:02}",
            sign,
            CURRENCY,
            self.major().abs(),
            self.minor_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, factor: i64) -> Self {
        Money(self.0 * factor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
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
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "LKR 10.99");
        assert_eq!(Money::from_cents(500000).to_string(), "LKR 5000.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-LKR 5.50");
    }

    #[test]
    fn test_rental_arithmetic() {
        // 5000 × 2 + 3000 × 1 = 13000 per day, 3 days = 39000
        let a = Money::from_cents(5000).multiply_quantity(2);
        let b = Money::from_cents(3000).multiply_quantity(1);
        let one_day: Money = [a, b].into_iter().sum();
        assert_eq!(one_day.cents(), 13000);
        assert_eq!(one_day.multiply_days(3).cents(), 39000);
        assert_eq!((one_day * 3).cents(), 39000);
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_cents(13000)).unwrap();
        assert_eq!(json, "13000");
        let back: Money = serde_json::from_str("42").unwrap();
        assert_eq!(back, Money::from_cents(42));
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_positive());
        assert!(Money::from_cents(1).is_positive());
        assert_eq!(Money::default(), Money::zero());
        assert_eq!((Money::from_cents(10) - Money::from_cents(4)).cents(), 6);
    }
}
