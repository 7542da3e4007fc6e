//! # Order Numbers
//!
//! Human-readable order identifiers: `ORD` followed by a counter padded to at
//! least four digits.
//!
//! ```text
//!   1      → ORD0001
//!   42     → ORD0042
//!   12345  → ORD12345   (never truncated)
//! ```
//!
//! This module only knows how to read and write the format. Handing out the
//! next number atomically is the order store's job (see
//! `rental_db::OrderRepository::create`).

use std::fmt;

use crate::error::{CoreError, CoreResult};

const PREFIX: &str = "ORD";

/// A parsed order number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderNumber(u64);

impl OrderNumber {
    /// The number given to the very first order.
    pub const fn first() -> Self {
        OrderNumber(1)
    }

    pub const fn from_value(value: u64) -> Self {
        OrderNumber(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    /// The number after this one, or `None` once the counter is exhausted.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(OrderNumber)
    }

    /// Parses `ORD` + ASCII digits.
    ///
    /// ## Example
    /// ```rust
    /// use rental_core::OrderNumber;
    ///
    /// assert_eq!(OrderNumber::parse("ORD0042").unwrap().value(), 42);
    /// assert!(OrderNumber::parse("ORDX1").is_err());
    /// ```
    pub fn parse(order_id: &str) -> CoreResult<Self> {
        let digits = order_id
            .strip_prefix(PREFIX)
            .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| CoreError::MalformedOrderId(order_id.to_string()))?;

        digits
            .parse::<u64>()
            .map(OrderNumber)
            .map_err(|_| CoreError::MalformedOrderId(order_id.to_string()))
    }

    /// Computes the number following the most recently created order.
    ///
    /// `None` means no order exists yet.
    pub fn next_after(latest: Option<&str>) -> CoreResult<Self> {
        match latest {
            None => Ok(OrderNumber::first()),
            Some(id) => OrderNumber::parse(id)?
                .next()
                .ok_or_else(|| CoreError::MalformedOrderId(id.to_string())),
        }
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:04}", PREFIX, self.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
