//! # rental-core: Pure Business Logic for the Rental Backend
//!
//! This crate is the **heart** of the rental backend. It contains the pricing,
//! validation and numbering rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Rental Backend Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    rental-api (axum)                            │   │
//! │  │    /api/orders ──► /api/orders/quote ──► /api/users ...         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rental-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌──────────────┐  ┌─────────┐  │   │
//! │  │   │   types   │  │   money   │  │ order_number │  │  quote  │  │   │
//! │  │   │  Order    │  │   Money   │  │  ORD0001 ... │  │ pricing │  │   │
//! │  │   │  Catalog  │  │           │  │              │  │         │  │   │
//! │  │   └───────────┘  └───────────┘  └──────────────┘  └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO CLOCK                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    rental-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CatalogItem, Order, User, Review, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation and rental period parsing
//! - [`order_number`] - `ORDnnnn` identifiers
//! - [`quote`] - Line validation, availability and pricing
//! - [`access`] - Identity and the role capability check
//!
//! ## Example Usage
//!
//! ```rust
//! use rental_core::money::Money;
//!
//! let daily_rate = Money::from_cents(5000);
//! let one_day = daily_rate.multiply_quantity(2);
//! assert_eq!(one_day.multiply_days(3).cents(), 30000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod error;
pub mod money;
pub mod order_number;
pub mod quote;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use access::{require_identity, require_role, Identity};
pub use error::{CoreError, CoreResult, InvalidLine, UnavailableItem, ValidationError};
pub use money::Money;
pub use order_number::OrderNumber;
pub use quote::{Quote, RentalRequest};
pub use types::*;
pub use validation::RentalPeriod;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency tag attached to every quote.
pub const CURRENCY: &str = "LKR";

/// How long a quote stays valid after it is computed.
pub const QUOTE_VALIDITY_MINUTES: i64 = 30;

/// Maximum number of lines in a single order or quote.
///
/// ## Business Reason
/// Prevents runaway requests that would issue hundreds of catalog lookups.
pub const MAX_ORDER_ITEMS: usize = 100;

/// Maximum quantity of a single vehicle line.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Longest rental period accepted, in days.
pub const MAX_RENTAL_DAYS: i64 = 3650;
