//! # Error Types
//!
//! Domain-specific error types for rental-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rental-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  rental-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  rental-api errors                                                     │
//! │  └── ApiError         - What the HTTP client sees                      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (key, order id, ...)
//! 3. Errors that carry a list (missing keys, unavailable vehicles) keep the
//!    list as data so the API can return it verbatim

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

use crate::types::{OrderStatus, Role};

// =============================================================================
// Error Payloads
// =============================================================================

/// A submitted order line that failed shape validation.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvalidLine {
    /// Position of the line in the request.
    pub index: usize,
    /// The key as submitted, if any.
    pub key: Option<String>,
    /// The quantity as submitted, if any.
    #[ts(type = "unknown")]
    pub qty: Option<serde_json::Value>,
    pub reason: String,
}

/// Why a catalog item cannot be rented right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub enum UnavailableReason {
    #[serde(rename = "Currently rented")]
    CurrentlyRented,
    #[serde(rename = "Not available")]
    NotAvailable,
}

/// A catalog item that exists but is not rentable.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct UnavailableItem {
    pub key: String,
    pub model: String,
    pub reason: UnavailableReason,
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They are translated to HTTP responses in rental-api.
#[derive(Debug, Error)]
pub enum CoreError {
    /// One or more order lines are malformed.
    #[error("Invalid items in order")]
    InvalidItems(Vec<InvalidLine>),

    /// Requested catalog keys that do not exist.
    ///
    /// ## When This Occurs
    /// - Quote: every key missing from the batch lookup, in request order
    /// - Order creation: the first key that failed its lookup
    #[error("Vehicles not found: {}", keys.join(", "))]
    ItemsNotFound { keys: Vec<String> },

    /// Requested catalog items that exist but are rented or withdrawn.
    #[error("Some vehicles are not available")]
    ItemsUnavailable { items: Vec<UnavailableItem> },

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Review not found.
    #[error("Review not found: {0}")]
    ReviewNotFound(String),

    /// User not found.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Order is not in a state that allows the requested transition.
    ///
    /// ## When This Occurs
    /// - Approving or rejecting an order that was already decided
    /// - Requesting `Pending` as a target status
    #[error("Order {order_id} is {current:?}, cannot change it to {requested:?}")]
    InvalidStatusTransition {
        order_id: String,
        current: OrderStatus,
        requested: OrderStatus,
    },

    /// A stored order identifier is not `ORD` followed by digits.
    ///
    /// This is an internal error: the allocator refuses to guess a number.
    #[error("Malformed order id: {0:?}")]
    MalformedOrderId(String),

    /// Request carries no identity.
    #[error("Please login and try again")]
    Unauthenticated,

    /// Identity present but its role is not allowed.
    #[error("You are not authorized to perform this action (requires {required:?})")]
    Forbidden { required: Vec<Role> },

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any store access.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid email, invalid key).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Order or quote submitted without lines.
    #[error("At least one vehicle must be selected")]
    NoItems,

    /// Order or quote has more lines than allowed.
    #[error("An order cannot have more than {max} items")]
    TooManyItems { max: usize },

    /// A rental date did not parse.
    #[error("Invalid date format for {field} (use YYYY-MM-DD)")]
    InvalidDate { field: String },

    /// Rental period is empty or reversed.
    #[error("End date must be after start date")]
    EndBeforeStart,

    /// Client-supplied day count disagrees with the date range.
    #[error("days ({given}) does not match the rental period ({computed} days)")]
    DaysMismatch { given: i64, computed: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ItemsNotFound {
            keys: vec!["CAR-1".to_string(), "VAN-2".to_string()],
        };
        assert_eq!(err.to_string(), "Vehicles not found: CAR-1, VAN-2");

        let err = CoreError::InvalidStatusTransition {
            order_id: "ORD0003".to_string(),
            current: OrderStatus::Approved,
            requested: OrderStatus::Rejected,
        };
        assert_eq!(
            err.to_string(),
            "Order ORD0003 is Approved, cannot change it to Rejected"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::NoItems.to_string(),
            "At least one vehicle must be selected"
        );
        assert_eq!(
            ValidationError::EndBeforeStart.to_string(),
            "End date must be after start date"
        );
        let err = ValidationError::Required {
            field: "email".to_string(),
        };
        assert_eq!(err.to_string(), "email is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::NoItems.into();
        assert!(matches!(core_err, CoreError::Validation(ValidationError::NoItems)));
        assert_eq!(core_err.to_string(), "At least one vehicle must be selected");
    }

    #[test]
    fn test_unavailable_reason_serializes_as_text() {
        let item = UnavailableItem {
            key: "CAR-1".to_string(),
            model: "Axio".to_string(),
            reason: UnavailableReason::CurrentlyRented,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["reason"], "Currently rented");
    }
}
