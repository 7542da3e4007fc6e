//! # Domain Types
//!
//! Core domain types used throughout the rental backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CatalogItem    │   │      Order      │   │ PricedLineItem  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  key (unique)   │   │  order_id       │   │  key            │       │
//! │  │  daily_rate     │──►│  ordered_items ─┼──►│  unit_price     │       │
//! │  │  is_available   │   │  total_amount   │   │  quantity       │       │
//! │  │  rented         │   │  status         │   │  (frozen)       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │     Review      │   │  OrderStatus    │       │
//! │  │  email (unique) │   │  email (unique) │   │  Pending        │       │
//! │  │  role           │   │  rating 1-5     │   │  Approved       │       │
//! │  │  password_hash  │   │  is_approved    │   │  Rejected       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! An order never points back at the live catalog for its prices. Each
//! [`PricedLineItem`] freezes key, name, image and daily rate at booking time,
//! so a later price change does not rewrite history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::UnavailableReason;
use crate::money::Money;

// =============================================================================
// Role
// =============================================================================

/// Role carried by a user record and by the identity claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
    /// Lowercase name used on the wire and in the database.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Customer
    }
}

// =============================================================================
// Catalog Item
// =============================================================================

/// A rentable vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Business identifier, unique and immutable.
    pub key: String,

    /// Model name, also used as the display name on orders.
    pub model: String,

    pub make: String,

    pub year: i32,

    pub description: Option<String>,

    /// Image URLs; the first one is the display image.
    pub images: Vec<String>,

    /// Price per vehicle per day.
    pub daily_rate: Money,

    /// Whether the vehicle is offered at all.
    pub is_available: bool,

    /// Whether the vehicle is currently checked out.
    pub rented: bool,

    pub transmission: String,

    pub fuel_type: String,

    pub seats: i32,

    pub car_type: String,

    pub location: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl CatalogItem {
    /// The image used on order snapshots and quotes.
    pub fn display_image(&self) -> &str {
        self.images.first().map(String::as_str).unwrap_or("")
    }

    /// Why this item cannot be rented, or `None` if it can.
    ///
    /// A rented vehicle reports "Currently rented" even when it is also
    /// withdrawn from the catalog.
    pub fn unavailable_reason(&self) -> Option<UnavailableReason> {
        if self.rented {
            Some(UnavailableReason::CurrentlyRented)
        } else if !self.is_available {
            Some(UnavailableReason::NotAvailable)
        } else {
            None
        }
    }

    /// Freezes this item into an order line.
    pub fn snapshot(&self, quantity: i64) -> PricedLineItem {
        PricedLineItem {
            key: self.key.clone(),
            name: self.model.clone(),
            image: self.display_image().to_string(),
            unit_price: self.daily_rate,
            quantity,
        }
    }
}

/// Admin input for adding a vehicle to the catalog.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewCatalogItem {
    pub key: String,
    pub model: String,
    pub make: String,
    pub year: i32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub daily_rate: Money,
    #[serde(default = "default_true")]
    pub is_available: bool,
    pub transmission: String,
    pub fuel_type: String,
    pub seats: i32,
    pub car_type: String,
    #[serde(default)]
    pub location: Option<String>,
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Order Lines
// =============================================================================

/// A validated request for `quantity` units of catalog item `key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLineRequest {
    pub key: String,
    pub quantity: i64,
}

/// A line in a persisted order, frozen at booking time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricedLineItem {
    /// Catalog key at time of booking.
    pub key: String,
    /// Vehicle model at time of booking.
    pub name: String,
    /// Display image at time of booking.
    pub image: String,
    /// Daily rate at time of booking.
    pub unit_price: Money,
    pub quantity: i64,
}

impl PricedLineItem {
    /// Cost of this line for one day.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Approval state of an order.
///
/// ```text
///            ┌──► Approved
/// Pending ───┤
///            └──► Rejected
/// ```
/// No transition leaves `Approved` or `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum OrderStatus {
    Pending,
    Approved,
    Rejected,
}

impl OrderStatus {
    /// Whether `self → next` is an allowed transition.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Approved)
                | (OrderStatus::Pending, OrderStatus::Rejected)
        )
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Approved => "Approved",
            OrderStatus::Rejected => "Rejected",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Order
// =============================================================================

/// A persisted rental order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// `ORD` + zero-padded counter.
    pub order_id: String,
    /// Requester email, taken from the identity claim.
    pub email: String,
    /// Creation time, set once.
    #[ts(as = "String")]
    pub order_date: DateTime<Utc>,
    pub ordered_items: Vec<PricedLineItem>,
    pub days: i64,
    #[ts(as = "String")]
    pub starting_date: DateTime<Utc>,
    #[ts(as = "String")]
    pub ending_date: DateTime<Utc>,
    /// Σ(unit_price × quantity) × days.
    pub total_amount: Money,
    pub status: OrderStatus,
    /// True exactly when `status` is `Approved`.
    pub is_approved: bool,
}

/// An order that has passed validation and pricing but has no id yet.
///
/// The order store assigns `order_id` inside the insert transaction.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub email: String,
    pub order_date: DateTime<Utc>,
    pub ordered_items: Vec<PricedLineItem>,
    pub days: i64,
    pub starting_date: DateTime<Utc>,
    pub ending_date: DateTime<Utc>,
    pub total_amount: Money,
}

impl NewOrder {
    /// Attaches the allocated id, producing the record as it is stored.
    pub fn into_order(self, order_id: String) -> Order {
        Order {
            order_id,
            email: self.email,
            order_date: self.order_date,
            ordered_items: self.ordered_items,
            days: self.days,
            starting_date: self.starting_date,
            ending_date: self.ending_date,
            total_amount: self.total_amount,
            status: OrderStatus::Pending,
            is_approved: false,
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Argon2 PHC string. Never leaves the server.
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: String,
    pub role: Role,
    pub phone: Option<String>,
    pub profile_picture: Option<String>,
    pub is_blocked: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Review
// =============================================================================

/// A customer review, one per email.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub email: String,
    pub name: String,
    pub rating: i64,
    pub comment: String,
    pub profile_picture: Option<String>,
    pub is_approved: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(rented: bool, is_available: bool) -> CatalogItem {
        CatalogItem {
            key: "CAR-1".to_string(),
            model: "Axio".to_string(),
            make: "Toyota".to_string(),
            year: 2019,
            description: None,
            images: vec!["a.jpg".to_string(), "b.jpg".to_string()],
            daily_rate: Money::from_cents(5000),
            is_available,
            rented,
            transmission: "Auto".to_string(),
            fuel_type: "Petrol".to_string(),
            seats: 5,
            car_type: "Sedan".to_string(),
            location: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_unavailable_reason() {
        assert_eq!(item(false, true).unavailable_reason(), None);
        assert_eq!(
            item(true, true).unavailable_reason(),
            Some(UnavailableReason::CurrentlyRented)
        );
        assert_eq!(
            item(true, false).unavailable_reason(),
            Some(UnavailableReason::CurrentlyRented)
        );
        assert_eq!(
            item(false, false).unavailable_reason(),
            Some(UnavailableReason::NotAvailable)
        );
    }

    #[test]
    fn test_snapshot_freezes_first_image_and_rate() {
        let line = item(false, true).snapshot(2);
        assert_eq!(line.name, "Axio");
        assert_eq!(line.image, "a.jpg");
        assert_eq!(line.unit_price, Money::from_cents(5000));
        assert_eq!(line.line_total(), Money::from_cents(10000));
    }

    #[test]
    fn test_snapshot_without_images() {
        let mut vehicle = item(false, true);
        vehicle.images.clear();
        assert_eq!(vehicle.snapshot(1).image, "");
    }

    #[test]
    fn test_status_transitions() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Approved));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Rejected));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Approved.can_transition_to(OrderStatus::Rejected));
        assert!(!OrderStatus::Rejected.can_transition_to(OrderStatus::Approved));
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"customer\"").unwrap();
        assert_eq!(role, Role::Customer);
    }

    #[test]
    fn test_user_hash_is_not_serialized() {
        let user = User {
            email: "a@b.lk".to_string(),
            first_name: "Ann".to_string(),
            last_name: "Perera".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::Customer,
            phone: None,
            profile_picture: None,
            is_blocked: false,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["firstName"], "Ann");
        assert_eq!(user.full_name(), "Ann Perera");
    }
}
