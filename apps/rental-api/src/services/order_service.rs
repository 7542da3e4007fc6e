//! Order service: creation pipeline, listing and status decisions.
//!
//! ## Creation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  identity? ──► validate_for_order ──────► per line: get_by_key         │
//! │     │              │                          │  missing ──► 404        │
//! │    401            400                         │  rented  ──► 400        │
//! │                                               ▼                         │
//! │                  order_total ──► OrderRepository::create (one tx)       │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │                               ORDnnnn, Pending                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure before the final transaction leaves the store untouched.
//! A taken order id inside that transaction is a store fault (500), never a
//! client error.
//! Availability is read without a lock; two customers may book the same
//! vehicle and an admin resolves that when approving.

use chrono::Utc;
use tracing::{debug, info};

use rental_core::quote::{order_total, price_order_line};
use rental_core::{
    require_identity, require_role, CoreError, Identity, NewOrder, Order, OrderStatus,
    RentalRequest, Role,
};
use rental_db::repository::order::StatusUpdate;
use rental_db::{Database, DbError};

use crate::error::{ApiError, ApiResult};

/// Order service implementation.
#[derive(Debug, Clone)]
pub struct OrderService {
    db: Database,
}

impl OrderService {
    /// Create a new order service.
    pub fn new(db: Database) -> Self {
        OrderService { db }
    }

    /// Validates, prices and persists an order for the caller.
    pub async fn create_order(
        &self,
        identity: Option<&Identity>,
        request: &RentalRequest,
    ) -> ApiResult<Order> {
        let identity = require_identity(identity)?;
        let rental = request.validate_for_order()?;

        // One lookup per line, stopping at the first problem
        let catalog = self.db.catalog();
        let mut ordered_items = Vec::with_capacity(rental.lines.len());
        for line in &rental.lines {
            let item = catalog
                .get_by_key(&line.key)
                .await?
                .ok_or_else(|| CoreError::ItemsNotFound {
                    keys: vec![line.key.clone()],
                })?;
            ordered_items.push(price_order_line(&item, line.quantity)?);
        }

        let total_amount = order_total(&ordered_items, rental.period.days);

        let order = self
            .db
            .orders()
            .create(NewOrder {
                email: identity.email.clone(),
                order_date: Utc::now(),
                ordered_items,
                days: rental.period.days,
                starting_date: rental.period.start,
                ending_date: rental.period.end,
                total_amount,
            })
            .await
            .map_err(|e| match e {
                DbError::UniqueViolation { .. } => ApiError::internal(e),
                other => ApiError::from(other),
            })?;

        info!(
            order_id = %order.order_id,
            email = %order.email,
            total = %order.total_amount,
            days = order.days,
            "Order created"
        );

        Ok(order)
    }

    /// Customers see their own orders, admins see every order.
    pub async fn list_orders(&self, identity: Option<&Identity>) -> ApiResult<Vec<Order>> {
        let identity = require_role(identity, &[Role::Customer, Role::Admin])?;

        let orders = match identity.role {
            Role::Admin => self.db.orders().list_all().await?,
            Role::Customer => self.db.orders().list_by_email(&identity.email).await?,
        };

        debug!(email = %identity.email, count = orders.len(), "Listed orders");
        Ok(orders)
    }

    /// Approves or rejects a pending order.
    pub async fn update_order_status(
        &self,
        identity: Option<&Identity>,
        order_id: &str,
        status: OrderStatus,
    ) -> ApiResult<Order> {
        require_role(identity, &[Role::Admin])?;

        // Only decisions are accepted; the store re-checks `Pending` atomically
        if !OrderStatus::Pending.can_transition_to(status) {
            let current = self
                .db
                .orders()
                .get_by_id(order_id)
                .await?
                .ok_or_else(|| CoreError::OrderNotFound(order_id.to_string()))?
                .status;
            return Err(CoreError::InvalidStatusTransition {
                order_id: order_id.to_string(),
                current,
                requested: status,
            }
            .into());
        }

        match self.db.orders().update_status(order_id, status).await? {
            StatusUpdate::Applied(order) => Ok(order),
            StatusUpdate::Unchanged { current } => Err(CoreError::InvalidStatusTransition {
                order_id: order_id.to_string(),
                current,
                requested: status,
            }
            .into()),
        }
    }
}
