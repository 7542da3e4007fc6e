//! # Order Repository
//!
//! Database operations for orders, their line snapshots and the order
//! sequence.
//!
//! ## Order Number Allocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 create(new_order): one transaction                      │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   │                                                                     │
//! │   ├─ UPDATE order_sequence SET value = value + 1    ← takes the SQLite  │
//! │   │  WHERE name = 'orders' RETURNING value            write lock first  │
//! │   │                                                                     │
//! │   ├─ no row? ── SELECT latest order_id                                  │
//! │   │             next_after(latest) ──► INSERT order_sequence            │
//! │   │                                                                     │
//! │   ├─ INSERT orders (order_id = ORD{value:04})                           │
//! │   ├─ INSERT order_items × n                                             │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  A second writer blocks on the write lock (busy_timeout) until the      │
//! │  first commits, then increments the already-bumped counter. Numbers     │
//! │  are unique and gapless; a rolled-back insert also rolls back its bump. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use rental_core::{Money, NewOrder, Order, OrderNumber, OrderStatus, PricedLineItem};

/// Name of the counter row used for order numbers.
const ORDER_SEQUENCE: &str = "orders";

const ORDER_COLUMNS: &str = r#"
    order_id, email, order_date, days, starting_date, ending_date,
    total_amount, status, is_approved
"#;

/// Newest first; rowid breaks ties between orders created in the same instant.
const NEWEST_FIRST: &str = "ORDER BY order_date DESC, rowid DESC";

#[derive(Debug, FromRow)]
struct OrderRow {
    order_id: String,
    email: String,
    order_date: DateTime<Utc>,
    days: i64,
    starting_date: DateTime<Utc>,
    ending_date: DateTime<Utc>,
    total_amount: Money,
    status: OrderStatus,
    is_approved: bool,
}

impl OrderRow {
    fn into_order(self, ordered_items: Vec<PricedLineItem>) -> Order {
        Order {
            order_id: self.order_id,
            email: self.email,
            order_date: self.order_date,
            ordered_items,
            days: self.days,
            starting_date: self.starting_date,
            ending_date: self.ending_date,
            total_amount: self.total_amount,
            status: self.status,
            is_approved: self.is_approved,
        }
    }
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
    order_id: String,
    key: String,
    name: String,
    image: String,
    unit_price: Money,
    quantity: i64,
}

impl From<OrderItemRow> for PricedLineItem {
    fn from(row: OrderItemRow) -> Self {
        PricedLineItem {
            key: row.key,
            name: row.name,
            image: row.image,
            unit_price: row.unit_price,
            quantity: row.quantity,
        }
    }
}

/// Outcome of [`OrderRepository::update_status`].
#[derive(Debug, Clone)]
pub enum StatusUpdate {
    /// The order was `Pending` and now carries the new status.
    Applied(Order),
    /// The order had already left `Pending`; nothing was written.
    Unchanged { current: OrderStatus },
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Persists a priced order, allocating its order id.
    ///
    /// Allocation and insert share one transaction, so concurrent callers
    /// always receive distinct, consecutive ids and a failed insert leaves
    /// neither an order nor a consumed number behind.
    ///
    /// ## Errors
    /// - `DbError::Corrupt` if the sequence has to be seeded and the latest
    ///   stored order id is not `ORD` + digits
    /// - `DbError::UniqueViolation` if the id is somehow taken (the counter
    ///   was edited by hand)
    pub async fn create(&self, order: NewOrder) -> DbResult<Order> {
        let mut tx = self.pool.begin().await?;

        let number = next_order_number(&mut *tx).await?;
        let order_id = number.to_string();

        debug!(order_id = %order_id, email = %order.email, "Inserting order");

        sqlx::query(
            r#"
            INSERT INTO orders (
                order_id, email, order_date, days, starting_date, ending_date,
                total_amount, status, is_approved
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0)
            "#,
        )
        .bind(&order_id)
        .bind(&order.email)
        .bind(order.order_date)
        .bind(order.days)
        .bind(order.starting_date)
        .bind(order.ending_date)
        .bind(order.total_amount)
        .bind(OrderStatus::Pending)
        .execute(&mut *tx)
        .await?;

        for (position, item) in order.ordered_items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    order_id, position, key, name, image, unit_price, quantity
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&order_id)
            .bind(position as i64)
            .bind(&item.key)
            .bind(&item.name)
            .bind(&item.image)
            .bind(item.unit_price)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            order_id = %order_id,
            email = %order.email,
            total = %order.total_amount,
            lines = order.ordered_items.len(),
            "Order created"
        );

        Ok(order.into_order(order_id))
    }

    /// Gets an order with its lines.
    pub async fn get_by_id(&self, order_id: &str) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = ?1");
        let Some(row) = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT order_id, key, name, image, unit_price, quantity
            FROM order_items
            WHERE order_id = ?1
            ORDER BY position
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(PricedLineItem::from)
        .collect();

        Ok(Some(row.into_order(items)))
    }

    /// Lists one requester's orders, newest first.
    pub async fn list_by_email(&self, email: &str) -> DbResult<Vec<Order>> {
        debug!(email = %email, "Listing orders for requester");

        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE email = ?1 {NEWEST_FIRST}");
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(email)
            .fetch_all(&self.pool)
            .await?;

        let items = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT oi.order_id, oi.key, oi.name, oi.image, oi.unit_price, oi.quantity
            FROM order_items oi
            JOIN orders o ON o.order_id = oi.order_id
            WHERE o.email = ?1
            ORDER BY oi.order_id, oi.position
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(attach_items(rows, items))
    }

    /// Lists every order, newest first.
    pub async fn list_all(&self) -> DbResult<Vec<Order>> {
        debug!("Listing all orders");

        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders {NEWEST_FIRST}");
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let items = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT order_id, key, name, image, unit_price, quantity
            FROM order_items
            ORDER BY order_id, position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(attach_items(rows, items))
    }

    /// The most recently created order, if any.
    pub async fn find_latest(&self) -> DbResult<Option<Order>> {
        let sql = format!("SELECT order_id FROM orders {NEWEST_FIRST} LIMIT 1");
        let latest: Option<String> = sqlx::query_scalar(&sql)
            .fetch_optional(&self.pool)
            .await?;

        match latest {
            Some(order_id) => self.get_by_id(&order_id).await,
            None => Ok(None),
        }
    }

    /// Moves a `Pending` order to `status`.
    ///
    /// The update is conditional on the stored status still being
    /// `Pending`, so two concurrent decisions cannot both apply. Callers are
    /// expected to reject `Pending` as a target before calling.
    ///
    /// ## Errors
    /// `DbError::NotFound` if no order has this id.
    pub async fn update_status(&self, order_id: &str, status: OrderStatus) -> DbResult<StatusUpdate> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = ?2, is_approved = ?3
            WHERE order_id = ?1 AND status = 'Pending'
            "#,
        )
        .bind(order_id)
        .bind(status)
        .bind(status == OrderStatus::Approved)
        .execute(&self.pool)
        .await?;

        let order = self
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))?;

        if result.rows_affected() == 0 {
            debug!(order_id = %order_id, current = ?order.status, "Status unchanged");
            return Ok(StatusUpdate::Unchanged {
                current: order.status,
            });
        }

        info!(order_id = %order_id, status = ?status, "Order status updated");
        Ok(StatusUpdate::Applied(order))
    }

    /// Counts orders (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Bumps the order counter, seeding it from the latest order on first use.
///
/// Must run as the first statement of the write transaction.
async fn next_order_number(conn: &mut SqliteConnection) -> DbResult<OrderNumber> {
    let bumped: Option<i64> = sqlx::query_scalar(
        "UPDATE order_sequence SET value = value + 1 WHERE name = ?1 RETURNING value",
    )
    .bind(ORDER_SEQUENCE)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(value) = bumped {
        let value = u64::try_from(value)
            .map_err(|_| DbError::corrupt("order_sequence", format!("negative value {value}")))?;
        return Ok(OrderNumber::from_value(value));
    }

    let sql = format!("SELECT order_id FROM orders {NEWEST_FIRST} LIMIT 1");
    let latest: Option<String> = sqlx::query_scalar(&sql)
        .fetch_optional(&mut *conn)
        .await?;

    let next = OrderNumber::next_after(latest.as_deref()).map_err(|e| DbError::corrupt("orders", e))?;
    let value = i64::try_from(next.value())
        .map_err(|_| DbError::corrupt("orders", format!("order number {next} out of range")))?;

    info!(seed = %next, "Seeding order sequence");

    sqlx::query("INSERT INTO order_sequence (name, value) VALUES (?1, ?2)")
        .bind(ORDER_SEQUENCE)
        .bind(value)
        .execute(&mut *conn)
        .await?;

    Ok(next)
}

/// Groups item rows under their orders, preserving the order of `rows`.
fn attach_items(rows: Vec<OrderRow>, items: Vec<OrderItemRow>) -> Vec<Order> {
    let mut by_order: HashMap<String, Vec<PricedLineItem>> = HashMap::new();
    for item in items {
        by_order
            .entry(item.order_id.clone())
            .or_default()
            .push(item.into());
    }

    rows.into_iter()
        .map(|row| {
            let lines = by_order.remove(&row.order_id).unwrap_or_default();
            row.into_order(lines)
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
