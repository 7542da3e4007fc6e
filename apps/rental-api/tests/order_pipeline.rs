//! Order creation and quoting, driven through the services against an
//! in-memory database.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;

use rental_api::services::{OrderService, QuoteService};
use rental_core::quote::RawOrderLine;
use rental_core::{Money, OrderStatus, RentalRequest};

use common::{admin, customer, rental, seeded_db, three_days};

// ---------------------------------------------------------------------------
// Order ids
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sequential_orders_get_consecutive_ids() {
    let db = seeded_db().await;
    let orders = OrderService::new(db.clone());

    let mut ids = Vec::new();
    for email in ["ann@example.lk", "ben@example.lk", "ann@example.lk"] {
        let order = orders
            .create_order(Some(&customer(email)), &three_days(&[("CAR-A", 1)]))
            .await
            .unwrap();
        ids.push(order.order_id);
    }

    assert_eq!(ids, vec!["ORD0001", "ORD0002", "ORD0003"]);
}

#[tokio::test]
async fn created_order_is_pending_with_snapshot() {
    let db = seeded_db().await;

    let order = OrderService::new(db.clone())
        .create_order(Some(&customer("ann@example.lk")), &three_days(&[("CAR-A", 2), ("CAR-B", 1)]))
        .await
        .unwrap();

    assert_eq!(order.email, "ann@example.lk");
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(!order.is_approved);
    assert_eq!(order.days, 3);
    assert_eq!(order.ordered_items.len(), 2);
    assert_eq!(order.ordered_items[0].key, "CAR-A");
    assert_eq!(order.ordered_items[0].name, "Model CAR-A");
    assert_eq!(order.ordered_items[0].unit_price, Money::from_cents(5000));
    assert_eq!(order.ordered_items[0].quantity, 2);
}

#[tokio::test]
async fn total_is_daily_sum_times_days() {
    let db = seeded_db().await;

    // 5000 × 2 + 3000 × 1 = 13000 per day, 3 days
    let order = OrderService::new(db.clone())
        .create_order(Some(&customer("ann@example.lk")), &three_days(&[("CAR-A", 2), ("CAR-B", 1)]))
        .await
        .unwrap();

    assert_eq!(order.total_amount, Money::from_cents(39000));
}

// ---------------------------------------------------------------------------
// Creation failures persist nothing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_requires_identity() {
    let db = seeded_db().await;

    let err = OrderService::new(db.clone())
        .create_order(None, &three_days(&[("CAR-A", 1)]))
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(err.message(), "Please login and try again");
    assert_eq!(db.orders().count().await.unwrap(), 0);
}

#[tokio::test]
async fn unknown_key_fails_and_persists_nothing() {
    let db = seeded_db().await;

    let err = OrderService::new(db.clone())
        .create_order(
            Some(&customer("ann@example.lk")),
            &three_days(&[("CAR-A", 1), ("GHOST-9", 1)]),
        )
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert_eq!(err.message(), "Product with key GHOST-9 not found");
    assert_eq!(db.orders().count().await.unwrap(), 0);
}

#[tokio::test]
async fn unavailable_second_item_persists_nothing() {
    let db = seeded_db().await;

    let err = OrderService::new(db.clone())
        .create_order(
            Some(&customer("ann@example.lk")),
            &three_days(&[("CAR-A", 1), ("VAN-C", 1), ("CAR-B", 1)]),
        )
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.message(), "Product with key VAN-C is not available");
    assert_eq!(db.orders().count().await.unwrap(), 0);

    // The failed attempt consumed no number
    let order = OrderService::new(db.clone())
        .create_order(Some(&customer("ann@example.lk")), &three_days(&[("CAR-A", 1)]))
        .await
        .unwrap();
    assert_eq!(order.order_id, "ORD0001");
}

#[tokio::test]
async fn taken_order_id_is_a_server_error() {
    let db = seeded_db().await;
    let orders = OrderService::new(db.clone());
    let ann = customer("ann@example.lk");

    orders
        .create_order(Some(&ann), &three_days(&[("CAR-A", 1)]))
        .await
        .unwrap();

    // A row written behind the counter's back takes the next id
    sqlx::query(
        r#"
        INSERT INTO orders (order_id, email, order_date, days, starting_date,
                            ending_date, total_amount, status, is_approved)
        VALUES ('ORD0002', 'old@example.lk', ?1, 1, ?1, ?1, 100, 'Pending', 0)
        "#,
    )
    .bind(Utc::now())
    .execute(db.pool())
    .await
    .unwrap();

    let err = orders
        .create_order(Some(&ann), &three_days(&[("CAR-B", 1)]))
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(db.orders().count().await.unwrap(), 2);
}

#[tokio::test]
async fn create_defaults_missing_quantity_to_one() {
    let db = seeded_db().await;

    let request = RentalRequest {
        ordered_items: vec![RawOrderLine {
            key: Some("CAR-A".to_string()),
            qty: None,
        }],
        ..three_days(&[])
    };
    let order = OrderService::new(db.clone())
        .create_order(Some(&customer("ann@example.lk")), &request)
        .await
        .unwrap();

    assert_eq!(order.ordered_items[0].quantity, 1);
    assert_eq!(order.total_amount, Money::from_cents(15000));
}

#[tokio::test]
async fn create_rejects_reversed_and_empty_periods() {
    let db = seeded_db().await;
    let orders = OrderService::new(db.clone());
    let ann = customer("ann@example.lk");

    for (start, end) in [("2026-03-04", "2026-03-01"), ("2026-03-01", "2026-03-01")] {
        let err = orders
            .create_order(Some(&ann), &rental(&[("CAR-A", 1)], start, end))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "End date must be after start date");
    }

    assert_eq!(db.orders().count().await.unwrap(), 0);
}

#[tokio::test]
async fn create_rejects_mismatched_day_count() {
    let db = seeded_db().await;

    let request = RentalRequest {
        days: Some(5),
        ..three_days(&[("CAR-A", 1)])
    };
    let err = OrderService::new(db.clone())
        .create_order(Some(&customer("ann@example.lk")), &request)
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(db.orders().count().await.unwrap(), 0);
}

#[tokio::test]
async fn create_rejects_malformed_lines() {
    let db = seeded_db().await;

    let request = RentalRequest {
        ordered_items: vec![
            RawOrderLine {
                key: Some("CAR-A".to_string()),
                qty: Some(json!(0)),
            },
            RawOrderLine {
                key: None,
                qty: Some(json!(1)),
            },
        ],
        ..three_days(&[])
    };
    let err = OrderService::new(db.clone())
        .create_order(Some(&customer("ann@example.lk")), &request)
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.message(), "Invalid items in order");
    assert_eq!(db.orders().count().await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Quotes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn quote_prices_lines_and_period() {
    let db = seeded_db().await;

    let quote = QuoteService::new(db.clone())
        .compute_quote(&three_days(&[("CAR-A", 2), ("CAR-B", 1)]))
        .await
        .unwrap();

    assert_eq!(quote.days, 3);
    assert_eq!(quote.daily_rate, Money::from_cents(13000));
    assert_eq!(quote.total, Money::from_cents(39000));
    assert_eq!(quote.currency, "LKR");
    assert_eq!(quote.metadata.vehicle_count, 3);
    assert_eq!(quote.detailed_items[0].item_total, Money::from_cents(10000));
    assert_eq!(quote.detailed_items[0].total_for_period, Money::from_cents(30000));
}

#[tokio::test]
async fn quote_ignores_client_day_count() {
    let db = seeded_db().await;

    let request = RentalRequest {
        days: Some(99),
        ..three_days(&[("CAR-A", 1)])
    };
    let quote = QuoteService::new(db.clone()).compute_quote(&request).await.unwrap();

    assert_eq!(quote.days, 3);
    assert_eq!(quote.total, Money::from_cents(15000));
}

#[tokio::test]
async fn quote_rejects_line_without_quantity() {
    let db = seeded_db().await;

    let request = RentalRequest {
        ordered_items: vec![RawOrderLine {
            key: Some("CAR-A".to_string()),
            qty: None,
        }],
        ..three_days(&[])
    };
    let err = QuoteService::new(db.clone())
        .compute_quote(&request)
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.message(), "Invalid items in order");
}

#[tokio::test]
async fn quote_without_items_fails_before_any_lookup() {
    // No tables at all: any store access would fail with a 500
    let db = rental_db::Database::new(rental_db::DbConfig::in_memory().run_migrations(false))
        .await
        .unwrap();

    let err = QuoteService::new(db)
        .compute_quote(&three_days(&[]))
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.message(), "At least one vehicle must be selected");
}

#[tokio::test]
async fn quote_names_exactly_the_missing_keys() {
    let db = seeded_db().await;

    let err = QuoteService::new(db.clone())
        .compute_quote(&three_days(&[("NOPE-1", 1), ("CAR-A", 1), ("NOPE-2", 1), ("NOPE-1", 2)]))
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert_eq!(err.message(), "Some vehicles not found");
}

#[tokio::test]
async fn quote_lists_every_unavailable_vehicle() {
    let db = seeded_db().await;

    let err = QuoteService::new(db.clone())
        .compute_quote(&three_days(&[("VAN-C", 1), ("CAR-A", 1), ("SUV-D", 1)]))
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.message(), "Some vehicles are not available");
}

#[tokio::test]
async fn quoting_writes_nothing() {
    let db = seeded_db().await;
    let quotes = QuoteService::new(db.clone());

    for _ in 0..3 {
        quotes
            .compute_quote(&three_days(&[("CAR-A", 1)]))
            .await
            .unwrap();
    }
    assert_eq!(db.orders().count().await.unwrap(), 0);

    // The sequence was not touched either
    let order = OrderService::new(db.clone())
        .create_order(Some(&customer("ann@example.lk")), &three_days(&[("CAR-A", 1)]))
        .await
        .unwrap();
    assert_eq!(order.order_id, "ORD0001");
}

// ---------------------------------------------------------------------------
// Listing and status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn customers_see_own_orders_admins_see_all() {
    let db = seeded_db().await;
    let orders = OrderService::new(db.clone());

    for email in ["ann@example.lk", "ben@example.lk", "ann@example.lk"] {
        orders
            .create_order(Some(&customer(email)), &three_days(&[("CAR-B", 1)]))
            .await
            .unwrap();
    }

    let anns = orders.list_orders(Some(&customer("ann@example.lk"))).await.unwrap();
    assert_eq!(anns.len(), 2);
    assert!(anns.iter().all(|o| o.email == "ann@example.lk"));
    // Newest first
    assert_eq!(anns[0].order_id, "ORD0003");

    let all = orders.list_orders(Some(&admin())).await.unwrap();
    assert_eq!(all.len(), 3);

    let err = orders.list_orders(None).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn status_changes_once_and_only_by_admin() {
    let db = seeded_db().await;
    let orders = OrderService::new(db.clone());
    let ann = customer("ann@example.lk");

    let order = orders
        .create_order(Some(&ann), &three_days(&[("CAR-A", 1)]))
        .await
        .unwrap();

    let err = orders
        .update_order_status(Some(&ann), &order.order_id, OrderStatus::Approved)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    let err = orders
        .update_order_status(Some(&admin()), &order.order_id, OrderStatus::Pending)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let approved = orders
        .update_order_status(Some(&admin()), &order.order_id, OrderStatus::Approved)
        .await
        .unwrap();
    assert_eq!(approved.status, OrderStatus::Approved);
    assert!(approved.is_approved);

    let err = orders
        .update_order_status(Some(&admin()), &order.order_id, OrderStatus::Rejected)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let err = orders
        .update_order_status(Some(&admin()), "ORD9999", OrderStatus::Approved)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}
