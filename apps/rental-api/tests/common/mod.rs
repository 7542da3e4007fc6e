//! Shared fixtures for the rental-api integration tests.

#![allow(dead_code)]

use serde_json::json;

use rental_core::quote::RawOrderLine;
use rental_core::{Identity, Money, NewCatalogItem, RentalRequest, Role};
use rental_db::{Database, DbConfig};

/// A rentable vehicle with the given daily rate in cents.
pub fn vehicle(key: &str, rate_cents: i64) -> NewCatalogItem {
    NewCatalogItem {
        key: key.to_string(),
        model: format!("Model {}", key),
        make: "Toyota".to_string(),
        year: 2020,
        description: None,
        images: vec![format!("https://images.example.lk/{}.jpg", key)],
        daily_rate: Money::from_cents(rate_cents),
        is_available: true,
        transmission: "Automatic".to_string(),
        fuel_type: "Petrol".to_string(),
        seats: 5,
        car_type: "Sedan".to_string(),
        location: Some("Colombo".to_string()),
    }
}

/// In-memory database holding:
///
/// | key     | rate | state       |
/// |---------|------|-------------|
/// | CAR-A   | 5000 | available   |
/// | CAR-B   | 3000 | available   |
/// | VAN-C   | 8000 | rented      |
/// | SUV-D   | 9000 | withdrawn   |
pub async fn seeded_db() -> Database {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    seed(&db).await;
    db
}

pub async fn seed(db: &Database) {
    let catalog = db.catalog();
    catalog.insert(&vehicle("CAR-A", 5000)).await.unwrap();
    catalog.insert(&vehicle("CAR-B", 3000)).await.unwrap();
    catalog.insert(&vehicle("VAN-C", 8000)).await.unwrap();
    catalog.set_rented("VAN-C", true).await.unwrap();
    catalog
        .insert(&NewCatalogItem {
            is_available: false,
            ..vehicle("SUV-D", 9000)
        })
        .await
        .unwrap();
}

pub fn identity(email: &str, role: Role) -> Identity {
    Identity {
        email: email.to_string(),
        role,
        first_name: "Ann".to_string(),
        last_name: "Perera".to_string(),
        profile_picture: None,
        phone: None,
    }
}

pub fn customer(email: &str) -> Identity {
    identity(email, Role::Customer)
}

pub fn admin() -> Identity {
    identity("admin@example.lk", Role::Admin)
}

/// A request for `items` (key, qty) from `start` to `end`.
pub fn rental(items: &[(&str, i64)], start: &str, end: &str) -> RentalRequest {
    RentalRequest {
        ordered_items: items
            .iter()
            .map(|(key, qty)| RawOrderLine {
                key: Some(key.to_string()),
                qty: Some(json!(qty)),
            })
            .collect(),
        starting_date: Some(start.to_string()),
        ending_date: Some(end.to_string()),
        days: None,
    }
}

/// Three days starting 2026-03-01.
pub fn three_days(items: &[(&str, i64)]) -> RentalRequest {
    rental(items, "2026-03-01", "2026-03-04")
}
