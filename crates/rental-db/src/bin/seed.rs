//! # Seed Data Generator
//!
//! Populates the database with a demo vehicle fleet for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p rental-db --bin seed
//!
//! # Specify database path
//! cargo run -p rental-db --bin seed -- --db ./data/rental.db
//!
//! # Mark every third vehicle as rented (to exercise availability errors)
//! cargo run -p rental-db --bin seed -- --with-rented
//! ```
//!
//! Each vehicle gets a key of the form `{MAKE}-{MODEL}-{NN}`, a daily rate in
//! LKR cents and two placeholder image URLs.

use std::env;

use rental_core::{Money, NewCatalogItem};
use rental_db::{Database, DbConfig};

/// (make, model, car type, seats, daily rate in LKR)
const FLEET: &[(&str, &str, &str, i32, i64)] = &[
    ("Toyota", "Axio", "Sedan", 5, 8_500),
    ("Toyota", "Prius", "Sedan", 5, 10_000),
    ("Toyota", "KDH", "Van", 14, 18_000),
    ("Honda", "Vezel", "SUV", 5, 12_500),
    ("Honda", "Fit", "Hatchback", 5, 7_000),
    ("Suzuki", "Wagon R", "Hatchback", 4, 5_500),
    ("Suzuki", "Alto", "Hatchback", 4, 4_500),
    ("Nissan", "Leaf", "Hatchback", 5, 9_000),
    ("Nissan", "X-Trail", "SUV", 7, 15_000),
    ("Mitsubishi", "Montero", "SUV", 7, 22_000),
    ("Mercedes-Benz", "E-Class", "Luxury", 5, 45_000),
    ("BMW", "5 Series", "Luxury", 5, 42_000),
];

const LOCATIONS: &[&str] = &["Colombo", "Kandy", "Galle", "Negombo"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./data/rental.db");
    let mut with_rented = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--with-rented" => with_rented = true,
            "--help" | "-h" => {
                println!("Rental Backend Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./data/rental.db)");
                println!("      --with-rented  Mark every third vehicle as rented");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Rental Backend Seed Data Generator");
    println!("=====================================");
    println!("Database: {}", db_path);
    println!("Vehicles: {}", FLEET.len());
    println!();

    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.catalog().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} vehicles", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Adding vehicles...");

    let mut added = 0;
    for (index, vehicle) in FLEET.iter().enumerate() {
        let item = fleet_item(index, vehicle);

        if let Err(e) = db.catalog().insert(&item).await {
            eprintln!("Failed to insert {}: {}", item.key, e);
            continue;
        }

        if with_rented && index % 3 == 2 {
            db.catalog().set_rented(&item.key, true).await?;
            println!("  {} (rented)", item.key);
        } else {
            println!("  {}", item.key);
        }
        added += 1;
    }

    println!();
    println!("✓ Added {} vehicles", added);
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one catalog entry from a fleet row.
fn fleet_item(
    index: usize,
    &(make, model, car_type, seats, rate_lkr): &(&str, &str, &str, i32, i64),
) -> NewCatalogItem {
    let slug = |s: &str| s.replace(' ', "").to_uppercase();
    let key = format!("{}-{}-{:02}", slug(make), slug(model), index + 1);

    NewCatalogItem {
        images: vec![
            format!("https://images.example.lk/{}/front.jpg", key.to_lowercase()),
            format!("https://images.example.lk/{}/side.jpg", key.to_lowercase()),
        ],
        key,
        model: model.to_string(),
        make: make.to_string(),
        year: 2015 + (index % 9) as i32,
        description: Some(format!("{} {} {} with {} seats", make, model, car_type, seats)),
        daily_rate: Money::from_major_minor(rate_lkr, 0),
        is_available: true,
        transmission: if index % 4 == 3 { "Manual" } else { "Automatic" }.to_string(),
        fuel_type: if model == "Leaf" { "Electric" } else if model == "Prius" { "Hybrid" } else { "Petrol" }.to_string(),
        seats,
        car_type: car_type.to_string(),
        location: Some(LOCATIONS[index % LOCATIONS.len()].to_string()),
    }
}
