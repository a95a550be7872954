//! # Seed Data Generator
//!
//! Populates the database with sample customers and products for development.
//! The storefront has no registration flow, so this is also the only way to
//! get customers on record in a dev environment.
//!
//! ## Usage
//! ```bash
//! cargo run -p shopfloor-db --bin seed
//! cargo run -p shopfloor-db --bin seed -- --db ./shopfloor.db
//! ```

use std::env;

use shopfloor_core::NewProduct;
use shopfloor_db::{Database, DbConfig};

const CUSTOMERS: &[(&str, &str, &str)] = &[
    ("Ada", "Lovelace", "ada@example.com"),
    ("Grace", "Hopper", "grace@example.com"),
    ("Alan", "Turing", "alan@example.com"),
    ("Edsger", "Dijkstra", "edsger@example.com"),
    ("Barbara", "Liskov", "barbara@example.com"),
];

/// (name, price_cents, stock)
const PRODUCTS: &[(&str, i64, i64)] = &[
    ("Mechanical Keyboard", 8999, 12),
    ("USB-C Cable 1m", 999, 80),
    ("Wireless Mouse", 2499, 35),
    ("27in Monitor", 21900, 6),
    ("Laptop Stand", 3499, 20),
    ("Webcam 1080p", 5499, 15),
    ("Desk Mat", 1899, 40),
    ("Headset", 6499, 10),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./shopfloor.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Shopfloor Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./shopfloor.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Shopfloor Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("Connected, migrations applied");

    if db.customers().count().await? > 0 || db.products().count().await? > 0 {
        println!("Database already has data; skipping seed to avoid duplicates.");
        println!("Delete the database file to regenerate.");
        return Ok(());
    }

    for (first, last, email) in CUSTOMERS {
        let id = db.customers().insert(first, last, email).await?;
        println!("  customer {:>3}  {} {}", id, first, last);
    }

    for (name, price_cents, stock) in PRODUCTS {
        let id = db
            .products()
            .insert(&NewProduct {
                name: name.to_string(),
                price_cents: *price_cents,
                stock_quantity: *stock,
            })
            .await?;
        println!("  product  {:>3}  {}", id, name);
    }

    println!();
    println!(
        "Seed complete: {} customers, {} products",
        db.customers().count().await?,
        db.products().count().await?
    );

    Ok(())
}
