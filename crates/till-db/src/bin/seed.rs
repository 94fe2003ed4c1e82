//! # Seed Data Generator
//!
//! Populates a database with a small demo shop for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./till_dev.db for the default shop
//! cargo run -p till-db --bin seed
//!
//! # Specify database path and shop
//! cargo run -p till-db --bin seed -- --db ./data/till.db --shop shop-2
//! ```
//!
//! ## Generated Data
//! - Grocery, household and fresh items, some sold by weight
//! - Scan codes: `{CATEGORY}-{INDEX}`
//! - Cost at 70-85% of price, stock 0-60
//! - Three staff members

use chrono::Utc;
use rust_decimal::Decimal;
use std::env;
use till_core::{CatalogItem, Money, StaffMember, UnitOfMeasure, DEFAULT_SHOP_ID};
use till_db::{Database, DbConfig};
use uuid::Uuid;

/// (code prefix, category, unit, products as (name, price in minor units))
const CATEGORIES: &[(&str, &str, UnitOfMeasure, &[(&str, i64)])] = &[
    (
        "GRO",
        "Grocery",
        UnitOfMeasure::Units,
        &[
            ("Cooking Oil 1L", 54000),
            ("Basmati Rice 5kg", 185000),
            ("Sugar 1kg", 16000),
            ("Tea 450g", 125000),
            ("Flour 10kg", 120000),
            ("Red Chilli Powder", 22000),
        ],
    ),
    (
        "HSE",
        "Household",
        UnitOfMeasure::Units,
        &[
            ("Bath Soap", 12000),
            ("Washing Powder 1kg", 38000),
            ("Dishwash Bar", 9000),
            ("Toothpaste", 26000),
        ],
    ),
    (
        "FRS",
        "Fresh",
        UnitOfMeasure::Kg,
        &[
            ("Tomatoes", 18000),
            ("Onions", 14000),
            ("Potatoes", 9000),
            ("Bananas", 16000),
        ],
    ),
    (
        "DRY",
        "Dairy",
        UnitOfMeasure::L,
        &[("Fresh Milk", 22000), ("Yogurt", 24000)],
    ),
];

const STAFF: &[&str] = &["Bilal", "Sana", "Omar"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./till_dev.db");
    let mut shop_id = String::from(DEFAULT_SHOP_ID);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--shop" | "-s" => {
                if i + 1 < args.len() {
                    shop_id = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Till Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./till_dev.db)");
                println!("  -s, --shop <ID>    Shop id to seed (default: {})", DEFAULT_SHOP_ID);
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Till Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!("Shop:     {}", shop_id);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.catalog().count(&shop_id).await?;
    if existing > 0 {
        println!("⚠ Shop already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating items...");

    let start = std::time::Instant::now();
    let mut generated = 0;

    for (prefix, category, unit, products) in CATEGORIES {
        for (index, (name, price_minor)) in products.iter().enumerate() {
            let item = generate_item(&shop_id, prefix, category, *unit, name, *price_minor, index);

            if let Err(e) = db.catalog().insert(&item).await {
                eprintln!("Failed to insert {}: {}", item.name, e);
                continue;
            }
            generated += 1;
        }
    }

    for name in STAFF {
        let member = StaffMember {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        };
        db.staff().insert(&shop_id, &member).await?;
    }

    println!("✓ Generated {} items and {} staff in {:?}", generated, STAFF.len(), start.elapsed());

    println!();
    println!("Verifying lookups...");
    let found = db.catalog().get_by_code(&shop_id, "gro-001").await?;
    println!(
        "  Code 'gro-001': {}",
        found.map(|i| i.name).unwrap_or_else(|| "not found".to_string())
    );

    println!();
    println!("✓ Seed complete! ({})", Utc::now().format("%Y-%m-%d %H:%M"));

    Ok(())
}

/// Builds one catalog item with deterministic cost and stock.
fn generate_item(
    shop_id: &str,
    prefix: &str,
    category: &str,
    unit: UnitOfMeasure,
    name: &str,
    price_minor: i64,
    index: usize,
) -> CatalogItem {
    let seed = index as i64 + price_minor / 100;

    // Cost at 70-85% of price
    let cost_pct = 70 + seed % 16;
    let cost_minor = price_minor * cost_pct / 100;

    CatalogItem {
        id: Uuid::new_v4().to_string(),
        shop_id: shop_id.to_string(),
        name: name.to_string(),
        code: Some(format!("{}-{:03}", prefix, index + 1)),
        price: Money::from_minor(price_minor),
        cost_price: Some(Money::from_minor(cost_minor)),
        quantity: Decimal::from(seed % 61),
        unit,
        category: category.to_string(),
    }
}
