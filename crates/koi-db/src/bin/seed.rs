//! # Seed Catalog Generator
//!
//! Populates the database with tea-shop products for development, so
//! shared-cart links have something to resolve against.
//!
//! ## Usage
//! ```bash
//! # Generate 60 products (default)
//! cargo run -p koi-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p koi-db --bin seed -- --count 200
//!
//! # Specify database path
//! cargo run -p koi-db --bin seed -- --db ./data/koi.db
//! ```
//!
//! Each product has:
//! - Random UUID id
//! - Name: `{tea} {format}`
//! - Price: $2.50 - $14.49 plus a format surcharge
//! - Weight in grams, except gift cards which have none

use std::env;

use koi_core::Product;
use koi_db::repository::product::generate_product_id;
use koi_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const TEAS: &[&str] = &[
    "Sencha",
    "Gyokuro",
    "Matcha",
    "Hojicha",
    "Genmaicha",
    "Bancha",
    "Kukicha",
    "Oolong",
    "Assam",
    "Darjeeling",
    "Earl Grey",
    "Jasmine",
    "Pu-erh",
    "Rooibos",
    "Chamomile",
];

/// Format name, price surcharge in cents, unit weight in grams.
const FORMATS: &[(&str, i64, Option<u32>)] = &[
    ("Sample 25g", 0, Some(25)),
    ("Pouch 100g", 400, Some(100)),
    ("Tin 250g", 900, Some(250)),
    ("Gift Card", 1500, None),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = TEAS.len() * FORMATS.len();
    let mut db_path = String::from("./koi_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(count);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("KoiShop Seed Catalog Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 60)");
                println!("  -d, --db <PATH>    Database file path (default: ./koi_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(db = %db_path, count, "Seeding catalog");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let existing = db.products().count().await?;
    if existing > 0 {
        warn!(existing, "Catalog already has products, skipping seed");
        return Ok(());
    }

    let products = db.products();
    let mut generated = 0;

    'outer: for (tea_idx, tea) in TEAS.iter().enumerate() {
        for (format_idx, format) in FORMATS.iter().enumerate() {
            if generated >= count {
                break 'outer;
            }

            let product = generate_product(tea, format, tea_idx * FORMATS.len() + format_idx);

            if let Err(e) = products.insert(&product).await {
                warn!(name = %product.name, error = %e, "Failed to insert product");
                continue;
            }

            println!("{}  {}  {}", product.id, product.price(), product.name);
            generated += 1;
        }
    }

    info!(generated, "Seed complete");
    db.close().await;

    Ok(())
}

/// Builds one product with deterministic price data.
fn generate_product(tea: &str, format: &(&str, i64, Option<u32>), seed: usize) -> Product {
    let (format_name, surcharge, weight) = *format;

    // $2.50 - $14.49
    let base_price = 250 + ((seed * 37) % 1200) as i64;

    Product {
        id: generate_product_id(),
        name: format!("{} {}", tea, format_name),
        price_cents: base_price + surcharge,
        weight_grams: weight,
    }
}
