//! # Seed Data Generator
//!
//! Fills an empty database with demo product types and products.
//!
//! ## Usage
//! ```bash
//! # Default: ./venda.db, 3 products per type
//! cargo run -p venda-db --bin seed
//!
//! # More products
//! cargo run -p venda-db --bin seed -- --per-type 20
//!
//! # Specify database path
//! cargo run -p venda-db --bin seed -- --db ./data/venda.db
//! ```
//!
//! Products get an EAN `789{type:02}{index:08}`; every third one starts
//! below its minimum quantity so the low-stock report has something to show.

use std::env;

use venda_core::input::{ProductRecord, ProductTypeRecord};
use venda_core::{Money, Percentage};
use venda_db::{Database, DbConfig};

/// (description, tax %, product names with base price in cents)
const CATALOG: &[(&str, f64, &[(&str, i64)])] = &[
    (
        "informatica",
        10.0,
        &[
            ("mouse", 15_000),
            ("teclado", 19_990),
            ("monitor 24", 89_900),
            ("cabo hdmi", 2_990),
            ("pendrive 64gb", 4_590),
        ],
    ),
    (
        "alimentos",
        7.0,
        &[
            ("arroz 5kg", 2_399),
            ("feijao 1kg", 899),
            ("cafe 500g", 1_749),
            ("acucar 1kg", 499),
            ("oleo de soja", 799),
        ],
    ),
    (
        "bebidas",
        12.0,
        &[
            ("agua mineral", 250),
            ("refrigerante 2l", 999),
            ("suco de uva", 1_290),
            ("cerveja lata", 429),
            ("cha gelado", 599),
        ],
    ),
    (
        "limpeza",
        18.0,
        &[
            ("detergente", 289),
            ("sabao em po", 1_899),
            ("agua sanitaria", 599),
            ("esponja", 199),
            ("desinfetante", 749),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut per_type: usize = 3;
    let mut db_path = String::from("./venda.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--per-type" | "-n" => {
                if i + 1 < args.len() {
                    per_type = args[i + 1].parse().unwrap_or(3);
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
                println!("Venda POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --per-type <N>  Products per product type (default: 3)");
                println!("  -d, --db <PATH>      Database file path (default: ./venda.db)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Venda POS Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Products per type: {}", per_type);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let (embedded, applied) = db.migration_status().await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied ({applied}/{embedded})");

    let existing = db.products().count().await? + db.product_types().count().await?;
    if existing > 0 {
        println!("⚠ Database already has data");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating catalog...");

    let mut generated = 0;
    for (type_idx, (description, tax_pct, products)) in CATALOG.iter().enumerate() {
        let kind = db
            .product_types()
            .insert(&ProductTypeRecord {
                description: description.to_string(),
                tax: Percentage::from_percentage(*tax_pct),
            })
            .await?;
        println!("  {} ({}%)", kind.description, tax_pct);

        for index in 0..per_type {
            let (name, base_price) = products[index % products.len()];
            let record = generate_product(kind.id, type_idx, index, name, base_price);

            if let Err(e) = db.products().insert(&record).await {
                eprintln!("Failed to insert {}: {}", record.description, e);
                continue;
            }
            generated += 1;
        }
    }

    let low_stock = db.products().low_stock().await?;

    println!();
    println!("✓ Generated {} product types", CATALOG.len());
    println!("✓ Generated {} products ({} low on stock)", generated, low_stock.len());
    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

/// Builds one product; names repeat with a numeric suffix past the catalog.
fn generate_product(
    product_type_id: i64,
    type_idx: usize,
    index: usize,
    name: &str,
    base_price: i64,
) -> ProductRecord {
    let round = index / 5;
    let description = if round == 0 {
        name.to_string()
    } else {
        format!("{} {}", name, round + 1)
    };

    // Purchase price 60-80% of the sale price
    let cost_pct = 60 + (index as i64 * 7) % 21;
    let purchase_price = base_price * cost_pct / 100;
    let margin_bps = ((base_price - purchase_price) * 10_000 / purchase_price.max(1)) as u32;

    let minimum_quantity = 10;
    let quantity = if index % 3 == 2 { 4 } else { 50 + (index as i64 * 13) % 100 };

    ProductRecord {
        description,
        price: Money::from_cents(base_price),
        ean: Some(format!("789{:02}{:08}", type_idx, index)),
        purchase_price: Some(Money::from_cents(purchase_price)),
        sales_margin: Some(Percentage::from_bps(margin_bps)),
        quantity,
        minimum_quantity,
        product_type_id,
    }
}
