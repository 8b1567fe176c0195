//! # Repository Module
//!
//! One repository per table group, each wrapping a cloned `SqlitePool`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Handler                                                               │
//! │       │  db.products().get_by_id(4)                                    │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list / low_stock / get_by_id                                      │
//! │  ├── insert / update                                                   │
//! │  └── soft_delete                                                       │
//! │       │  SQL (runtime-checked, FromRow rows)                           │
//! │       ▼                                                                 │
//! │  SQLite                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are read into `*Row` structs holding raw cents/basis points and
//! converted to venda-core types with `into_*` methods.
//!
//! Reads exclude rows with `deleted_at` set, except a sale item's product
//! which is shown even after the product was deleted.
//!
//! - [`ProductTypeRepository`](product_type::ProductTypeRepository)
//! - [`ProductRepository`](product::ProductRepository)
//! - [`SaleRepository`](sale::SaleRepository)

pub mod product;
pub mod product_type;
pub mod sale;

use venda_core::types::Percentage;

/// Basis points as stored in SQLite. CHECK constraints keep them in range.
pub(crate) fn percentage_from_db(bps: i64) -> Percentage {
    Percentage::from_bps(u32::try_from(bps).unwrap_or_default())
}

pub(crate) fn percentage_to_db(pct: Percentage) -> i64 {
    i64::from(pct.bps())
}

// =============================================================================
// Test Fixtures
// =============================================================================

#[cfg(test)]
pub(crate) mod fixtures {
    use venda_core::input::{ProductRecord, ProductTypeRecord};
    use venda_core::{Money, Product, ProductType};

    use super::Percentage;
    use crate::{Database, DbConfig};

    pub async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub async fn product_type(db: &Database, description: &str, tax_pct: f64) -> ProductType {
        db.product_types()
            .insert(&ProductTypeRecord {
                description: description.to_string(),
                tax: Percentage::from_percentage(tax_pct),
            })
            .await
            .unwrap()
    }

    pub fn product_record(product_type_id: i64, description: &str, price_cents: i64) -> ProductRecord {
        ProductRecord {
            description: description.to_string(),
            price: Money::from_cents(price_cents),
            ean: None,
            purchase_price: None,
            sales_margin: None,
            quantity: 150,
            minimum_quantity: 10,
            product_type_id,
        }
    }

    pub async fn product(
        db: &Database,
        product_type_id: i64,
        description: &str,
        price_cents: i64,
    ) -> Product {
        db.products()
            .insert(&product_record(product_type_id, description, price_cents))
            .await
            .unwrap()
    }
}
