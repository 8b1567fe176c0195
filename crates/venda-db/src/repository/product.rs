//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD with soft delete
//! - EAN lookup for the barcode scanner
//! - Low-stock listing
//!
//! ## Reading a product
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products p ──INNER JOIN── product_types t ON t.id = p.product_type_id │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductRow { p.*, type_id, type_description, type_tax_bps, ... }      │
//! │       │  From<ProductRow>                                              │
//! │       ▼                                                                 │
//! │  Product { ..., product_type: ProductType { ... } }                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The nested type is returned even if it has been soft-deleted, so a
//! product never loses its tax rate.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteExecutor, SqlitePool};
use tracing::debug;
use venda_core::input::ProductRecord;
use venda_core::{Money, Product, ProductType};

use super::{percentage_from_db, percentage_to_db};
use crate::error::{DbError, DbResult};

/// Product columns plus the joined type under `type_*` aliases.
///
/// Also selected by the sale repository for sale items.
pub(crate) const PRODUCT_COLUMNS: &str = r#"
    p.id, p.description, p.price_cents, p.ean, p.purchase_price_cents,
    p.sales_margin_bps, p.quantity, p.minimum_quantity,
    p.created_at, p.updated_at, p.deleted_at,
    t.id AS type_id, t.description AS type_description, t.tax_bps AS type_tax_bps,
    t.created_at AS type_created_at, t.updated_at AS type_updated_at,
    t.deleted_at AS type_deleted_at
"#;

/// Joined `products` + `product_types` row.
#[derive(Debug, FromRow)]
pub(crate) struct ProductRow {
    id: i64,
    description: String,
    price_cents: i64,
    ean: Option<String>,
    purchase_price_cents: Option<i64>,
    sales_margin_bps: Option<i64>,
    quantity: i64,
    minimum_quantity: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    type_id: i64,
    type_description: String,
    type_tax_bps: i64,
    type_created_at: DateTime<Utc>,
    type_updated_at: DateTime<Utc>,
    type_deleted_at: Option<DateTime<Utc>>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            description: row.description,
            price: Money::from_cents(row.price_cents),
            ean: row.ean,
            purchase_price: row.purchase_price_cents.map(Money::from_cents),
            sales_margin: row.sales_margin_bps.map(percentage_from_db),
            quantity: row.quantity,
            minimum_quantity: row.minimum_quantity,
            product_type: ProductType {
                id: row.type_id,
                description: row.type_description,
                tax: percentage_from_db(row.type_tax_bps),
                created_at: row.type_created_at,
                updated_at: row.type_updated_at,
                deleted_at: row.type_deleted_at,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

/// Loads a live product on any executor.
///
/// Sale creation calls this with its open transaction.
pub(crate) async fn fetch_live<'e, E>(executor: E, id: i64) -> DbResult<Option<Product>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!(
        "SELECT {PRODUCT_COLUMNS} FROM products p \
         INNER JOIN product_types t ON t.id = p.product_type_id \
         WHERE p.id = ?1 AND p.deleted_at IS NULL"
    );
    let row: Option<ProductRow> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(row.map(Product::from))
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Barcode scan
/// let hits = repo.list(Some("7891000100103")).await?;
///
/// // Get by ID
/// let product = repo.get_by_id(4).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists live products, optionally only those with the given EAN.
    pub async fn list(&self, ean: Option<&str>) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = match ean {
            Some(ean) => {
                debug!(ean = %ean, "Looking up products by EAN");
                let sql = format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products p \
                     INNER JOIN product_types t ON t.id = p.product_type_id \
                     WHERE p.deleted_at IS NULL AND p.ean = ?1 ORDER BY p.id"
                );
                sqlx::query_as(&sql).bind(ean).fetch_all(&self.pool).await?
            }
            None => {
                let sql = format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products p \
                     INNER JOIN product_types t ON t.id = p.product_type_id \
                     WHERE p.deleted_at IS NULL ORDER BY p.id"
                );
                sqlx::query_as(&sql).fetch_all(&self.pool).await?
            }
        };

        debug!(count = rows.len(), "Listed products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Live products at or below their minimum quantity, scarcest first.
    pub async fn low_stock(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p \
             INNER JOIN product_types t ON t.id = p.product_type_id \
             WHERE p.deleted_at IS NULL AND p.quantity <= p.minimum_quantity \
             ORDER BY p.quantity, p.id"
        );
        let rows: Vec<ProductRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        debug!(count = rows.len(), "Listed low-stock products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Gets a live product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Missing or soft-deleted
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        fetch_live(&self.pool, id).await
    }

    /// Inserts a validated product.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - `product_type_id` is missing or soft-deleted
    pub async fn insert(&self, record: &ProductRecord) -> DbResult<Product> {
        self.ensure_product_type(record.product_type_id).await?;

        debug!(description = %record.description, price = %record.price, "Inserting product");

        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO products (
                description, price_cents, ean, purchase_price_cents, sales_margin_bps,
                quantity, minimum_quantity, product_type_id, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            "#,
        )
        .bind(&record.description)
        .bind(record.price.cents())
        .bind(&record.ean)
        .bind(record.purchase_price.map(|m| m.cents()))
        .bind(record.sales_margin.map(percentage_to_db))
        .bind(record.quantity)
        .bind(record.minimum_quantity)
        .bind(record.product_type_id)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Overwrites a live product with a validated record.
    ///
    /// Sale items keep their own price snapshot, so this never changes
    /// recorded sales.
    pub async fn update(&self, id: i64, record: &ProductRecord) -> DbResult<Product> {
        self.ensure_product_type(record.product_type_id).await?;

        debug!(id = id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET description = ?2,
                price_cents = ?3,
                ean = ?4,
                purchase_price_cents = ?5,
                sales_margin_bps = ?6,
                quantity = ?7,
                minimum_quantity = ?8,
                product_type_id = ?9,
                updated_at = ?10
            WHERE id = ?1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(&record.description)
        .bind(record.price.cents())
        .bind(&record.ean)
        .bind(record.purchase_price.map(|m| m.cents()))
        .bind(record.sales_margin.map(percentage_to_db))
        .bind(record.quantity)
        .bind(record.minimum_quantity)
        .bind(record.product_type_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Soft-deletes a product. Sale items referencing it still show it.
    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Soft-deleting product");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE products
            SET deleted_at = ?2, updated_at = ?2
            WHERE id = ?1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Number of live products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn ensure_product_type(&self, product_type_id: i64) -> DbResult<()> {
        let live: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM product_types WHERE id = ?1 AND deleted_at IS NULL",
        )
        .bind(product_type_id)
        .fetch_one(&self.pool)
        .await?;

        if live == 0 {
            return Err(DbError::not_found("ProductType", product_type_id));
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
