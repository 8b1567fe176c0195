//! # Sale Repository
//!
//! Sales and their items.
//!
//! ## Creating a sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  NewSale { products: [{product_id, quantity}, ...] }                   │
//! │       │  validate (1..=100 lines, quantity 1..=999)                    │
//! │       ▼                                                                 │
//! │  BEGIN IMMEDIATE (write lock before any read)                          │
//! │   ├── for each line: fetch live product ── missing? ──► ROLLBACK       │
//! │   │                  SaleDraft::add_line (price + tax snapshot)        │
//! │   ├── INSERT sales (draft totals)                                      │
//! │   └── INSERT sale_items (one per line)                                 │
//! │  COMMIT                                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Sale read back with items and their products                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Dropping the transaction without committing rolls it back, so every
//! early `?` return leaves no partial sale behind.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};
use venda_core::input::NewSale;
use venda_core::report::SalesSummary;
use venda_core::sale::{SaleDraft, SaleTotals};
use venda_core::{CoreError, Money, Sale, SaleItem};

use super::product::{self, ProductRow, PRODUCT_COLUMNS};
use crate::error::{DbError, DbResult};

/// Raw `sales` row.
#[derive(Debug, FromRow)]
struct SaleRow {
    id: i64,
    total_amount_cents: i64,
    total_tax_cents: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl SaleRow {
    fn into_sale(self, items: Vec<SaleItem>) -> Sale {
        Sale {
            id: self.id,
            items,
            total_amount: Money::from_cents(self.total_amount_cents),
            total_tax: Money::from_cents(self.total_tax_cents),
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        }
    }
}

/// `sale_items` row joined with its product. Item columns are prefixed
/// so they don't collide with the product's.
#[derive(Debug, FromRow)]
struct SaleItemRow {
    item_id: i64,
    sale_id: i64,
    item_quantity: i64,
    price_per_unit_cents: i64,
    tax_per_unit_cents: i64,
    total_price_cents: i64,
    total_tax_cents: i64,
    item_created_at: DateTime<Utc>,
    item_updated_at: DateTime<Utc>,
    item_deleted_at: Option<DateTime<Utc>>,
    #[sqlx(flatten)]
    product: ProductRow,
}

impl From<SaleItemRow> for SaleItem {
    fn from(row: SaleItemRow) -> Self {
        SaleItem {
            id: row.item_id,
            product: row.product.into(),
            quantity: row.item_quantity,
            price_per_unit: Money::from_cents(row.price_per_unit_cents),
            tax_per_unit: Money::from_cents(row.tax_per_unit_cents),
            total_price: Money::from_cents(row.total_price_cents),
            total_tax: Money::from_cents(row.total_tax_cents),
            created_at: row.item_created_at,
            updated_at: row.item_updated_at,
            deleted_at: row.item_deleted_at,
        }
    }
}

fn item_query(filter: &str) -> String {
    // Products are not filtered on deleted_at: a sold product stays visible
    format!(
        "SELECT i.id AS item_id, i.sale_id, i.quantity AS item_quantity, \
                i.price_per_unit_cents, i.tax_per_unit_cents, \
                i.total_price_cents, i.total_tax_cents, \
                i.created_at AS item_created_at, i.updated_at AS item_updated_at, \
                i.deleted_at AS item_deleted_at, \
                {PRODUCT_COLUMNS} \
         FROM sale_items i \
         INNER JOIN products p ON p.id = i.product_id \
         INNER JOIN product_types t ON t.id = p.product_type_id \
         WHERE i.deleted_at IS NULL AND {filter} \
         ORDER BY i.sale_id, i.id"
    )
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Lists live sales with their items, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let sales: Vec<SaleRow> = sqlx::query_as(
            r#"
            SELECT id, total_amount_cents, total_tax_cents, created_at, updated_at, deleted_at
            FROM sales
            WHERE deleted_at IS NULL
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let sql = item_query("i.sale_id IN (SELECT id FROM sales WHERE deleted_at IS NULL)");
        let items: Vec<SaleItemRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        let mut by_sale: HashMap<i64, Vec<SaleItem>> = HashMap::new();
        for row in items {
            by_sale.entry(row.sale_id).or_default().push(row.into());
        }

        debug!(count = sales.len(), "Listed sales");

        Ok(sales
            .into_iter()
            .map(|sale| {
                let items = by_sale.remove(&sale.id).unwrap_or_default();
                sale.into_sale(items)
            })
            .collect())
    }

    /// Gets a live sale with its items.
    ///
    /// ## Returns
    /// * `Ok(Some(Sale))` - Found
    /// * `Ok(None)` - Missing or soft-deleted
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale: Option<SaleRow> = sqlx::query_as(
            r#"
            SELECT id, total_amount_cents, total_tax_cents, created_at, updated_at, deleted_at
            FROM sales
            WHERE id = ?1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(sale) = sale else {
            return Ok(None);
        };

        let sql = item_query("i.sale_id = ?1");
        let items: Vec<SaleItemRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(
            sale.into_sale(items.into_iter().map(SaleItem::from).collect()),
        ))
    }

    /// Prices and records a sale in one transaction.
    ///
    /// ## Errors
    /// * `DbError::Domain` - Empty/oversized order, bad quantity, amount overflow
    /// * `DbError::NotFound` - A product id is missing or soft-deleted
    ///
    /// Nothing is written in either case.
    pub async fn create(&self, order: &NewSale) -> DbResult<Sale> {
        order.validate().map_err(CoreError::from)?;

        // Write lock before the product reads; a deferred read transaction
        // cannot wait for the lock once another writer commits under WAL
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let mut draft = SaleDraft::new();
        for line in &order.products {
            let product = product::fetch_live(&mut *tx, line.product_id)
                .await?
                .ok_or_else(|| DbError::not_found("Product", line.product_id))?;
            draft.add_line(&product, line.quantity)?;
        }

        let totals = draft.totals();
        let now = Utc::now();

        let sale_id = sqlx::query(
            r#"
            INSERT INTO sales (total_amount_cents, total_tax_cents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            "#,
        )
        .bind(totals.total_amount.cents())
        .bind(totals.total_tax.cents())
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for line in draft.lines() {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    sale_id, product_id, quantity,
                    price_per_unit_cents, tax_per_unit_cents,
                    total_price_cents, total_tax_cents,
                    created_at, updated_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
                "#,
            )
            .bind(sale_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.price_per_unit.cents())
            .bind(line.tax_per_unit.cents())
            .bind(line.total_price.cents())
            .bind(line.total_tax.cents())
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            sale_id = sale_id,
            lines = draft.lines().len(),
            total_amount = %totals.total_amount,
            total_tax = %totals.total_tax,
            "Sale recorded"
        );

        self.get_by_id(sale_id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", sale_id))
    }

    /// Soft-deletes a sale and its items.
    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Soft-deleting sale");

        let now = Utc::now();
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let result = sqlx::query(
            r#"
            UPDATE sales
            SET deleted_at = ?2, updated_at = ?2
            WHERE id = ?1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        sqlx::query(
            r#"
            UPDATE sale_items
            SET deleted_at = ?2, updated_at = ?2
            WHERE sale_id = ?1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Dashboard figures over all live sales. `today` is a UTC date.
    pub async fn summary(&self, today: NaiveDate) -> DbResult<SalesSummary> {
        let rows: Vec<(DateTime<Utc>, i64, i64)> = sqlx::query_as(
            "SELECT created_at, total_amount_cents, total_tax_cents FROM sales WHERE deleted_at IS NULL",
        )
        .fetch_all(&self.pool)
        .await?;

        let summary = SalesSummary::from_sales(
            rows.into_iter().map(|(created_at, amount, tax)| {
                (
                    created_at,
                    SaleTotals {
                        total_amount: Money::from_cents(amount),
                        total_tax: Money::from_cents(tax),
                    },
                )
            }),
            today,
        )?;

        Ok(summary)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures;
    use venda_core::input::SaleLineRequest;

    fn order(lines: &[(i64, i64)]) -> NewSale {
        NewSale {
            products: lines
                .iter()
                .map(|&(product_id, quantity)| SaleLineRequest {
                    product_id,
                    quantity,
                })
                .collect(),
        }
    }

    async fn sale_count(db: &crate::Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    async fn item_count(db: &crate::Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM sale_items")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_prices_lines() {
        let db = fixtures::database().await;
        let kind = fixtures::product_type(&db, "informatica", 10.0).await;
        let mouse = fixtures::product(&db, kind.id, "mouse", 15_000).await;

        let sale = db.sales().create(&order(&[(mouse.id, 2)])).await.unwrap();

        assert_eq!(sale.items.len(), 1);
        let item = &sale.items[0];
        assert_eq!(item.product.id, mouse.id);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price_per_unit.cents(), 15_000);
        assert_eq!(item.tax_per_unit.cents(), 1_500);
        assert_eq!(item.total_price.cents(), 30_000);
        assert_eq!(item.total_tax.cents(), 3_000);
        assert_eq!(sale.total_amount.cents(), 30_000);
        assert_eq!(sale.total_tax.cents(), 3_000);
    }

    #[tokio::test]
    async fn test_totals_are_sum_of_items() {
        let db = fixtures::database().await;
        let food = fixtures::product_type(&db, "alimentos", 7.0).await;
        let tech = fixtures::product_type(&db, "informatica", 10.0).await;
        let rice = fixtures::product(&db, food.id, "arroz", 2_399).await;
        let cable = fixtures::product(&db, tech.id, "cabo", 1_999).await;

        let sale = db
            .sales()
            .create(&order(&[(rice.id, 3), (cable.id, 1), (rice.id, 1)]))
            .await
            .unwrap();

        // Duplicate product ids stay separate lines, in request order
        let ids: Vec<i64> = sale.items.iter().map(|i| i.product.id).collect();
        assert_eq!(ids, vec![rice.id, cable.id, rice.id]);

        let amount: Money = sale.items.iter().map(|i| i.total_price).sum();
        let tax: Money = sale.items.iter().map(|i| i.total_tax).sum();
        assert_eq!(sale.total_amount, amount);
        assert_eq!(sale.total_tax, tax);
        assert_eq!(sale.total_amount.cents(), 2_399 * 4 + 1_999);
    }

    #[tokio::test]
    async fn test_missing_product_persists_nothing() {
        let db = fixtures::database().await;
        let kind = fixtures::product_type(&db, "informatica", 10.0).await;
        let mouse = fixtures::product(&db, kind.id, "mouse", 15_000).await;

        let err = db
            .sales()
            .create(&order(&[(mouse.id, 1), (999, 1)]))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Product not found: 999");
        assert_eq!(sale_count(&db).await, 0);
        assert_eq!(item_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_deleted_product_cannot_be_sold() {
        let db = fixtures::database().await;
        let kind = fixtures::product_type(&db, "informatica", 10.0).await;
        let mouse = fixtures::product(&db, kind.id, "mouse", 15_000).await;
        db.products().soft_delete(mouse.id).await.unwrap();

        let err = db.sales().create(&order(&[(mouse.id, 1)])).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(sale_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_invalid_order_is_rejected() {
        let db = fixtures::database().await;

        let empty = db.sales().create(&order(&[])).await.unwrap_err();
        assert!(matches!(empty, DbError::Domain(CoreError::Validation(_))));

        let kind = fixtures::product_type(&db, "informatica", 10.0).await;
        let mouse = fixtures::product(&db, kind.id, "mouse", 15_000).await;
        let zero = db.sales().create(&order(&[(mouse.id, 0)])).await.unwrap_err();
        assert!(matches!(zero, DbError::Domain(CoreError::Validation(_))));

        assert_eq!(sale_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_price_change_keeps_snapshot() {
        let db = fixtures::database().await;
        let kind = fixtures::product_type(&db, "informatica", 10.0).await;
        let mouse = fixtures::product(&db, kind.id, "mouse", 15_000).await;

        let sale = db.sales().create(&order(&[(mouse.id, 2)])).await.unwrap();

        db.products()
            .update(mouse.id, &fixtures::product_record(kind.id, "mouse", 99_900))
            .await
            .unwrap();
        db.product_types()
            .update(
                kind.id,
                &venda_core::input::ProductTypeRecord {
                    description: "informatica".to_string(),
                    tax: venda_core::Percentage::from_percentage(25.0),
                },
            )
            .await
            .unwrap();

        let reread = db.sales().get_by_id(sale.id).await.unwrap().unwrap();
        let item = &reread.items[0];
        assert_eq!(item.price_per_unit.cents(), 15_000);
        assert_eq!(item.tax_per_unit.cents(), 1_500);
        assert_eq!(item.total_price.cents(), 30_000);
        assert_eq!(reread.total_amount.cents(), 30_000);
        // The nested product shows its current state
        assert_eq!(item.product.price.cents(), 99_900);
    }

    #[tokio::test]
    async fn test_sale_shows_deleted_product() {
        let db = fixtures::database().await;
        let kind = fixtures::product_type(&db, "informatica", 10.0).await;
        let mouse = fixtures::product(&db, kind.id, "mouse", 15_000).await;
        let sale = db.sales().create(&order(&[(mouse.id, 1)])).await.unwrap();

        db.products().soft_delete(mouse.id).await.unwrap();

        let reread = db.sales().get_by_id(sale.id).await.unwrap().unwrap();
        assert_eq!(reread.items.len(), 1);
        assert!(reread.items[0].product.deleted_at.is_some());
    }

    #[tokio::test]
    async fn test_soft_delete_hides_sale() {
        let db = fixtures::database().await;
        let kind = fixtures::product_type(&db, "informatica", 10.0).await;
        let mouse = fixtures::product(&db, kind.id, "mouse", 15_000).await;

        let first = db.sales().create(&order(&[(mouse.id, 1)])).await.unwrap();
        let second = db.sales().create(&order(&[(mouse.id, 3)])).await.unwrap();

        db.sales().soft_delete(first.id).await.unwrap();

        assert!(db.sales().get_by_id(first.id).await.unwrap().is_none());
        let listed = db.sales().list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[0].items.len(), 1);
        assert_eq!(listed[0].items[0].quantity, 3);

        assert!(db.sales().soft_delete(first.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_summary_counts_live_sales() {
        let db = fixtures::database().await;
        let kind = fixtures::product_type(&db, "informatica", 10.0).await;
        let mouse = fixtures::product(&db, kind.id, "mouse", 15_000).await;

        db.sales().create(&order(&[(mouse.id, 2)])).await.unwrap();
        let gone = db.sales().create(&order(&[(mouse.id, 1)])).await.unwrap();
        db.sales().create(&order(&[(mouse.id, 3)])).await.unwrap();
        db.sales().soft_delete(gone.id).await.unwrap();

        let summary = db.sales().summary(Utc::now().date_naive()).await.unwrap();
        assert_eq!(summary.sales_count, 2);
        assert_eq!(summary.total_amount.cents(), 75_000);
        assert_eq!(summary.total_tax.cents(), 7_500);
        assert_eq!(summary.total_today.cents(), 75_000);
    }

    #[tokio::test]
    async fn test_summary_overflow_is_an_error() {
        let db = fixtures::database().await;
        let kind = fixtures::product_type(&db, "isento", 0.0).await;
        let yacht = fixtures::product(&db, kind.id, "iate", 4_700_000_000_000_000_000).await;

        // Each sale fits in i64 cents on its own, the sum does not
        db.sales().create(&order(&[(yacht.id, 1)])).await.unwrap();
        db.sales().create(&order(&[(yacht.id, 1)])).await.unwrap();

        let err = db.sales().summary(Utc::now().date_naive()).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::SummaryOverflow)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_all_commit() {
        // File-backed so the pool really holds several connections
        let path = std::env::temp_dir().join(format!(
            "venda-concurrent-sales-{}.db",
            std::process::id()
        ));
        let db = crate::Database::new(crate::DbConfig::new(path.clone()).max_connections(5))
            .await
            .unwrap();
        let kind = fixtures::product_type(&db, "informatica", 10.0).await;
        let mouse = fixtures::product(&db, kind.id, "mouse", 15_000).await;

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let db = db.clone();
                let order = order(&[(mouse.id, 1), (mouse.id, 2)]);
                tokio::spawn(async move { db.sales().create(&order).await })
            })
            .collect();

        let mut failures = Vec::new();
        for handle in handles {
            if let Err(err) = handle.await.unwrap() {
                failures.push(err.to_string());
            }
        }
        let sales = sale_count(&db).await;
        let items = item_count(&db).await;

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }

        assert!(failures.is_empty(), "failed creates: {failures:?}");
        assert_eq!(sales, 16);
        assert_eq!(items, 32);
    }
}
