//! # Product Type Repository
//!
//! Product categories and the tax rate their products are sold with.
//! A type's tax is read at sale time; changing it later does not touch
//! existing sale items.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;
use venda_core::input::ProductTypeRecord;
use venda_core::ProductType;

use super::{percentage_from_db, percentage_to_db};
use crate::error::{DbError, DbResult};

const SELECT_PRODUCT_TYPE: &str = r#"
    SELECT id, description, tax_bps, created_at, updated_at, deleted_at
    FROM product_types
"#;

/// Raw `product_types` row.
#[derive(Debug, FromRow)]
struct ProductTypeRow {
    id: i64,
    description: String,
    tax_bps: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<ProductTypeRow> for ProductType {
    fn from(row: ProductTypeRow) -> Self {
        ProductType {
            id: row.id,
            description: row.description,
            tax: percentage_from_db(row.tax_bps),
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

/// Repository for product type database operations.
#[derive(Debug, Clone)]
pub struct ProductTypeRepository {
    pool: SqlitePool,
}

impl ProductTypeRepository {
    /// Creates a new ProductTypeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductTypeRepository { pool }
    }

    /// Lists live product types, oldest first.
    pub async fn list(&self) -> DbResult<Vec<ProductType>> {
        let sql = format!("{SELECT_PRODUCT_TYPE} WHERE deleted_at IS NULL ORDER BY id");
        let rows: Vec<ProductTypeRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        debug!(count = rows.len(), "Listed product types");
        Ok(rows.into_iter().map(ProductType::from).collect())
    }

    /// Gets a live product type by id.
    ///
    /// ## Returns
    /// * `Ok(Some(ProductType))` - Found
    /// * `Ok(None)` - Missing or soft-deleted
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<ProductType>> {
        let sql = format!("{SELECT_PRODUCT_TYPE} WHERE id = ?1 AND deleted_at IS NULL");
        let row: Option<ProductTypeRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ProductType::from))
    }

    /// Inserts a validated product type and returns it with its new id.
    pub async fn insert(&self, record: &ProductTypeRecord) -> DbResult<ProductType> {
        let now = Utc::now();

        debug!(description = %record.description, tax_bps = record.tax.bps(), "Inserting product type");

        let id = sqlx::query(
            r#"
            INSERT INTO product_types (description, tax_bps, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            "#,
        )
        .bind(&record.description)
        .bind(percentage_to_db(record.tax))
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("ProductType", id))
    }

    /// Overwrites a live product type with a validated record.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - Missing or soft-deleted
    pub async fn update(&self, id: i64, record: &ProductTypeRecord) -> DbResult<ProductType> {
        debug!(id = id, "Updating product type");

        let result = sqlx::query(
            r#"
            UPDATE product_types
            SET description = ?2, tax_bps = ?3, updated_at = ?4
            WHERE id = ?1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(&record.description)
        .bind(percentage_to_db(record.tax))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("ProductType", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("ProductType", id))
    }

    /// Soft-deletes a product type. Its products are left alone.
    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Soft-deleting product type");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE product_types
            SET deleted_at = ?2, updated_at = ?2
            WHERE id = ?1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("ProductType", id));
        }

        Ok(())
    }

    /// Number of live product types.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM product_types WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures;
    use venda_core::types::Percentage;

    fn record(description: &str, tax_pct: f64) -> ProductTypeRecord {
        ProductTypeRecord {
            description: description.to_string(),
            tax: Percentage::from_percentage(tax_pct),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = fixtures::database().await;
        let repo = db.product_types();

        let created = repo.insert(&record("informatica", 10.0)).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.tax.bps(), 1_000);
        assert!(created.deleted_at.is_none());

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_update_changes_fields() {
        let db = fixtures::database().await;
        let repo = db.product_types();

        let created = repo.insert(&record("bebidas", 5.0)).await.unwrap();
        let updated = repo
            .update(created.id, &record("bebidas frias", 12.5))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.description, "bebidas frias");
        assert_eq!(updated.tax.bps(), 1_250);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = fixtures::database().await;
        let err = db
            .product_types()
            .update(999, &record("x", 1.0))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "ProductType not found: 999");
    }

    #[tokio::test]
    async fn test_soft_delete_hides_type() {
        let db = fixtures::database().await;
        let repo = db.product_types();

        let keep = repo.insert(&record("limpeza", 18.0)).await.unwrap();
        let gone = repo.insert(&record("sazonal", 7.0)).await.unwrap();

        repo.soft_delete(gone.id).await.unwrap();

        assert!(repo.get_by_id(gone.id).await.unwrap().is_none());
        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, keep.id);
        assert_eq!(repo.count().await.unwrap(), 1);

        // Deleting twice is a not-found, as is updating a deleted type
        assert!(repo.soft_delete(gone.id).await.unwrap_err().is_not_found());
        assert!(repo
            .update(gone.id, &record("sazonal", 7.0))
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_tax_over_hundred_percent_is_rejected_by_schema() {
        let db = fixtures::database().await;
        let err = db
            .product_types()
            .insert(&record("impossivel", 150.0))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ConstraintViolation { .. }));
    }
}
