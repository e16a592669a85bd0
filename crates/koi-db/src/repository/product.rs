//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! The catalog is what a shared-cart link is resolved against: every id in
//! the link is looked up here with [`ProductRepository::get_by_id`]. A
//! soft-deleted product behaves exactly like a missing one.

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use koi_core::validation::validate_product;
use koi_core::Product;

/// Raw `products` row.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: String,
    name: String,
    price_cents: i64,
    weight_grams: Option<i64>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> DbResult<Self> {
        let weight_grams = row
            .weight_grams
            .map(u32::try_from)
            .transpose()
            .map_err(|_| DbError::corrupt("products", format!("weight out of range for {}", row.id)))?;

        Ok(Product {
            id: row.id,
            name: row.name,
            price_cents: row.price_cents,
            weight_grams,
        })
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.get_by_id("tea-01").await?;
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

    /// Gets an active product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found or soft-deleted
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, price_cents, weight_grams
            FROM products
            WHERE id = ?1 AND is_active = 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Lists active products ordered by name.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, price_cents, weight_grams
            FROM products
            WHERE is_active = 1
            ORDER BY name
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::Validation)` - Empty id/name or negative price
    /// * `Err(DbError::UniqueViolation)` - Id already exists
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        validate_product(product)?;

        debug!(id = %product.id, "Inserting product");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, price_cents, weight_grams,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.weight_grams.map(i64::from))
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::UniqueViolation {
                field,
                value: product.id.clone(),
            },
            other => other,
        })?;

        Ok(())
    }

    /// Updates name, price and weight of an existing product.
    ///
    /// Carts that already hold the product keep their snapshot.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        validate_product(product)?;

        debug!(id = %product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                price_cents = ?3,
                weight_grams = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.weight_grams.map(i64::from))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Soft-deletes a product by setting is_active = false.
    ///
    /// Shared links that still mention the product will skip it.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET is_active = 0, updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
