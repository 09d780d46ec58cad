//! Catalog repositories: categories and products.
//!
//! Products carry a weighted tsvector column (`search_vector`) derived from
//! the name and descriptions. It is recomputed synchronously inside the same
//! transaction as every create/update, mirroring a save-triggered index
//! refresh; query-time ranking is delegated to `ts_rank`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use bazaar_core::{CategoryId, ProductId};

use super::RepositoryError;
use crate::models::catalog::{Category, Product, ProductFilter, ProductInput};

const PRODUCT_COLUMNS: &str = "id, name, price, stock, discount, brand, size, color, is_active, \
     short_description, long_description, category_id, created_at";

/// Internal row type for category queries.
#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    parent_id: Option<i64>,
    is_active: bool,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            parent_id: row.parent_id.map(CategoryId::new),
            is_active: row.is_active,
        }
    }
}

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price: Decimal,
    stock: i32,
    discount: Decimal,
    brand: Option<String>,
    size: Option<String>,
    color: Option<String>,
    is_active: bool,
    short_description: String,
    long_description: String,
    category_id: Option<i64>,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            price: row.price,
            stock: row.stock,
            discount: row.discount,
            brand: row.brand,
            size: row.size,
            color: row.color,
            is_active: row.is_active,
            short_description: row.short_description,
            long_description: row.long_description,
            category_id: row.category_id.map(CategoryId::new),
            created_at: row.created_at,
        }
    }
}

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories, parents before children within the same name order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, parent_id, is_active FROM categories ORDER BY parent_id NULLS FIRST, name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, parent_id, is_active FROM categories WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        parent_id: Option<CategoryId>,
        is_active: bool,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "INSERT INTO categories (name, parent_id, is_active)
             VALUES ($1, $2, $3)
             RETURNING id, name, parent_id, is_active",
        )
        .bind(name)
        .bind(parent_id.map(|id| id.as_i64()))
        .bind(is_active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "category"))?;

        Ok(row.into())
    }

    /// Update a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new name collides.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: CategoryId,
        name: &str,
        parent_id: Option<CategoryId>,
        is_active: bool,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "UPDATE categories
             SET name = $2, parent_id = $3, is_active = $4
             WHERE id = $1
             RETURNING id, name, parent_id, is_active",
        )
        .bind(id.as_i64())
        .bind(name)
        .bind(parent_id.map(|id| id.as_i64()))
        .bind(is_active)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "category"))?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a category. Child categories cascade; products are detached
    /// (their `category_id` nulls out), not deleted.
    ///
    /// # Returns
    ///
    /// Returns `true` if the category was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: CategoryId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products matching the filter.
    ///
    /// With a `search` term, results are restricted to tsvector matches and
    /// ordered by `ts_rank` descending; otherwise newest first. Attribute
    /// filters are case-insensitive exact matches, price bounds inclusive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE TRUE"
        ));

        if let Some(brand) = &filter.brand {
            qb.push(" AND lower(brand) = lower(");
            qb.push_bind(brand);
            qb.push(")");
        }
        if let Some(size) = &filter.size {
            qb.push(" AND lower(size) = lower(");
            qb.push_bind(size);
            qb.push(")");
        }
        if let Some(color) = &filter.color {
            qb.push(" AND lower(color) = lower(");
            qb.push_bind(color);
            qb.push(")");
        }
        if let Some(min_price) = filter.min_price {
            qb.push(" AND price >= ");
            qb.push_bind(min_price);
        }
        if let Some(max_price) = filter.max_price {
            qb.push(" AND price <= ");
            qb.push_bind(max_price);
        }
        if let Some(category_id) = filter.category_id {
            qb.push(" AND category_id = ");
            qb.push_bind(category_id.as_i64());
        }
        if let Some(search) = &filter.search {
            qb.push(" AND search_vector @@ websearch_to_tsquery('english', ");
            qb.push_bind(search);
            qb.push(")");
            qb.push(" ORDER BY ts_rank(search_vector, websearch_to_tsquery('english', ");
            qb.push_bind(search);
            qb.push(")) DESC");
        } else {
            qb.push(" ORDER BY created_at DESC");
        }

        let rows = qb
            .build_query_as::<ProductRow>()
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a product. The search vector is computed in the same
    /// transaction as the insert.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (name, price, stock, discount, brand, size, color, is_active,
                                   short_description, long_description, category_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.discount)
        .bind(&input.brand)
        .bind(&input.size)
        .bind(&input.color)
        .bind(input.is_active)
        .bind(&input.short_description)
        .bind(&input.long_description)
        .bind(input.category_id.map(|id| id.as_i64()))
        .fetch_one(&mut *tx)
        .await?;

        refresh_search_vector(&mut tx, row.id).await?;
        tx.commit().await?;

        Ok(row.into())
    }

    /// Replace a product. The search vector is recomputed in the same
    /// transaction as the update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products
             SET name = $2, price = $3, stock = $4, discount = $5, brand = $6, size = $7,
                 color = $8, is_active = $9, short_description = $10, long_description = $11,
                 category_id = $12
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_i64())
        .bind(&input.name)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.discount)
        .bind(&input.brand)
        .bind(&input.size)
        .bind(&input.color)
        .bind(input.is_active)
        .bind(&input.short_description)
        .bind(&input.long_description)
        .bind(input.category_id.map(|id| id.as_i64()))
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Err(RepositoryError::NotFound);
        };

        refresh_search_vector(&mut tx, row.id).await?;
        tx.commit().await?;

        Ok(row.into())
    }

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Recompute the weighted search vector for one product.
///
/// Name gets weight A, short description B, long description C — search
/// ranking favors title matches over description matches.
async fn refresh_search_vector(
    conn: &mut PgConnection,
    product_id: i64,
) -> Result<(), RepositoryError> {
    sqlx::query(
        "UPDATE products
         SET search_vector = setweight(to_tsvector('english', name), 'A')
                          || setweight(to_tsvector('english', coalesce(short_description, '')), 'B')
                          || setweight(to_tsvector('english', coalesce(long_description, '')), 'C')
         WHERE id = $1",
    )
    .bind(product_id)
    .execute(conn)
    .await?;

    Ok(())
}
