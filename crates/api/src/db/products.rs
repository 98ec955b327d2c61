//! Product repository for database operations.

use sqlx::PgPool;

use oakline_core::{ProductId, UserId};

use super::RepositoryError;
use crate::models::Product;
use crate::models::product::{CreateProduct, UpdateProduct};

const PRODUCT_COLUMNS: &str = "id, name, price, description, image, category, company, colors, \
     featured, free_shipping, inventory, average_rating, num_of_reviews, user_id, \
     created_at, updated_at";

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

    /// Insert a new product owned by `creator`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(
        &self,
        data: &CreateProduct,
        creator: UserId,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products \
                 (name, price, description, image, category, company, colors, \
                  featured, free_shipping, inventory, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(data.name.trim())
        .bind(data.price)
        .bind(&data.description)
        .bind(&data.image)
        .bind(data.category)
        .bind(data.company)
        .bind(&data.colors)
        .bind(data.featured)
        .bind(data.free_shipping)
        .bind(data.inventory)
        .bind(creator)
        .fetch_one(self.pool)
        .await?;
        Ok(product)
    }

    /// List all products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(products)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(product)
    }

    /// Apply a partial update; absent fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn update(
        &self,
        id: ProductId,
        data: &UpdateProduct,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET \
                 name = COALESCE($2, name), \
                 price = COALESCE($3, price), \
                 description = COALESCE($4, description), \
                 image = COALESCE($5, image), \
                 category = COALESCE($6, category), \
                 company = COALESCE($7, company), \
                 colors = COALESCE($8, colors), \
                 featured = COALESCE($9, featured), \
                 free_shipping = COALESCE($10, free_shipping), \
                 inventory = COALESCE($11, inventory), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(data.name.as_deref().map(str::trim))
        .bind(data.price)
        .bind(data.description.as_deref())
        .bind(data.image.as_deref())
        .bind(data.category)
        .bind(data.company)
        .bind(data.colors.as_deref())
        .bind(data.featured)
        .bind(data.free_shipping)
        .bind(data.inventory)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product and every review referencing it, in one transaction.
    ///
    /// A dangling review would be a permanent integrity violation with no
    /// compensating aggregator, so the two deletes commit or fail together.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn delete_with_reviews(&self, id: ProductId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM reviews WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }

    /// Overwrite the derived rating aggregate columns.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn set_rating(
        &self,
        id: ProductId,
        average_rating: i32,
        num_of_reviews: i32,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET average_rating = $2, num_of_reviews = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(average_rating)
        .bind(num_of_reviews)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
