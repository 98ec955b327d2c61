//! Review repository for database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;

use oakline_core::{Company, ProductId, ReviewId, UserId};

use super::RepositoryError;
use crate::models::Review;
use crate::models::review::{ReviewDetail, ReviewedProduct, Reviewer};

const REVIEW_COLUMNS: &str = "id, rating, title, comment, user_id, product_id, created_at, updated_at";

/// Flat row for the joined review listing.
#[derive(sqlx::FromRow)]
struct ReviewDetailRow {
    id: ReviewId,
    rating: i32,
    title: String,
    comment: String,
    product_id: ProductId,
    product_name: String,
    product_company: Company,
    product_price: Decimal,
    user_id: UserId,
    user_name: String,
}

impl From<ReviewDetailRow> for ReviewDetail {
    fn from(row: ReviewDetailRow) -> Self {
        Self {
            id: row.id,
            rating: row.rating,
            title: row.title,
            comment: row.comment,
            product: ReviewedProduct {
                id: row.product_id,
                name: row.product_name,
                company: row.product_company,
                price: row.product_price,
            },
            user: Reviewer {
                id: row.user_id,
                name: row.user_name,
            },
        }
    }
}

/// Aggregate over a product's review set.
pub struct RatingAggregate {
    pub num_of_reviews: i64,
    pub average: Option<f64>,
}

/// Repository for review database operations.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Whether `author` has already reviewed `product`.
    ///
    /// This is an early-exit optimization only; the unique index on
    /// (product_id, user_id) is what actually holds under concurrency.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists_for(
        &self,
        product: ProductId,
        author: UserId,
    ) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM reviews WHERE product_id = $1 AND user_id = $2)",
        )
        .bind(product)
        .bind(author)
        .fetch_one(self.pool)
        .await?;
        Ok(exists)
    }

    /// Insert a new review.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if this author already reviewed
    /// this product (unique-index violation; expected under concurrent
    /// duplicate submissions even after the pre-check passed).
    pub async fn insert(
        &self,
        product: ProductId,
        author: UserId,
        rating: i32,
        title: &str,
        comment: &str,
    ) -> Result<Review, RepositoryError> {
        sqlx::query_as::<_, Review>(&format!(
            "INSERT INTO reviews (rating, title, comment, user_id, product_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {REVIEW_COLUMNS}"
        ))
        .bind(rating)
        .bind(title.trim())
        .bind(comment)
        .bind(author)
        .bind(product)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_unique_violation(e, "Already submitted review for this product")
        })
    }

    /// List all reviews joined with product and author summaries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_detailed(&self) -> Result<Vec<ReviewDetail>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewDetailRow>(
            "SELECT r.id, r.rating, r.title, r.comment, \
                    p.id AS product_id, p.name AS product_name, \
                    p.company AS product_company, p.price AS product_price, \
                    u.id AS user_id, u.name AS user_name \
             FROM reviews r \
             JOIN products p ON p.id = r.product_id \
             JOIN users u ON u.id = r.user_id \
             ORDER BY r.created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ReviewDetail::from).collect())
    }

    /// Get a review by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, RepositoryError> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(review)
    }

    /// Replace a review's rating, title, and comment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the review does not exist.
    pub async fn update(
        &self,
        id: ReviewId,
        rating: i32,
        title: &str,
        comment: &str,
    ) -> Result<Review, RepositoryError> {
        sqlx::query_as::<_, Review>(&format!(
            "UPDATE reviews SET rating = $2, title = $3, comment = $4, updated_at = now() \
             WHERE id = $1 \
             RETURNING {REVIEW_COLUMNS}"
        ))
        .bind(id)
        .bind(rating)
        .bind(title.trim())
        .bind(comment)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a review.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the review does not exist.
    pub async fn delete(&self, id: ReviewId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// List the reviews of a single product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product: ProductId,
    ) -> Result<Vec<Review>, RepositoryError> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE product_id = $1 ORDER BY created_at DESC"
        ))
        .bind(product)
        .fetch_all(self.pool)
        .await?;
        Ok(reviews)
    }

    /// Count and average the ratings currently referencing `product`.
    ///
    /// One full-snapshot aggregate; the average is `None` when the product
    /// has no reviews.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn aggregate_for_product(
        &self,
        product: ProductId,
    ) -> Result<RatingAggregate, RepositoryError> {
        let (num_of_reviews, average): (i64, Option<f64>) = sqlx::query_as(
            "SELECT COUNT(*), AVG(rating)::float8 FROM reviews WHERE product_id = $1",
        )
        .bind(product)
        .fetch_one(self.pool)
        .await?;

        Ok(RatingAggregate {
            num_of_reviews,
            average,
        })
    }
}
