//! Product rating aggregation.
//!
//! The product columns `average_rating` and `num_of_reviews` are a derived
//! cache over the review set. Every review mutation is followed by a full
//! recompute: one aggregate over the rows that exist right now, written back
//! onto the product. There is no delta arithmetic, so concurrent recomputes
//! need no coordination; whichever one finishes last wrote a consistent
//! snapshot.

use sqlx::PgPool;

use oakline_core::ProductId;

use crate::db::{ProductRepository, RepositoryError, ReviewRepository};

/// Recompute and persist a product's rating aggregate from its current
/// review set.
///
/// # Errors
///
/// Returns `RepositoryError` if the aggregate query or the product update
/// fails.
pub async fn recompute_product_rating(
    pool: &PgPool,
    product: ProductId,
) -> Result<(), RepositoryError> {
    let aggregate = ReviewRepository::new(pool)
        .aggregate_for_product(product)
        .await?;

    let average_rating = rounded_average(aggregate.average);
    let num_of_reviews = i32::try_from(aggregate.num_of_reviews)
        .map_err(|_| RepositoryError::DataCorruption("review count exceeds i32".to_owned()))?;

    ProductRepository::new(pool)
        .set_rating(product, average_rating, num_of_reviews)
        .await
}

/// Recompute after a review mutation, logging failure instead of raising it.
///
/// The review write is the source of truth; the aggregate is a best-effort
/// cache that may transiently lag. A failed recompute therefore never fails
/// the review operation that triggered it.
pub async fn recompute_after_review_change(pool: &PgPool, product: ProductId) {
    if let Err(err) = recompute_product_rating(pool, product).await {
        tracing::error!(
            product_id = %product,
            error = %err,
            "failed to recompute product rating aggregate"
        );
    }
}

/// Round a mean rating the way the catalog displays it: ceiling, 0 when
/// there are no reviews.
#[allow(clippy::cast_possible_truncation)] // ratings are in 1..=5
fn rounded_average(average: Option<f64>) -> i32 {
    average.map_or(0, |avg| avg.ceil() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_reviews_yields_zero() {
        assert_eq!(rounded_average(None), 0);
    }

    #[test]
    fn test_exact_mean_is_kept() {
        assert_eq!(rounded_average(Some(3.0)), 3);
        assert_eq!(rounded_average(Some(5.0)), 5);
    }

    #[test]
    fn test_fractional_mean_rounds_up() {
        assert_eq!(rounded_average(Some(3.2)), 4);
        assert_eq!(rounded_average(Some(4.5)), 5);
        // two reviews: 1 and 2 -> mean 1.5 -> displayed 2
        assert_eq!(rounded_average(Some(1.5)), 2);
    }
}
