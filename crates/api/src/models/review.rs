//! Review model and request types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use oakline_core::{Company, ProductId, ReviewId, UserId};

/// Maximum review title length.
pub const MAX_TITLE_LENGTH: usize = 100;

/// A product review. At most one exists per (product, author) pair.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub rating: i32,
    pub title: String,
    pub comment: String,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A review joined with summaries of its product and author, as returned by
/// the review listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDetail {
    pub id: ReviewId,
    pub rating: i32,
    pub title: String,
    pub comment: String,
    pub product: ReviewedProduct,
    pub user: Reviewer,
}

/// Product summary embedded in a [`ReviewDetail`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewedProduct {
    pub id: ProductId,
    pub name: String,
    pub company: Company,
    pub price: Decimal,
}

/// Author summary embedded in a [`ReviewDetail`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reviewer {
    pub id: UserId,
    pub name: String,
}

/// Payload for creating a review.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReview {
    /// The reviewed product's id.
    pub product: ProductId,
    pub rating: i32,
    pub title: String,
    pub comment: String,
}

/// Payload for updating a review.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReview {
    pub rating: i32,
    pub title: String,
    pub comment: String,
}

/// Validate rating/title/comment constraints shared by create and update.
///
/// # Errors
///
/// Returns a message describing the first violated constraint.
pub fn validate_review_fields(rating: i32, title: &str, comment: &str) -> Result<(), String> {
    if !(1..=5).contains(&rating) {
        return Err("Rating must be between 1 and 5".to_owned());
    }
    let title = title.trim();
    if title.is_empty() {
        return Err("Please provide review title".to_owned());
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(format!(
            "Title can not be more than {MAX_TITLE_LENGTH} characters"
        ));
    }
    if comment.is_empty() {
        return Err("Please provide review text".to_owned());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(validate_review_fields(0, "good", "text").is_err());
        assert!(validate_review_fields(6, "good", "text").is_err());
        for rating in 1..=5 {
            assert!(validate_review_fields(rating, "good", "text").is_ok());
        }
    }

    #[test]
    fn test_title_and_comment_required() {
        assert!(validate_review_fields(3, "  ", "text").is_err());
        assert!(validate_review_fields(3, "good", "").is_err());
        assert!(validate_review_fields(3, &"t".repeat(MAX_TITLE_LENGTH + 1), "text").is_err());
    }
}
