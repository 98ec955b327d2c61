//! Product model and catalog request types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use oakline_core::{Category, Company, ProductId, UserId};

use crate::models::Review;

/// Maximum product name length.
pub const MAX_NAME_LENGTH: usize = 100;
/// Maximum product description length.
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// A catalog product.
///
/// `average_rating` and `num_of_reviews` are a derived cache over the
/// product's review set, maintained by the rating aggregator; they are never
/// written directly by catalog mutations.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub image: String,
    pub category: Category,
    pub company: Company,
    pub colors: Vec<String>,
    pub featured: bool,
    pub free_shipping: bool,
    pub inventory: i32,
    pub average_rating: i32,
    pub num_of_reviews: i32,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product together with its reviews, as returned by the single-product
/// read.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithReviews {
    #[serde(flatten)]
    pub product: Product,
    pub reviews: Vec<Review>,
}

fn default_image() -> String {
    "/uploads/example.jpeg".to_owned()
}

fn default_colors() -> Vec<String> {
    vec!["#222".to_owned()]
}

const fn default_inventory() -> i32 {
    15
}

/// Payload for creating a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub name: String,
    #[serde(default)]
    pub price: Decimal,
    pub description: String,
    #[serde(default = "default_image")]
    pub image: String,
    pub category: Category,
    pub company: Company,
    #[serde(default = "default_colors")]
    pub colors: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub free_shipping: bool,
    #[serde(default = "default_inventory")]
    pub inventory: i32,
}

impl CreateProduct {
    /// Validate field constraints.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first violated constraint.
    pub fn validate(&self) -> Result<(), String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Please provide product name".to_owned());
        }
        if name.len() > MAX_NAME_LENGTH {
            return Err(format!(
                "Name can not be more than {MAX_NAME_LENGTH} characters"
            ));
        }
        if self.description.is_empty() {
            return Err("Please provide product description".to_owned());
        }
        if self.description.len() > MAX_DESCRIPTION_LENGTH {
            return Err(format!(
                "Description can not be more than {MAX_DESCRIPTION_LENGTH} characters"
            ));
        }
        if self.price < Decimal::ZERO {
            return Err("Price can not be negative".to_owned());
        }
        if self.colors.is_empty() {
            return Err("Please provide at least one color".to_owned());
        }
        if self.inventory < 0 {
            return Err("Inventory can not be negative".to_owned());
        }
        Ok(())
    }
}

/// Payload for a partial product update. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<Category>,
    pub company: Option<Company>,
    pub colors: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub free_shipping: Option<bool>,
    pub inventory: Option<i32>,
}

impl UpdateProduct {
    /// Validate field constraints on the provided fields.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first violated constraint.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name
            && (name.trim().is_empty() || name.len() > MAX_NAME_LENGTH)
        {
            return Err(format!(
                "Name must be between 1 and {MAX_NAME_LENGTH} characters"
            ));
        }
        if let Some(description) = &self.description
            && (description.is_empty() || description.len() > MAX_DESCRIPTION_LENGTH)
        {
            return Err(format!(
                "Description must be between 1 and {MAX_DESCRIPTION_LENGTH} characters"
            ));
        }
        if let Some(price) = self.price
            && price < Decimal::ZERO
        {
            return Err("Price can not be negative".to_owned());
        }
        if let Some(colors) = &self.colors
            && colors.is_empty()
        {
            return Err("Please provide at least one color".to_owned());
        }
        if let Some(inventory) = self.inventory
            && inventory < 0
        {
            return Err("Inventory can not be negative".to_owned());
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn create_request() -> CreateProduct {
        serde_json::from_value(serde_json::json!({
            "name": "accent chair",
            "price": "25.99",
            "description": "A comfortable chair",
            "category": "office",
            "company": "marcos"
        }))
        .unwrap()
    }

    #[test]
    fn test_create_defaults() {
        let req = create_request();
        assert_eq!(req.image, "/uploads/example.jpeg");
        assert_eq!(req.colors, vec!["#222".to_owned()]);
        assert_eq!(req.inventory, 15);
        assert!(!req.featured);
        assert!(!req.free_shipping);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_rejects_long_name() {
        let mut req = create_request();
        req.name = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_rejects_empty_colors() {
        let mut req = create_request();
        req.colors = vec![];
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_validates_only_present_fields() {
        let update = UpdateProduct {
            price: Some(Decimal::from(10)),
            ..UpdateProduct::default()
        };
        assert!(update.validate().is_ok());

        let update = UpdateProduct {
            price: Some(Decimal::from(-1)),
            ..UpdateProduct::default()
        };
        assert!(update.validate().is_err());
    }
}
