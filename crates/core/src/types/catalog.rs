//! Catalog classification enums.
//!
//! The catalog is deliberately closed: products belong to one of a fixed set
//! of room categories and are sourced from a fixed set of companies. An
//! unknown value is a request error, not a new variant.

use serde::{Deserialize, Serialize};

/// Room category a product belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "product_category", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Office,
    Kitchen,
    Bedroom,
}

/// Furniture company a product is sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "product_company", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum Company {
    Ikea,
    Liddy,
    Marcos,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Office => write!(f, "office"),
            Self::Kitchen => write!(f, "kitchen"),
            Self::Bedroom => write!(f, "bedroom"),
        }
    }
}

impl std::fmt::Display for Company {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ikea => write!(f, "ikea"),
            Self::Liddy => write!(f, "liddy"),
            Self::Marcos => write!(f, "marcos"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&Category::Kitchen).unwrap(),
            "\"kitchen\""
        );
        assert_eq!(
            serde_json::from_str::<Company>("\"liddy\"").unwrap(),
            Company::Liddy
        );
    }

    #[test]
    fn test_unknown_value_rejected() {
        assert!(serde_json::from_str::<Category>("\"garage\"").is_err());
        assert!(serde_json::from_str::<Company>("\"acme\"").is_err());
    }
}
