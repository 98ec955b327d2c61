//! Status enums.

use serde::{Deserialize, Serialize};

/// Order payment status.
///
/// Orders are created `Pending` and move to `Paid` exactly once when the
/// payment is confirmed. `Paid` is terminal; refunds and cancellation are not
/// modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Paid => write!(f, "paid"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Paid).unwrap(),
            "\"paid\""
        );
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"pending\"").unwrap(),
            OrderStatus::Pending
        );
    }
}
