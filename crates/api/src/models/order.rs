//! Order model and checkout request types.
//!
//! Order items are immutable snapshots of the product taken at order time;
//! later catalog changes never alter an existing order.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use oakline_core::{OrderId, OrderStatus, ProductId, UserId};

/// A single priced line of an order, snapshotted from the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub quantity: i32,
}

/// An order row. `total = subtotal + tax + shipping_fee`, always.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping_fee: Decimal,
    pub total: Decimal,
    /// Opaque reference handed out by the payment gateway at creation.
    pub client_secret: String,
    /// Reference supplied by the client when confirming payment.
    pub payment_intent_id: Option<String>,
    pub status: OrderStatus,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order together with its item snapshots.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub order_items: Vec<OrderItem>,
}

/// A cart line as submitted by the client. Only the product reference and
/// quantity are trusted; pricing comes from the catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: ProductId,
    pub quantity: i32,
}

/// Payload for creating an order.
///
/// `tax` and `shipping_fee` are optional at the wire level so their absence
/// maps to a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    #[serde(default)]
    pub items: Vec<CartLine>,
    pub tax: Option<Decimal>,
    pub shipping_fee: Option<Decimal>,
}

/// Payload for confirming an order's payment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrder {
    pub payment_intent_id: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_item_wire_shape() {
        let item = OrderItem {
            product_id: ProductId::new(1),
            name: "accent chair".to_owned(),
            price: Decimal::from(10),
            image: "/uploads/example.jpeg".to_owned(),
            quantity: 2,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["productId"], 1);
        assert_eq!(json["quantity"], 2);
    }

    #[test]
    fn test_create_order_accepts_missing_charges() {
        let req: CreateOrder = serde_json::from_value(serde_json::json!({
            "items": [{"product": 1, "quantity": 2}]
        }))
        .unwrap();
        assert!(req.tax.is_none());
        assert!(req.shipping_fee.is_none());
    }
}
