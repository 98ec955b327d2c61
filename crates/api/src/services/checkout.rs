//! Order creation pipeline.
//!
//! Turns a cart into a priced, payment-backed order:
//! validate → snapshot and price each line from the catalog → reserve a
//! payment intent with the gateway → persist order and items in one
//! transaction. The gateway call comes before the persist, so a gateway
//! failure leaves no order behind; a persist failure after the gateway call
//! leaves an orphaned intent, which is logged for reconciliation and
//! surfaced as its own failure mode.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::PgPool;

use oakline_core::{ProductId, UserId};

use crate::db::{OrderRepository, ProductRepository, RepositoryError};
use crate::models::order::{CartLine, CreateOrder, OrderItem, OrderWithItems};
use crate::models::product::Product;
use crate::services::payments::{PaymentError, PaymentGateway, PaymentIntent};

/// Fixed settlement currency.
const CURRENCY: &str = "usd";

/// Errors that can occur while creating an order.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// The cart was empty.
    #[error("No cart items provided")]
    EmptyCart,

    /// Tax or shipping fee was absent (a zero value counts as absent).
    #[error("Please provide tax and shipping fee")]
    MissingCharges,

    /// A cart line had a non-positive quantity.
    #[error("Item quantity must be at least 1")]
    InvalidQuantity,

    /// A cart line referenced a product that does not exist.
    #[error("No product with id : {0}")]
    ProductNotFound(ProductId),

    /// The order total cannot be expressed in minor currency units.
    #[error("order total is not representable in minor units")]
    AmountNotRepresentable,

    /// The payment gateway rejected the intent or was unreachable. No order
    /// was persisted.
    #[error("payment gateway error: {0}")]
    Gateway(#[from] PaymentError),

    /// The order could not be persisted after the payment intent was already
    /// created. The intent is now orphaned gateway-side; the details have
    /// been logged for manual reconciliation.
    #[error("order persistence failed after payment intent {intent_id} was created")]
    OrphanedIntent {
        intent_id: String,
        #[source]
        source: RepositoryError,
    },

    /// Database failure before any payment intent existed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A validated, fully priced order ready to persist.
#[derive(Debug, Clone)]
pub struct PricedOrder {
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping_fee: Decimal,
    pub total: Decimal,
}

/// The order creation pipeline.
pub struct CheckoutService<'a> {
    products: ProductRepository<'a>,
    orders: OrderRepository<'a>,
    gateway: &'a dyn PaymentGateway,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, gateway: &'a dyn PaymentGateway) -> Self {
        Self {
            products: ProductRepository::new(pool),
            orders: OrderRepository::new(pool),
            gateway,
        }
    }

    /// Create an order from a cart.
    ///
    /// Every line is priced from the catalog at this moment; client-supplied
    /// prices are never trusted. The returned order is `pending` and carries
    /// the client secret the caller needs to complete payment out of band.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty cart or absent charges,
    /// `ProductNotFound` naming the first missing product id, a gateway
    /// error when no intent could be reserved, and `OrphanedIntent` when the
    /// persist failed after the intent was created.
    pub async fn create_order(
        &self,
        request: &CreateOrder,
        owner: UserId,
    ) -> Result<OrderWithItems, CheckoutError> {
        if request.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let (tax, shipping_fee) = validate_charges(request.tax, request.shipping_fee)?;

        let mut items = Vec::with_capacity(request.items.len());
        for line in &request.items {
            if line.quantity < 1 {
                return Err(CheckoutError::InvalidQuantity);
            }
            let product = self
                .products
                .find_by_id(line.product)
                .await?
                .ok_or(CheckoutError::ProductNotFound(line.product))?;
            items.push(snapshot_line(&product, line));
        }

        let priced = price_order(items, tax, shipping_fee);
        let intent = acquire_intent(self.gateway, priced.total).await?;

        match self.orders.insert(&priced, &intent.client_secret, owner).await {
            Ok(order) => Ok(order),
            Err(source) => {
                // The gateway-side reservation now has no corresponding
                // order; record everything needed to reconcile it by hand.
                tracing::error!(
                    intent_id = %intent.id,
                    amount = %priced.total,
                    currency = CURRENCY,
                    error = %source,
                    "order persistence failed after payment intent creation; \
                     intent is orphaned and needs reconciliation"
                );
                Err(CheckoutError::OrphanedIntent {
                    intent_id: intent.id,
                    source,
                })
            }
        }
    }
}

/// Validate the client-supplied charges.
///
/// Absent and zero are both rejected: a zero charge is treated as missing.
fn validate_charges(
    tax: Option<Decimal>,
    shipping_fee: Option<Decimal>,
) -> Result<(Decimal, Decimal), CheckoutError> {
    match (tax, shipping_fee) {
        (Some(tax), Some(fee)) if tax > Decimal::ZERO && fee > Decimal::ZERO => Ok((tax, fee)),
        _ => Err(CheckoutError::MissingCharges),
    }
}

/// Snapshot a cart line from the current product record.
fn snapshot_line(product: &Product, line: &CartLine) -> OrderItem {
    OrderItem {
        product_id: product.id,
        name: product.name.clone(),
        price: product.price,
        image: product.image.clone(),
        quantity: line.quantity,
    }
}

/// Price a set of snapshotted items: `subtotal = Σ quantity × price`,
/// `total = subtotal + tax + shipping_fee`.
fn price_order(items: Vec<OrderItem>, tax: Decimal, shipping_fee: Decimal) -> PricedOrder {
    let subtotal: Decimal = items
        .iter()
        .map(|item| Decimal::from(item.quantity) * item.price)
        .sum();
    let total = subtotal + tax + shipping_fee;

    PricedOrder {
        items,
        subtotal,
        tax,
        shipping_fee,
        total,
    }
}

/// Convert a total to minor units and reserve a payment intent for it.
async fn acquire_intent(
    gateway: &dyn PaymentGateway,
    total: Decimal,
) -> Result<PaymentIntent, CheckoutError> {
    let amount = to_minor_units(total)?;
    let intent = gateway.create_payment_intent(amount, CURRENCY).await?;
    Ok(intent)
}

/// Express a decimal amount in minor currency units (cents).
fn to_minor_units(amount: Decimal) -> Result<i64, CheckoutError> {
    (amount * Decimal::ONE_HUNDRED)
        .trunc()
        .to_i64()
        .ok_or(CheckoutError::AmountNotRepresentable)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use oakline_core::{Category, Company};

    fn product(id: i32, price: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("product-{id}"),
            price,
            description: "test".to_owned(),
            image: "/uploads/example.jpeg".to_owned(),
            category: Category::Office,
            company: Company::Ikea,
            colors: vec!["#222".to_owned()],
            featured: false,
            free_shipping: false,
            inventory: 15,
            average_rating: 0,
            num_of_reviews: 0,
            user_id: UserId::new(1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn line(id: i32, quantity: i32) -> CartLine {
        CartLine {
            product: ProductId::new(id),
            quantity,
        }
    }

    #[test]
    fn test_pricing_scenario() {
        // cart [{product: X, quantity: 2}], X.price=10, tax=2, shippingFee=5
        let item = snapshot_line(&product(1, Decimal::from(10)), &line(1, 2));
        let priced = price_order(vec![item], Decimal::from(2), Decimal::from(5));

        assert_eq!(priced.subtotal, Decimal::from(20));
        assert_eq!(priced.total, Decimal::from(27));
    }

    #[test]
    fn test_pricing_sums_multiple_lines() {
        let items = vec![
            snapshot_line(&product(1, Decimal::new(1050, 2)), &line(1, 3)),
            snapshot_line(&product(2, Decimal::from(4)), &line(2, 1)),
        ];
        let priced = price_order(items, Decimal::ONE, Decimal::ONE);

        // 3 × 10.50 + 4 = 35.50
        assert_eq!(priced.subtotal, Decimal::new(3550, 2));
        assert_eq!(priced.total, Decimal::new(3750, 2));
    }

    #[test]
    fn test_snapshot_ignores_client_price() {
        // The snapshot copies the catalog price; the cart line has no say.
        let item = snapshot_line(&product(7, Decimal::new(1999, 2)), &line(7, 1));
        assert_eq!(item.price, Decimal::new(1999, 2));
        assert_eq!(item.product_id, ProductId::new(7));
    }

    #[test]
    fn test_charges_zero_treated_as_absent() {
        assert!(matches!(
            validate_charges(Some(Decimal::ZERO), Some(Decimal::from(5))),
            Err(CheckoutError::MissingCharges)
        ));
        assert!(matches!(
            validate_charges(Some(Decimal::from(2)), None),
            Err(CheckoutError::MissingCharges)
        ));
        assert!(validate_charges(Some(Decimal::from(2)), Some(Decimal::from(5))).is_ok());
    }

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units(Decimal::from(27)).unwrap(), 2700);
        assert_eq!(to_minor_units(Decimal::new(1999, 2)).unwrap(), 1999);
        assert_eq!(to_minor_units(Decimal::ZERO).unwrap(), 0);
    }

    struct FakeGateway {
        fail: bool,
    }

    #[async_trait]
    impl PaymentGateway for FakeGateway {
        async fn create_payment_intent(
            &self,
            amount: i64,
            currency: &str,
        ) -> Result<PaymentIntent, PaymentError> {
            if self.fail {
                return Err(PaymentError::Api {
                    status: 402,
                    message: "card declined".to_owned(),
                });
            }
            Ok(PaymentIntent {
                id: format!("pi_{amount}_{currency}"),
                client_secret: format!("pi_{amount}_secret"),
            })
        }
    }

    #[tokio::test]
    async fn test_acquire_intent_converts_to_minor_units() {
        let gateway = FakeGateway { fail: false };
        let intent = acquire_intent(&gateway, Decimal::from(27)).await.unwrap();
        assert_eq!(intent.id, "pi_2700_usd");
    }

    #[tokio::test]
    async fn test_gateway_failure_maps_to_checkout_error() {
        let gateway = FakeGateway { fail: true };
        let err = acquire_intent(&gateway, Decimal::from(27))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Gateway(PaymentError::Api { status: 402, .. })
        ));
    }
}
