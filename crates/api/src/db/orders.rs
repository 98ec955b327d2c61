//! Order repository for database operations.

use std::collections::HashMap;

use sqlx::PgPool;

use oakline_core::{OrderId, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItem, OrderWithItems};
use crate::services::checkout::PricedOrder;

const ORDER_COLUMNS: &str = "id, subtotal, tax, shipping_fee, total, client_secret, \
     payment_intent_id, status, user_id, created_at, updated_at";

/// Item row carrying its parent order id, used to group listing results.
#[derive(sqlx::FromRow)]
struct ItemRow {
    order_id: OrderId,
    #[sqlx(flatten)]
    item: OrderItem,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a priced order and its item snapshots in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails; nothing is
    /// committed in that case.
    pub async fn insert(
        &self,
        priced: &PricedOrder,
        client_secret: &str,
        owner: UserId,
    ) -> Result<OrderWithItems, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders (subtotal, tax, shipping_fee, total, client_secret, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(priced.subtotal)
        .bind(priced.tax)
        .bind(priced.shipping_fee)
        .bind(priced.total)
        .bind(client_secret)
        .bind(owner)
        .fetch_one(&mut *tx)
        .await?;

        for item in &priced.items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, name, price, image, quantity) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(order.id)
            .bind(item.product_id)
            .bind(&item.name)
            .bind(item.price)
            .bind(&item.image)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(OrderWithItems {
            order,
            order_items: priced.items.clone(),
        })
    }

    /// List every order (admin view), newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        self.attach_items(orders).await
    }

    /// List the orders belonging to `owner`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        owner: UserId,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        self.attach_items(orders).await
    }

    /// Get an order with its items by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(
        &self,
        id: OrderId,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT product_id, name, price, image, quantity \
             FROM order_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(OrderWithItems {
            order,
            order_items: items,
        }))
    }

    /// Record the confirmed payment reference and mark the order paid.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn mark_paid(
        &self,
        id: OrderId,
        payment_intent_id: &str,
    ) -> Result<Order, RepositoryError> {
        sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET payment_intent_id = $2, status = 'paid', updated_at = now() \
             WHERE id = $1 \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(payment_intent_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Fetch the item snapshots for a batch of orders and zip them back on.
    async fn attach_items(
        &self,
        orders: Vec<Order>,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let ids: Vec<i32> = orders.iter().map(|o| o.id.as_i32()).collect();

        let rows = sqlx::query_as::<_, ItemRow>(
            "SELECT order_id, product_id, name, price, image, quantity \
             FROM order_items WHERE order_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            by_order.entry(row.order_id).or_default().push(row.item);
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let order_items = by_order.remove(&order.id).unwrap_or_default();
                OrderWithItems { order, order_items }
            })
            .collect())
    }
}
