//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use oakline_core::OrderId;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, RequireAdmin};
use crate::models::order::{CreateOrder, OrderWithItems, UpdateOrder};
use crate::services::checkout::CheckoutService;
use crate::services::permissions::check_permissions;
use crate::state::AppState;

/// Handle `POST /api/v1/orders`.
///
/// Runs the full pipeline: price the cart from the catalog, reserve a
/// payment intent, persist. The response carries the client secret needed to
/// complete payment out of band.
pub async fn create(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    Json(body): Json<CreateOrder>,
) -> Result<impl IntoResponse> {
    let order = CheckoutService::new(state.pool(), state.gateway())
        .create_order(&body, owner.user_id)
        .await?;

    let client_secret = order.order.client_secret.clone();

    Ok((
        StatusCode::CREATED,
        Json(json!({ "order": order, "clientSecret": client_secret })),
    ))
}

/// Handle `GET /api/v1/orders` (admin only).
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;
    Ok(Json(json!({ "count": orders.len(), "orders": orders })))
}

/// Handle `GET /api/v1/orders/showAllMyOrders`.
///
/// Pre-scoped to the caller by query; no per-row guard needed.
pub async fn show_mine(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(owner.user_id)
        .await?;
    Ok(Json(json!({ "count": orders.len(), "orders": orders })))
}

/// Handle `GET /api/v1/orders/{id}` (owner or admin).
pub async fn show(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<OrderId>,
) -> Result<impl IntoResponse> {
    let order = OrderRepository::new(state.pool())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No order with id : {id}")))?;

    check_permissions(&requester, order.order.user_id)?;

    Ok(Json(json!({ "order": order })))
}

/// Handle `PATCH /api/v1/orders/{id}` (owner or admin).
///
/// Records the caller-supplied payment reference and moves the order to its
/// terminal `paid` state. The reference is trusted as confirmation; no
/// verification call is made to the gateway.
pub async fn update(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<OrderId>,
    Json(body): Json<UpdateOrder>,
) -> Result<impl IntoResponse> {
    let Some(payment_intent_id) = body.payment_intent_id else {
        return Err(AppError::Validation(
            "Please provide payment intent id".to_owned(),
        ));
    };

    let orders = OrderRepository::new(state.pool());

    let order = orders
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No order with id : {id}")))?;

    check_permissions(&requester, order.order.user_id)?;

    let updated = OrderWithItems {
        order: orders.mark_paid(id, &payment_intent_id).await?,
        order_items: order.order_items,
    };

    Ok(Json(json!({ "order": updated })))
}
