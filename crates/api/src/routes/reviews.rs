//! Review route handlers.
//!
//! Every mutation ends with a rating-aggregate recompute for the touched
//! product. The recompute is best-effort: its failure is logged and the
//! review operation still reports success, because the review rows are the
//! source of truth and the aggregate is a derived cache.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use oakline_core::ReviewId;

use crate::db::{ProductRepository, ReviewRepository};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::review::{CreateReview, UpdateReview, validate_review_fields};
use crate::services::permissions::check_permissions;
use crate::services::ratings;
use crate::state::AppState;

/// Handle `POST /api/v1/reviews`.
///
/// The exists-check below is an early exit for the common case; under
/// concurrent duplicate submissions both checks can pass, and the unique
/// index rejects the loser, which surfaces as the same conflict.
pub async fn create(
    State(state): State<AppState>,
    AuthUser(author): AuthUser,
    Json(body): Json<CreateReview>,
) -> Result<impl IntoResponse> {
    validate_review_fields(body.rating, &body.title, &body.comment)
        .map_err(AppError::Validation)?;

    ProductRepository::new(state.pool())
        .find_by_id(body.product)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No product with id : {}", body.product)))?;

    let reviews = ReviewRepository::new(state.pool());

    if reviews.exists_for(body.product, author.user_id).await? {
        return Err(AppError::Conflict(
            "Already submitted review for this product".to_owned(),
        ));
    }

    let review = reviews
        .insert(
            body.product,
            author.user_id,
            body.rating,
            &body.title,
            &body.comment,
        )
        .await?;

    ratings::recompute_after_review_change(state.pool(), review.product_id).await;

    Ok((StatusCode::CREATED, Json(json!({ "review": review }))))
}

/// Handle `GET /api/v1/reviews` (public).
///
/// Each review carries a summary of its product and author.
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let reviews = ReviewRepository::new(state.pool()).list_detailed().await?;
    Ok(Json(json!({ "count": reviews.len(), "reviews": reviews })))
}

/// Handle `GET /api/v1/reviews/{id}` (public).
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ReviewId>,
) -> Result<impl IntoResponse> {
    let review = ReviewRepository::new(state.pool())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No review with id {id}")))?;

    Ok(Json(json!({ "review": review })))
}

/// Handle `PATCH /api/v1/reviews/{id}` (owner or admin).
pub async fn update(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<ReviewId>,
    Json(body): Json<UpdateReview>,
) -> Result<impl IntoResponse> {
    validate_review_fields(body.rating, &body.title, &body.comment)
        .map_err(AppError::Validation)?;

    let reviews = ReviewRepository::new(state.pool());

    let review = reviews
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No review with id {id}")))?;

    check_permissions(&requester, review.user_id)?;

    let review = reviews
        .update(id, body.rating, &body.title, &body.comment)
        .await?;

    ratings::recompute_after_review_change(state.pool(), review.product_id).await;

    Ok(Json(json!({ "review": review })))
}

/// Handle `DELETE /api/v1/reviews/{id}` (owner or admin).
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<ReviewId>,
) -> Result<impl IntoResponse> {
    let reviews = ReviewRepository::new(state.pool());

    let review = reviews
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No review with id {id}")))?;

    check_permissions(&requester, review.user_id)?;

    reviews.delete(id).await?;

    ratings::recompute_after_review_change(state.pool(), review.product_id).await;

    Ok(Json(json!({ "msg": "Success! Review removed" })))
}
