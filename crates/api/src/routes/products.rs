//! Product route handlers.
//!
//! Catalog reads are public; every mutation is admin-only. Product deletion
//! removes the product's reviews in the same transaction - a review must
//! never outlive its product.

use std::path::Path as FsPath;

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use oakline_core::ProductId;

use crate::db::{ProductRepository, ReviewRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::product::{CreateProduct, ProductWithReviews, UpdateProduct};
use crate::state::AppState;

/// Directory uploaded product images are written to.
const UPLOAD_DIR: &str = "public/uploads";

/// Maximum accepted image size (1MB).
const MAX_IMAGE_BYTES: usize = 1024 * 1024;

/// Handle `POST /api/v1/products` (admin only).
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(body): Json<CreateProduct>,
) -> Result<impl IntoResponse> {
    body.validate().map_err(AppError::Validation)?;

    let product = ProductRepository::new(state.pool())
        .insert(&body, admin.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "product": product }))))
}

/// Handle `GET /api/v1/products` (public).
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(json!({ "count": products.len(), "products": products })))
}

/// Handle `GET /api/v1/products/{id}` (public).
///
/// Returns the product with its reviews embedded.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let product = ProductRepository::new(state.pool())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No product with id : {id}")))?;

    let reviews = ReviewRepository::new(state.pool())
        .list_for_product(id)
        .await?;

    Ok(Json(json!({
        "product": ProductWithReviews { product, reviews }
    })))
}

/// Handle `PATCH /api/v1/products/{id}` (admin only).
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(body): Json<UpdateProduct>,
) -> Result<impl IntoResponse> {
    body.validate().map_err(AppError::Validation)?;

    let product = ProductRepository::new(state.pool())
        .update(id, &body)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound(format!("No product with id : {id}"))
            }
            other => other.into(),
        })?;

    Ok(Json(json!({ "product": product })))
}

/// Handle `DELETE /api/v1/products/{id}` (admin only).
///
/// The product and all reviews referencing it are deleted together.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let products = ProductRepository::new(state.pool());

    products
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No product with id : {id}")))?;

    products.delete_with_reviews(id).await?;

    Ok(Json(json!({ "msg": "Success! Product removed." })))
}

/// Handle `GET /api/v1/products/{id}/reviews` (public).
pub async fn reviews(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let reviews = ReviewRepository::new(state.pool())
        .list_for_product(id)
        .await?;
    Ok(Json(json!({ "count": reviews.len(), "reviews": reviews })))
}

/// Handle `POST /api/v1/products/uploadImage` (admin only).
///
/// Accepts a multipart `image` field of at most 1MB and stores it under the
/// public uploads directory.
pub async fn upload_image(
    RequireAdmin(_admin): RequireAdmin,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::Validation("No File Uploaded".to_owned()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let is_image = field
            .content_type()
            .is_some_and(|ct| ct.starts_with("image"));
        if !is_image {
            return Err(AppError::Validation("Please Upload Image".to_owned()));
        }

        // Keep only the final path component of the client-supplied name.
        let file_name = field
            .file_name()
            .and_then(|name| FsPath::new(name).file_name())
            .and_then(|name| name.to_str())
            .map(ToOwned::to_owned)
            .ok_or_else(|| AppError::Validation("Please Upload Image".to_owned()))?;

        let data = field
            .bytes()
            .await
            .map_err(|_| AppError::Validation("No File Uploaded".to_owned()))?;

        if data.len() > MAX_IMAGE_BYTES {
            return Err(AppError::Validation(
                "Please upload image smaller than 1MB".to_owned(),
            ));
        }

        tokio::fs::create_dir_all(UPLOAD_DIR)
            .await
            .map_err(|e| AppError::Internal(format!("failed to create upload dir: {e}")))?;
        tokio::fs::write(format!("{UPLOAD_DIR}/{file_name}"), &data)
            .await
            .map_err(|e| AppError::Internal(format!("failed to store image: {e}")))?;

        return Ok(Json(json!({ "image": format!("/uploads/{file_name}") })));
    }

    Err(AppError::Validation("No File Uploaded".to_owned()))
}
