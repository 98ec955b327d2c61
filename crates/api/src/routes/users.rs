//! User route handlers.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;

use oakline_core::UserId;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, RequireAdmin};
use crate::models::TokenUser;
use crate::services::auth::AuthService;
use crate::services::permissions::check_permissions;
use crate::state::AppState;

/// Profile update payload.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Password update payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

/// Handle `GET /api/v1/users` (admin only).
///
/// Lists non-admin accounts; password hashes never leave the repository.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool()).list_customers().await?;
    Ok(Json(json!({ "users": users })))
}

/// Handle `GET /api/v1/users/showMe`.
///
/// Echoes the token identity; no database round-trip.
pub async fn show_me(AuthUser(user): AuthUser) -> impl IntoResponse {
    Json(json!({ "user": user }))
}

/// Handle `GET /api/v1/users/{id}`.
///
/// Guarded: only the user themselves or an admin may look up a profile.
pub async fn show(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<UserId>,
) -> Result<impl IntoResponse> {
    let user = UserRepository::new(state.pool())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No user with id : {id}")))?;

    check_permissions(&requester, user.id)?;

    Ok(Json(json!({ "user": user })))
}

/// Handle `PATCH /api/v1/users/updateUser` (self only).
///
/// Re-issues the session cookie: the token embeds the name, which may have
/// just changed.
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    jar: CookieJar,
    Json(body): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse> {
    let (Some(name), Some(email)) = (body.name, body.email) else {
        return Err(AppError::Validation("Please provide all values".to_owned()));
    };

    let user = AuthService::new(state.pool())
        .update_profile(requester.user_id, &name, &email)
        .await?;

    let token_user = TokenUser::from(&user);
    let token = state.tokens().issue(&token_user)?;
    let jar = state.tokens().attach_cookie(jar, token);

    Ok((jar, Json(json!({ "user": token_user }))))
}

/// Handle `PATCH /api/v1/users/updateUserPassword` (self only).
pub async fn update_password(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Json(body): Json<UpdatePasswordRequest>,
) -> Result<impl IntoResponse> {
    let (Some(old_password), Some(new_password)) = (body.old_password, body.new_password) else {
        return Err(AppError::Validation("Please provide both values".to_owned()));
    };

    AuthService::new(state.pool())
        .change_password(requester.user_id, &old_password, &new_password)
        .await?;

    Ok(Json(json!({ "msg": "Success! Password Updated." })))
}
