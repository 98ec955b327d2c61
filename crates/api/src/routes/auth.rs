//! Authentication route handlers: register, login, logout.
//!
//! Register and login both answer with `{"user": tokenSummary}` and attach a
//! fresh session cookie; logout attaches an already-expired one.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::models::TokenUser;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Registration payload. Fields are optional at the wire level so their
/// absence maps to a validation error rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Handle `POST /api/v1/auth/register`.
///
/// The first account ever registered becomes an admin.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let (Some(name), Some(email), Some(password)) = (body.name, body.email, body.password) else {
        return Err(AppError::Validation(
            "Please provide name, email and password".to_owned(),
        ));
    };

    let user = AuthService::new(state.pool())
        .register(&name, &email, &password)
        .await?;

    let token_user = TokenUser::from(&user);
    let token = state.tokens().issue(&token_user)?;
    let jar = state.tokens().attach_cookie(jar, token);

    Ok((StatusCode::CREATED, jar, Json(json!({ "user": token_user }))))
}

/// Handle `POST /api/v1/auth/login`.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(AppError::Validation(
            "Please provide email and password".to_owned(),
        ));
    };

    let user = AuthService::new(state.pool())
        .login(&email, &password)
        .await?;

    let token_user = TokenUser::from(&user);
    let token = state.tokens().issue(&token_user)?;
    let jar = state.tokens().attach_cookie(jar, token);

    Ok((StatusCode::OK, jar, Json(json!({ "user": token_user }))))
}

/// Handle `POST /api/v1/auth/logout`.
///
/// Stateless logout: the cookie is replaced with an already-expired value.
/// A previously issued token stays valid until its natural expiry.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = state.tokens().expire_cookie(jar);
    (StatusCode::OK, jar, Json(json!({ "msg": "user logged out!" })))
}
