//! Authentication extractors.
//!
//! Handlers declare their authentication requirement through extractors:
//! [`AuthUser`] for any signed-in identity, [`RequireAdmin`] for admin-only
//! routes. Both read the `token` cookie and verify it statelessly; a
//! missing, malformed, or expired token rejects the request before the
//! handler body runs.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;

use crate::error::AppError;
use crate::models::TokenUser;
use crate::services::token::TOKEN_COOKIE;
use crate::state::AppState;

/// Extractor that requires an authenticated identity.
///
/// # Example
///
/// ```rust,ignore
/// async fn show_me(AuthUser(user): AuthUser) -> impl IntoResponse {
///     Json(json!({ "user": user }))
/// }
/// ```
pub struct AuthUser(pub TokenUser);

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        let cookie = jar
            .get(TOKEN_COOKIE)
            .ok_or_else(|| AppError::Authentication("Authentication Invalid".to_owned()))?;

        let user = state.tokens().verify(cookie.value())?;

        Ok(Self(user))
    }
}

/// Extractor that requires an authenticated admin.
///
/// Authentication failures reject with 401; a valid non-admin identity
/// rejects with 403.
pub struct RequireAdmin(pub TokenUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;

        if !user.role.is_admin() {
            return Err(AppError::Authorization(
                "Unauthorized to access this route".to_owned(),
            ));
        }

        Ok(Self(user))
    }
}
