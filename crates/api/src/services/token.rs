//! Session tokens.
//!
//! A session is a signed, time-boxed token embedding `{name, userId, role}`,
//! carried in the `token` cookie. Verification is stateless and fails
//! closed: malformed, forged, or expired tokens all collapse to the same
//! authentication failure. There is no server-side revocation list — logout
//! just re-issues the cookie already expired, and an issued token stays
//! valid until its natural expiry.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use oakline_core::{Role, UserId};

use crate::config::ApiConfig;
use crate::models::TokenUser;

/// Name of the session cookie.
pub const TOKEN_COOKIE: &str = "token";

/// Errors that can occur when issuing or verifying a token.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Signing failed (malformed key material).
    #[error("token signing failed")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// The token is missing, malformed, forged, or expired. Deliberately a
    /// single variant: verification never yields a partial identity.
    #[error("Authentication Invalid")]
    Invalid,
}

/// Signed token payload.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    name: String,
    user_id: UserId,
    role: Role,
    exp: i64,
}

/// Issues and verifies session tokens, and owns the cookie attributes.
#[derive(Clone)]
pub struct TokenSessions {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime_hours: i64,
    secure_cookies: bool,
}

impl TokenSessions {
    /// Create a token issuer from raw parts.
    #[must_use]
    pub fn new(secret: &SecretString, lifetime_hours: i64, secure_cookies: bool) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            lifetime_hours,
            secure_cookies,
        }
    }

    /// Create a token issuer from the application configuration.
    #[must_use]
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            config.jwt_lifetime_hours,
            config.production,
        )
    }

    /// Issue a signed token for `user`, expiring after the configured
    /// lifetime.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(&self, user: &TokenUser) -> Result<String, TokenError> {
        let claims = Claims {
            name: user.name.clone(),
            user_id: user.user_id,
            role: user.role,
            exp: (Utc::now() + Duration::hours(self.lifetime_hours)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Verify a token and recover the identity it embeds.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for anything short of a correctly
    /// signed, unexpired token.
    pub fn verify(&self, token: &str) -> Result<TokenUser, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| TokenError::Invalid)?;

        Ok(TokenUser {
            name: data.claims.name,
            user_id: data.claims.user_id,
            role: data.claims.role,
        })
    }

    /// Attach a freshly issued token cookie to the jar.
    #[must_use]
    pub fn attach_cookie(&self, jar: CookieJar, token: String) -> CookieJar {
        let expires = OffsetDateTime::now_utc() + time::Duration::hours(self.lifetime_hours);
        jar.add(self.session_cookie(token, expires))
    }

    /// Attach an already-expired cookie, logging the session out.
    #[must_use]
    pub fn expire_cookie(&self, jar: CookieJar) -> CookieJar {
        jar.add(self.session_cookie("logout".to_owned(), OffsetDateTime::now_utc()))
    }

    fn session_cookie(&self, value: String, expires: OffsetDateTime) -> Cookie<'static> {
        Cookie::build((TOKEN_COOKIE, value))
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Lax)
            .path("/")
            .expires(expires)
            .build()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sessions(lifetime_hours: i64) -> TokenSessions {
        TokenSessions::new(
            &SecretString::from("0123456789abcdef0123456789abcdef"),
            lifetime_hours,
            false,
        )
    }

    fn identity() -> TokenUser {
        TokenUser {
            name: "ada".to_owned(),
            user_id: UserId::new(7),
            role: Role::User,
        }
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let sessions = sessions(24);
        let token = sessions.issue(&identity()).unwrap();
        let verified = sessions.verify(&token).unwrap();
        assert_eq!(verified, identity());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let sessions = sessions(24);
        let token = sessions.issue(&identity()).unwrap();
        let tampered = format!("{token}x");
        assert!(matches!(
            sessions.verify(&tampered),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = sessions(24).issue(&identity()).unwrap();
        let other = TokenSessions::new(
            &SecretString::from("ffffffffffffffffffffffffffffffff"),
            24,
            false,
        );
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_expired_token_rejected() {
        // A negative lifetime stamps an exp well past the default leeway.
        let sessions = sessions(-2);
        let token = sessions.issue(&identity()).unwrap();
        assert!(matches!(sessions.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            sessions(24).verify("not-a-token"),
            Err(TokenError::Invalid)
        ));
    }
}
