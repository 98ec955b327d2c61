//! Authentication service.
//!
//! Registration, login, and profile/password updates. Password hashing is
//! Argon2id through pure functions; hashes are recomputed only when the
//! plaintext changes, as an explicit step here rather than a storage hook.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use oakline_core::{Email, EmailError, Role, UserId};

use crate::db::{RepositoryError, UserRepository};
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;
/// Display name length bounds.
const NAME_LENGTH: std::ops::RangeInclusive<usize> = 3..=50;

/// Errors that can occur during authentication operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// A request field failed validation.
    #[error("{0}")]
    Validation(String),

    /// Wrong password, or no account for the email. One message for both:
    /// login must not reveal which half failed.
    #[error("Invalid Credentials")]
    InvalidCredentials,

    /// The email is already registered.
    #[error("Email already exists")]
    EmailTaken,

    /// Password too weak.
    #[error("{0}")]
    WeakPassword(String),

    /// The account no longer exists.
    #[error("user not found")]
    UserNotFound,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new account.
    ///
    /// The very first account ever created becomes an admin; everyone after
    /// that is an ordinary user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailTaken` if the email is already registered,
    /// or a validation error for a bad name, email, or password.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let name = validate_name(name)?;
        let email = Email::parse(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let is_first_account = self.users.count().await? == 0;
        let role = if is_first_account {
            Role::Admin
        } else {
            Role::User
        };

        let user = self
            .users
            .create(name, &email, &password_hash, role)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is
    /// wrong; the error never distinguishes an unknown account from a wrong
    /// password.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        // A malformed email cannot belong to any account.
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Update the caller's own name and email.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailTaken` if the email belongs to another
    /// account, or a validation error for a bad name or email.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        name: &str,
        email: &str,
    ) -> Result<User, AuthError> {
        let name = validate_name(name)?;
        let email = Email::parse(email)?;

        self.users
            .update_profile(user_id, name, &email)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })
    }

    /// Change the caller's own password after verifying the old one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the old password is wrong,
    /// or `AuthError::WeakPassword` if the new one fails validation.
    pub async fn change_password(
        &self,
        user_id: UserId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let stored_hash = self
            .users
            .password_hash(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(old_password, &stored_hash)?;
        validate_password(new_password)?;

        let new_hash = hash_password(new_password)?;
        self.users.update_password_hash(user_id, &new_hash).await?;

        Ok(())
    }
}

/// Validate a display name, returning it trimmed.
fn validate_name(name: &str) -> Result<&str, AuthError> {
    let name = name.trim();
    if !NAME_LENGTH.contains(&name.len()) {
        return Err(AuthError::Validation(format!(
            "Name must be between {} and {} characters",
            NAME_LENGTH.start(),
            NAME_LENGTH.end()
        )));
    }
    Ok(name)
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// Pure function; also used by the CLI when bootstrapping admin accounts.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a plaintext password against a stored hash.
///
/// Pure function, decoupled from the account record.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password does not match.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verify_roundtrip() {
        let hash = hash_password("sekrit-enough").unwrap();
        assert!(verify_password("sekrit-enough", &hash).is_ok());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = hash_password("sekrit-enough").unwrap();
        assert!(matches!(
            verify_password("wrong-password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("sekrit-enough").unwrap();
        let second = hash_password("sekrit-enough").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("longer").is_ok());
    }

    #[test]
    fn test_name_bounds() {
        assert!(validate_name("al").is_err());
        assert!(validate_name(&"x".repeat(51)).is_err());
        assert_eq!(validate_name("  ada  ").unwrap(), "ada");
    }
}
