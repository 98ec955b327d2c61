//! Admin user management command.
//!
//! The API promotes only the very first registered account to admin; any
//! further admin has to be created out of band, here.

use sqlx::PgPool;

use oakline_api::db::UserRepository;
use oakline_api::services::auth::hash_password;
use oakline_core::{Email, Role};

use super::CommandError;

/// Create an admin account.
///
/// # Errors
///
/// Returns `CommandError` if the email or password is invalid, the email is
/// already registered, or the database is unreachable.
pub async fn create(email: &str, name: &str, password: &str) -> Result<(), CommandError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email).map_err(|e| CommandError::Invalid(e.to_string()))?;
    let password_hash =
        hash_password(password).map_err(|e| CommandError::Invalid(e.to_string()))?;

    let database_url = std::env::var("API_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("API_DATABASE_URL"))?;

    let pool = PgPool::connect(&database_url).await?;

    let user = UserRepository::new(&pool)
        .create(name, &email, &password_hash, Role::Admin)
        .await
        .map_err(|e| CommandError::Invalid(e.to_string()))?;

    tracing::info!(user_id = %user.id, email = %user.email, "admin user created");
    Ok(())
}
