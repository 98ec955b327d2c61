//! User model and token identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use oakline_core::{Email, Role, UserId};

/// An account.
///
/// The password hash is never part of this struct; repositories return it
/// separately and only to the authentication service.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The identity embedded in (and recovered from) a session token.
///
/// This is the only view of a user that authenticated handlers see; it is
/// also the `{"user": ...}` payload returned by register/login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUser {
    pub name: String,
    pub user_id: UserId,
    pub role: Role,
}

impl From<&User> for TokenUser {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            user_id: user.id,
            role: user.role,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_token_user_wire_shape() {
        let token_user = TokenUser {
            name: "ada".to_owned(),
            user_id: UserId::new(3),
            role: Role::Admin,
        };
        let json = serde_json::to_value(&token_user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "ada", "userId": 3, "role": "admin"})
        );
    }
}
