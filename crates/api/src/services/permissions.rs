//! Ownership/role authorization guard.
//!
//! Every read/update/delete of a resource with a single owner (a profile, an
//! order, a review) passes through [`check_permissions`] before the response
//! may proceed. It is a precondition, not a filter: the resource has already
//! been fetched by id, and the guard only decides whether the requester may
//! act on it.

use oakline_core::UserId;

use crate::models::TokenUser;

/// The requester is neither an admin nor the owner of the resource.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Not authorized to access this route")]
pub struct PermissionError;

/// Decide whether `requester` may act on a resource owned by `owner`.
///
/// Admins always may; owners may act on their own resources; everyone else
/// is rejected.
///
/// # Errors
///
/// Returns `PermissionError` when access is denied.
pub fn check_permissions(requester: &TokenUser, owner: UserId) -> Result<(), PermissionError> {
    if requester.role.is_admin() {
        return Ok(());
    }
    if requester.user_id == owner {
        return Ok(());
    }
    Err(PermissionError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oakline_core::Role;

    fn requester(id: i32, role: Role) -> TokenUser {
        TokenUser {
            name: "someone".to_owned(),
            user_id: UserId::new(id),
            role,
        }
    }

    #[test]
    fn test_admin_may_act_on_any_resource() {
        let admin = requester(1, Role::Admin);
        assert!(check_permissions(&admin, UserId::new(1)).is_ok());
        assert!(check_permissions(&admin, UserId::new(99)).is_ok());
    }

    #[test]
    fn test_owner_may_act_on_own_resource() {
        let owner = requester(5, Role::User);
        assert!(check_permissions(&owner, UserId::new(5)).is_ok());
    }

    #[test]
    fn test_other_user_is_rejected() {
        let stranger = requester(5, Role::User);
        assert_eq!(
            check_permissions(&stranger, UserId::new(6)),
            Err(PermissionError)
        );
    }
}
