//! Business rules of the back-office, generic over the repository traits.

use thiserror::Error;

use crate::domain::auth::{AdminModel, AuthenticatedUser, PermissionAction};
use crate::password::PasswordError;
use crate::repository::errors::RepositoryError;

pub mod admin;
pub mod auth;
pub mod client_requests;
pub mod clients;
pub mod permissions;
pub mod request_types;
pub mod seed;
pub mod users;

/// Errors surfaced to the HTTP layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The user may not perform the requested operation.
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// Submitted data was rejected; the message is shown to the user.
    #[error("{0}")]
    Form(String),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

/// Fails with [`ServiceError::Unauthorized`] unless `user` is active staff
/// holding the permission for `action` on `model`.
pub fn ensure_perm(
    user: &AuthenticatedUser,
    action: PermissionAction,
    model: AdminModel,
) -> ServiceResult<()> {
    if user.is_admin_member() && user.can(action, model) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Changelists are open to users holding either view or change.
pub fn ensure_view_or_change(user: &AuthenticatedUser, model: AdminModel) -> ServiceResult<()> {
    ensure_perm(user, PermissionAction::View, model)
        .or_else(|_| ensure_perm(user, PermissionAction::Change, model))
}

/// Trims the search box input, dropping it when blank.
pub(crate) fn normalize_search(search: Option<String>) -> Option<String> {
    search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::BTreeSet;

    use crate::domain::auth::AuthenticatedUser;
    use crate::domain::types::{UserId, Username};

    pub fn staff_with(perms: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId::new(7).unwrap(),
            username: Username::new("limiteduser").unwrap(),
            is_active: true,
            is_staff: true,
            is_superuser: false,
            permissions: perms.iter().map(|p| p.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    pub fn superuser() -> AuthenticatedUser {
        AuthenticatedUser {
            is_superuser: true,
            username: Username::new("superadmin").unwrap(),
            ..staff_with(&[])
        }
    }
}
