//! Error conversion glue between the layers.
//!
//! The domain layer must not depend on repository or service error types, so
//! the conversions live here instead of next to [`TypeConstraintError`].

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;
#[cfg(feature = "server")]
use crate::services::ServiceError;

#[cfg(feature = "server")]
impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_errors_become_validation_errors() {
        let err = RepositoryError::from(TypeConstraintError::InvalidUsername);
        assert!(matches!(err, RepositoryError::ValidationError(msg) if msg == "invalid username"));
    }
}
