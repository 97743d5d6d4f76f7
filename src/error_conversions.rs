//! Error conversion glue between layers.
//!
//! The domain and storage layers must not depend on service or repository
//! error types, so their conversions live here.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;
use crate::services::ServiceError;
use crate::services::storage::StorageError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::Unexpected(val.to_string())
    }
}

impl From<StorageError> for ServiceError {
    fn from(val: StorageError) -> Self {
        ServiceError::Storage(val.to_string())
    }
}
