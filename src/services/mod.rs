//! View-models of the CRM console.
//!
//! Each view-model owns its state and receives its collaborators (REST
//! repository, UI ports, telephony device) as arguments, so pages are built
//! by composing view-models rather than merging them.

use thiserror::Error;

use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

pub mod autodialer;
pub mod call;
pub mod contacts_page;
pub mod crud;
pub mod list;
pub mod messages;
pub mod notify;
pub mod recorder;
pub mod storage;
#[cfg(test)]
pub(crate) mod testing;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("Type constraint violation: {0}")]
    TypeConstraint(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

