//! Form definitions submitted by the console view-models.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;
use crate::dto::api::{FieldErrors, NON_FIELD_ERRORS};

pub mod campaign;
pub mod contact;
pub mod message;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl From<TypeConstraintError> for FormError {
    fn from(err: TypeConstraintError) -> Self {
        match err {
            TypeConstraintError::InvalidPhone => FormError::InvalidPhoneNumber,
            other => FormError::InvalidValue(other.to_string()),
        }
    }
}

impl FormError {
    /// Field-by-field messages for binding back onto the form.
    pub fn field_errors(&self) -> FieldErrors {
        match self {
            FormError::Validation(errors) => validation_to_field_errors(errors),
            other => FieldErrors::from([(NON_FIELD_ERRORS.to_string(), vec![other.to_string()])]),
        }
    }
}

/// Flattens `validator` output into the same shape the API reports.
pub fn validation_to_field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value ({})", e.code))
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}
