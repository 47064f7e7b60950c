use crate::ErrorLocation;

use thiserror::Error as ThisError;

/// Errors raised when a record violates its invariants.
#[derive(Debug, ThisError)]
pub enum ModelError {
    #[error("Validation Error: {field}: {message} {location}")]
    Validation {
        field: &'static str,
        message: String,
        location: ErrorLocation,
    },
}

impl ModelError {
    #[track_caller]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ModelError::Validation {
            field,
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }
}
