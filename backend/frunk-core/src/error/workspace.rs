use crate::error::api::ApiError;

use common::{ErrorLocation, NoteId, TagId};

use std::fmt;

use thiserror::Error as ThisError;

/// Failures surfaced by the notes workspace.
#[derive(Debug, ThisError)]
pub enum WorkspaceError {
    /// No session; the caller routes to the login view.
    #[error("Authentication required {location}")]
    AuthRequired { location: ErrorLocation },

    #[error("Validation failed: {reason} {location}")]
    Validation {
        reason: ValidationFailure,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Api(ApiError),
}

/// Inline validation problems, checked before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    EmptyTagName,
    DuplicateTagName { name: String },
    UnknownNote { id: NoteId },
    UnknownTag { id: TagId },
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTagName => write!(f, "tag name cannot be empty"),
            Self::DuplicateTagName { name } => write!(f, "tag name '{}' already exists", name),
            Self::UnknownNote { id } => write!(f, "note {} is not on this page", id),
            Self::UnknownTag { id } => write!(f, "tag {} does not exist", id),
        }
    }
}

impl WorkspaceError {
    #[track_caller]
    pub fn validation(reason: ValidationFailure) -> Self {
        WorkspaceError::Validation {
            reason,
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn auth_required() -> Self {
        WorkspaceError::AuthRequired {
            location: ErrorLocation::caller(),
        }
    }

    pub fn is_auth_required(&self) -> bool {
        matches!(self, WorkspaceError::AuthRequired { .. })
    }

    /// Text suitable for the dismissible error banner.
    pub fn user_message(&self) -> String {
        match self {
            WorkspaceError::AuthRequired { .. } => String::from("Please log in"),
            WorkspaceError::Validation { reason, .. } => reason.to_string(),
            WorkspaceError::Api(error) => error.user_message(),
        }
    }
}

impl From<ApiError> for WorkspaceError {
    #[track_caller]
    fn from(error: ApiError) -> Self {
        if error.is_auth_required() {
            return WorkspaceError::auth_required();
        }
        WorkspaceError::Api(error)
    }
}
