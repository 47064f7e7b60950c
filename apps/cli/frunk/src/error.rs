use common::ErrorLocation;

use frunk_core::error::{CoreError, WorkspaceError};

use serde::Serialize;
use thiserror::Error;

/// Errors returned by application commands.
///
/// Serializable so the shell (or any other front end) can render them as
/// structured data; location tracking stays attached internally.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum FrunkError {
    /// Error from this App
    #[error("Frunk Error: {message} {location}")]
    Frunk {
        message: String,
        location: ErrorLocation,
    },

    /// Error from frunk-core operations (requests, config, workspace)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },

    /// The session is missing or expired
    #[error("Not Logged In Error: {message} {location}")]
    NotLoggedIn {
        message: String,
        location: ErrorLocation,
    },

    /// A shell line could not be understood
    #[error("Shell Error: {message} {location}")]
    Shell {
        message: String,
        location: ErrorLocation,
    },
}

impl FrunkError {
    #[track_caller]
    pub fn shell(message: impl Into<String>) -> Self {
        FrunkError::Shell {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn not_logged_in() -> Self {
        FrunkError::NotLoggedIn {
            message: String::from("Please log in"),
            location: ErrorLocation::caller(),
        }
    }

    pub fn is_not_logged_in(&self) -> bool {
        matches!(self, FrunkError::NotLoggedIn { .. })
    }

    /// The message without location, for display to the user.
    pub fn message(&self) -> &str {
        match self {
            FrunkError::Frunk { message, .. }
            | FrunkError::Core { message, .. }
            | FrunkError::NotLoggedIn { message, .. }
            | FrunkError::Shell { message, .. } => message,
        }
    }
}

impl From<WorkspaceError> for FrunkError {
    #[track_caller]
    fn from(error: WorkspaceError) -> Self {
        if error.is_auth_required() {
            return FrunkError::not_logged_in();
        }
        FrunkError::Core {
            message: error.user_message(),
            location: ErrorLocation::caller(),
        }
    }
}

impl From<CoreError> for FrunkError {
    #[track_caller]
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Workspace(error) => error.into(),
            other => FrunkError::Core {
                message: other.to_string(),
                location: ErrorLocation::caller(),
            },
        }
    }
}
