//! Errors raised by the REST client.
//!
//! - HTTP status codes stored directly (not parsed from strings)
//! - `is_retryable()` uses status codes and transport flags, not message content
//! - All errors include ErrorLocation for debugging

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

/// Banner text for transport failures.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error";

#[derive(Debug, ThisError)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("Request Failed: HTTP {status} - {message} {location}")]
    Request {
        status: HttpStatusCode,
        message: String,
        location: ErrorLocation,
    },

    /// The request never got an HTTP answer.
    #[error("Network Error: {message} {location}")]
    Network {
        message: String,
        is_timeout: bool,
        is_connection: bool,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    #[track_caller]
    pub fn request(status: u16, message: impl Into<String>) -> Self {
        ApiError::Request {
            status: HttpStatusCode(status),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// A response body that could not be read, whatever reqwest classed it as.
    #[track_caller]
    pub fn unreadable_body(error: reqwest::Error) -> Self {
        ApiError::Network {
            message: error.to_string(),
            is_timeout: error.is_timeout(),
            is_connection: false,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Timeouts, refused connections, and transient statuses.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network {
                is_timeout,
                is_connection,
                ..
            } => *is_timeout || *is_connection,
            ApiError::Request { status, .. } => status.is_retryable(),
            ApiError::Json { .. } => false,
            ApiError::UrlParse { .. } => false,
        }
    }

    pub fn is_auth_required(&self) -> bool {
        matches!(self, ApiError::Request { status, .. } if status.is_auth_required())
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(status.0),
            _ => None,
        }
    }

    /// Text suitable for the dismissible error banner.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Request { message, .. } => message.clone(),
            ApiError::Network { .. } => NETWORK_ERROR_MESSAGE.to_string(),
            ApiError::Json { .. } => String::from("Unexpected response from server"),
            ApiError::UrlParse { message, .. } => message.clone(),
        }
    }
}

impl From<url::ParseError> for ApiError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        ApiError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        let location = ErrorLocation::from(Location::caller());

        if error.is_decode() {
            return ApiError::Json {
                message: error.to_string(),
                location,
            };
        }

        if let Some(status) = error.status() {
            return ApiError::Request {
                status: HttpStatusCode(status.as_u16()),
                message: error.to_string(),
                location,
            };
        }

        ApiError::Network {
            message: error.to_string(),
            is_timeout: error.is_timeout(),
            is_connection: error.is_connect(),
            location,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        ApiError::Json {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
