//! Application commands: each drives `frunk-core` and records the outcome in
//! [`AppState`](crate::state::AppState).

pub mod auth;
pub mod toolbox;

use crate::error::FrunkError;

use common::ErrorLocation;

use frunk_core::error::ApiError;

use std::panic::Location;

use log::error;

/// Wrap a request failure for the front end.
#[track_caller]
pub(crate) fn core_error(context: &str, error: ApiError) -> FrunkError {
    error!("{context}: {error}");
    if error.is_auth_required() {
        return FrunkError::not_logged_in();
    }
    FrunkError::Core {
        message: error.user_message(),
        location: ErrorLocation::from(Location::caller()),
    }
}
