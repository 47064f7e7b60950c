// Unit tests for error module
// Tests serialization and the mapping of core errors

use crate::error::FrunkError;

use common::ErrorLocation;

use frunk_core::error::{ApiError, CoreError, ValidationFailure, WorkspaceError};

/// **VALUE**: Tests that errors serialize as tagged data.
///
/// **WHY THIS MATTERS**: Front ends other than the shell receive errors as
/// JSON; an opaque string would lose the variant.
///
/// **BUG THIS CATCHES**: Would catch the `#[serde(tag, content)]` layout changing
/// or a non-serializable field being added.
#[test]
fn given_frunk_error_when_serialized_then_tagged_with_variant() {
    // GIVEN: A NotLoggedIn error
    let err = FrunkError::NotLoggedIn {
        message: String::from("Please log in"),
        location: ErrorLocation::caller(),
    };

    // WHEN: Serializing to JSON
    let json = serde_json::to_value(&err).unwrap();

    // THEN: Variant name and message are both present
    assert_eq!(json["type"], "NotLoggedIn");
    assert_eq!(json["data"]["message"], "Please log in");
    assert!(json["data"]["location"]["file"].as_str().unwrap().ends_with("error.rs"));
}

/// **VALUE**: Verifies an expired session maps to `NotLoggedIn`.
///
/// **WHY THIS MATTERS**: The shell routes to the login view on exactly this variant.
///
/// **BUG THIS CATCHES**: Would catch 401s from the notes view being shown as generic errors.
#[test]
fn given_auth_required_workspace_error_when_converted_then_not_logged_in() {
    let workspace_error = WorkspaceError::from(ApiError::request(401, "Unauthorized"));

    let err = FrunkError::from(workspace_error);

    assert!(err.is_not_logged_in());
}

/// **VALUE**: Verifies other workspace errors keep their banner text.
///
/// **BUG THIS CATCHES**: Would catch the location-bearing `Display` text
/// being shown to the user instead of the message.
#[test]
fn given_validation_error_when_converted_then_core_with_user_message() {
    let workspace_error = WorkspaceError::validation(ValidationFailure::EmptyTagName);

    let err = FrunkError::from(workspace_error);

    assert!(matches!(err, FrunkError::Core { .. }));
    assert_eq!(err.message(), "tag name cannot be empty");
}

/// **VALUE**: Verifies startup failures from the core crate keep their variant mapping.
///
/// **BUG THIS CATCHES**: Would catch a workspace error wrapped in `CoreError`
/// losing the `NotLoggedIn` routing.
#[test]
fn given_core_error_when_converted_then_workspace_errors_still_route() {
    let wrapped = CoreError::from(WorkspaceError::from(ApiError::request(401, "Unauthorized")));
    let api = CoreError::from(ApiError::request(500, "boom"));

    assert!(FrunkError::from(wrapped).is_not_logged_in());

    let err = FrunkError::from(api);
    assert!(matches!(err, FrunkError::Core { .. }));
    assert!(err.message().contains("boom"));
}
