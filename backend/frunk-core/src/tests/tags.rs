use crate::error::workspace::{ValidationFailure, WorkspaceError};
use crate::notes::rows::TagRow;
use crate::notes::tags::{validate_new_name, validate_rename};

use common::Tag;

fn row(id: i64, name: &str) -> TagRow {
    TagRow::new(Tag {
        id,
        name: name.to_string(),
        color: "#007bff".to_string(),
        note_count: 0,
    })
}

fn reason(error: WorkspaceError) -> ValidationFailure {
    match error {
        WorkspaceError::Validation { reason, .. } => reason,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

/// **VALUE**: Verifies blank tag names are rejected before any request.
///
/// **WHY THIS MATTERS**: The server would otherwise create a tag with no visible name.
///
/// **BUG THIS CATCHES**: Would catch whitespace-only names slipping through untrimmed.
#[test]
fn given_blank_name_when_validated_then_empty_name_error() {
    let error = validate_new_name("   ").unwrap_err();
    assert_eq!(reason(error), ValidationFailure::EmptyTagName);

    // AND: Valid names come back trimmed
    assert_eq!(validate_new_name("  work ").unwrap(), "work");
}

/// **VALUE**: Verifies a rename cannot take another tag's name.
///
/// **WHY THIS MATTERS**: Two tags with the same name cannot be told apart in the filter bar.
///
/// **BUG THIS CATCHES**: Would catch the tag's own name counting as a duplicate,
/// which would make "save without changes" fail.
#[test]
fn given_existing_names_when_rename_validated_then_only_others_conflict() {
    // GIVEN: Two tags
    let tags = vec![row(1, "work"), row(2, "home")];

    // WHEN/THEN: Taking another tag's name fails
    let error = validate_rename(&tags, 1, " home ").unwrap_err();
    assert_eq!(
        reason(error),
        ValidationFailure::DuplicateTagName {
            name: "home".to_string()
        }
    );

    // AND: Keeping its own name or choosing a new one succeeds
    assert_eq!(validate_rename(&tags, 1, "work").unwrap(), "work");
    assert_eq!(validate_rename(&tags, 1, "office").unwrap(), "office");
}

/// **VALUE**: Verifies validation errors carry a banner message and location.
///
/// **BUG THIS CATCHES**: Would catch `#[track_caller]` being lost on the constructor.
#[test]
fn given_validation_error_when_formatted_then_has_message_and_location() {
    let error = validate_new_name("").unwrap_err();

    assert_eq!(error.user_message(), "tag name cannot be empty");
    assert!(error.to_string().contains("tags.rs"));
}
