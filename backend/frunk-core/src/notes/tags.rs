//! Inline validation of tag names before they reach the server.

use crate::error::workspace::{ValidationFailure, WorkspaceError};
use crate::notes::rows::TagRow;

use common::TagId;

/// Trimmed name, or a validation error when nothing is left.
#[track_caller]
pub fn validate_new_name(name: &str) -> Result<String, WorkspaceError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(WorkspaceError::validation(ValidationFailure::EmptyTagName));
    }
    Ok(trimmed.to_string())
}

/// Validate a rename of `tag_id`: non-empty and not used by another tag.
#[track_caller]
pub fn validate_rename(
    tags: &[TagRow],
    tag_id: TagId,
    name: &str,
) -> Result<String, WorkspaceError> {
    let trimmed = validate_new_name(name)?;
    let taken = tags
        .iter()
        .any(|row| row.tag.id != tag_id && row.tag.name == trimmed);
    if taken {
        return Err(WorkspaceError::validation(
            ValidationFailure::DuplicateTagName { name: trimmed },
        ));
    }
    Ok(trimmed)
}
