//! Domain records for Frunk.
//!
//! This crate contains pure data structures mirrored from the Frunk server
//! (users, tools, notes, tags, pagination) plus the small error vocabulary
//! shared by every layer. Records carry no I/O - they're just data that can
//! be passed between layers.
//!
//! ## Architecture
//!
//! - **common** (this crate): Pure data structures
//! - **frunk-core**: REST client, calculator, pager, autosave, notes workspace
//! - **frunk**: Application wiring (logger, state, shell)

pub mod error;
pub mod http_status;
pub mod note;
pub mod pagination;
pub mod redacted_secret;
pub mod tag;
pub mod tool;
pub mod user;

#[cfg(test)]
mod tests;

pub use error::error_location::ErrorLocation;
pub use error::model_error::ModelError;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use note::{Note, NoteDraft, NoteId, NoteQuery, NotesPage};
pub use pagination::PaginationState;
pub use redacted_secret::RedactedSecret;
pub use tag::{NoteTag, Tag, TagDraft, TagId, DEFAULT_TAG_COLOR};
pub use tool::{Tool, ToolEntry};
pub use user::{Credentials, User};
