//! View-side wrappers around mirrored records.

use common::{Note, Tag, TagDraft};

use std::time::Duration;

use tokio::time::Instant;

/// A note as shown in the list.
#[derive(Debug, Clone)]
pub struct NoteRow {
    pub note: Note,
    pub is_editing: bool,
    saved_at: Option<Instant>,
}

impl NoteRow {
    pub fn new(note: Note) -> Self {
        Self {
            note,
            is_editing: false,
            saved_at: None,
        }
    }

    pub fn id(&self) -> common::NoteId {
        self.note.id
    }

    /// Take the server's view of a just-saved note.
    pub fn mark_saved(&mut self, saved: Option<Note>) {
        if let Some(saved) = saved {
            self.note.updated_at = saved.updated_at;
            self.note.tags = saved.tags;
        }
        self.saved_at = Some(Instant::now());
    }

    /// Whether the "saved" indicator is still showing.
    pub fn just_saved(&self, flash: Duration) -> bool {
        self.saved_at
            .is_some_and(|saved_at| saved_at.elapsed() < flash)
    }
}

/// A tag as shown in the tag manager, with its inline edit buffer.
#[derive(Debug, Clone)]
pub struct TagRow {
    pub tag: Tag,
    pub edit: Option<TagDraft>,
}

impl TagRow {
    pub fn new(tag: Tag) -> Self {
        Self { tag, edit: None }
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }
}
