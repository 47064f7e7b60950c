//! Rich-text editor sessions.
//!
//! The editor widget itself lives outside this crate behind
//! [`RichTextEditor`]. An [`EditorSession`] owns one widget and destroys it
//! when the session is closed, replaced, or dropped, so a widget never
//! outlives the edit it was opened for.

pub mod buffer;
pub mod content;

use std::collections::HashMap;
use std::fmt;

use log::debug;

use common::NoteId;

/// An attached editor widget.
pub trait RichTextEditor {
    fn content(&self) -> String;
    fn set_content(&mut self, html: &str);
    /// Detach the widget. Must be safe to call more than once.
    fn destroy(&mut self);
}

/// Creates editor widgets.
pub trait EditorFactory {
    type Editor: RichTextEditor;

    fn create(&self, id: &EditorId, profile: EditorProfile, initial: &str) -> Self::Editor;
}

/// Which editor slot a session occupies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EditorId {
    /// The new-note form.
    Draft,
    /// Inline editing of an existing note.
    Note(NoteId),
}

impl fmt::Display for EditorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorId::Draft => write!(f, "draft-editor"),
            EditorId::Note(id) => write!(f, "note-editor-{id}"),
        }
    }
}

/// Widget configuration for each kind of slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorProfile {
    /// Full toolbar for composing a new note.
    Draft,
    /// Compact toolbar for inline edits.
    Inline,
}

impl EditorProfile {
    pub fn height(&self) -> u32 {
        match self {
            EditorProfile::Draft => 200,
            EditorProfile::Inline => 150,
        }
    }

    pub fn plugins(&self) -> &'static [&'static str] {
        match self {
            EditorProfile::Draft => &[
                "lists",
                "link",
                "image",
                "charmap",
                "preview",
                "searchreplace",
                "visualblocks",
                "code",
                "fullscreen",
                "insertdatetime",
                "media",
                "table",
                "help",
                "wordcount",
            ],
            EditorProfile::Inline => &["lists", "link", "code", "autolink"],
        }
    }

    pub fn toolbar(&self) -> &'static str {
        match self {
            EditorProfile::Draft => {
                "undo redo | formatselect | bold italic underline | alignleft aligncenter alignright | bullist numlist | link image | code"
            }
            EditorProfile::Inline => "bold italic underline | bullist numlist | link | code",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            EditorProfile::Draft => "Start writing your note...",
            EditorProfile::Inline => "Note content",
        }
    }
}

/// Owns one editor widget for the lifetime of an edit.
pub struct EditorSession<E: RichTextEditor> {
    id: EditorId,
    editor: E,
}

impl<E: RichTextEditor> EditorSession<E> {
    pub fn id(&self) -> &EditorId {
        &self.id
    }

    pub fn content(&self) -> String {
        self.editor.content()
    }

    pub fn set_content(&mut self, html: &str) {
        self.editor.set_content(html);
    }

    /// Read the final content and destroy the widget.
    pub fn close(self) -> String {
        self.editor.content()
    }
}

impl<E: RichTextEditor> Drop for EditorSession<E> {
    fn drop(&mut self) {
        self.editor.destroy();
    }
}

/// Open editor sessions, at most one per slot.
pub struct EditorSlots<F: EditorFactory> {
    factory: F,
    sessions: HashMap<EditorId, EditorSession<F::Editor>>,
}

impl<F: EditorFactory> EditorSlots<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            sessions: HashMap::new(),
        }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Open a session, destroying any session already in that slot.
    pub fn open(&mut self, id: EditorId, profile: EditorProfile, initial: &str) {
        let editor = self.factory.create(&id, profile, initial);
        let session = EditorSession {
            id: id.clone(),
            editor,
        };
        if self.sessions.insert(id.clone(), session).is_some() {
            debug!("Replaced open editor {id}");
        }
    }

    pub fn is_open(&self, id: &EditorId) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn content(&self, id: &EditorId) -> Option<String> {
        self.sessions.get(id).map(EditorSession::content)
    }

    /// Returns `false` when no session is open in that slot.
    pub fn set_content(&mut self, id: &EditorId, html: &str) -> bool {
        match self.sessions.get_mut(id) {
            Some(session) => {
                session.set_content(html);
                true
            }
            None => false,
        }
    }

    /// Close a session, returning its final content.
    pub fn close(&mut self, id: &EditorId) -> Option<String> {
        self.sessions.remove(id).map(EditorSession::close)
    }

    /// Close every inline note editor, keeping the draft editor.
    pub fn close_note_editors(&mut self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|id, _| matches!(id, EditorId::Draft));
        before - self.sessions.len()
    }

    pub fn close_all(&mut self) {
        self.sessions.clear();
    }

    pub fn open_count(&self) -> usize {
        self.sessions.len()
    }
}
