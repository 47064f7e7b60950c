//! In-memory editor used by the terminal shell and by tests.

use super::{EditorFactory, EditorId, EditorProfile, RichTextEditor};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::trace;

/// Editor that keeps its HTML in a string.
#[derive(Debug)]
pub struct BufferEditor {
    id: EditorId,
    html: String,
    live: Arc<AtomicUsize>,
    destroyed: bool,
}

impl RichTextEditor for BufferEditor {
    fn content(&self) -> String {
        self.html.clone()
    }

    fn set_content(&mut self, html: &str) {
        self.html = html.to_string();
    }

    fn destroy(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            self.live.fetch_sub(1, Ordering::SeqCst);
            trace!("Destroyed editor {}", self.id);
        }
    }
}

/// Creates [`BufferEditor`]s and counts how many are alive.
#[derive(Debug, Clone, Default)]
pub struct BufferEditorFactory {
    live: Arc<AtomicUsize>,
}

impl BufferEditorFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_editors(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl EditorFactory for BufferEditorFactory {
    type Editor = BufferEditor;

    fn create(&self, id: &EditorId, profile: EditorProfile, initial: &str) -> BufferEditor {
        self.live.fetch_add(1, Ordering::SeqCst);
        trace!("Created {profile:?} editor {id}");
        BufferEditor {
            id: id.clone(),
            html: initial.to_string(),
            live: Arc::clone(&self.live),
            destroyed: false,
        }
    }
}
