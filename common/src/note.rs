use crate::pagination::PaginationState;
use crate::tag::{NoteTag, TagId};

use serde::{Deserialize, Serialize};

pub type NoteId = i64;

/// A note exactly as the server returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub tags: Vec<NoteTag>,
}

impl Note {
    pub fn tag_ids(&self) -> Vec<TagId> {
        self.tags.iter().map(|tag| tag.id).collect()
    }

    pub fn has_tag(&self, tag_id: TagId) -> bool {
        self.tags.iter().any(|tag| tag.id == tag_id)
    }
}

/// Body of `POST /notes/` and `PUT /notes/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tag_ids: Vec<TagId>,
}

impl NoteDraft {
    /// Add the tag if absent, remove it if present.
    pub fn toggle_tag(&mut self, tag_id: TagId) {
        if let Some(index) = self.tag_ids.iter().position(|id| *id == tag_id) {
            self.tag_ids.remove(index);
        } else {
            self.tag_ids.push(tag_id);
        }
    }
}

impl From<&Note> for NoteDraft {
    fn from(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            tag_ids: note.tag_ids(),
        }
    }
}

/// One page of `GET /notes/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesPage {
    #[serde(default)]
    pub notes: Vec<Note>,
    pub page: u32,
    pub pages: u32,
    pub total: u64,
    pub per_page: u32,
}

impl NotesPage {
    pub fn pagination(&self) -> PaginationState {
        PaginationState::from_server(self.page, self.pages, self.total, self.per_page)
    }
}

/// Filters and paging for `GET /notes/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteQuery {
    search: Option<String>,
    tag_id: Option<TagId>,
    page: u32,
    per_page: u32,
}

impl NoteQuery {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            search: None,
            tag_id: None,
            page,
            per_page,
        }
    }

    /// Empty search text is the same as no search.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = (!search.is_empty()).then_some(search);
        self
    }

    pub fn with_tag(mut self, tag_id: Option<TagId>) -> Self {
        self.tag_id = tag_id;
        self
    }

    /// Query-string pairs in the order the server documents them.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(tag_id) = self.tag_id {
            pairs.push(("tag_id", tag_id.to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("per_page", self.per_page.to_string()));
        pairs
    }
}
