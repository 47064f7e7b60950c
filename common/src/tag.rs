use serde::{Deserialize, Serialize};

pub type TagId = i64;

/// Color assigned to a tag created without an explicit one.
pub const DEFAULT_TAG_COLOR: &str = "#007bff";

/// Tag summary embedded in a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteTag {
    pub id: TagId,
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
}

/// Tag as listed by `/notes/tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub note_count: u64,
}

impl Tag {
    pub fn as_note_tag(&self) -> NoteTag {
        NoteTag {
            id: self.id,
            name: self.name.clone(),
            color: self.color.clone(),
        }
    }
}

/// Create/update payload for a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDraft {
    pub name: String,
    pub color: String,
}

impl TagDraft {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

impl Default for TagDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: default_color(),
        }
    }
}

fn default_color() -> String {
    DEFAULT_TAG_COLOR.to_string()
}
