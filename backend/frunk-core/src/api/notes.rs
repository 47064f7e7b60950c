use super::ApiClient;
use crate::autosave::PersistNote;
use crate::error::api::ApiError;

use common::{Note, NoteDraft, NoteId, NoteQuery, NoteTag, NotesPage, Tag, TagDraft, TagId};

use log::debug;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

const NOTES_ENDPOINT: &str = "notes/";
const TAGS_ENDPOINT: &str = "notes/tags";

/// Acknowledgement of `POST /notes/`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedNote {
    pub id: NoteId,
    #[serde(default)]
    pub tags: Vec<NoteTag>,
}

#[derive(Deserialize)]
struct NoteEnvelope {
    #[serde(default)]
    note: Option<Note>,
}

#[derive(Deserialize)]
struct PinEnvelope {
    is_pinned: bool,
}

impl ApiClient {
    pub async fn list_notes(&self, query: &NoteQuery) -> Result<NotesPage, ApiError> {
        let mut url = self.endpoint(NOTES_ENDPOINT)?;
        url.query_pairs_mut().extend_pairs(query.pairs());
        let page: NotesPage = self.get_json(url).await?;
        debug!(
            "Loaded {} notes (page {}/{}, total {})",
            page.notes.len(),
            page.page,
            page.pages,
            page.total
        );
        Ok(page)
    }

    pub async fn create_note(&self, draft: &NoteDraft) -> Result<CreatedNote, ApiError> {
        let url = self.endpoint(NOTES_ENDPOINT)?;
        let created: CreatedNote = self.send_json(Method::POST, url, draft).await?;
        debug!("Created note {}", created.id);
        Ok(created)
    }

    /// Returns the server's copy of the note when it sends one back.
    pub async fn update_note(
        &self,
        note_id: NoteId,
        draft: &NoteDraft,
    ) -> Result<Option<Note>, ApiError> {
        let url = self.endpoint(&format!("{NOTES_ENDPOINT}{note_id}"))?;
        let envelope: NoteEnvelope = self.send_json(Method::PUT, url, draft).await?;
        Ok(envelope.note)
    }

    pub async fn delete_note(&self, note_id: NoteId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("{NOTES_ENDPOINT}{note_id}"))?;
        self.delete(url).await
    }

    /// Flip the pin and return the new state.
    pub async fn toggle_pin(&self, note_id: NoteId) -> Result<bool, ApiError> {
        let url = self.endpoint(&format!("{NOTES_ENDPOINT}{note_id}/toggle-pin"))?;
        let envelope: PinEnvelope = self.send_json(Method::POST, url, &json!({})).await?;
        Ok(envelope.is_pinned)
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        let url = self.endpoint(TAGS_ENDPOINT)?;
        self.get_json(url).await
    }

    pub async fn create_tag(&self, draft: &TagDraft) -> Result<Tag, ApiError> {
        let url = self.endpoint(TAGS_ENDPOINT)?;
        self.send_json(Method::POST, url, draft).await
    }

    pub async fn update_tag(&self, tag_id: TagId, draft: &TagDraft) -> Result<Tag, ApiError> {
        let url = self.endpoint(&format!("{TAGS_ENDPOINT}/{tag_id}"))?;
        self.send_json(Method::PUT, url, draft).await
    }

    pub async fn delete_tag(&self, tag_id: TagId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("{TAGS_ENDPOINT}/{tag_id}"))?;
        self.delete(url).await
    }
}

impl PersistNote for ApiClient {
    async fn persist(&self, note_id: NoteId, draft: NoteDraft) -> Result<Option<Note>, ApiError> {
        self.update_note(note_id, &draft).await
    }
}
