//! The notes view: a mirror of the server's note list and tag set.
//!
//! Every mutating operation issues its request and then reloads the
//! authoritative list (and tags, where they may have changed). Inline edits
//! go through the per-note [`Autosaver`]; results of background saves are
//! folded back in by [`NotesWorkspace::sync_autosaves`].

pub mod rows;
pub mod tags;
pub mod time;

use crate::api::ApiClient;
use crate::autosave::{AutosaveEvent, Autosaver};
use crate::config::NotesConfig;
use crate::editor::content::{is_content_empty, is_html_content, text_to_html};
use crate::editor::{EditorFactory, EditorId, EditorProfile, EditorSlots};
use crate::error::workspace::{ValidationFailure, WorkspaceError};
use crate::pager::{PageLabel, page_window};

use common::{NoteDraft, NoteId, NoteQuery, PaginationState, Tag, TagDraft, TagId};

use rows::{NoteRow, TagRow};

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::mpsc;

pub struct NotesWorkspace<F: EditorFactory> {
    api: ApiClient,
    autosaver: Autosaver<ApiClient>,
    autosave_events: mpsc::UnboundedReceiver<AutosaveEvent>,
    editors: EditorSlots<F>,
    notes: Vec<NoteRow>,
    tags: Vec<TagRow>,
    pagination: PaginationState,
    search_query: String,
    selected_tag: Option<TagId>,
    draft: NoteDraft,
    new_note_form_open: bool,
    new_tag: TagDraft,
    banner: Option<String>,
    saved_flash: Duration,
}

impl<F: EditorFactory> NotesWorkspace<F> {
    pub fn new(api: ApiClient, editor_factory: F, config: &NotesConfig) -> Self {
        let (autosaver, autosave_events) =
            Autosaver::new(Arc::new(api.clone()), config.autosave_quiet());

        Self {
            api,
            autosaver,
            autosave_events,
            editors: EditorSlots::new(editor_factory),
            notes: Vec::new(),
            tags: Vec::new(),
            pagination: PaginationState {
                per_page: config.per_page.max(1),
                ..PaginationState::default()
            },
            search_query: String::new(),
            selected_tag: None,
            draft: NoteDraft::default(),
            new_note_form_open: false,
            new_tag: TagDraft::default(),
            banner: None,
            saved_flash: config.saved_flash(),
        }
    }

    // ============================================
    // READ ACCESS
    // ============================================

    pub fn notes(&self) -> &[NoteRow] {
        &self.notes
    }

    pub fn note(&self, note_id: NoteId) -> Option<&NoteRow> {
        self.notes.iter().find(|row| row.id() == note_id)
    }

    pub fn tags(&self) -> &[TagRow] {
        &self.tags
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }

    pub fn page_window(&self) -> Vec<PageLabel> {
        page_window(self.pagination.page, self.pagination.pages)
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn selected_tag(&self) -> Option<TagId> {
        self.selected_tag
    }

    pub fn draft(&self) -> &NoteDraft {
        &self.draft
    }

    pub fn is_new_note_form_open(&self) -> bool {
        self.new_note_form_open
    }

    pub fn new_tag(&self) -> &TagDraft {
        &self.new_tag
    }

    pub fn editors(&self) -> &EditorSlots<F> {
        &self.editors
    }

    /// Waiting on an autosave timer or being persisted.
    pub fn is_saving(&self, note_id: NoteId) -> bool {
        self.autosaver.is_busy(note_id)
    }

    pub fn just_saved(&self, note_id: NoteId) -> bool {
        self.note(note_id)
            .is_some_and(|row| row.just_saved(self.saved_flash))
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    // ============================================
    // LOADING
    // ============================================

    /// Entering the notes view.
    pub async fn open(&mut self) -> Result<(), WorkspaceError> {
        self.load_notes().await?;
        self.load_tags().await
    }

    pub async fn load_notes(&mut self) -> Result<(), WorkspaceError> {
        let query = NoteQuery::new(self.pagination.page, self.pagination.per_page)
            .with_search(self.search_query.clone())
            .with_tag(self.selected_tag);

        let page = self
            .api
            .list_notes(&query)
            .await
            .map_err(|e| self.fail(e))?;

        let closed = self.editors.close_note_editors();
        if closed > 0 {
            debug!("Closed {closed} inline editors on reload");
        }

        self.pagination = page.pagination();
        self.notes = page.notes.into_iter().map(NoteRow::new).collect();
        Ok(())
    }

    pub async fn load_tags(&mut self) -> Result<(), WorkspaceError> {
        let tags = self.api.list_tags().await.map_err(|e| self.fail(e))?;
        self.tags = tags.into_iter().map(TagRow::new).collect();
        Ok(())
    }

    /// Forget everything (logout). Pending autosaves are discarded; call
    /// [`flush_autosaves`](Self::flush_autosaves) first to keep them.
    pub fn reset(&mut self) {
        let dropped = self.autosaver.cancel_all();
        if dropped > 0 {
            warn!("Discarded {dropped} unsaved note edits");
        }
        self.editors.close_all();
        self.notes.clear();
        self.tags.clear();
        self.pagination = PaginationState {
            per_page: self.pagination.per_page,
            ..PaginationState::default()
        };
        self.search_query.clear();
        self.selected_tag = None;
        self.draft = NoteDraft::default();
        self.new_note_form_open = false;
        self.new_tag = TagDraft::default();
        self.banner = None;
    }

    // ============================================
    // NEW NOTE FORM
    // ============================================

    pub fn expand_new_note_form(&mut self) {
        self.new_note_form_open = true;
        self.editors
            .open(EditorId::Draft, EditorProfile::Draft, &self.draft.content);
    }

    pub fn cancel_new_note(&mut self) {
        self.new_note_form_open = false;
        self.draft = NoteDraft::default();
        self.editors.close(&EditorId::Draft);
    }

    pub fn set_draft_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_draft_content(&mut self, html: impl Into<String>) {
        self.draft.content = html.into();
        self.editors.set_content(&EditorId::Draft, &self.draft.content);
    }

    pub fn toggle_tag_in_draft(&mut self, tag_id: TagId) {
        self.draft.toggle_tag(tag_id);
    }

    /// Post the draft. Returns `false` when there was nothing to post.
    pub async fn create_note(&mut self) -> Result<bool, WorkspaceError> {
        if let Some(content) = self.editors.content(&EditorId::Draft) {
            self.draft.content = content;
        }
        if self.draft.title.is_empty() && is_content_empty(&self.draft.content) {
            debug!("Ignoring empty draft");
            return Ok(false);
        }

        let created = self
            .api
            .create_note(&self.draft)
            .await
            .map_err(|e| self.fail(e))?;
        info!("Created note {}", created.id);

        self.cancel_new_note();
        self.pagination.reset_to_first();
        self.load_notes().await?;
        self.load_tags().await?;
        Ok(true)
    }

    // ============================================
    // INLINE EDITING
    // ============================================

    pub fn start_edit(&mut self, note_id: NoteId) -> Result<(), WorkspaceError> {
        let row = self.row_mut(note_id)?;
        row.is_editing = true;
        if !row.note.content.is_empty() && !is_html_content(&row.note.content) {
            row.note.content = text_to_html(&row.note.content);
        }
        let content = row.note.content.clone();

        self.editors
            .open(EditorId::Note(note_id), EditorProfile::Inline, &content);
        Ok(())
    }

    /// A keystroke in the inline editor.
    pub fn edit_note_content(
        &mut self,
        note_id: NoteId,
        html: impl Into<String>,
    ) -> Result<(), WorkspaceError> {
        let html = html.into();
        self.editors.set_content(&EditorId::Note(note_id), &html);
        self.row_mut(note_id)?.note.content = html;
        self.schedule_update(note_id)
    }

    pub fn set_note_title(
        &mut self,
        note_id: NoteId,
        title: impl Into<String>,
    ) -> Result<(), WorkspaceError> {
        self.row_mut(note_id)?.note.title = title.into();
        self.schedule_update(note_id)
    }

    pub fn finish_edit(&mut self, note_id: NoteId) -> Result<(), WorkspaceError> {
        let content = self.editors.close(&EditorId::Note(note_id));
        let row = self.row_mut(note_id)?;
        if let Some(content) = content {
            row.note.content = content;
        }
        row.is_editing = false;
        self.schedule_update(note_id)
    }

    /// (Re)start the autosave timer with the row's current state.
    pub fn schedule_update(&mut self, note_id: NoteId) -> Result<(), WorkspaceError> {
        let draft = NoteDraft::from(&self.row_mut(note_id)?.note);
        self.autosaver.schedule(note_id, draft);
        Ok(())
    }

    /// Persist a note right away.
    pub async fn update_note(&mut self, note_id: NoteId) -> Result<(), WorkspaceError> {
        let draft = NoteDraft::from(&self.row_mut(note_id)?.note);
        let saved = self
            .autosaver
            .persist_now(note_id, draft)
            .await
            .map_err(|e| self.fail(e))?;

        if let Ok(row) = self.row_mut(note_id) {
            row.mark_saved(saved);
        }
        self.load_tags().await
    }

    /// Fold finished background saves into the list. Returns how many succeeded.
    pub async fn sync_autosaves(&mut self) -> Result<usize, WorkspaceError> {
        let mut events = Vec::new();
        while let Ok(event) = self.autosave_events.try_recv() {
            events.push(event);
        }
        self.apply_autosaves(events).await
    }

    /// Persist every pending edit now (before logout or exit).
    pub async fn flush_autosaves(&mut self) -> Result<usize, WorkspaceError> {
        let events = self.autosaver.flush().await;
        let flushed = self.apply_autosaves(events).await?;
        let synced = self.sync_autosaves().await?;
        Ok(flushed + synced)
    }

    async fn apply_autosaves(&mut self, events: Vec<AutosaveEvent>) -> Result<usize, WorkspaceError> {
        let mut saved = 0;
        let mut first_error = None;

        for AutosaveEvent { note_id, outcome } in events {
            match outcome {
                Ok(note) => {
                    saved += 1;
                    if let Some(row) = self.notes.iter_mut().find(|row| row.id() == note_id) {
                        row.mark_saved(note);
                    }
                }
                Err(e) => {
                    let error = self.fail(e);
                    first_error.get_or_insert(error);
                }
            }
        }

        if saved > 0 {
            self.load_tags().await?;
        }
        match first_error {
            Some(error) => Err(error),
            None => Ok(saved),
        }
    }

    // ============================================
    // LIST OPERATIONS
    // ============================================

    pub async fn delete_note(&mut self, note_id: NoteId) -> Result<(), WorkspaceError> {
        self.api
            .delete_note(note_id)
            .await
            .map_err(|e| self.fail(e))?;
        self.autosaver.cancel(note_id);
        self.editors.close(&EditorId::Note(note_id));
        info!("Deleted note {note_id}");

        self.load_notes().await?;
        self.load_tags().await
    }

    pub async fn toggle_pin(&mut self, note_id: NoteId) -> Result<bool, WorkspaceError> {
        let is_pinned = self
            .api
            .toggle_pin(note_id)
            .await
            .map_err(|e| self.fail(e))?;
        if let Ok(row) = self.row_mut(note_id) {
            row.note.is_pinned = is_pinned;
        }
        self.load_notes().await?;
        Ok(is_pinned)
    }

    /// Add or remove a tag on a note and persist immediately.
    pub async fn toggle_tag_in_note(
        &mut self,
        note_id: NoteId,
        tag_id: TagId,
    ) -> Result<(), WorkspaceError> {
        let tag = self
            .tags
            .iter()
            .find(|row| row.tag.id == tag_id)
            .map(|row| row.tag.as_note_tag());

        let row = self.row_mut(note_id)?;
        if let Some(index) = row.note.tags.iter().position(|t| t.id == tag_id) {
            row.note.tags.remove(index);
        } else {
            let tag = tag.ok_or_else(|| {
                WorkspaceError::validation(ValidationFailure::UnknownTag { id: tag_id })
            });
            let tag = tag.map_err(|e| self.fail(e))?;
            self.row_mut(note_id)?.note.tags.push(tag);
        }

        self.update_note(note_id).await
    }

    pub async fn search(&mut self, query: impl Into<String>) -> Result<(), WorkspaceError> {
        self.search_query = query.into();
        self.pagination.reset_to_first();
        self.load_notes().await
    }

    pub async fn clear_search(&mut self) -> Result<(), WorkspaceError> {
        self.search_query.clear();
        self.selected_tag = None;
        self.pagination.reset_to_first();
        self.load_notes().await?;
        self.load_tags().await
    }

    /// Select a tag filter, or clear it when it is already selected.
    pub async fn filter_by_tag(&mut self, tag_id: TagId) -> Result<(), WorkspaceError> {
        self.selected_tag = if self.selected_tag == Some(tag_id) {
            None
        } else {
            Some(tag_id)
        };
        self.pagination.reset_to_first();
        self.load_notes().await
    }

    // ============================================
    // PAGER
    // ============================================

    /// Returns `false` (and does not reload) when the move is not allowed.
    pub async fn go_page(&mut self, page: u32) -> Result<bool, WorkspaceError> {
        if !self.pagination.go_to(page) {
            return Ok(false);
        }
        self.load_notes().await?;
        Ok(true)
    }

    pub async fn go_prev(&mut self) -> Result<bool, WorkspaceError> {
        if !self.pagination.prev() {
            return Ok(false);
        }
        self.load_notes().await?;
        Ok(true)
    }

    pub async fn go_next(&mut self) -> Result<bool, WorkspaceError> {
        if !self.pagination.next() {
            return Ok(false);
        }
        self.load_notes().await?;
        Ok(true)
    }

    // ============================================
    // TAGS
    // ============================================

    pub fn set_new_tag(&mut self, name: impl Into<String>, color: Option<String>) {
        self.new_tag.name = name.into();
        if let Some(color) = color {
            self.new_tag.color = color;
        }
    }

    pub async fn create_tag(&mut self) -> Result<Tag, WorkspaceError> {
        let name = tags::validate_new_name(&self.new_tag.name).map_err(|e| self.fail(e))?;
        let draft = TagDraft::new(name, self.new_tag.color.clone());

        let tag = self
            .api
            .create_tag(&draft)
            .await
            .map_err(|e| self.fail(e))?;
        info!("Created tag {} ({})", tag.name, tag.id);

        self.new_tag = TagDraft::default();
        self.banner = None;
        self.load_tags().await?;
        Ok(tag)
    }

    pub async fn delete_tag(&mut self, tag_id: TagId) -> Result<(), WorkspaceError> {
        self.api
            .delete_tag(tag_id)
            .await
            .map_err(|e| self.fail(e))?;
        if self.selected_tag == Some(tag_id) {
            self.selected_tag = None;
        }
        self.load_tags().await?;
        self.load_notes().await
    }

    pub fn start_edit_tag(&mut self, tag_id: TagId) -> Result<(), WorkspaceError> {
        let row = self.tag_row_mut(tag_id)?;
        row.edit = Some(TagDraft::new(row.tag.name.clone(), row.tag.color.clone()));
        Ok(())
    }

    pub fn set_tag_edit(
        &mut self,
        tag_id: TagId,
        name: impl Into<String>,
        color: Option<String>,
    ) -> Result<(), WorkspaceError> {
        let row = self.tag_row_mut(tag_id)?;
        let current = TagDraft::new(row.tag.name.clone(), row.tag.color.clone());
        let edit = row.edit.get_or_insert(current);
        edit.name = name.into();
        if let Some(color) = color {
            edit.color = color;
        }
        Ok(())
    }

    pub fn cancel_tag_edit(&mut self, tag_id: TagId) -> Result<(), WorkspaceError> {
        self.tag_row_mut(tag_id)?.edit = None;
        Ok(())
    }

    pub async fn save_tag_edit(&mut self, tag_id: TagId) -> Result<Tag, WorkspaceError> {
        let Some(edit) = self.tag_row_mut(tag_id)?.edit.clone() else {
            return Ok(self.tag_row_mut(tag_id)?.tag.clone());
        };

        let name = tags::validate_rename(&self.tags, tag_id, &edit.name).map_err(|e| self.fail(e))?;
        let draft = TagDraft::new(name, edit.color);

        let tag = self
            .api
            .update_tag(tag_id, &draft)
            .await
            .map_err(|e| self.fail(e))?;

        if let Ok(row) = self.tag_row_mut(tag_id) {
            row.tag.name = draft.name;
            row.tag.color = draft.color;
            row.edit = None;
        }
        self.load_tags().await?;
        self.load_notes().await?;
        self.banner = None;
        Ok(tag)
    }

    // ============================================
    // HELPERS
    // ============================================

    #[track_caller]
    fn row_mut(&mut self, note_id: NoteId) -> Result<&mut NoteRow, WorkspaceError> {
        self.notes
            .iter_mut()
            .find(|row| row.id() == note_id)
            .ok_or_else(|| WorkspaceError::validation(ValidationFailure::UnknownNote { id: note_id }))
    }

    #[track_caller]
    fn tag_row_mut(&mut self, tag_id: TagId) -> Result<&mut TagRow, WorkspaceError> {
        self.tags
            .iter_mut()
            .find(|row| row.tag.id == tag_id)
            .ok_or_else(|| WorkspaceError::validation(ValidationFailure::UnknownTag { id: tag_id }))
    }

    /// Record a failure in the banner and hand it back to the caller.
    #[track_caller]
    fn fail(&mut self, error: impl Into<WorkspaceError>) -> WorkspaceError {
        let error = error.into();
        warn!("Notes operation failed: {error}");
        if !error.is_auth_required() {
            self.banner = Some(error.user_message());
        }
        error
    }
}
