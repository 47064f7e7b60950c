use crate::helpers::{fast_notes_config, note_json, page_json, start, tag_json};

use frunk_core::api::ApiClient;
use frunk_core::editor::EditorId;
use frunk_core::editor::buffer::BufferEditorFactory;
use frunk_core::error::{ValidationFailure, WorkspaceError};
use frunk_core::notes::NotesWorkspace;

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

type Workspace = NotesWorkspace<BufferEditorFactory>;

fn workspace(api: ApiClient) -> Workspace {
    NotesWorkspace::new(api, BufferEditorFactory::new(), &fast_notes_config())
}

async fn mount_lists(server: &MockServer, notes: Value, tags: Value) {
    Mock::given(method("GET"))
        .and(path("/api/notes/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(notes))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/notes/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tags))
        .mount(server)
        .await;
}

/// **VALUE**: Verifies opening the view mirrors the server's notes, tags, and pagination.
///
/// **WHY THIS MATTERS**: The pager and list render straight from this state.
///
/// **BUG THIS CATCHES**: Would catch an empty result (`pages = 0`) breaking the pager.
#[tokio::test]
async fn given_empty_account_when_opened_then_single_empty_page() {
    let (server, api) = start().await;
    mount_lists(&server, page_json(vec![], 1, 0, 0), json!([])).await;
    let mut ws = workspace(api);

    ws.open().await.unwrap();

    assert!(ws.notes().is_empty());
    assert_eq!(ws.pagination().pages, 1);
    assert_eq!(ws.pagination().page, 1);
    assert_eq!(ws.page_window().len(), 1);
}

/// **VALUE**: Verifies inline edits are debounced into one PUT of the final content.
///
/// **WHY THIS MATTERS**: This is the autosave path every keystroke goes through.
///
/// **BUG THIS CATCHES**: Would catch one PUT per keystroke, or a PUT carrying
/// stale content.
#[tokio::test]
async fn given_inline_edits_when_quiet_then_single_put_with_final_content() {
    // GIVEN: One plain-text note
    let (server, api) = start().await;
    mount_lists(
        &server,
        page_json(vec![note_json(1, "Todo", "milk\neggs")], 1, 1, 1),
        json!([]),
    )
    .await;
    let mut saved = note_json(1, "Todo", "<p>milk, eggs</p>");
    saved["updated_at"] = json!("2024-01-10T12:00:00");
    Mock::given(method("PUT"))
        .and(path("/api/notes/1"))
        .and(body_json(json!({
            "title": "Todo",
            "content": "<p>milk, eggs</p>",
            "tag_ids": []
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "note": saved })))
        .expect(1)
        .mount(&server)
        .await;
    let mut ws = workspace(api);
    ws.open().await.unwrap();

    // WHEN: Editing starts (plain text becomes HTML) and two edits follow quickly
    ws.start_edit(1).unwrap();
    assert_eq!(ws.note(1).unwrap().note.content, "<p>milk<br>eggs</p>");
    assert!(ws.editors().is_open(&EditorId::Note(1)));
    ws.edit_note_content(1, "<p>milk, e</p>").unwrap();
    ws.edit_note_content(1, "<p>milk, eggs</p>").unwrap();
    assert!(ws.is_saving(1));

    tokio::time::sleep(Duration::from_millis(500)).await;
    let synced = ws.sync_autosaves().await.unwrap();

    // THEN: One save, reflected in the row
    assert_eq!(synced, 1);
    assert!(!ws.is_saving(1));
    assert!(ws.just_saved(1));
    assert_eq!(ws.note(1).unwrap().note.updated_at, "2024-01-10T12:00:00");
}

/// **VALUE**: Verifies pending edits are flushed without waiting for the timer.
///
/// **WHY THIS MATTERS**: Logout flushes first so the last edit is not lost.
///
/// **BUG THIS CATCHES**: Would catch the flushed edit being sent a second time by its timer.
#[tokio::test]
async fn given_pending_edit_when_flushed_then_saved_once() {
    let (server, api) = start().await;
    mount_lists(
        &server,
        page_json(vec![note_json(4, "Draft", "<p>a</p>")], 1, 1, 1),
        json!([]),
    )
    .await;
    Mock::given(method("PUT"))
        .and(path("/api/notes/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "note": null })))
        .expect(1)
        .mount(&server)
        .await;
    let mut ws = workspace(api);
    ws.open().await.unwrap();

    ws.set_note_title(4, "Final").unwrap();
    let flushed = ws.flush_autosaves().await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(flushed, 1);
    assert_eq!(ws.sync_autosaves().await.unwrap(), 0);
}

/// **VALUE**: Verifies an empty draft is not posted and a real one resets the form.
///
/// **WHY THIS MATTERS**: The form's "Save" must not create blank notes, and
/// after saving the user expects a fresh form and the first page.
///
/// **BUG THIS CATCHES**: Would catch markup-only content counting as content.
#[tokio::test]
async fn given_draft_when_created_then_posted_and_form_reset() {
    let (server, api) = start().await;
    mount_lists(&server, page_json(vec![], 1, 0, 0), json!([tag_json(2, "work")])).await;
    Mock::given(method("POST"))
        .and(path("/api/notes/"))
        .and(body_json(json!({
            "title": "Hi",
            "content": "<p>x</p>",
            "tag_ids": [2]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 9, "tags": [] })))
        .expect(1)
        .mount(&server)
        .await;
    let mut ws = workspace(api);
    ws.open().await.unwrap();

    // GIVEN: An open form with only an empty paragraph
    ws.expand_new_note_form();
    ws.set_draft_content("<p><br></p>");

    // WHEN/THEN: Nothing is posted
    assert!(!ws.create_note().await.unwrap());

    // WHEN: A title, body, and tag are filled in
    ws.set_draft_title("Hi");
    ws.set_draft_content("<p>x</p>");
    ws.toggle_tag_in_draft(2);
    assert!(ws.create_note().await.unwrap());

    // THEN: The form is closed and cleared
    assert!(!ws.is_new_note_form_open());
    assert!(ws.draft().title.is_empty());
    assert_eq!(ws.editors().open_count(), 0);
    assert_eq!(ws.pagination().page, 1);
}

/// **VALUE**: Verifies toggling a tag on a note saves immediately with the new tag list.
///
/// **BUG THIS CATCHES**: Would catch the tag change waiting for the debounce timer.
#[tokio::test]
async fn given_note_without_tag_when_tag_toggled_then_put_with_tag() {
    let (server, api) = start().await;
    mount_lists(
        &server,
        page_json(vec![note_json(1, "T", "<p>c</p>")], 1, 1, 1),
        json!([tag_json(2, "work")]),
    )
    .await;
    let mut saved = note_json(1, "T", "<p>c</p>");
    saved["tags"] = json!([{ "id": 2, "name": "work", "color": "#007bff" }]);
    Mock::given(method("PUT"))
        .and(path("/api/notes/1"))
        .and(body_json(json!({ "title": "T", "content": "<p>c</p>", "tag_ids": [2] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "note": saved })))
        .expect(1)
        .mount(&server)
        .await;
    let mut ws = workspace(api);
    ws.open().await.unwrap();

    ws.toggle_tag_in_note(1, 2).await.unwrap();

    assert!(ws.note(1).unwrap().note.has_tag(2));
}

/// **VALUE**: Verifies a missing session surfaces as `AuthRequired` without a banner.
///
/// **WHY THIS MATTERS**: An expired session routes to login silently.
///
/// **BUG THIS CATCHES**: Would catch 401s shown as "Unauthorized" banners.
#[tokio::test]
async fn given_expired_session_when_opened_then_auth_required() {
    let (server, api) = start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;
    let mut ws = workspace(api);

    let error = ws.open().await.unwrap_err();

    assert!(error.is_auth_required());
    assert_eq!(ws.banner(), None);
}

/// **VALUE**: Verifies request failures land in the dismissible banner.
///
/// **BUG THIS CATCHES**: Would catch failures being logged but not shown.
#[tokio::test]
async fn given_failing_pin_when_toggled_then_banner_shown_until_dismissed() {
    let (server, api) = start().await;
    mount_lists(
        &server,
        page_json(vec![note_json(1, "T", "")], 1, 1, 1),
        json!([]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/notes/1/toggle-pin"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "database locked" })))
        .mount(&server)
        .await;
    let mut ws = workspace(api);
    ws.open().await.unwrap();

    assert!(ws.toggle_pin(1).await.is_err());
    assert_eq!(ws.banner(), Some("database locked"));

    ws.dismiss_banner();
    assert_eq!(ws.banner(), None);
}

/// **VALUE**: Verifies tag names are validated before any request.
///
/// **BUG THIS CATCHES**: Would catch a blank or duplicate name reaching the server.
#[tokio::test]
async fn given_invalid_tag_names_when_saved_then_rejected_locally() {
    let (server, api) = start().await;
    mount_lists(
        &server,
        page_json(vec![], 1, 1, 0),
        json!([tag_json(1, "work"), tag_json(2, "home")]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/notes/tags"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/notes/tags/1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let mut ws = workspace(api);
    ws.open().await.unwrap();

    ws.set_new_tag("   ", None);
    let blank = ws.create_tag().await.unwrap_err();
    assert!(matches!(
        blank,
        WorkspaceError::Validation { reason: ValidationFailure::EmptyTagName, .. }
    ));
    assert_eq!(ws.banner(), Some("tag name cannot be empty"));

    ws.start_edit_tag(1).unwrap();
    ws.set_tag_edit(1, "home", None).unwrap();
    let duplicate = ws.save_tag_edit(1).await.unwrap_err();
    assert!(matches!(
        duplicate,
        WorkspaceError::Validation { reason: ValidationFailure::DuplicateTagName { .. }, .. }
    ));
    assert!(ws.tags()[0].is_editing());
}

/// **VALUE**: Verifies deleting the tag being filtered on clears the filter.
///
/// **WHY THIS MATTERS**: Filtering by a tag that no longer exists shows an
/// empty list with no way to tell why.
///
/// **BUG THIS CATCHES**: Would catch the reload still sending the deleted `tag_id`.
#[tokio::test]
async fn given_filter_on_tag_when_tag_deleted_then_filter_cleared() {
    let (server, api) = start().await;
    mount_lists(&server, page_json(vec![], 1, 1, 0), json!([tag_json(3, "old")])).await;
    Mock::given(method("DELETE"))
        .and(path("/api/notes/tags/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "deleted" })))
        .expect(1)
        .mount(&server)
        .await;
    let mut ws = workspace(api);
    ws.open().await.unwrap();

    ws.filter_by_tag(3).await.unwrap();
    assert_eq!(ws.selected_tag(), Some(3));
    ws.delete_tag(3).await.unwrap();

    assert_eq!(ws.selected_tag(), None);
    let requests = server.received_requests().await.unwrap();
    let last_list = requests
        .iter()
        .rev()
        .find(|request| request.url.path() == "/api/notes/")
        .unwrap();
    assert!(!last_list.url.query().unwrap_or("").contains("tag_id"));
}

/// **VALUE**: Verifies paging past either end does nothing.
///
/// **BUG THIS CATCHES**: Would catch a reload being issued for an impossible page.
#[tokio::test]
async fn given_single_page_when_paging_then_no_reload() {
    let (server, api) = start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 1, 1, 0)))
        .expect(1)
        .mount(&server)
        .await;
    let mut ws = workspace(api);
    ws.load_notes().await.unwrap();

    assert!(!ws.go_next().await.unwrap());
    assert!(!ws.go_prev().await.unwrap());
    assert!(!ws.go_page(1).await.unwrap());
}
