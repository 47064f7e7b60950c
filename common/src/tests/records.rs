use crate::{Credentials, Note, NoteDraft, NoteQuery, NotesPage, Tag, TagDraft, Tool};

/// **VALUE**: Verifies that credentials serialize with the real password.
///
/// **WHY THIS MATTERS**: `RedactedSecret` refuses to serialize on its own; the
/// login body is the one place the password must go out in clear.
///
/// **BUG THIS CATCHES**: Would catch the login body carrying `[REDACTED]` or failing.
#[test]
fn given_credentials_when_serialized_then_password_is_exposed_on_the_wire() {
    // GIVEN: Credentials
    let credentials = Credentials::new("a@b.c", "hunter2");

    // WHEN: Serializing
    let body = serde_json::to_value(&credentials).unwrap();

    // THEN: Both fields are present
    assert_eq!(body["email"], "a@b.c");
    assert_eq!(body["password"], "hunter2");

    // AND: Debug output hides the password
    assert!(!format!("{credentials:?}").contains("hunter2"));
}

/// **VALUE**: Verifies tool entries resolve to a view only when one is declared.
///
/// **WHY THIS MATTERS**: Opening a tool without a view must be ignored.
///
/// **BUG THIS CATCHES**: Would catch empty-string views being treated as real.
#[test]
fn given_tools_when_view_requested_then_only_declared_views_resolve() {
    // GIVEN: The shapes the server sends
    let tools: Vec<Tool> = serde_json::from_value(serde_json::json!([
        {"id": "mymo", "name": "Mymo", "entry": {"type": "frontend_view", "view": "notes"}},
        {"id": "blank", "entry": {"type": "frontend_view", "view": ""}},
        {"id": "bare"}
    ]))
    .unwrap();

    // WHEN/THEN
    assert_eq!(tools[0].view(), Some("notes"));
    assert_eq!(tools[1].view(), None);
    assert_eq!(tools[2].view(), None);
}

/// **VALUE**: Verifies query pairs omit unset filters and keep paging.
///
/// **WHY THIS MATTERS**: The server treats `search=` and `tag_id=` as filters when
/// present at all.
///
/// **BUG THIS CATCHES**: Would catch sending an empty search string.
#[test]
fn given_note_query_when_pairs_built_then_only_set_filters_included() {
    // GIVEN: A query with an empty search and no tag
    let plain = NoteQuery::new(2, 10).with_search("").with_tag(None);

    // THEN: Only paging is sent
    assert_eq!(
        plain.pairs(),
        vec![("page", "2".to_string()), ("per_page", "10".to_string())]
    );

    // GIVEN: A query with both filters
    let filtered = NoteQuery::new(1, 5).with_search("rust").with_tag(Some(7));

    // THEN: Filters come first
    assert_eq!(filtered.pairs()[0], ("search", "rust".to_string()));
    assert_eq!(filtered.pairs()[1], ("tag_id", "7".to_string()));
}

/// **VALUE**: Verifies draft tag toggling adds then removes.
///
/// **WHY THIS MATTERS**: The new-note form toggles tags with the same control.
///
/// **BUG THIS CATCHES**: Would catch duplicate ids after a double toggle.
#[test]
fn given_draft_when_tag_toggled_twice_then_back_to_original() {
    // GIVEN: A draft with one tag
    let mut draft = NoteDraft {
        tag_ids: vec![1],
        ..NoteDraft::default()
    };

    // WHEN/THEN
    draft.toggle_tag(2);
    assert_eq!(draft.tag_ids, vec![1, 2]);
    draft.toggle_tag(2);
    draft.toggle_tag(1);
    assert!(draft.tag_ids.is_empty());
}

/// **VALUE**: Verifies a notes page deserializes from the server payload and
/// yields normalized pagination.
///
/// **WHY THIS MATTERS**: This is the payload every list reload mirrors.
///
/// **BUG THIS CATCHES**: Would catch renamed fields or missing defaults.
#[test]
fn given_server_payload_when_notes_page_parsed_then_fields_mirrored() {
    // GIVEN: A page as the server returns it
    let page: NotesPage = serde_json::from_value(serde_json::json!({
        "notes": [{
            "id": 3, "title": "t", "content": "c", "is_pinned": true,
            "created_at": "2024-01-01T00:00:00", "updated_at": "2024-01-02T00:00:00",
            "tags": [{"id": 1, "name": "work", "color": "#ff0000"}]
        }],
        "page": 1, "pages": 0, "total": 0, "per_page": 10
    }))
    .unwrap();

    // THEN
    let note: &Note = &page.notes[0];
    assert!(note.is_pinned);
    assert_eq!(note.tag_ids(), vec![1]);
    assert_eq!(page.pagination().pages, 1);
}

/// **VALUE**: Verifies tag defaults match the server's default color.
///
/// **WHY THIS MATTERS**: The create form starts from this draft.
///
/// **BUG THIS CATCHES**: Would catch an empty default color.
#[test]
fn given_tag_payload_without_color_when_parsed_then_default_color() {
    // GIVEN/WHEN
    let tag: Tag = serde_json::from_value(serde_json::json!({"id": 1, "name": "x"})).unwrap();

    // THEN
    assert_eq!(tag.color, "#007bff");
    assert_eq!(TagDraft::default().color, "#007bff");
}
