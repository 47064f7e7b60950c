use crate::editor::buffer::BufferEditorFactory;
use crate::editor::{EditorId, EditorProfile, EditorSlots};

/// **VALUE**: Verifies every editor widget is destroyed when its slot is closed or replaced.
///
/// **WHY THIS MATTERS**: Widgets attached to rows that no longer exist leak
/// and keep firing change events into stale notes.
///
/// **BUG THIS CATCHES**: Would catch `open` on an occupied slot leaking the old widget.
#[test]
fn given_open_sessions_when_closed_or_replaced_then_widgets_destroyed() {
    // GIVEN: A draft editor and one inline editor
    let factory = BufferEditorFactory::new();
    let mut slots = EditorSlots::new(factory.clone());
    slots.open(EditorId::Draft, EditorProfile::Draft, "");
    slots.open(EditorId::Note(7), EditorProfile::Inline, "<p>a</p>");
    assert_eq!(factory.live_editors(), 2);

    // WHEN: The inline slot is reopened
    slots.open(EditorId::Note(7), EditorProfile::Inline, "<p>b</p>");

    // THEN: The replaced widget is gone
    assert_eq!(factory.live_editors(), 2);
    assert_eq!(slots.content(&EditorId::Note(7)).as_deref(), Some("<p>b</p>"));

    // WHEN: It is closed
    let last = slots.close(&EditorId::Note(7));

    // THEN: Its final content is returned and the widget destroyed
    assert_eq!(last.as_deref(), Some("<p>b</p>"));
    assert_eq!(factory.live_editors(), 1);
    assert!(slots.close(&EditorId::Note(7)).is_none());
}

/// **VALUE**: Verifies dropping the slots destroys every remaining widget.
///
/// **WHY THIS MATTERS**: Leaving the notes view tears down the whole component.
///
/// **BUG THIS CATCHES**: Would catch sessions without a `Drop` guard.
#[test]
fn given_open_sessions_when_slots_dropped_then_all_destroyed() {
    let factory = BufferEditorFactory::new();
    {
        let mut slots = EditorSlots::new(factory.clone());
        slots.open(EditorId::Draft, EditorProfile::Draft, "");
        slots.open(EditorId::Note(1), EditorProfile::Inline, "");
        slots.open(EditorId::Note(2), EditorProfile::Inline, "");
        assert_eq!(factory.live_editors(), 3);
    }

    assert_eq!(factory.live_editors(), 0);
}

/// **VALUE**: Verifies a list reload closes inline editors but keeps the draft.
///
/// **WHY THIS MATTERS**: The new-note form survives paging and searching.
///
/// **BUG THIS CATCHES**: Would catch the draft being discarded on every reload.
#[test]
fn given_mixed_sessions_when_note_editors_closed_then_draft_kept() {
    let factory = BufferEditorFactory::new();
    let mut slots = EditorSlots::new(factory.clone());
    slots.open(EditorId::Draft, EditorProfile::Draft, "<p>draft</p>");
    slots.open(EditorId::Note(1), EditorProfile::Inline, "");
    slots.open(EditorId::Note(2), EditorProfile::Inline, "");

    assert_eq!(slots.close_note_editors(), 2);

    assert!(slots.is_open(&EditorId::Draft));
    assert_eq!(slots.open_count(), 1);
    assert_eq!(factory.live_editors(), 1);
    assert!(!slots.set_content(&EditorId::Note(1), "x"));
}

/// **VALUE**: Verifies slot names and per-profile widget settings.
///
/// **BUG THIS CATCHES**: Would catch the inline profile getting the full toolbar.
#[test]
fn given_profiles_when_inspected_then_inline_is_compact() {
    assert_eq!(EditorId::Draft.to_string(), "draft-editor");
    assert_eq!(EditorId::Note(42).to_string(), "note-editor-42");

    assert!(EditorProfile::Inline.height() < EditorProfile::Draft.height());
    assert!(EditorProfile::Inline.plugins().len() < EditorProfile::Draft.plugins().len());
    assert!(!EditorProfile::Inline.toolbar().contains("image"));
}
