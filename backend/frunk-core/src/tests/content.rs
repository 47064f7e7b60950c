use crate::editor::content::{is_content_empty, is_html_content, strip_html, text_to_html};

/// **VALUE**: Verifies plain-text notes are converted to escaped paragraph markup.
///
/// **WHY THIS MATTERS**: Notes created before the rich-text editor are plain
/// text; loading them raw would collapse line breaks and interpret `<`.
///
/// **BUG THIS CATCHES**: Would catch escaping done after the `<br>` insertion
/// (which would escape the markup itself).
#[test]
fn given_plain_text_when_converted_then_escaped_with_breaks() {
    assert_eq!(text_to_html("a < b"), "<p>a &lt; b</p>");
    assert_eq!(text_to_html("one\ntwo"), "<p>one<br>two</p>");
    assert_eq!(text_to_html("one\n\ntwo"), "<p>one</p><p>two</p>");
    assert_eq!(text_to_html(""), "");
}

/// **VALUE**: Verifies markup detection used to decide whether to convert.
///
/// **BUG THIS CATCHES**: Would catch a bare `<` being treated as markup.
#[test]
fn given_content_when_checked_for_markup_then_only_tags_count() {
    assert!(is_html_content("<p>hi</p>"));
    assert!(is_html_content("text with <b>bold</b>"));
    assert!(!is_html_content("1 < 2"));
    assert!(!is_html_content("plain"));
}

/// **VALUE**: Verifies an editor body with only markup counts as empty.
///
/// **WHY THIS MATTERS**: A freshly opened editor reports `<p><br></p>`; posting
/// that as a note would create a blank note.
///
/// **BUG THIS CATCHES**: Would catch `&nbsp;` not being treated as whitespace.
#[test]
fn given_markup_only_body_when_checked_then_empty() {
    assert!(is_content_empty(""));
    assert!(is_content_empty("<p><br></p>"));
    assert!(is_content_empty("<p>&nbsp;</p>"));
    assert!(!is_content_empty("<p>x</p>"));
    assert_eq!(strip_html("<p>a &amp; b</p>"), "a & b");
}
