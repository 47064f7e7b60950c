//! Helpers for note bodies, which may be plain text or editor HTML.

use once_cell::sync::Lazy;
use regex::Regex;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// True when the text contains at least one markup tag.
pub fn is_html_content(content: &str) -> bool {
    HTML_TAG.is_match(content)
}

/// Escape plain text and give it paragraph and line-break markup.
pub fn text_to_html(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let body = text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace("\n\n", "</p><p>")
        .replace('\n', "<br>");

    format!("<p>{body}</p>")
}

/// Visible text of an HTML fragment.
pub fn strip_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    ANY_TAG
        .replace_all(html, "")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// True when nothing but markup and whitespace is left.
pub fn is_content_empty(content: &str) -> bool {
    strip_html(content).trim().is_empty()
}
