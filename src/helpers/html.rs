//! HTML and plain-text helper functions

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape XML special characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    TAG.replace_all(s, "").into_owned()
}

/// Plain-text excerpt of rendered content
///
/// Markup is stripped and whitespace collapsed. Text longer than `length`
/// characters is cut, trimmed, and suffixed with `...`.
///
/// # Examples
/// ```ignore
/// excerpt("<p>Hello <b>world</b></p>", 5) // -> "Hello..."
/// ```
pub fn excerpt(content: &str, length: usize) -> String {
    if content.is_empty() {
        return String::new();
    }

    let text = strip_html(content);
    let text = WHITESPACE.replace_all(&text, " ");
    let text = text.trim();

    if text.chars().count() <= length {
        return text.to_string();
    }

    let truncated: String = text.chars().take(length).collect();
    format!("{}...", truncated.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <b>World</b></p>"), "Hello World");
        assert_eq!(strip_html("a < b"), "a < b");
    }

    #[test]
    fn test_excerpt_truncates() {
        assert_eq!(excerpt("<p>Hello <b>world</b></p>", 5), "Hello...");
        assert_eq!(excerpt("<p>Hello <b>world</b></p>", 6), "Hello...");
    }

    #[test]
    fn test_excerpt_short_text_untouched() {
        assert_eq!(excerpt("<p>Hi</p>\n\n<p>there</p>", 200), "Hi there");
        assert_eq!(excerpt("exact", 5), "exact");
    }

    #[test]
    fn test_excerpt_empty() {
        assert_eq!(excerpt("", 10), "");
        assert_eq!(excerpt("<br>", 10), "");
    }

    #[test]
    fn test_excerpt_counts_chars_not_bytes() {
        assert_eq!(excerpt("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_escape() {
        assert_eq!(html_escape(r#"<a href="x">'"#), "&lt;a href=&quot;x&quot;&gt;&#39;");
        assert_eq!(escape_xml("Tom & 'Jerry'"), "Tom &amp; &apos;Jerry&apos;");
    }
}
