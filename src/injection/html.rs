//! Charset detection and `<head>` injection.

// ============================================================================
// Imports
// ============================================================================

use std::sync::LazyLock;

use encoding_rs::Encoding;
use regex::Regex;

// ============================================================================
// Patterns
// ============================================================================

/// Opening `<head>` tag with optional attributes. Does not match `<header>`.
static HEAD_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<head(?:\s[^>]*)?>").expect("valid head pattern"));

/// `charset=` parameter of a `Content-Type` value.
static CHARSET_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset="?([\w\-]+)"#).expect("valid charset pattern"));

// ============================================================================
// Functions
// ============================================================================

/// Returns `true` for `text/html` and `application/xhtml+xml` content types.
#[must_use]
pub fn is_html_content_type(content_type: &str) -> bool {
    let ct = content_type.trim_start().to_ascii_lowercase();
    ct.starts_with("text/html") || ct.starts_with("application/xhtml+xml")
}

/// Resolves the charset declared in a `Content-Type` value.
///
/// Returns `None` when no charset is declared or the label is unknown.
#[must_use]
pub fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    let label = CHARSET_PARAM.captures(content_type)?.get(1)?.as_str().trim();
    Encoding::for_label(label.as_bytes())
}

/// Wraps script source in a `<script>` block.
#[must_use]
pub fn script_block(js: &str) -> String {
    format!("<script>\n{js}\n</script>\n")
}

/// Inserts a script block right after the opening `<head>` tag.
///
/// Documents without a head get the block prepended.
#[must_use]
pub fn inject_into_head(html: &str, js: &str) -> String {
    let tag = script_block(js);

    match HEAD_TAG.find(html) {
        Some(head) => {
            let at = head.end();
            let mut out = String::with_capacity(html.len() + tag.len() + 1);
            out.push_str(&html[..at]);
            out.push('\n');
            out.push_str(&tag);
            out.push_str(&html[at..]);
            out
        }
        None => tag + html,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use encoding_rs::{SHIFT_JIS, UTF_8, WINDOWS_1252};
    use proptest::prelude::*;

    #[test]
    fn test_inject_after_head() {
        let out = inject_into_head("<head><meta></head>", "x");
        assert_eq!(out, "<head>\n<script>\nx\n</script>\n<meta></head>");
    }

    #[test]
    fn test_inject_keeps_head_attributes() {
        let html = r#"<!doctype html><HTML><HEAD lang="en" data-x='1'><title>t</title></HEAD></HTML>"#;
        let out = inject_into_head(html, "boot()");
        assert!(out.starts_with(r#"<!doctype html><HTML><HEAD lang="en" data-x='1'>"#));
        assert!(out.contains("data-x='1'>\n<script>\nboot()\n</script>\n<title>"));
    }

    #[test]
    fn test_inject_without_head_prepends() {
        let out = inject_into_head("<body>hi</body>", "x");
        assert_eq!(out, "<script>\nx\n</script>\n<body>hi</body>");
    }

    #[test]
    fn test_header_element_is_not_head() {
        let out = inject_into_head("<body><header>top</header></body>", "x");
        assert!(out.starts_with("<script>\nx\n</script>\n<body>"));
    }

    #[test]
    fn test_charset_extraction() {
        assert_eq!(
            charset_from_content_type("text/html; charset=ISO-8859-1"),
            Some(WINDOWS_1252)
        );
        assert_eq!(
            charset_from_content_type("text/html;CHARSET=\"Shift_JIS\""),
            Some(SHIFT_JIS)
        );
        assert_eq!(charset_from_content_type("text/html; charset=utf-8"), Some(UTF_8));
    }

    #[test]
    fn test_charset_missing_or_unknown() {
        assert_eq!(charset_from_content_type("text/html"), None);
        assert_eq!(charset_from_content_type("text/html; charset=klingon"), None);
    }

    #[test]
    fn test_html_content_types() {
        assert!(is_html_content_type("text/html; charset=utf-8"));
        assert!(is_html_content_type("Application/XHTML+XML"));
        assert!(!is_html_content_type("application/json"));
        assert!(!is_html_content_type(""));
    }

    proptest! {
        #[test]
        fn prop_injection_preserves_document(
            before in "[a-z <>=\"]{0,40}",
            after in "[a-z <>/]{0,40}",
        ) {
            let html = format!("{before}<head>{after}");
            let out = inject_into_head(&html, "js()");
            let block = format!("\n{}", script_block("js()"));
            prop_assert_eq!(out.matches(block.as_str()).count(), 1);
            prop_assert_eq!(out.replacen(block.as_str(), "", 1), html);
        }
    }
}
