//! HTML escaping for interpolated values

/// Escape `&`, `<`, `>`, `"` and `'` for safe inclusion in HTML text and attributes
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// Inverse of [`escape`]
pub fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_all_special_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_leaves_plain_text() {
        assert_eq!(escape("plain text, ünïcödé"), "plain text, ünïcödé");
    }

    #[test]
    fn test_unescape_round_trip() {
        for original in [
            "<script>alert('x')</script>",
            "a && b || \"c\"",
            "&lt; already escaped &amp;",
        ] {
            assert_eq!(unescape(&escape(original)), original);
        }
    }
}
