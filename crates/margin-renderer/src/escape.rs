//! HTML escaping for sidenote content.

/// Escape HTML special characters.
///
/// Escapes `&`, `<`, `>`, `"` and `'`, writing quotes as the numeric entities
/// `&#34;` and `&#39;`. Everything else is copied unchanged.
///
/// # Example
///
/// ```
/// use margin_renderer::escape_html;
///
/// assert_eq!(escape_html("a < b & c"), "a &lt; b &amp; c");
/// ```
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&#34;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#""quoted""#), "&#34;quoted&#34;");
        assert_eq!(escape_html("it's"), "it&#39;s");
    }

    #[test]
    fn test_escape_html_passthrough() {
        assert_eq!(
            escape_html("plain text, {braces} and $math$"),
            "plain text, {braces} and $math$"
        );
        assert_eq!(escape_html("naïve café"), "naïve café");
    }

    #[test]
    fn test_escape_html_already_escaped() {
        // Entities are escaped again; content is treated as text
        assert_eq!(escape_html("&amp;"), "&amp;amp;");
    }
}
