//! Code block highlighting.
//!
//! The markdown renderer hands every code block to a [`CodeHighlighter`].
//! Whatever markup a highlighter returns must keep the `<pre><code …>` …
//! `</code></pre>` envelope, otherwise sidenote rewriting no longer sees the
//! block as code.

use std::fmt::Write;

use crate::escape::escape_html;

/// Renders one code block to HTML.
pub trait CodeHighlighter: Send + Sync {
    /// Highlight `source`, written in `language` when the fence named one.
    fn highlight(&self, language: Option<&str>, source: &str) -> String;
}

/// Highlighter that only escapes.
///
/// # Example
///
/// ```
/// use margin_renderer::{CodeHighlighter, PlainHighlighter};
///
/// let html = PlainHighlighter.highlight(Some("rust"), "a < b");
/// assert_eq!(html, r#"<pre><code class="language-rust">a &lt; b</code></pre>"#);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainHighlighter;

impl CodeHighlighter for PlainHighlighter {
    fn highlight(&self, language: Option<&str>, source: &str) -> String {
        let mut out = String::with_capacity(source.len() + 32);
        match language {
            Some(lang) => {
                let _ = write!(
                    out,
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    escape_html(lang),
                    escape_html(source)
                );
            }
            None => {
                let _ = write!(out, "<pre><code>{}</code></pre>", escape_html(source));
            }
        }
        out
    }
}

/// Language named by a fence info string: its first whitespace-separated token.
pub(crate) fn fence_language(info: &str) -> Option<&str> {
    info.split_whitespace().next()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_code_block_with_language() {
        assert_eq!(
            PlainHighlighter.highlight(Some("rust"), "fn main() {}"),
            r#"<pre><code class="language-rust">fn main() {}</code></pre>"#
        );
    }

    #[test]
    fn test_code_block_without_language() {
        assert_eq!(
            PlainHighlighter.highlight(None, "plain code"),
            "<pre><code>plain code</code></pre>"
        );
    }

    #[test]
    fn test_source_is_escaped() {
        let html = PlainHighlighter.highlight(None, "<script>&</script>");
        assert_eq!(
            html,
            "<pre><code>&lt;script&gt;&amp;&lt;/script&gt;</code></pre>"
        );
    }

    #[test]
    fn test_language_is_escaped() {
        let html = PlainHighlighter.highlight(Some(r#"x"y"#), "");
        assert!(html.starts_with(r#"<pre><code class="language-x&#34;y">"#));
    }

    #[test]
    fn test_fence_language_first_token() {
        assert_eq!(fence_language("rust"), Some("rust"));
        assert_eq!(fence_language("python title=main.py"), Some("python"));
        assert_eq!(fence_language("  go  "), Some("go"));
        assert_eq!(fence_language(""), None);
        assert_eq!(fence_language("   "), None);
    }

    #[test]
    fn test_highlighter_output_is_a_code_region() {
        let html = PlainHighlighter.highlight(Some("text"), "{sidenote nope}");
        let regions = crate::CodeRegions::scan(html.as_bytes());

        // Block region plus the inline region of the inner `<code>`
        assert_eq!(regions.len(), 2);
        assert!(regions.contains(html.find('{').unwrap()));
    }
}
