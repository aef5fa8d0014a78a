//! Markdown to HTML conversion.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, html};

use crate::escape::escape_html;
use crate::heading::HeadingIds;
use crate::highlight::{CodeHighlighter, PlainHighlighter, fence_language};

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML.
    pub html: String,
    /// Warnings generated during conversion.
    pub warnings: Vec<String>,
}

/// Markdown renderer backed by `pulldown-cmark`.
///
/// Code blocks are rendered by the configured [`CodeHighlighter`]; everything
/// else goes through `pulldown-cmark`'s own HTML writer. Headings get slug ids
/// and links that are not relative open in a new tab; both can be turned off.
///
/// # Example
///
/// ```
/// use margin_renderer::MarkdownRenderer;
///
/// let result = MarkdownRenderer::new().render_markdown("# Hello\n\n**Bold** text");
/// assert!(result.html.contains("<strong>Bold</strong>"));
/// ```
pub struct MarkdownRenderer {
    gfm: bool,
    heading_ids: bool,
    links_new_tab: bool,
    highlighter: Box<dyn CodeHighlighter>,
}

impl MarkdownRenderer {
    /// Create a new renderer with GFM, heading ids, new-tab links and plain
    /// highlighting.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gfm: true,
            heading_ids: true,
            links_new_tab: true,
            highlighter: Box::new(PlainHighlighter),
        }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Enable or disable slug `id` attributes on headings.
    ///
    /// Ids are derived from the heading text; repeated slugs get `-1`, `-2`
    /// and so on appended.
    #[must_use]
    pub fn with_heading_ids(mut self, enabled: bool) -> Self {
        self.heading_ids = enabled;
        self
    }

    /// Enable or disable `target="_blank"` on links.
    ///
    /// Links starting with `#`, `/` (but not `//`), `./` or `../` are
    /// relative and never get a target.
    #[must_use]
    pub fn with_links_new_tab(mut self, enabled: bool) -> Self {
        self.links_new_tab = enabled;
        self
    }

    /// Replace the code block highlighter.
    #[must_use]
    pub fn with_highlighter<H: CodeHighlighter + 'static>(mut self, highlighter: H) -> Self {
        self.highlighter = Box::new(highlighter);
        self
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Create a configured parser for the given markdown text.
    #[must_use]
    pub fn create_parser<'a>(&self, markdown: &'a str) -> Parser<'a> {
        Parser::new_ext(markdown, self.parser_options())
    }

    /// Render markdown text to HTML.
    #[must_use]
    pub fn render_markdown(&self, markdown: &str) -> RenderResult {
        let mut events = Vec::new();
        let mut warnings = Vec::new();
        let mut code: Option<CodeBlock> = None;
        let mut index = 0;
        let mut ids = HeadingIds::default();
        let mut heading: Option<PendingHeading> = None;
        let mut in_new_tab_link = false;

        for event in self.create_parser(markdown) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let language = match kind {
                        CodeBlockKind::Fenced(ref info) => fence_language(info).map(str::to_owned),
                        CodeBlockKind::Indented => None,
                    };
                    code = Some(CodeBlock {
                        language,
                        source: String::new(),
                    });
                }
                Event::End(TagEnd::CodeBlock) => {
                    let Some(block) = code.take() else { continue };
                    let highlighted = self
                        .highlighter
                        .highlight(block.language.as_deref(), &block.source);
                    if !is_code_envelope(&highlighted) {
                        tracing::warn!(index, "Highlighter output is not wrapped in <pre><code>");
                        warnings.push(format!(
                            "code block {}: highlighter output is not wrapped in <pre><code>, \
                             directives inside it will be rewritten",
                            index + 1
                        ));
                    }
                    index += 1;
                    events.push(Event::Html(highlighted.into()));
                }
                Event::Text(text) => match code.as_mut() {
                    Some(block) => block.source.push_str(&text),
                    None => {
                        if let Some(pending) = heading.as_mut() {
                            pending.text.push_str(&text);
                        }
                        events.push(Event::Text(text));
                    }
                },
                Event::Code(text) => {
                    if let Some(pending) = heading.as_mut() {
                        pending.text.push_str(&text);
                    }
                    events.push(Event::Code(text));
                }
                start @ Event::Start(Tag::Heading { id: None, .. }) if self.heading_ids => {
                    heading = Some(PendingHeading {
                        event: events.len(),
                        text: String::new(),
                    });
                    events.push(start);
                }
                end @ Event::End(TagEnd::Heading(_)) => {
                    if let Some(pending) = heading.take() {
                        pending.assign_id(&mut ids, &mut events);
                    }
                    events.push(end);
                }
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    ..
                }) if self.links_new_tab && !is_relative_link(&dest_url) => {
                    in_new_tab_link = true;
                    events.push(Event::InlineHtml(new_tab_link(link_type, &dest_url, &title)));
                }
                Event::End(TagEnd::Link) if in_new_tab_link => {
                    in_new_tab_link = false;
                    events.push(Event::InlineHtml(CowStr::Borrowed("</a>")));
                }
                other => events.push(other),
            }
        }

        let mut out = String::with_capacity(markdown.len() + markdown.len() / 2);
        html::push_html(&mut out, events.into_iter());

        RenderResult {
            html: out,
            warnings,
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

struct CodeBlock {
    language: Option<String>,
    source: String,
}

/// A heading whose id is filled in once its text is known.
struct PendingHeading {
    /// Index of the heading's start event.
    event: usize,
    text: String,
}

impl PendingHeading {
    fn assign_id(self, ids: &mut HeadingIds, events: &mut [Event<'_>]) {
        let Some(slug) = ids.assign(&self.text) else {
            return;
        };
        if let Some(Event::Start(Tag::Heading { id, .. })) = events.get_mut(self.event) {
            *id = Some(slug.into());
        }
    }
}

/// Relative links: `#frag`, `/path` but not `//host`, `./path`, `../path`.
fn is_relative_link(url: &str) -> bool {
    url.is_empty()
        || url.starts_with('#')
        || (url.starts_with('/') && !url.starts_with("//"))
        || url.starts_with("./")
        || url.starts_with("../")
}

/// Opening `<a>` tag for a link that opens in a new tab.
fn new_tab_link(link_type: LinkType, dest_url: &str, title: &str) -> CowStr<'static> {
    let scheme = if link_type == LinkType::Email { "mailto:" } else { "" };
    let mut tag = format!(r#"<a href="{scheme}{}""#, escape_html(dest_url));
    if !title.is_empty() {
        let _ = write!(tag, r#" title="{}""#, escape_html(title));
    }
    tag.push_str(r#" target="_blank">"#);
    tag.into()
}

fn is_code_envelope(html: &str) -> bool {
    html.starts_with("<pre") && html.trim_end().ends_with("</code></pre>")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(markdown: &str) -> String {
        MarkdownRenderer::new().render_markdown(markdown).html
    }

    struct FancyHighlighter;

    impl CodeHighlighter for FancyHighlighter {
        fn highlight(&self, language: Option<&str>, source: &str) -> String {
            format!(
                r#"<pre class="fancy"><code data-lang="{}">{}</code></pre>"#,
                language.unwrap_or("none"),
                source.len()
            )
        }
    }

    struct BareHighlighter;

    impl CodeHighlighter for BareHighlighter {
        fn highlight(&self, _language: Option<&str>, source: &str) -> String {
            format!("<div>{source}</div>")
        }
    }

    #[test]
    fn test_basic_paragraph() {
        assert_eq!(render("Hello, world!"), "<p>Hello, world!</p>\n");
    }

    #[test]
    fn test_emphasis() {
        let html = render("*italic* and **bold**");
        assert!(html.contains("<em>italic</em>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_fenced_code_block() {
        let html = render("```rust\nfn main() {}\n```");
        assert_eq!(
            html,
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>"
        );
    }

    #[test]
    fn test_fence_info_extra_tokens_ignored() {
        let html = render("```python title=main.py\nx = 1\n```");
        assert!(html.contains(r#"<code class="language-python">"#));
    }

    #[test]
    fn test_indented_code_block() {
        let html = render("    let x = 1;\n");
        assert_eq!(html, "<pre><code>let x = 1;\n</code></pre>");
    }

    #[test]
    fn test_code_block_is_escaped_once() {
        let html = render("```\na < b && c\n```");
        assert!(html.contains("a &lt; b &amp;&amp; c"));
    }

    #[test]
    fn test_inline_code() {
        let html = render("Use `{sidenote x}` literally.");
        assert!(html.contains("<code>{sidenote x}</code>"));
    }

    #[test]
    fn test_directive_text_survives_conversion() {
        let html = render("Text{sidenote a note}.\n\n{sidenote}\nblock\n{/sidenote}");
        assert!(html.contains("{sidenote a note}"));
        assert!(html.contains("{sidenote}"));
        assert!(html.contains("{/sidenote}"));
    }

    #[test]
    fn test_dollar_signs_stay_text() {
        let html = render("costs $5 and $x$");
        assert!(html.contains("$5 and $x$"));
    }

    #[test]
    fn test_gfm_table() {
        let html = render("| a |\n|---|\n| b |");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_gfm_disabled() {
        let renderer = MarkdownRenderer::new().with_gfm(false);
        let html = renderer.render_markdown("| a |\n|---|\n| b |\n\n~~x~~").html;
        assert!(!html.contains("<table>"));
        assert!(!html.contains("<del>"));
    }

    #[test]
    fn test_parser_options() {
        assert!(
            MarkdownRenderer::new()
                .parser_options()
                .contains(Options::ENABLE_TABLES)
        );
        assert!(
            MarkdownRenderer::new()
                .with_gfm(false)
                .parser_options()
                .is_empty()
        );
    }

    #[test]
    fn test_heading_ids() {
        assert_eq!(render("## Intro"), "<h2 id=\"intro\">Intro</h2>\n");

        let html = render("## FAQ\n\n## FAQ\n\n## Install `npm`");
        assert!(html.contains(r#"<h2 id="faq">FAQ</h2>"#));
        assert!(html.contains(r#"<h2 id="faq-1">FAQ</h2>"#));
        assert!(html.contains(r#"<h2 id="install-npm">Install <code>npm</code></h2>"#));
    }

    #[test]
    fn test_heading_without_slug_text_has_no_id() {
        assert_eq!(render("# ???"), "<h1>???</h1>\n");
    }

    #[test]
    fn test_links_open_in_new_tab() {
        let html = render(r#"[l](https://x.y "A \"quoted\" title") and <me@x.y>"#);

        assert!(html.contains(
            r#"<a href="https://x.y" title="A &#34;quoted&#34; title" target="_blank">l</a>"#
        ));
        assert!(html.contains(r#"<a href="mailto:me@x.y" target="_blank">me@x.y</a>"#));
    }

    #[test]
    fn test_relative_links_stay_in_tab() {
        let html = render("[a](#top) [b](/docs) [c](./x.md) [d](../y.md) [e](//cdn.example)");

        assert!(html.contains(r##"<a href="#top">a</a>"##));
        assert!(html.contains(r#"<a href="/docs">b</a>"#));
        assert!(html.contains(r#"<a href="./x.md">c</a>"#));
        assert!(html.contains(r#"<a href="../y.md">d</a>"#));
        assert!(html.contains(r#"<a href="//cdn.example" target="_blank">e</a>"#));
    }

    #[test]
    fn test_heading_ids_and_new_tab_disabled() {
        let renderer = MarkdownRenderer::new()
            .with_heading_ids(false)
            .with_links_new_tab(false);
        let html = renderer.render_markdown("## Intro\n\n[l](https://x.y)").html;

        assert_eq!(html, "<h2>Intro</h2>\n<p><a href=\"https://x.y\">l</a></p>\n");
    }

    #[test]
    fn test_custom_highlighter() {
        let renderer = MarkdownRenderer::new().with_highlighter(FancyHighlighter);
        let result = renderer.render_markdown("```go\nabc\n```");

        assert_eq!(
            result.html,
            r#"<pre class="fancy"><code data-lang="go">4</code></pre>"#
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_highlighter_without_envelope_warns() {
        let renderer = MarkdownRenderer::new().with_highlighter(BareHighlighter);
        let result = renderer.render_markdown("```\nx\n```\n\n```\ny\n```");

        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[1].starts_with("code block 2:"));
    }
}
