//! Whole-page rendering.
//!
//! Provides [`PageRenderer`], which runs the full pipeline for one markdown
//! document: frontmatter stripping, markdown conversion, sidenote rewriting
//! and math wrapping.

use std::fs;
use std::path::{Path, PathBuf};

use crate::frontmatter::split_frontmatter;
use crate::highlight::CodeHighlighter;
use crate::math::MathWrapper;
use crate::postprocess::PostProcessor;
use crate::renderer::MarkdownRenderer;
use crate::sidenote::{SidenoteProcessorConfig, into_string};

/// Result of rendering a markdown page.
#[derive(Clone, Debug)]
pub struct PageRenderResult {
    /// Rendered HTML content.
    pub html: String,
    /// Raw frontmatter block, if the page had one.
    pub frontmatter: Option<String>,
    /// Warnings from every stage, in pipeline order.
    pub warnings: Vec<String>,
}

/// Error returned when page rendering fails.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Source file not found.
    #[error("Source file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    /// I/O error reading source file.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),
}

/// Configuration for [`PageRenderer`].
#[derive(Clone, Debug)]
pub struct PageRendererConfig {
    /// Enable GitHub Flavored Markdown.
    pub gfm: bool,
    /// Give headings slug `id` attributes.
    pub heading_ids: bool,
    /// Open links that are not relative in a new tab.
    pub links_new_tab: bool,
    /// Sidenote numbering and classes.
    pub sidenotes: SidenoteProcessorConfig,
    /// Math wrapping, or `None` to leave `$` alone.
    pub math: Option<MathWrapper>,
}

impl Default for PageRendererConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            heading_ids: true,
            links_new_tab: true,
            sidenotes: SidenoteProcessorConfig::default(),
            math: Some(MathWrapper::new()),
        }
    }
}

/// Markdown page renderer.
///
/// Shareable between threads: every call builds its own post-processor, so
/// sidenote numbering always starts at 1 and concurrent renders never see
/// each other's ids.
///
/// # Example
///
/// ```
/// use margin_renderer::{PageRenderer, PageRendererConfig};
///
/// let renderer = PageRenderer::new(PageRendererConfig::default());
/// let result = renderer.render("---\ntitle: x\n---\nText{sidenote a note}.\n");
///
/// assert_eq!(result.frontmatter.as_deref(), Some("title: x\n"));
/// assert!(result.html.contains(r#"id="sidenote-1">a note</aside>"#));
/// ```
pub struct PageRenderer {
    markdown: MarkdownRenderer,
    sidenotes: SidenoteProcessorConfig,
    math: Option<MathWrapper>,
}

impl PageRenderer {
    /// Create a new page renderer with the given configuration.
    #[must_use]
    pub fn new(config: PageRendererConfig) -> Self {
        Self {
            markdown: MarkdownRenderer::new()
                .with_gfm(config.gfm)
                .with_heading_ids(config.heading_ids)
                .with_links_new_tab(config.links_new_tab),
            sidenotes: config.sidenotes,
            math: config.math,
        }
    }

    /// Replace the code block highlighter.
    #[must_use]
    pub fn with_highlighter<H: CodeHighlighter + 'static>(mut self, highlighter: H) -> Self {
        self.markdown = self.markdown.with_highlighter(highlighter);
        self
    }

    /// Render markdown source to a finished page.
    #[must_use]
    pub fn render(&self, source: &str) -> PageRenderResult {
        let mut warnings = Vec::new();

        let parts = split_frontmatter(source);
        if parts.unclosed {
            tracing::warn!("Unclosed frontmatter block");
            warnings.push(
                "line 1: frontmatter opened with `---` is never closed, rendered as body"
                    .to_owned(),
            );
        }

        let converted = self.markdown.render_markdown(parts.body);
        warnings.extend(converted.warnings);

        let mut post = PostProcessor::new(self.sidenotes.clone(), self.math);
        let html = into_string(post.process(converted.html.as_bytes()));
        warnings.extend(post.take_warnings());

        PageRenderResult {
            html,
            frontmatter: parts.block.map(str::to_owned),
            warnings,
        }
    }

    /// Read and render a markdown file.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::FileNotFound` if the file doesn't exist.
    /// Returns `RenderError::Io` if the file cannot be read.
    pub fn render_file(&self, path: &Path) -> Result<PageRenderResult, RenderError> {
        if !path.exists() {
            return Err(RenderError::FileNotFound(path.to_path_buf()));
        }

        let source = fs::read_to_string(path).map_err(RenderError::Io)?;
        let result = self.render(&source);
        tracing::debug!(
            path = %path.display(),
            warnings = result.warnings.len(),
            "Rendered page"
        );
        Ok(result)
    }
}

impl Default for PageRenderer {
    fn default() -> Self {
        Self::new(PageRendererConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::sidenote::Numbering;

    static_assertions::assert_impl_all!(super::PageRenderer: Send, Sync);

    fn create_temp_md(content: &str) -> (tempfile::TempDir, PathBuf) {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("test.md");
        let mut file = fs::File::create(&file_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (temp_dir, file_path)
    }

    #[test]
    fn test_render_simple_markdown() {
        let result = PageRenderer::default().render("# Hello\n\nWorld");

        assert!(result.html.contains(r#"<h1 id="hello">Hello</h1>"#));
        assert!(result.html.contains("<p>World</p>"));
        assert_eq!(result.frontmatter, None);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_render_heading_ids_and_links() {
        let result = PageRenderer::default().render("## Intro\n\n[l](https://x.y)");

        assert_eq!(
            result.html,
            "<h2 id=\"intro\">Intro</h2>\n<p><a href=\"https://x.y\" target=\"_blank\">l</a></p>\n"
        );
    }

    #[test]
    fn test_render_heading_ids_and_links_disabled() {
        let config = PageRendererConfig {
            heading_ids: false,
            links_new_tab: false,
            ..PageRendererConfig::default()
        };
        let result = PageRenderer::new(config).render("## Intro\n\n[l](https://x.y)");

        assert_eq!(
            result.html,
            "<h2>Intro</h2>\n<p><a href=\"https://x.y\">l</a></p>\n"
        );
    }

    #[test]
    fn test_render_full_pipeline() {
        let source = "---\ntitle: Demo\n---\n\
                      Energy{sidenote Einstein, 1905} is $E=mc^2$.\n\n\
                      ```\n{sidenote not a note}\n```\n\n\
                      {sidenote}\nA wide note.\n{/sidenote}\n";
        let result = PageRenderer::default().render(source);

        assert_eq!(result.frontmatter.as_deref(), Some("title: Demo\n"));
        assert!(result.html.contains(r#"data-sidenote-id="1""#));
        assert!(result.html.contains(r#"id="sidenote-1">Einstein, 1905</aside>"#));
        assert!(result.html.contains(r#"id="sidenote-2">A wide note.</aside>"#));
        assert!(result.html.contains(r#"<div class="inline-latex-block">E=mc^2</div>"#));
        assert!(result.html.contains("<pre><code>{sidenote not a note}\n</code></pre>"));
        assert!(!result.html.contains("title: Demo"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_math_disabled() {
        let config = PageRendererConfig {
            math: None,
            ..Default::default()
        };
        let result = PageRenderer::new(config).render("costs $5 and $6");

        assert!(result.html.contains("costs $5 and $6"));
    }

    #[test]
    fn test_document_order_numbering() {
        let config = PageRendererConfig {
            sidenotes: SidenoteProcessorConfig::new().with_numbering(Numbering::DocumentOrder),
            ..Default::default()
        };
        let result = PageRenderer::new(config)
            .render("{sidenote}\nfirst\n{/sidenote}\n\nthen{sidenote second}\n");

        assert!(result.html.contains(r#"id="sidenote-1">first</aside>"#));
        assert!(result.html.contains(r#"id="sidenote-2">second</aside>"#));
    }

    #[test]
    fn test_unclosed_frontmatter_warns() {
        let result = PageRenderer::default().render("---\ntitle: x\n\nBody\n");

        assert_eq!(result.frontmatter, None);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("frontmatter"));
    }

    #[test]
    fn test_warnings_from_later_stages_collected() {
        let result = PageRenderer::default().render("Price $5.\n\n{sidenote}\nopen\n");

        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].contains("unclosed {sidenote}"));
        assert!(result.warnings[1].contains("unbalanced"));
    }

    #[test]
    fn test_each_render_restarts_numbering() {
        let renderer = PageRenderer::default();
        let first = renderer.render("a{sidenote x} b{sidenote y}");
        let second = renderer.render("c{sidenote z}");

        assert!(first.html.contains(r#"id="sidenote-2""#));
        assert!(second.html.contains(r#"id="sidenote-1">z</aside>"#));
        assert!(!second.html.contains(r#"id="sidenote-2""#));
    }

    #[test]
    fn test_concurrent_renders_are_independent() {
        let renderer = Arc::new(PageRenderer::default());
        let handles: Vec<_> = (1..=8)
            .map(|n| {
                let renderer = Arc::clone(&renderer);
                std::thread::spawn(move || {
                    let source: String = (0..n)
                        .map(|i| format!("p{i}{{sidenote n{i}}}\n"))
                        .collect();
                    (n, renderer.render(&source).html)
                })
            })
            .collect();

        for handle in handles {
            let (n, html) = handle.join().unwrap();
            assert_eq!(html.matches("<aside").count(), n);
            assert!(html.contains(&format!(r#"id="sidenote-{n}""#)));
            assert!(!html.contains(&format!(r#"id="sidenote-{}""#, n + 1)));
        }
    }

    #[test]
    fn test_render_file() {
        let (_temp_dir, file_path) = create_temp_md("# Hello\n\nWorld{sidenote hi}");

        let result = PageRenderer::default().render_file(&file_path).unwrap();
        assert!(result.html.contains("<p>World<span"));
    }

    #[test]
    fn test_render_file_not_found() {
        let result = PageRenderer::default().render_file(Path::new("/nonexistent/file.md"));

        assert!(matches!(result, Err(RenderError::FileNotFound(_))));
    }

    #[test]
    fn test_render_error_display() {
        let err = RenderError::FileNotFound(PathBuf::from("/docs/missing.md"));
        assert_eq!(err.to_string(), "Source file not found: /docs/missing.md");
    }
}
