//! Markdown rendering with margin sidenotes and inline math.
//!
//! The pipeline for one page:
//!
//! 1. [`split_frontmatter`] cuts off a leading `---` block.
//! 2. [`MarkdownRenderer`] converts the body to HTML, handing code blocks to
//!    a [`CodeHighlighter`].
//! 3. [`sidenote::SidenoteProcessor`] rewrites `{sidenote …}` directives that
//!    lie outside [`CodeRegions`] into numbered margin notes.
//! 4. [`MathWrapper`] wraps `$…$` spans.
//!
//! [`PageRenderer`] runs all of it; [`postprocess`] runs steps 3 and 4 on
//! HTML rendered elsewhere.
//!
//! # Example
//!
//! ```
//! use margin_renderer::PageRenderer;
//!
//! let page = PageRenderer::default().render("Text{sidenote a margin note}.");
//! assert!(page.html.contains(r#"<span class="sidenote-marker" data-sidenote-id="1">1</span>"#));
//! ```

mod escape;
mod frontmatter;
mod heading;
mod highlight;
mod math;
mod page;
mod postprocess;
mod region;
mod renderer;
mod replacements;
pub mod sidenote;

pub use escape::escape_html;
pub use frontmatter::{Frontmatter, split_frontmatter};
pub use highlight::{CodeHighlighter, PlainHighlighter};
pub use math::{MATH_CLASS, MATH_DELIMITER, MathOutput, MathWrapper};
pub use page::{PageRenderResult, PageRenderer, PageRendererConfig, RenderError};
pub use postprocess::{PostProcessor, postprocess};
pub use region::{CodeRegion, CodeRegions};
pub use renderer::{MarkdownRenderer, RenderResult};
pub use replacements::Replacements;
