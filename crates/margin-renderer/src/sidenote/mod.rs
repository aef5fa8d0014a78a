//! Sidenote directives in rendered HTML.
//!
//! Two directive shapes are recognized in the body text of already-rendered
//! HTML:
//!
//! - **Inline**: `{sidenote text}` produces a numbered marker followed by an
//!   annotation.
//! - **Block**: `{sidenote}` … `{/sidenote}` produces an annotation only. The
//!   body may span several lines.
//!
//! # Processing
//!
//! [`SidenoteProcessor::process`] runs the whole rewrite for one document:
//!
//! 1. [`CodeRegions::scan`](crate::CodeRegions::scan) finds code to protect.
//! 2. [`SidenoteProcessor::extract`] scans for inline directives, then for
//!    block directives, drops any whose start lies in code, and numbers the
//!    survivors with a fresh [`SidenoteCounter`].
//! 3. [`render_sidenote`] turns each sidenote into markup.
//! 4. [`Replacements`](crate::Replacements) splices the markup in, last
//!    sidenote first.
//!
//! # Example
//!
//! ```
//! use margin_renderer::sidenote::SidenoteProcessor;
//!
//! let mut processor = SidenoteProcessor::new();
//! let html = processor.process_str("<p>Text{sidenote a note}.</p>");
//!
//! assert!(html.contains(r#"data-sidenote-id="1""#));
//! assert!(html.contains(r#"id="sidenote-1""#));
//! ```

mod counter;
mod parser;
mod processor;
mod render;

pub use counter::SidenoteCounter;
pub(crate) use processor::into_string;
pub use processor::{Numbering, SidenoteProcessor, SidenoteProcessorConfig};
pub use render::{MARKER_CLASS, SidenoteClasses, render_sidenote};

/// Shape of a sidenote directive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SidenoteKind {
    /// `{sidenote text}`
    Inline,
    /// `{sidenote}` … `{/sidenote}`
    Block,
}

/// One numbered sidenote found in a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sidenote {
    /// Sequence number, starting at 1 for each document.
    pub id: u32,
    /// Directive shape.
    pub kind: SidenoteKind,
    /// Offset of the opening `{`.
    pub start: usize,
    /// Offset just past the closing `}`.
    pub end: usize,
    /// Inner text with surrounding whitespace trimmed.
    pub content: String,
    /// Original directive bytes, kept for diagnostics.
    pub raw: Vec<u8>,
}
