//! Post-processing of rendered HTML: sidenotes, then inline math.

use crate::math::MathWrapper;
use crate::sidenote::{SidenoteProcessor, SidenoteProcessorConfig, into_string};

/// Runs the sidenote rewrite followed by math wrapping.
///
/// Math wrapping sees the document after sidenote markup has been spliced in,
/// so a `$` inside an annotation pairs with any other `$` in the document.
#[derive(Debug, Default)]
pub struct PostProcessor {
    sidenotes: SidenoteProcessor,
    math: Option<MathWrapper>,
    warnings: Vec<String>,
}

impl PostProcessor {
    /// Create a post-processor. Math wrapping is skipped when `math` is `None`.
    #[must_use]
    pub fn new(sidenotes: SidenoteProcessorConfig, math: Option<MathWrapper>) -> Self {
        Self {
            sidenotes: SidenoteProcessor::with_config(sidenotes),
            math,
            warnings: Vec::new(),
        }
    }

    /// Rewrite one document.
    #[must_use]
    pub fn process(&mut self, html: &[u8]) -> Vec<u8> {
        let rewritten = self.sidenotes.process(html);
        self.warnings.extend(self.sidenotes.take_warnings());

        let Some(math) = self.math else {
            return rewritten;
        };

        let wrapped = math.wrap(&rewritten);
        if let Some(pos) = wrapped.open_at {
            tracing::warn!(pos, "Unbalanced math delimiter");
            self.warnings.push(format!(
                "byte {pos}: unbalanced `$`, math wrapper left open"
            ));
        }
        wrapped.html
    }

    /// Rewrite one document held in a string.
    #[must_use]
    pub fn process_str(&mut self, html: &str) -> String {
        into_string(self.process(html.as_bytes()))
    }

    /// Warnings collected so far.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Take the collected warnings, leaving none behind.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}

/// Rewrite sidenotes and wrap math with default settings.
///
/// # Example
///
/// ```
/// use margin_renderer::postprocess;
///
/// let out = postprocess(b"<p>$x${sidenote note}</p>");
/// let out = String::from_utf8(out).unwrap();
///
/// assert!(out.starts_with(r#"<p><div class="inline-latex-block">x</div><span"#));
/// assert!(out.contains(r#"id="sidenote-1">note</aside>"#));
/// ```
#[must_use]
pub fn postprocess(html: &[u8]) -> Vec<u8> {
    PostProcessor::new(SidenoteProcessorConfig::default(), Some(MathWrapper::new())).process(html)
}
