//! Sidenote processor for rendered HTML.
//!
//! Finds sidenote directives outside code, numbers them and rewrites them into
//! markup.

use super::counter::SidenoteCounter;
use super::parser::{self, BlockScan, Candidate};
use super::render::{SidenoteClasses, render_sidenote};
use super::{Sidenote, SidenoteKind};
use crate::region::CodeRegions;
use crate::replacements::Replacements;

/// Order in which sidenotes receive their ids.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Numbering {
    /// All inline sidenotes in document order, then all block sidenotes in
    /// document order. An inline sidenote placed after a block sidenote can
    /// receive the lower id.
    #[default]
    TwoPass,
    /// Strict document order across both shapes.
    DocumentOrder,
}

/// Configuration for the sidenote processor.
#[derive(Clone, Debug, Default)]
pub struct SidenoteProcessorConfig {
    /// Id assignment order.
    pub numbering: Numbering,
    /// CSS classes for the annotation elements.
    pub classes: SidenoteClasses,
}

impl SidenoteProcessorConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the id assignment order.
    #[must_use]
    pub fn with_numbering(mut self, numbering: Numbering) -> Self {
        self.numbering = numbering;
        self
    }

    /// Set the annotation classes.
    #[must_use]
    pub fn with_classes(mut self, classes: SidenoteClasses) -> Self {
        self.classes = classes;
        self
    }
}

/// Processor for sidenote directives.
///
/// Each call to [`process`](Self::process) numbers sidenotes from 1 with its
/// own [`SidenoteCounter`]; nothing carries over between documents except the
/// collected warnings.
///
/// # Thread Safety
///
/// The processor holds no shared state. For parallel rendering, create one
/// processor per thread.
///
/// # Example
///
/// ```
/// use margin_renderer::sidenote::{Numbering, SidenoteProcessor, SidenoteProcessorConfig};
///
/// let config = SidenoteProcessorConfig::new().with_numbering(Numbering::DocumentOrder);
/// let mut processor = SidenoteProcessor::with_config(config);
///
/// let html = processor.process_str("{sidenote}block{/sidenote} then {sidenote inline}");
/// assert!(html.contains(r#"id="sidenote-1">block</aside>"#));
/// assert!(html.contains(r#"data-sidenote-id="2""#));
/// ```
#[derive(Debug, Default)]
pub struct SidenoteProcessor {
    config: SidenoteProcessorConfig,
    warnings: Vec<String>,
}

impl SidenoteProcessor {
    /// Create a new sidenote processor with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SidenoteProcessorConfig::default())
    }

    /// Create a new sidenote processor with custom configuration.
    #[must_use]
    pub fn with_config(config: SidenoteProcessorConfig) -> Self {
        Self {
            config,
            warnings: Vec::new(),
        }
    }

    /// Rewrite every sidenote directive outside code into markup.
    ///
    /// Never fails: malformed directives and directives inside code are left
    /// as they are.
    #[must_use]
    pub fn process(&mut self, html: &[u8]) -> Vec<u8> {
        let regions = CodeRegions::scan(html);
        let notes = self.extract(html, &regions);
        if notes.is_empty() {
            return html.to_vec();
        }

        let mut replacements = Replacements::with_capacity(notes.len());
        for note in &notes {
            replacements.add(
                note.start..note.end,
                render_sidenote(note, &self.config.classes),
            );
        }

        tracing::debug!(count = notes.len(), "Rewrote sidenotes");
        replacements.apply(html)
    }

    /// Rewrite sidenotes in a string.
    ///
    /// Convenience wrapper around [`process`](Self::process).
    #[must_use]
    pub fn process_str(&mut self, html: &str) -> String {
        into_string(self.process(html.as_bytes()))
    }

    /// Find and number the sidenotes in `html`.
    ///
    /// Inline directives are scanned first, then block directives. Matches
    /// whose opening brace lies inside a code region are dropped, as are inline
    /// matches that overlap a block match. Ids are assigned from a fresh
    /// counter in the configured [`Numbering`] order. The result is in id order.
    pub fn extract(&mut self, html: &[u8], regions: &CodeRegions) -> Vec<Sidenote> {
        let inline = parser::scan_inline(html);
        let block = parser::scan_block(html);
        self.check_block_markers(html, regions, &inline, &block);

        let blocks: Vec<Candidate> = block
            .candidates
            .into_iter()
            .filter(|c| outside_code(c, regions, SidenoteKind::Block))
            .collect();

        let inlines: Vec<Candidate> = inline
            .into_iter()
            .filter(|c| outside_code(c, regions, SidenoteKind::Inline))
            .filter(|c| {
                let Some(block) = parser::first_overlap(&blocks, c) else {
                    return true;
                };
                self.warnings.push(format!(
                    "byte {}: sidenote overlaps the block sidenote at byte {} and was left unchanged",
                    c.start, block.start
                ));
                false
            })
            .collect();

        let mut ordered: Vec<(SidenoteKind, Candidate)> = inlines
            .into_iter()
            .map(|c| (SidenoteKind::Inline, c))
            .chain(blocks.into_iter().map(|c| (SidenoteKind::Block, c)))
            .collect();

        if self.config.numbering == Numbering::DocumentOrder {
            ordered.sort_by_key(|(_, c)| c.start);
        }

        let mut counter = SidenoteCounter::new();
        ordered
            .into_iter()
            .map(|(kind, c)| {
                let note = Sidenote {
                    id: counter.next_id(),
                    kind,
                    start: c.start,
                    end: c.end,
                    content: String::from_utf8_lossy(&html[c.content]).trim().to_owned(),
                    raw: html[c.start..c.end].to_vec(),
                };
                tracing::debug!(
                    id = note.id,
                    kind = ?note.kind,
                    start = note.start,
                    raw = %String::from_utf8_lossy(&note.raw),
                    "Found sidenote"
                );
                note
            })
            .collect()
    }

    /// Warn about an unclosed `{sidenote}` and `{/sidenote}` markers that close nothing.
    ///
    /// Runs on the raw scan results so that spans dropped for lying in code
    /// still count as consuming their markers.
    fn check_block_markers(
        &mut self,
        html: &[u8],
        regions: &CodeRegions,
        inline: &[Candidate],
        block: &BlockScan,
    ) {
        if let Some(start) = block.unterminated
            && !regions.contains(start)
        {
            self.warnings.push(format!(
                "byte {start}: unclosed {{sidenote}} block (missing {{/sidenote}})"
            ));
        }

        for pos in parser::block_closers(html) {
            let consumed = regions.contains(pos)
                || parser::covering(inline, pos).is_some()
                || parser::covering(&block.candidates, pos).is_some();
            if !consumed {
                self.warnings.push(format!(
                    "byte {pos}: stray {{/sidenote}} with no opening {{sidenote}}"
                ));
            }
        }
    }

    /// Get all warnings generated during processing.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Take the collected warnings, leaving the processor with none.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}

fn outside_code(candidate: &Candidate, regions: &CodeRegions, kind: SidenoteKind) -> bool {
    if regions.contains(candidate.start) {
        tracing::debug!(start = candidate.start, ?kind, "Skipping sidenote inside code");
        return false;
    }
    true
}

/// Convert processed bytes back to a string.
///
/// Rewriting only splits input at ASCII delimiters, so valid UTF-8 input stays
/// valid; the lossy path only runs for input that was not UTF-8 to begin with.
pub(crate) fn into_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}
