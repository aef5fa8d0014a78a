//! Offset-based replacement for post-processing.
//!
//! Collects byte-range replacements and applies them against the original
//! document, last range first.

use std::cmp::Reverse;
use std::ops::Range;

/// Collects byte-range replacements for one document.
///
/// Each replacement names a range of the *original* document. [`apply`](Self::apply)
/// performs them in descending start order, so splicing in text of a different
/// length never shifts a range that has not been applied yet.
///
/// ```text
/// original:  aaa[--1--]bbb[---2---]ccc
/// step 1:    aaa[--1--]bbb<new 2>ccc      (range 2 applied first)
/// step 2:    aaa<new 1>bbb<new 2>ccc      (range 1 offsets still valid)
/// ```
///
/// The order in which replacements are added does not matter.
///
/// # Example
///
/// ```
/// use margin_renderer::Replacements;
///
/// let mut replacements = Replacements::new();
/// replacements.add(0..3, "<b>one</b>");
/// replacements.add(8..11, "3");
///
/// let out = replacements.apply(b"one two six");
/// assert_eq!(out, b"<b>one</b> two 3");
/// ```
#[derive(Debug, Default)]
pub struct Replacements {
    items: Vec<(Range<usize>, Vec<u8>)>,
}

impl Replacements {
    /// Create a new empty replacements collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new replacements collector with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Register a replacement of `range` in the original document with `to`.
    pub fn add(&mut self, range: Range<usize>, to: impl Into<Vec<u8>>) {
        self.items.push((range, to.into()));
    }

    /// Apply all registered replacements to `input`.
    ///
    /// Ranges that fall outside the input or overlap a range with a higher
    /// start are skipped, leaving that text unchanged.
    ///
    /// Note: This consumes the replacements to prevent accidental reuse.
    #[must_use]
    pub fn apply(mut self, input: &[u8]) -> Vec<u8> {
        let mut output = input.to_vec();
        if self.items.is_empty() {
            return output;
        }

        self.items.sort_by_key(|(range, _)| Reverse(range.start));

        // Lowest start applied so far; every remaining range must end at or before it
        let mut limit = input.len();
        for (range, to) in self.items {
            if range.start > range.end || range.end > limit {
                tracing::warn!(
                    start = range.start,
                    end = range.end,
                    "Skipping overlapping or out-of-bounds replacement"
                );
                continue;
            }
            limit = range.start;
            output.splice(range, to);
        }

        output
    }

    /// Check if there are any replacements registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the number of registered replacements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}
