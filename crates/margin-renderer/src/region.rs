//! Code region detection for rendered HTML.
//!
//! Locates the byte ranges of rendered code so that sidenote and math
//! rewriting can leave them untouched. Two shapes are recognized:
//!
//! - block code: `<pre…><code…>` … `</code></pre>`
//! - inline code: `<code…>` … `</code>`
//!
//! Each shape is matched with the shortest span up to its closing tags and may
//! cross line breaks. The two scans are independent, so an inline region can
//! sit inside a block region. Regions are only used for membership tests and
//! are never merged.

use memchr::memmem;

/// Half-open byte range `[start, end)` covering one rendered code fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeRegion {
    /// Offset of the first byte of the opening tag.
    pub start: usize,
    /// Offset just past the closing tag.
    pub end: usize,
}

impl CodeRegion {
    /// Check whether `pos` falls inside this region.
    #[must_use]
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }
}

/// Set of code regions found in one document.
///
/// # Example
///
/// ```
/// use margin_renderer::CodeRegions;
///
/// let html = b"<p>see <code>{sidenote x}</code></p>";
/// let regions = CodeRegions::scan(html);
///
/// assert_eq!(regions.len(), 1);
/// assert!(regions.contains(13));
/// assert!(!regions.contains(0));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeRegions {
    regions: Vec<CodeRegion>,
    /// Number of leading block regions. Each shape's regions are sorted and disjoint.
    blocks: usize,
}

impl CodeRegions {
    /// Scan rendered HTML for code regions.
    #[must_use]
    pub fn scan(html: &[u8]) -> Self {
        let mut regions = Vec::new();
        BLOCK_CODE.scan(html, &mut regions);
        let blocks = regions.len();
        INLINE_CODE.scan(html, &mut regions);
        Self { regions, blocks }
    }

    /// Check whether `pos` falls inside any region.
    #[must_use]
    pub fn contains(&self, pos: usize) -> bool {
        let (block, inline) = self.regions.split_at(self.blocks);
        sorted_contains(block, pos) || sorted_contains(inline, pos)
    }

    /// Iterate over the regions, block regions first.
    pub fn iter(&self) -> impl Iterator<Item = &CodeRegion> {
        self.regions.iter()
    }

    /// Number of regions found.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Check if no code was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Membership test over regions sorted by start that do not overlap.
fn sorted_contains(regions: &[CodeRegion], pos: usize) -> bool {
    let after = regions.partition_point(|region| region.start <= pos);
    after > 0 && regions[after - 1].contains(pos)
}

/// A code markup shape: a run of adjacent opening tags and a closing sequence.
struct CodeShape {
    /// Opening tag prefixes, each followed by `[^>]*>`.
    open: &'static [&'static [u8]],
    close: &'static [u8],
}

const BLOCK_CODE: CodeShape = CodeShape {
    open: &[b"<pre", b"<code"],
    close: b"</code></pre>",
};

const INLINE_CODE: CodeShape = CodeShape {
    open: &[b"<code"],
    close: b"</code>",
};

/// Outcome of trying to match a shape at one position.
enum Attempt {
    Matched(usize),
    /// Opening tags did not match here; resume the search at the offset.
    Retry(usize),
    /// No `>` or closing sequence remains; no later position can match either.
    Exhausted,
}

impl CodeShape {
    fn scan(&self, html: &[u8], out: &mut Vec<CodeRegion>) {
        let opener = memmem::Finder::new(self.open[0]);
        let closer = memmem::Finder::new(self.close);
        let mut pos = 0;

        while let Some(offset) = opener.find(&html[pos..]) {
            let start = pos + offset;
            match self.match_at(html, start, &closer) {
                Attempt::Matched(end) => {
                    out.push(CodeRegion { start, end });
                    pos = end;
                }
                Attempt::Retry(next) => pos = next,
                Attempt::Exhausted => break,
            }
        }
    }

    fn match_at(&self, html: &[u8], start: usize, closer: &memmem::Finder<'_>) -> Attempt {
        let mut pos = start;
        // Every start before the first tag's `>` shares that `>` and fails the same way
        let mut resume = None;
        for tag in self.open {
            if !html[pos..].starts_with(tag) {
                return Attempt::Retry(resume.unwrap_or(start + 1));
            }
            let Some(end) = open_tag_end(html, pos + tag.len()) else {
                return Attempt::Exhausted;
            };
            resume.get_or_insert(end);
            pos = end;
        }

        match closer.find(&html[pos..]) {
            Some(offset) => Attempt::Matched(pos + offset + self.close.len()),
            None => Attempt::Exhausted,
        }
    }
}

/// Match the `[^>]*>` tail of an opening tag whose attributes start at
/// `attrs`, returning the offset just past the `>`.
fn open_tag_end(html: &[u8], attrs: usize) -> Option<usize> {
    memchr::memchr(b'>', &html[attrs..]).map(|offset| attrs + offset + 1)
}
