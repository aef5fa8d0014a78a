//! Sidenote directive scanning.
//!
//! Finds `{sidenote text}` and `{sidenote}` … `{/sidenote}` spans by byte
//! offset. Scans are left to right and non-overlapping within one shape; a
//! span that later gets filtered out still consumes its bytes.

use std::ops::Range;

use memchr::memmem;

/// Prefix shared by both opening forms.
pub(crate) const INLINE_OPEN: &[u8] = b"{sidenote";
pub(crate) const BLOCK_OPEN: &[u8] = b"{sidenote}";
pub(crate) const BLOCK_CLOSE: &[u8] = b"{/sidenote}";

/// A directive span before numbering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub start: usize,
    pub end: usize,
    /// Inner text, including the whitespace that follows the name.
    pub content: Range<usize>,
}

impl Candidate {
    pub(crate) fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub(crate) fn covers(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }
}

/// Result of the block directive scan.
#[derive(Debug, Default)]
pub(crate) struct BlockScan {
    pub candidates: Vec<Candidate>,
    /// Offset of a `{sidenote}` with no closing marker after it.
    pub unterminated: Option<usize>,
}

/// Scan for `{sidenote<ws>+<text>}`.
///
/// At least one whitespace byte must follow the name and at least one more
/// byte must precede the closing brace. The text runs to the first `}`.
pub(crate) fn scan_inline(html: &[u8]) -> Vec<Candidate> {
    let finder = memmem::Finder::new(INLINE_OPEN);
    let mut found = Vec::new();
    let mut pos = 0;

    while let Some(offset) = finder.find(&html[pos..]) {
        let start = pos + offset;
        let body = start + INLINE_OPEN.len();

        if !html.get(body).is_some_and(u8::is_ascii_whitespace) {
            pos = start + 1;
            continue;
        }

        // No closing brace anywhere after this point: nothing further can match
        let Some(brace) = memchr::memchr(b'}', &html[body..]) else {
            break;
        };
        let close = body + brace;

        if brace < 2 {
            pos = start + 1;
            continue;
        }

        found.push(Candidate {
            start,
            end: close + 1,
            content: body..close,
        });
        pos = close + 1;
    }

    found
}

/// Scan for `{sidenote}` … `{/sidenote}` using the nearest closing marker.
pub(crate) fn scan_block(html: &[u8]) -> BlockScan {
    let opener = memmem::Finder::new(BLOCK_OPEN);
    let closer = memmem::Finder::new(BLOCK_CLOSE);
    let mut scan = BlockScan::default();
    let mut pos = 0;

    while let Some(offset) = opener.find(&html[pos..]) {
        let start = pos + offset;
        let body = start + BLOCK_OPEN.len();

        let Some(len) = closer.find(&html[body..]) else {
            scan.unterminated = Some(start);
            break;
        };

        let body_end = body + len;
        let end = body_end + BLOCK_CLOSE.len();
        scan.candidates.push(Candidate {
            start,
            end,
            content: body..body_end,
        });
        pos = end;
    }

    scan
}

/// Offsets of every `{/sidenote}` marker.
pub(crate) fn block_closers(html: &[u8]) -> impl Iterator<Item = usize> + '_ {
    memmem::find_iter(html, BLOCK_CLOSE)
}

/// Candidate in `sorted` that covers `pos`.
///
/// `sorted` must come from one scan: ordered by start and non-overlapping.
pub(crate) fn covering(sorted: &[Candidate], pos: usize) -> Option<&Candidate> {
    let after = sorted.partition_point(|c| c.start <= pos);
    sorted[..after].last().filter(|c| c.covers(pos))
}

/// First candidate in `sorted` that overlaps `other`.
///
/// `sorted` must come from one scan, so ends ascend along with starts.
pub(crate) fn first_overlap<'a>(
    sorted: &'a [Candidate],
    other: &Candidate,
) -> Option<&'a Candidate> {
    let first = sorted.partition_point(|c| c.end <= other.start);
    sorted.get(first).filter(|c| c.overlaps(other))
}
