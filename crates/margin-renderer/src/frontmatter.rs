//! Frontmatter stripping.
//!
//! A document may open with a block fenced by `---` lines. The block is cut off
//! before markdown conversion and handed back raw. It is never parsed.

const FENCE: &str = "---";

/// Source split into frontmatter and body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frontmatter<'a> {
    /// Text between the fences, without the fence lines.
    pub block: Option<&'a str>,
    /// Everything after the closing fence, or the whole source.
    pub body: &'a str,
    /// The source opened a block that no later `---` line closed.
    pub unclosed: bool,
}

/// Split a leading `---` block off `source`.
///
/// The first line must be exactly `---` (trailing whitespace allowed) and a
/// later line must be `---` as well. Otherwise the whole source is the body.
///
/// # Example
///
/// ```
/// use margin_renderer::split_frontmatter;
///
/// let parts = split_frontmatter("---\ntitle: Notes\n---\n# Body\n");
/// assert_eq!(parts.block, Some("title: Notes\n"));
/// assert_eq!(parts.body, "# Body\n");
/// ```
#[must_use]
pub fn split_frontmatter(source: &str) -> Frontmatter<'_> {
    let whole = Frontmatter {
        block: None,
        body: source,
        unclosed: false,
    };

    let mut lines = source.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return whole;
    };
    if first.trim_end() != FENCE {
        return whole;
    }

    let block_start = first.len();
    let mut offset = block_start;
    for line in lines {
        if line.trim_end() == FENCE {
            return Frontmatter {
                block: Some(&source[block_start..offset]),
                body: &source[offset + line.len()..],
                unclosed: false,
            };
        }
        offset += line.len();
    }

    Frontmatter {
        unclosed: true,
        ..whole
    }
}
