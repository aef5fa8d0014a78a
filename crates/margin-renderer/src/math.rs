//! Inline math wrapping.
//!
//! A two-state toggle over the rewritten document: every `$` switches between
//! normal text and math. Entering math emits an opening wrapper element,
//! leaving it emits the closing tag; the `$` bytes themselves are dropped and
//! everything else is copied unchanged.
//!
//! An odd number of delimiters leaves the last wrapper open. No closing tag is
//! synthesized; [`MathOutput::open_at`] reports where the unclosed span began.

use crate::region::CodeRegions;

/// Byte that toggles math mode.
pub const MATH_DELIMITER: u8 = b'$';

/// Class of the element wrapping each inline math span.
pub const MATH_CLASS: &str = "inline-latex-block";

const OPEN_TAG: &[u8] = br#"<div class="inline-latex-block">"#;
const CLOSE_TAG: &[u8] = b"</div>";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MathState {
    Normal,
    InMath,
}

/// Result of wrapping one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MathOutput {
    /// Rewritten document.
    pub html: Vec<u8>,
    /// Number of wrappers opened.
    pub spans: usize,
    /// Input offset of the delimiter that opened a wrapper left unclosed at end
    /// of input.
    pub open_at: Option<usize>,
}

/// Wraps `$…$` spans in `<div class="inline-latex-block">` elements.
///
/// By default every `$` counts, including those inside code and inside
/// sidenote markup. [`with_skip_code`](Self::with_skip_code) copies
/// delimiters that fall inside code regions verbatim instead.
///
/// # Example
///
/// ```
/// use margin_renderer::MathWrapper;
///
/// let out = MathWrapper::new().wrap(b"a $x$ b");
/// assert_eq!(out.html, br#"a <div class="inline-latex-block">x</div> b"#);
/// assert_eq!(out.open_at, None);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MathWrapper {
    skip_code: bool,
}

impl MathWrapper {
    /// Create a wrapper that toggles on every delimiter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave delimiters inside `<pre><code>` and `<code>` untouched.
    #[must_use]
    pub fn with_skip_code(mut self, skip_code: bool) -> Self {
        self.skip_code = skip_code;
        self
    }

    /// Whether delimiters inside code are skipped.
    #[must_use]
    pub fn skips_code(&self) -> bool {
        self.skip_code
    }

    /// Wrap math spans in `input`.
    #[must_use]
    pub fn wrap(&self, input: &[u8]) -> MathOutput {
        let regions = self.skip_code.then(|| CodeRegions::scan(input));

        let mut html = Vec::with_capacity(input.len());
        let mut state = MathState::Normal;
        let mut spans = 0;
        let mut open_at = None;
        let mut copied = 0;

        for pos in memchr::memchr_iter(MATH_DELIMITER, input) {
            if regions.as_ref().is_some_and(|r| r.contains(pos)) {
                continue;
            }

            html.extend_from_slice(&input[copied..pos]);
            copied = pos + 1;

            state = match state {
                MathState::Normal => {
                    html.extend_from_slice(OPEN_TAG);
                    spans += 1;
                    open_at = Some(pos);
                    MathState::InMath
                }
                MathState::InMath => {
                    html.extend_from_slice(CLOSE_TAG);
                    open_at = None;
                    MathState::Normal
                }
            };
        }
        html.extend_from_slice(&input[copied..]);

        MathOutput {
            html,
            spans,
            open_at,
        }
    }

    /// Wrap math spans in a string.
    #[must_use]
    pub fn wrap_str(&self, input: &str) -> String {
        crate::sidenote::into_string(self.wrap(input.as_bytes()).html)
    }
}
