//! Sidenote markup.

use super::{Sidenote, SidenoteKind};
use crate::escape::escape_html;

/// Class of the numbered marker placed in the text flow.
pub const MARKER_CLASS: &str = "sidenote-marker";

/// CSS classes for the annotation elements.
///
/// Class names belong to the page layout. Only the marker class and the
/// `sidenote-<id>` anchors are fixed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidenoteClasses {
    /// Classes of the annotation produced by `{sidenote text}`.
    pub inline: String,
    /// Classes of the annotation produced by `{sidenote}` … `{/sidenote}`.
    pub block: String,
}

impl Default for SidenoteClasses {
    fn default() -> Self {
        Self {
            inline: "sidenote sidenote-inline".to_owned(),
            block: "sidenote sidenote-block".to_owned(),
        }
    }
}

impl SidenoteClasses {
    fn for_kind(&self, kind: SidenoteKind) -> &str {
        match kind {
            SidenoteKind::Inline => &self.inline,
            SidenoteKind::Block => &self.block,
        }
    }
}

/// Render the replacement markup for one sidenote.
///
/// Inline sidenotes produce a marker followed by the annotation; block
/// sidenotes produce the annotation alone. Only the content is escaped.
///
/// # Example
///
/// ```
/// use margin_renderer::sidenote::{Sidenote, SidenoteClasses, SidenoteKind, render_sidenote};
///
/// let note = Sidenote {
///     id: 3,
///     kind: SidenoteKind::Block,
///     start: 0,
///     end: 0,
///     content: "a < b".to_owned(),
///     raw: Vec::new(),
/// };
/// let html = render_sidenote(&note, &SidenoteClasses::default());
///
/// assert_eq!(
///     html,
///     r#"<aside class="sidenote sidenote-block" id="sidenote-3">a &lt; b</aside>"#
/// );
/// ```
#[must_use]
pub fn render_sidenote(note: &Sidenote, classes: &SidenoteClasses) -> String {
    let aside = format!(
        r#"<aside class="{}" id="sidenote-{}">{}</aside>"#,
        classes.for_kind(note.kind),
        note.id,
        escape_html(&note.content)
    );

    match note.kind {
        SidenoteKind::Inline => format!(
            r#"<span class="{MARKER_CLASS}" data-sidenote-id="{id}">{id}</span>{aside}"#,
            id = note.id
        ),
        SidenoteKind::Block => aside,
    }
}
