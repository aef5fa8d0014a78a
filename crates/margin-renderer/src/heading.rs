//! Heading anchor ids.

use std::collections::HashMap;

/// Assigns unique slug ids to the headings of one document.
///
/// The first heading with a given slug keeps it; later ones get `-1`, `-2`
/// and so on appended.
#[derive(Debug, Default)]
pub(crate) struct HeadingIds {
    counts: HashMap<String, usize>,
}

impl HeadingIds {
    /// Id for a heading with the given plain text, or `None` if the text has
    /// nothing to slug.
    pub(crate) fn assign(&mut self, text: &str) -> Option<String> {
        let base = slugify(text);
        if base.is_empty() {
            return None;
        }
        let count = self.counts.entry(base.clone()).or_default();
        let id = match *count {
            0 => base,
            n => format!("{base}-{n}"),
        };
        *count += 1;
        Some(id)
    }
}

/// Convert heading text to a URL-safe slug.
///
/// Lowercases ASCII alphanumerics, turns runs of whitespace, dashes and
/// underscores into a single dash, and drops everything else.
pub(crate) fn slugify(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_was_dash = true;

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("  Margin  Notes  "), "margin-notes");
        assert_eq!(slugify("snake_case and kebab-case"), "snake-case-and-kebab-case");
        assert_eq!(slugify("Step 2: --verbose"), "step-2-verbose");
    }

    #[test]
    fn test_duplicate_ids_are_numbered() {
        let mut ids = HeadingIds::default();

        assert_eq!(ids.assign("FAQ").as_deref(), Some("faq"));
        assert_eq!(ids.assign("FAQ").as_deref(), Some("faq-1"));
        assert_eq!(ids.assign("Other").as_deref(), Some("other"));
        assert_eq!(ids.assign("faq").as_deref(), Some("faq-2"));
    }

    #[test]
    fn test_heading_without_slug_text() {
        let mut ids = HeadingIds::default();
        assert_eq!(ids.assign("???"), None);
        assert_eq!(ids.assign(""), None);
    }
}
