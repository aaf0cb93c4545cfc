//! Markup and control character stripping.

use std::sync::LazyLock;

use regex::Regex;

use super::CharFilter;

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<[^>]*>").expect("tag pattern is a valid regex")
});

/// A char filter that removes markup tags, drops control characters other
/// than whitespace, and trims the result.
#[derive(Clone, Debug, Default)]
pub struct MarkupStripCharFilter;

impl MarkupStripCharFilter {
    /// Create a new markup strip char filter.
    pub fn new() -> Self {
        MarkupStripCharFilter
    }
}

impl CharFilter for MarkupStripCharFilter {
    fn filter(&self, input: &str) -> String {
        let stripped = TAG_PATTERN.replace_all(input, " ");
        stripped
            .chars()
            .filter(|c| !c.is_control() || c.is_whitespace())
            .collect::<String>()
            .trim()
            .to_string()
    }

    fn name(&self) -> &'static str {
        "markup_strip"
    }
}
