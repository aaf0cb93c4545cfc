//! Char filters that sanitize text before it reaches the tokenizer.
//!
//! A char filter is the classifier's sanitizer capability. It is injected at
//! construction and applied to both labels and texts before lowercasing.
//!
//! # Available Filters
//!
//! - [`markup_strip::MarkupStripCharFilter`] - Removes markup tags and control characters
//! - [`pattern_replace::PatternReplaceCharFilter`] - Regex-based replacement
//!
//! # Examples
//!
//! ```
//! use sieve::analysis::char_filter::{CharFilter, MarkupStripCharFilter};
//!
//! let filter = MarkupStripCharFilter::new();
//! assert_eq!(filter.filter("<b>cheap</b> pills"), "cheap pills");
//! ```

/// Trait for character filters that transform text before tokenization.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text and return the filtered text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod markup_strip;
pub mod pattern_replace;

pub use markup_strip::MarkupStripCharFilter;
pub use pattern_replace::PatternReplaceCharFilter;
