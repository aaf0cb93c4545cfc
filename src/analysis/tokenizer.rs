//! Tokenizer implementations for text analysis.
//!
//! The classifier is polymorphic over any [`Tokenizer`]. Tokenization itself
//! never fails: tokenizers that need fallible setup (such as compiling a
//! regex) report errors from their constructors instead.
//!
//! # Available Tokenizers
//!
//! - [`punctuation::PunctuationTokenizer`] - Splits on whitespace, punctuation and the ellipsis (default)
//! - [`whitespace::WhitespaceTokenizer`] - Splits on whitespace characters
//! - [`unicode_word::UnicodeWordTokenizer`] - Uses Unicode word boundaries
//! - [`regex::RegexTokenizer`] - Custom regex-based tokenization
//!
//! # Examples
//!
//! ```
//! use sieve::analysis::tokenizer::Tokenizer;
//! use sieve::analysis::tokenizer::PunctuationTokenizer;
//!
//! let tokenizer = PunctuationTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello, world!").collect();
//! assert_eq!(tokens.len(), 2);
//! assert_eq!(tokens[0].text, "hello");
//! ```

use crate::analysis::token::TokenStream;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so a classifier holding one can be shared
/// across threads.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into an ordered stream of tokens.
    fn tokenize(&self, text: &str) -> TokenStream;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod punctuation;
pub mod regex;
pub mod unicode_word;
pub mod whitespace;

pub use punctuation::PunctuationTokenizer;
pub use regex::RegexTokenizer;
pub use unicode_word::UnicodeWordTokenizer;
pub use whitespace::WhitespaceTokenizer;
