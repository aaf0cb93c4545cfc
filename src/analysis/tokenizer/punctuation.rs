//! Whitespace and punctuation tokenizer, the classifier's default.

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream};

/// Characters that separate tokens besides whitespace.
///
/// `!`, `-` and `:` are individual separators, not a `!`..`:` range, so
/// digits, quotes and `/` stay inside tokens.
const SEPARATORS: &[char] = &[' ', ',', '.', '?', '!', '-', ':', ';', '\n', '\r', '\t', '…', '_'];

/// A tokenizer that lowercases text and splits it on whitespace, common
/// punctuation and the ellipsis character.
///
/// The separators are `, . ? ! - : ; _` and `…`, each taken literally; digits,
/// quotes and `/` are never separators.
///
/// Empty and whitespace-only fragments are dropped; token order follows the
/// input.
///
/// ```
/// use sieve::analysis::tokenizer::{PunctuationTokenizer, Tokenizer};
///
/// let tokens: Vec<String> = PunctuationTokenizer::new()
///     .tokenize("Wait… what?! Buy-now")
///     .map(|t| t.text)
///     .collect();
/// assert_eq!(tokens, vec!["wait", "what", "buy", "now"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PunctuationTokenizer;

impl PunctuationTokenizer {
    /// Create a new punctuation tokenizer.
    pub fn new() -> Self {
        PunctuationTokenizer
    }

    fn is_separator(c: char) -> bool {
        SEPARATORS.contains(&c)
    }
}

impl Tokenizer for PunctuationTokenizer {
    fn tokenize(&self, text: &str) -> TokenStream {
        let text = text.to_lowercase();
        let mut tokens = Vec::new();
        let mut start = 0;

        let push_fragment = |from: usize, to: usize, tokens: &mut Vec<Token>| {
            let fragment = &text[from..to];
            if !fragment.trim().is_empty() {
                let position = tokens.len();
                tokens.push(Token::with_offsets(fragment, position, from, to));
            }
        };

        for (offset, c) in text.char_indices() {
            if Self::is_separator(c) {
                push_fragment(start, offset, &mut tokens);
                start = offset + c.len_utf8();
            }
        }
        push_fragment(start, text.len(), &mut tokens);

        Box::new(tokens.into_iter())
    }

    fn name(&self) -> &'static str {
        "punctuation"
    }
}
