//! Whitespace tokenizer implementation.

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream};

/// A tokenizer that splits text on Unicode whitespace only.
///
/// Punctuation stays attached to words, so `"now!"` and `"now"` are distinct
/// tokens. Case is preserved; the classifier lowercases before tokenizing.
#[derive(Clone, Debug, Default)]
pub struct WhitespaceTokenizer;

impl WhitespaceTokenizer {
    /// Create a new whitespace tokenizer.
    pub fn new() -> Self {
        WhitespaceTokenizer
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> TokenStream {
        let mut tokens = Vec::new();
        let mut start: Option<usize> = None;

        for (offset, c) in text.char_indices() {
            match (c.is_whitespace(), start) {
                (true, Some(from)) => {
                    let position = tokens.len();
                    tokens.push(Token::with_offsets(&text[from..offset], position, from, offset));
                    start = None;
                }
                (false, None) => start = Some(offset),
                _ => {}
            }
        }

        if let Some(from) = start {
            let position = tokens.len();
            tokens.push(Token::with_offsets(&text[from..], position, from, text.len()));
        }

        Box::new(tokens.into_iter())
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}
