//! Text analysis for the classifier.
//!
//! Text flows through an optional [`char_filter::CharFilter`] (the sanitizer),
//! is lowercased, and is then split into tokens by a [`tokenizer::Tokenizer`].
//! Both components are injected into the classifier so any implementation can
//! be substituted.

pub mod char_filter;
pub mod token;
pub mod tokenizer;
