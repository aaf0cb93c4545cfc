//! # Sieve
//!
//! An incremental, persistable text classifier that scores each label against
//! the complement of all other labels and combines per-token evidence in
//! log-odds space.
//!
//! ## Features
//!
//! - Streaming training: one `(label, text)` pair at a time
//! - Pluggable tokenizers and sanitizers
//! - Compact, checksummed, compressed model blobs that round-trip exactly
//! - Pluggable storage backends for models
//! - A read-write-locked handle for sharing one classifier across threads

pub mod analysis;
pub mod classifier;
pub mod cli;
pub mod error;
pub mod storage;

pub mod prelude {
    pub use crate::analysis::char_filter::{CharFilter, MarkupStripCharFilter};
    pub use crate::analysis::tokenizer::{PunctuationTokenizer, Tokenizer};
    pub use crate::classifier::{
        Classifier, ClassifierConfig, LabelScore, ModelSnapshot, SharedClassifier,
    };
    pub use crate::error::{Result, SieveError};
    pub use crate::storage::{FileStorage, MemoryStorage, Storage};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
