//! Error types for the Sieve library.
//!
//! All fallible operations return [`SieveError`]. Training and classification
//! never fail; errors come from model persistence, storage access and from
//! constructing analysis components with invalid settings.
//!
//! # Examples
//!
//! ```
//! use sieve::error::{Result, SieveError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SieveError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Sieve operations.
#[derive(Error, Debug)]
pub enum SieveError {
    /// I/O errors (file operations, directory creation, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A model blob is missing, carries the wrong format tag, or cannot be
    /// decompressed or decoded into the four frequency tables.
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Analysis-related errors (tokenizer or char filter construction)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Invalid argument supplied by the caller
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with SieveError.
pub type Result<T> = std::result::Result<T, SieveError>;

impl SieveError {
    /// Create a new invalid model error.
    pub fn invalid_model<S: Into<String>>(msg: S) -> Self {
        SieveError::InvalidModel(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        SieveError::Storage(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        SieveError::Analysis(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SieveError::InvalidArgument(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        SieveError::Serialization(msg.into())
    }

    /// Whether this error reports an unusable model.
    pub fn is_invalid_model(&self) -> bool {
        matches!(self, SieveError::InvalidModel(_))
    }
}
