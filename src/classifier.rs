//! Incremental complement-class Bayesian text classifier.
//!
//! # Architecture
//!
//! - [`FrequencyTables`]: the four count tables, the only learned state
//! - [`ModelSnapshot`]: serializable projection of the tables
//! - [`Classifier`]: train / classify / reset / save / load over injected
//!   tokenizer and sanitizer
//! - [`SharedClassifier`]: a cloneable handle guarding one classifier with a
//!   read-write lock
//!
//! # Example
//!
//! ```
//! use sieve::classifier::Classifier;
//!
//! let mut classifier = Classifier::default();
//! classifier.train("spam", "buy cheap now");
//! classifier.train("ham", "let's meet for lunch");
//! classifier.train("spam", "cheap pills now");
//!
//! let scores = classifier.classify("cheap now");
//! assert_eq!(scores[0].label, "spam");
//! ```

pub mod config;
pub mod engine;
pub mod model;
pub mod scoring;
pub mod shared;
pub mod tables;

pub use config::ClassifierConfig;
pub use engine::Classifier;
pub use model::{MODEL_EXTENSION, ModelSnapshot};
pub use scoring::LabelScore;
pub use shared::SharedClassifier;
pub use tables::FrequencyTables;
