//! Classifier configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SieveError};

/// Scoring and persistence settings for a [`Classifier`](super::Classifier).
///
/// The defaults reproduce the reference scoring rule exactly. Configuration
/// is never written into a model blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Probability a token is assumed to carry before any evidence.
    pub assumed_probability: f64,

    /// Weight of the assumed probability when damping by token frequency.
    pub assumed_weight: f64,

    /// Replacement for a damped probability of exactly 0.
    pub min_probability: f64,

    /// Replacement for a damped probability of exactly 1.
    pub max_probability: f64,

    /// zlib compression level used when saving models (0-9).
    pub compression_level: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            assumed_probability: 0.5,
            assumed_weight: 1.0,
            min_probability: 0.01,
            max_probability: 0.99,
            compression_level: 6,
        }
    }
}

impl ClassifierConfig {
    /// Check that every setting is in range.
    pub fn validate(&self) -> Result<()> {
        let open_unit = |value: f64| value > 0.0 && value < 1.0;

        if !open_unit(self.assumed_probability) {
            return Err(SieveError::invalid_argument(format!(
                "assumed_probability must be in (0, 1), got {}",
                self.assumed_probability
            )));
        }
        if !(self.assumed_weight > 0.0 && self.assumed_weight.is_finite()) {
            return Err(SieveError::invalid_argument(format!(
                "assumed_weight must be positive, got {}",
                self.assumed_weight
            )));
        }
        if !open_unit(self.min_probability)
            || !open_unit(self.max_probability)
            || self.min_probability >= self.max_probability
        {
            return Err(SieveError::invalid_argument(format!(
                "probability bounds must satisfy 0 < min < max < 1, got {} and {}",
                self.min_probability, self.max_probability
            )));
        }
        if self.compression_level > 9 {
            return Err(SieveError::invalid_argument(format!(
                "compression_level must be between 0 and 9, got {}",
                self.compression_level
            )));
        }
        Ok(())
    }

    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ClassifierConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
