//! Complement-class log-odds scoring.
//!
//! Each label is contrasted against the union of all other labels. For every
//! query token seen in training, the share of the label's documents that
//! carry the token is compared with the same share in the complement, damped
//! toward a neutral probability by how often the token was seen, and added to
//! a log-odds sum. The sum is squashed back into `[0, 1]` with a logistic.

use serde::{Deserialize, Serialize};

use crate::classifier::config::ClassifierConfig;
use crate::classifier::tables::FrequencyTables;

/// A label and its score for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    /// The label.
    pub label: String,
    /// Score in `[0, 1]`; higher means the text looks more like this label.
    pub score: f64,
}

/// Probability that a token indicates the label rather than its complement.
///
/// A label with no documents has no positive evidence. When neither side has
/// any evidence the token is neutral.
pub(crate) fn token_probability(
    label_count: u64,
    label_docs: u64,
    inverse_count: u64,
    inverse_docs: u64,
    neutral: f64,
) -> f64 {
    let ratio = |count: u64, docs: u64| {
        if docs == 0 {
            0.0
        } else {
            count as f64 / docs as f64
        }
    };

    let positive = ratio(label_count, label_docs);
    let negative = ratio(inverse_count, inverse_docs);

    if positive + negative == 0.0 {
        neutral
    } else {
        positive / (positive + negative)
    }
}

/// Pull `probability` toward the assumed probability; tokens seen more often
/// keep more of their own estimate.
pub(crate) fn damp(probability: f64, global_count: u64, config: &ClassifierConfig) -> f64 {
    let seen = global_count as f64;
    (config.assumed_weight * config.assumed_probability + seen * probability)
        / (config.assumed_weight + seen)
}

/// Keep a probability away from 0 and 1 so its log-odds stay finite.
pub(crate) fn clamp(probability: f64, config: &ClassifierConfig) -> f64 {
    if probability == 0.0 {
        config.min_probability
    } else if probability == 1.0 {
        config.max_probability
    } else {
        probability
    }
}

/// `ln(1 - p) - ln(p)`: negative when `p` favours the label.
pub(crate) fn log_odds(probability: f64) -> f64 {
    (1.0 - probability).ln() - probability.ln()
}

/// `1 / (1 + e^sum)`.
pub(crate) fn logistic(log_sum: f64) -> f64 {
    1.0 / (1.0 + log_sum.exp())
}

/// Score one label, or `None` when every trained document belongs to it and
/// there is no complement to contrast with.
pub(crate) fn score_label<S: AsRef<str>>(
    tables: &FrequencyTables,
    config: &ClassifierConfig,
    label: &str,
    tokens: &[S],
) -> Option<f64> {
    let label_docs = tables.document_count(label);
    let inverse_docs = tables.total_documents() - label_docs;
    if inverse_docs == 0 {
        return None;
    }

    let log_sum: f64 = tokens
        .iter()
        .map(|token| AsRef::<str>::as_ref(token))
        .filter_map(|token| {
            let global = tables.token_count(token);
            if global == 0 {
                return None;
            }

            let probability = token_probability(
                tables.label_token_count(label, token),
                label_docs,
                tables.inverse_token_count(token, label),
                inverse_docs,
                config.assumed_probability,
            );
            let probability = clamp(damp(probability, global, config), config);
            Some(log_odds(probability))
        })
        .sum();

    Some(logistic(log_sum))
}

/// Score every label that has a complement, best first.
///
/// The sort is stable, so tied labels keep first-trained order.
pub(crate) fn rank<S: AsRef<str>>(
    tables: &FrequencyTables,
    config: &ClassifierConfig,
    tokens: &[S],
) -> Vec<LabelScore> {
    let mut scores: Vec<LabelScore> = tables
        .labels()
        .filter_map(|label| {
            score_label(tables, config, label, tokens).map(|score| LabelScore {
                label: label.to_string(),
                score,
            })
        })
        .collect();

    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    scores
}
