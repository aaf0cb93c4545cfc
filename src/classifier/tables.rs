//! Frequency tables: the classifier's entire learned state.

use indexmap::IndexMap;

use crate::classifier::model::ModelSnapshot;
use crate::error::{Result, SieveError};

/// The four count tables a classifier learns from training.
///
/// All maps keep insertion order so labels are scored, and tied scores are
/// reported, in the order the labels were first trained.
///
/// For consistent tables every token occurrence belongs to exactly one
/// label, so the per-label counts of a token sum to its global count and a
/// label's token total is the sum of its per-label counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTables {
    /// label -> total number of tokens trained under the label
    label_totals: IndexMap<String, u64>,
    /// label -> number of training calls made with the label
    doc_counts: IndexMap<String, u64>,
    /// token -> occurrences across all labels
    token_counts: IndexMap<String, u64>,
    /// label -> token -> occurrences under the label
    label_token_counts: IndexMap<String, IndexMap<String, u64>>,
}

impl FrequencyTables {
    /// Create empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one training document.
    ///
    /// The label's document count grows by one even when `tokens` is empty;
    /// every token occurrence is counted separately.
    pub fn record<I>(&mut self, label: &str, tokens: I)
    where
        I: IntoIterator<Item = String>,
    {
        if !self.doc_counts.contains_key(label) {
            self.label_totals.insert(label.to_string(), 0);
            self.doc_counts.insert(label.to_string(), 0);
            self.label_token_counts
                .insert(label.to_string(), IndexMap::new());
        }

        let mut recorded = 0;
        if let Some(label_tokens) = self.label_token_counts.get_mut(label) {
            for token in tokens {
                *self.token_counts.entry(token.clone()).or_insert(0) += 1;
                *label_tokens.entry(token).or_insert(0) += 1;
                recorded += 1;
            }
        }

        if let Some(total) = self.label_totals.get_mut(label) {
            *total += recorded;
        }
        if let Some(docs) = self.doc_counts.get_mut(label) {
            *docs += 1;
        }
    }

    /// Remove every count, returning to the untrained state.
    pub fn clear(&mut self) {
        self.label_totals.clear();
        self.doc_counts.clear();
        self.token_counts.clear();
        self.label_token_counts.clear();
    }

    /// Whether nothing has been trained.
    pub fn is_empty(&self) -> bool {
        self.doc_counts.is_empty()
    }

    /// Known labels in first-trained order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.doc_counts.keys().map(String::as_str)
    }

    /// Number of known labels.
    pub fn label_count(&self) -> usize {
        self.doc_counts.len()
    }

    /// Number of distinct tokens seen across all labels.
    pub fn vocabulary_size(&self) -> usize {
        self.token_counts.len()
    }

    /// Number of training calls made with `label`.
    pub fn document_count(&self, label: &str) -> u64 {
        self.doc_counts.get(label).copied().unwrap_or(0)
    }

    /// Number of training calls across all labels, saturating at `u64::MAX`.
    pub fn total_documents(&self) -> u64 {
        self.doc_counts
            .values()
            .fold(0, |total, count| total.saturating_add(*count))
    }

    /// Total tokens trained under `label`.
    pub fn label_token_total(&self, label: &str) -> u64 {
        self.label_totals.get(label).copied().unwrap_or(0)
    }

    /// Occurrences of `token` across all labels.
    pub fn token_count(&self, token: &str) -> u64 {
        self.token_counts.get(token).copied().unwrap_or(0)
    }

    /// Occurrences of `token` under `label`.
    pub fn label_token_count(&self, label: &str, token: &str) -> u64 {
        self.label_token_counts
            .get(label)
            .and_then(|tokens| tokens.get(token))
            .copied()
            .unwrap_or(0)
    }

    /// Occurrences of `token` under every label other than `label`.
    ///
    /// Saturates at zero for tables restored from a snapshot whose per-label
    /// count exceeds the global count.
    pub fn inverse_token_count(&self, token: &str, label: &str) -> u64 {
        self.token_count(token)
            .saturating_sub(self.label_token_count(label, token))
    }

    /// Training calls made with every label other than `label`.
    pub fn inverse_document_count(&self, label: &str) -> u64 {
        self.doc_counts
            .iter()
            .filter(|(other, _)| other.as_str() != label)
            .fold(0, |total, (_, count)| total.saturating_add(*count))
    }

    /// Project the tables into a serializable snapshot.
    pub fn to_snapshot(&self) -> ModelSnapshot {
        ModelSnapshot {
            labels: self.label_totals.clone(),
            docs: self.doc_counts.clone(),
            tokens: self.token_counts.clone(),
            data: self.label_token_counts.clone(),
        }
    }
}

impl TryFrom<ModelSnapshot> for FrequencyTables {
    type Error = SieveError;

    /// Restore tables verbatim after checking that the three label-keyed
    /// tables describe the same labels.
    fn try_from(snapshot: ModelSnapshot) -> Result<Self> {
        snapshot.validate()?;

        Ok(FrequencyTables {
            label_totals: snapshot.labels,
            doc_counts: snapshot.docs,
            token_counts: snapshot.tokens,
            label_token_counts: snapshot.data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_record_counts_every_occurrence() {
        let mut tables = FrequencyTables::new();
        tables.record("spam", tokens("cheap cheap cheap pills"));

        assert_eq!(tables.token_count("cheap"), 3);
        assert_eq!(tables.label_token_count("spam", "cheap"), 3);
        assert_eq!(tables.label_token_total("spam"), 4);
        assert_eq!(tables.document_count("spam"), 1);
        assert_eq!(tables.vocabulary_size(), 2);
    }

    #[test]
    fn test_empty_document_still_counts() {
        let mut tables = FrequencyTables::new();
        tables.record("ham", Vec::new());
        tables.record("", Vec::new());

        assert_eq!(tables.document_count("ham"), 1);
        assert_eq!(tables.label_token_total("ham"), 0);
        assert_eq!(tables.document_count(""), 1);
        assert_eq!(tables.labels().collect::<Vec<_>>(), vec!["ham", ""]);
        assert_eq!(tables.vocabulary_size(), 0);
    }

    #[test]
    fn test_inverse_counts() {
        let mut tables = FrequencyTables::new();
        tables.record("spam", tokens("buy cheap now"));
        tables.record("ham", tokens("cheap lunch"));
        tables.record("spam", tokens("cheap pills"));

        assert_eq!(tables.inverse_token_count("cheap", "spam"), 1);
        assert_eq!(tables.inverse_token_count("cheap", "ham"), 2);
        assert_eq!(tables.inverse_token_count("unknown", "ham"), 0);
        assert_eq!(tables.inverse_document_count("spam"), 1);
        assert_eq!(tables.inverse_document_count("ham"), 2);
        assert_eq!(tables.inverse_document_count("other"), 3);
        assert_eq!(tables.total_documents(), 3);
    }

    #[test]
    fn test_conservation() {
        let mut tables = FrequencyTables::new();
        tables.record("a", tokens("x y x z"));
        tables.record("b", tokens("x z z"));
        tables.record("c", tokens("y"));

        for token in ["x", "y", "z"] {
            let per_label: u64 = tables
                .labels()
                .map(|label| tables.label_token_count(label, token))
                .sum();
            assert_eq!(per_label, tables.token_count(token));
        }
        for label in ["a", "b", "c"] {
            let sum: u64 = ["x", "y", "z"]
                .iter()
                .map(|token| tables.label_token_count(label, token))
                .sum();
            assert_eq!(sum, tables.label_token_total(label));
        }
    }

    #[test]
    fn test_clear() {
        let mut tables = FrequencyTables::new();
        tables.record("a", tokens("x"));
        tables.clear();

        assert!(tables.is_empty());
        assert_eq!(tables, FrequencyTables::new());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut tables = FrequencyTables::new();
        tables.record("b", tokens("x y"));
        tables.record("a", tokens("y"));

        let restored = FrequencyTables::try_from(tables.to_snapshot()).unwrap();
        assert_eq!(restored, tables);
        assert_eq!(restored.labels().collect::<Vec<_>>(), vec!["b", "a"]);
    }
}
