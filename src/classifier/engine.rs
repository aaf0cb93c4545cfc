//! The classifier engine.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::analysis::char_filter::CharFilter;
use crate::analysis::tokenizer::{PunctuationTokenizer, Tokenizer};
use crate::classifier::config::ClassifierConfig;
use crate::classifier::model::{ModelSnapshot, check_model_extension, model_file_name};
use crate::classifier::scoring::{self, LabelScore};
use crate::classifier::tables::FrequencyTables;
use crate::error::{Result, SieveError};
use crate::storage::{FileStorage, Storage, StorageConfig};

/// An incremental text classifier.
///
/// Mutating operations take `&mut self` and reads take `&self`, so exclusive
/// access is required to train, load or reset while any number of readers may
/// classify concurrently. Wrap it in a [`SharedClassifier`](super::SharedClassifier)
/// to share one instance between threads.
pub struct Classifier {
    tables: FrequencyTables,
    tokenizer: Arc<dyn Tokenizer>,
    sanitizer: Option<Arc<dyn CharFilter>>,
    config: ClassifierConfig,
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("labels", &self.tables.label_count())
            .field("documents", &self.tables.total_documents())
            .field("vocabulary_size", &self.tables.vocabulary_size())
            .field("tokenizer", &self.tokenizer.name())
            .field("sanitizer", &self.sanitizer.as_ref().map(|s| s.name()))
            .field("config", &self.config)
            .finish()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Arc::new(PunctuationTokenizer::new()))
    }
}

impl Classifier {
    /// Create an untrained classifier with the given tokenizer and the
    /// default configuration.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Classifier {
            tables: FrequencyTables::new(),
            tokenizer,
            sanitizer: None,
            config: ClassifierConfig::default(),
        }
    }

    /// Create an untrained classifier with a validated configuration.
    pub fn with_config(tokenizer: Arc<dyn Tokenizer>, config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Classifier {
            config,
            ..Self::new(tokenizer)
        })
    }

    /// Sanitize labels and texts with `sanitizer` before they are lowercased
    /// and tokenized.
    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn CharFilter>) -> Self {
        self.sanitizer = Some(sanitizer);
        self
    }

    /// The scoring configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// The learned frequency tables.
    pub fn tables(&self) -> &FrequencyTables {
        &self.tables
    }

    /// Name of the injected tokenizer.
    pub fn tokenizer_name(&self) -> &'static str {
        self.tokenizer.name()
    }

    /// Sanitize then lowercase.
    fn normalize(&self, input: &str) -> String {
        match &self.sanitizer {
            Some(sanitizer) => sanitizer.filter(input).to_lowercase(),
            None => input.to_lowercase(),
        }
    }

    fn analyze(&self, text: &str) -> Vec<String> {
        self.tokenizer
            .tokenize(&self.normalize(text))
            .map(|token| token.text)
            .collect()
    }

    /// Learn one labelled text.
    ///
    /// Every token occurrence is counted, and the label's document count
    /// grows by one even when the text yields no tokens. Empty labels and
    /// texts are valid.
    pub fn train(&mut self, label: &str, text: &str) {
        let label = self.normalize(label);
        let tokens = self.analyze(text);
        debug!("Training label {label:?} with {} tokens", tokens.len());
        self.tables.record(&label, tokens);
    }

    /// Learn a batch of `(label, text)` pairs in order.
    pub fn train_all<I, L, T>(&mut self, samples: I)
    where
        I: IntoIterator<Item = (L, T)>,
        L: AsRef<str>,
        T: AsRef<str>,
    {
        for (label, text) in samples {
            self.train(label.as_ref(), text.as_ref());
        }
    }

    /// Score `text` against every label, best first.
    ///
    /// Labels that own every training document are left out, tokens never
    /// seen in training contribute nothing, and an untrained classifier
    /// returns an empty result.
    pub fn classify(&self, text: &str) -> Vec<LabelScore> {
        let tokens = self.analyze(text);
        let scores = scoring::rank(&self.tables, &self.config, &tokens);
        debug!(
            "Classified {} tokens against {} labels, {} scored",
            tokens.len(),
            self.tables.label_count(),
            scores.len()
        );
        scores
    }

    /// Forget everything learned. The tokenizer, sanitizer and configuration
    /// are kept.
    pub fn reset(&mut self) {
        self.tables.clear();
    }

    /// Project the learned state into a snapshot.
    pub fn snapshot(&self) -> ModelSnapshot {
        self.tables.to_snapshot()
    }

    /// Replace the learned state with `snapshot`.
    ///
    /// On error the current state is left untouched.
    pub fn restore(&mut self, snapshot: ModelSnapshot) -> Result<()> {
        self.tables = FrequencyTables::try_from(snapshot)?;
        Ok(())
    }

    /// Encode the learned state as a model blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.snapshot().encode(self.config.compression_level)
    }

    /// Replace the learned state with the content of a model blob.
    pub fn load_bytes(&mut self, blob: &[u8]) -> Result<()> {
        self.restore(ModelSnapshot::decode(blob)?)
    }

    /// Write the model to `storage` as `<name>.model` and return that file name.
    pub fn save(&self, storage: &dyn Storage, name: &str) -> Result<String> {
        let file_name = model_file_name(name)?;
        let blob = self.to_bytes()?;

        let mut output = storage.create_output(&file_name)?;
        output.write_all(&blob)?;
        output.close()?;

        info!(
            "Saved model {file_name} ({} bytes, {} labels, {} tokens)",
            blob.len(),
            self.tables.label_count(),
            self.tables.vocabulary_size()
        );
        Ok(file_name)
    }

    /// Replace the learned state with the model stored as `file_name`.
    ///
    /// Fails with [`SieveError::InvalidModel`] if the file is missing, does
    /// not carry the `.model` extension, or cannot be decoded.
    pub fn load(&mut self, storage: &dyn Storage, file_name: &str) -> Result<()> {
        check_model_extension(file_name)?;
        if !storage.file_exists(file_name) {
            return Err(SieveError::invalid_model(format!(
                "no model found at {file_name}"
            )));
        }

        let blob = storage
            .open_input(file_name)
            .and_then(|mut input| input.read_all())
            .map_err(|e| SieveError::invalid_model(format!("cannot read {file_name}: {e}")))?;

        if let Err(e) = self.load_bytes(&blob) {
            warn!("Rejected model {file_name}: {e}");
            return Err(e);
        }

        info!(
            "Loaded model {file_name} ({} labels, {} tokens)",
            self.tables.label_count(),
            self.tables.vocabulary_size()
        );
        Ok(())
    }

    /// Write the model to `<dir>/<name>.model`, creating `dir` if needed, and
    /// return the model location.
    pub fn save_to_dir<P: AsRef<Path>>(&self, dir: P, name: &str) -> Result<PathBuf> {
        let storage = FileStorage::new(dir, StorageConfig::default())?;
        let file_name = self.save(&storage, name)?;
        Ok(storage.file_path(&file_name))
    }

    /// Replace the learned state with the model file at `path`.
    pub fn load_from_path<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                SieveError::invalid_model(format!("invalid model path {}", path.display()))
            })?;
        check_model_extension(file_name)?;

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !path.is_file() {
            return Err(SieveError::invalid_model(format!(
                "no model found at {}",
                path.display()
            )));
        }

        let storage = FileStorage::new(directory, StorageConfig::default())?;
        self.load(&storage, file_name)
    }

    /// Load the model at `path`, then classify `text` with it.
    pub fn classify_from_model<P: AsRef<Path>>(
        &mut self,
        text: &str,
        path: P,
    ) -> Result<Vec<LabelScore>> {
        self.load_from_path(path)?;
        Ok(self.classify(text))
    }

    /// Known labels in first-trained order.
    pub fn labels(&self) -> Vec<String> {
        self.tables.labels().map(str::to_string).collect()
    }

    /// Whether nothing has been trained or loaded.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Number of training calls made with `label`.
    pub fn document_count(&self, label: &str) -> u64 {
        self.tables.document_count(label)
    }

    /// Number of training calls across all labels.
    pub fn total_documents(&self) -> u64 {
        self.tables.total_documents()
    }

    /// Total tokens trained under `label`.
    pub fn label_token_total(&self, label: &str) -> u64 {
        self.tables.label_token_total(label)
    }

    /// Occurrences of `token` across all labels.
    pub fn token_count(&self, token: &str) -> u64 {
        self.tables.token_count(token)
    }

    /// Occurrences of `token` under `label`.
    pub fn label_token_count(&self, label: &str, token: &str) -> u64 {
        self.tables.label_token_count(label, token)
    }

    /// Occurrences of `token` under every label other than `label`.
    pub fn inverse_token_count(&self, token: &str, label: &str) -> u64 {
        self.tables.inverse_token_count(token, label)
    }

    /// Training calls made with every label other than `label`.
    pub fn inverse_document_count(&self, label: &str) -> u64 {
        self.tables.inverse_document_count(label)
    }

    /// Number of distinct tokens seen in training.
    pub fn vocabulary_size(&self) -> usize {
        self.tables.vocabulary_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::char_filter::MarkupStripCharFilter;
    use crate::analysis::tokenizer::WhitespaceTokenizer;
    use crate::storage::MemoryStorage;

    fn spam_ham() -> Classifier {
        let mut classifier = Classifier::default();
        classifier.train("spam", "buy cheap now");
        classifier.train("ham", "let's meet for lunch");
        classifier.train("spam", "cheap pills now");
        classifier
    }

    #[test]
    fn test_train_is_case_insensitive() {
        let mut classifier = Classifier::default();
        classifier.train("SPAM", "Cheap CHEAP cheap");

        assert_eq!(classifier.labels(), vec!["spam"]);
        assert_eq!(classifier.token_count("cheap"), 3);
        assert_eq!(classifier.label_token_count("spam", "cheap"), 3);
        assert_eq!(classifier.label_token_total("spam"), 3);
    }

    #[test]
    fn test_classifier_lowercases_for_case_preserving_tokenizers() {
        let mut classifier = Classifier::new(Arc::new(WhitespaceTokenizer::new()));
        classifier.train("spam", "BUY NOW");

        assert_eq!(classifier.token_count("buy"), 1);
        assert_eq!(classifier.token_count("BUY"), 0);
    }

    #[test]
    fn test_scenario_ranks_spam_first() {
        let classifier = spam_ham();
        let scores = classifier.classify("cheap now");

        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].label, "spam");
        assert_eq!(scores[1].label, "ham");
        assert!(scores[0].score > scores[1].score);
    }

    #[test]
    fn test_sanitizer_applies_to_label_and_text() {
        let mut classifier =
            Classifier::default().with_sanitizer(Arc::new(MarkupStripCharFilter::new()));
        classifier.train("<b>Spam</b>", "<p>cheap</p> pills");

        assert_eq!(classifier.labels(), vec!["spam"]);
        assert_eq!(classifier.token_count("cheap"), 1);
        assert_eq!(classifier.token_count("<p>cheap<"), 0);
    }

    #[test]
    fn test_reset_keeps_tokenizer() {
        let mut classifier = Classifier::new(Arc::new(WhitespaceTokenizer::new()));
        classifier.train("a", "x");
        classifier.reset();

        assert!(classifier.is_empty());
        assert!(classifier.classify("x").is_empty());
        assert_eq!(classifier.tokenizer_name(), "whitespace");
    }

    #[test]
    fn test_with_config_validates() {
        let config = ClassifierConfig {
            compression_level: 42,
            ..Default::default()
        };
        assert!(Classifier::with_config(Arc::new(PunctuationTokenizer::new()), config).is_err());
    }

    #[test]
    fn test_restore_failure_keeps_state() {
        let mut classifier = spam_ham();
        let mut broken = classifier.snapshot();
        broken.docs.swap_remove("ham");

        assert!(classifier.restore(broken).unwrap_err().is_invalid_model());
        assert_eq!(classifier.total_documents(), 3);
    }

    #[test]
    fn test_save_and_load_memory_storage() {
        let storage = MemoryStorage::new();
        let classifier = spam_ham();

        let file_name = classifier.save(&storage, "spam").unwrap();
        assert_eq!(file_name, "spam.model");

        let mut loaded = Classifier::default();
        loaded.load(&storage, &file_name).unwrap();
        assert_eq!(loaded.tables(), classifier.tables());
        assert_eq!(loaded.classify("cheap now"), classifier.classify("cheap now"));
    }

    #[test]
    fn test_load_rejects_wrong_extension_and_missing_file() {
        let storage = MemoryStorage::new();
        storage.put("spam.bin", &spam_ham().to_bytes().unwrap());

        let mut classifier = Classifier::default();
        assert!(classifier.load(&storage, "spam.bin").unwrap_err().is_invalid_model());
        assert!(classifier.load(&storage, "absent.model").unwrap_err().is_invalid_model());
        assert!(classifier.is_empty());
    }

    #[test]
    fn test_save_rejects_bad_name() {
        let storage = MemoryStorage::new();
        let err = spam_ham().save(&storage, "../escape").unwrap_err();
        assert!(matches!(err, SieveError::InvalidArgument(_)));
        assert_eq!(storage.file_count(), 0);
    }
}
