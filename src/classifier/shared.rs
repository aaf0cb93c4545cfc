//! Thread-safe handle around one classifier.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::classifier::engine::Classifier;
use crate::classifier::model::ModelSnapshot;
use crate::classifier::scoring::LabelScore;
use crate::error::Result;
use crate::storage::Storage;

/// A cloneable, thread-safe handle to a single [`Classifier`].
///
/// Training, loading and resetting take the write lock; classifying,
/// snapshotting and saving take the read lock, so any number of queries run
/// in parallel between mutations. Clones share the same classifier.
#[derive(Debug, Clone)]
pub struct SharedClassifier {
    inner: Arc<RwLock<Classifier>>,
}

impl Default for SharedClassifier {
    fn default() -> Self {
        Self::new(Classifier::default())
    }
}

impl From<Classifier> for SharedClassifier {
    fn from(classifier: Classifier) -> Self {
        Self::new(classifier)
    }
}

impl SharedClassifier {
    /// Take ownership of `classifier`.
    pub fn new(classifier: Classifier) -> Self {
        SharedClassifier {
            inner: Arc::new(RwLock::new(classifier)),
        }
    }

    /// See [`Classifier::train`].
    pub fn train(&self, label: &str, text: &str) {
        self.inner.write().train(label, text);
    }

    /// Train a batch under a single write lock.
    pub fn train_all<I, L, T>(&self, samples: I)
    where
        I: IntoIterator<Item = (L, T)>,
        L: AsRef<str>,
        T: AsRef<str>,
    {
        self.inner.write().train_all(samples);
    }

    /// See [`Classifier::classify`].
    pub fn classify(&self, text: &str) -> Vec<LabelScore> {
        self.inner.read().classify(text)
    }

    /// See [`Classifier::reset`].
    pub fn reset(&self) {
        self.inner.write().reset();
    }

    /// See [`Classifier::snapshot`].
    pub fn snapshot(&self) -> ModelSnapshot {
        self.inner.read().snapshot()
    }

    /// See [`Classifier::restore`].
    pub fn restore(&self, snapshot: ModelSnapshot) -> Result<()> {
        self.inner.write().restore(snapshot)
    }

    /// See [`Classifier::save`].
    pub fn save(&self, storage: &dyn Storage, name: &str) -> Result<String> {
        self.inner.read().save(storage, name)
    }

    /// See [`Classifier::load`].
    pub fn load(&self, storage: &dyn Storage, file_name: &str) -> Result<()> {
        self.inner.write().load(storage, file_name)
    }

    /// See [`Classifier::save_to_dir`].
    pub fn save_to_dir<P: AsRef<Path>>(&self, dir: P, name: &str) -> Result<PathBuf> {
        self.inner.read().save_to_dir(dir, name)
    }

    /// See [`Classifier::load_from_path`].
    pub fn load_from_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.inner.write().load_from_path(path)
    }

    /// Run `f` with shared access to the classifier.
    pub fn with_read<R>(&self, f: impl FnOnce(&Classifier) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access to the classifier.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut Classifier) -> R) -> R {
        f(&mut self.inner.write())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_clones_share_state() {
        let shared = SharedClassifier::default();
        let other = shared.clone();

        shared.train("spam", "cheap pills");
        other.train("ham", "lunch");

        assert_eq!(shared.with_read(|c| c.total_documents()), 2);
        assert_eq!(other.classify("cheap")[0].label, "spam");
    }

    #[test]
    fn test_save_load_through_handle() {
        let storage = MemoryStorage::new();
        let shared = SharedClassifier::default();
        shared.train_all([("spam", "cheap pills"), ("ham", "lunch meeting")]);
        let file_name = shared.save(&storage, "mail").unwrap();

        let restored = SharedClassifier::default();
        restored.load(&storage, &file_name).unwrap();
        assert_eq!(restored.snapshot(), shared.snapshot());

        restored.reset();
        assert!(restored.classify("cheap").is_empty());
        assert!(restored.with_write(|c| c.is_empty()));
    }
}
