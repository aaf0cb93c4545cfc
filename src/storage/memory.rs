//! In-memory storage implementation for testing and caching.

use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::storage::traits::{Storage, StorageError, StorageInput, StorageOutput};

type FileMap = Arc<Mutex<HashMap<String, Box<[u8]>>>>;

/// An in-memory storage implementation.
///
/// Cloning shares the underlying files.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: FileMap,
}

impl MemoryStorage {
    /// Create a new, empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of files stored.
    pub fn file_count(&self) -> usize {
        self.files.lock().len()
    }

    /// Replace the content of a file directly.
    pub fn put(&self, name: &str, data: &[u8]) {
        self.files
            .lock()
            .insert(name.to_string(), data.to_vec().into_boxed_slice());
    }

    /// Get a copy of the content of a file.
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.files.lock().get(name).map(|data| data.to_vec())
    }
}

impl Storage for MemoryStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        let files = self.files.lock();
        let data = files
            .get(name)
            .ok_or_else(|| StorageError::FileNotFound(name.to_string()))?;

        Ok(Box::new(MemoryInput::new(data.to_vec())))
    }

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        Ok(Box::new(MemoryOutput::new(
            name.to_string(),
            Arc::clone(&self.files),
        )))
    }

    fn file_exists(&self, name: &str) -> bool {
        self.files.lock().contains_key(name)
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        self.files.lock().remove(name);
        Ok(())
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let mut file_names: Vec<String> = self.files.lock().keys().cloned().collect();
        file_names.sort();
        Ok(file_names)
    }

    fn file_size(&self, name: &str) -> Result<u64> {
        let files = self.files.lock();
        let data = files
            .get(name)
            .ok_or_else(|| StorageError::FileNotFound(name.to_string()))?;

        Ok(data.len() as u64)
    }

    fn sync(&self) -> Result<()> {
        Ok(())
    }
}

/// A memory-based input implementation.
#[derive(Debug)]
pub struct MemoryInput {
    cursor: Cursor<Vec<u8>>,
    size: u64,
}

impl MemoryInput {
    fn new(data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        MemoryInput {
            cursor: Cursor::new(data),
            size,
        }
    }
}

impl Read for MemoryInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl StorageInput for MemoryInput {
    fn size(&self) -> Result<u64> {
        Ok(self.size)
    }
}

/// A memory-based output implementation. The buffer is published to the
/// file map on close or drop.
#[derive(Debug)]
pub struct MemoryOutput {
    name: String,
    buffer: Vec<u8>,
    files: FileMap,
    closed: bool,
}

impl MemoryOutput {
    fn new(name: String, files: FileMap) -> Self {
        MemoryOutput {
            name,
            buffer: Vec::new(),
            files,
            closed: false,
        }
    }
}

impl Write for MemoryOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.closed {
            return Err(std::io::Error::other("Output is closed"));
        }

        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl StorageOutput for MemoryOutput {
    fn flush_and_sync(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.files.lock().insert(
                self.name.clone(),
                std::mem::take(&mut self.buffer).into_boxed_slice(),
            );
            self.closed = true;
        }
        Ok(())
    }
}

impl Drop for MemoryOutput {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let storage = MemoryStorage::new();

        let mut output = storage.create_output("a.model").unwrap();
        output.write_all(b"abc").unwrap();
        assert!(!storage.file_exists("a.model"));
        output.close().unwrap();

        assert!(storage.file_exists("a.model"));
        assert_eq!(storage.file_size("a.model").unwrap(), 3);

        let mut input = storage.open_input("a.model").unwrap();
        assert_eq!(input.size().unwrap(), 3);
        assert_eq!(input.read_all().unwrap(), b"abc");
    }

    #[test]
    fn test_drop_publishes() {
        let storage = MemoryStorage::new();
        {
            let mut output = storage.create_output("b.model").unwrap();
            output.write_all(b"xyz").unwrap();
        }
        assert_eq!(storage.get("b.model").unwrap(), b"xyz");
    }

    #[test]
    fn test_list_and_delete() {
        let storage = MemoryStorage::new();
        storage.put("z.model", b"1");
        storage.put("a.model", b"2");

        assert_eq!(storage.list_files().unwrap(), vec!["a.model", "z.model"]);
        assert_eq!(storage.file_count(), 2);

        storage.delete_file("z.model").unwrap();
        storage.delete_file("missing").unwrap();
        assert_eq!(storage.list_files().unwrap(), vec!["a.model"]);
    }

    #[test]
    fn test_clone_shares_files() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.put("shared.model", b"data");
        assert!(other.file_exists("shared.model"));
    }

    #[test]
    fn test_missing_file() {
        let storage = MemoryStorage::new();
        assert!(storage.open_input("nope.model").is_err());
        assert!(storage.file_size("nope.model").is_err());
    }
}
