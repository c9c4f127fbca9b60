use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, ErrorKind},
    path::PathBuf,
};

use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Browser-style local storage: string keys to string values, no expiry.
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Storage persisted as a pretty-printed JSON object. The whole file is
/// rewritten on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStorage {
    /// Opens `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let items = match File::open(&path) {
            Ok(file) => serde_json::from_reader(BufReader::new(file))?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no storage file yet");
                BTreeMap::new()
            }
            Err(err) => {
                error!("could not open storage file {}: {}", path.display(), err);
                return Err(err.into());
            }
        };
        Ok(FileStorage { path, items })
    }

    fn flush(&self) -> Result<(), StorageError> {
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.items)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_sets_and_removes() {
        let mut storage = MemoryStorage::new();
        storage.set_item("cookie_consent", "accepted").unwrap();
        assert_eq!(storage.get_item("cookie_consent").as_deref(), Some("accepted"));

        storage.remove_item("cookie_consent").unwrap();
        assert!(storage.get_item("cookie_consent").is_none());
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let mut storage = FileStorage::open(&path).unwrap();
        assert!(storage.get_item("cookie_consent").is_none());
        storage.set_item("cookie_consent", "rejected").unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get_item("cookie_consent").as_deref(), Some("rejected"));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "[1, 2").unwrap();

        assert!(matches!(
            FileStorage::open(&path),
            Err(StorageError::Corrupt(_))
        ));
    }
}
