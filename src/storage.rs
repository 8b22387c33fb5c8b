//! Durable key/value storage for small string payloads.
//!
//! Plays the part a browser's `localStorage` would: string values under
//! string keys, read at startup and rewritten whole on every change.  The
//! file-backed store keeps one `{key}.json` file per key inside a data
//! directory.

#[cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::Result;

/// A synchronous string store.
pub trait Storage {
    /// Read the value under `key`.  A missing key is `Ok(None)`.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as `{dir}/{key}.json`.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        // Write then rename so a crash never leaves a half-written file.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory storage; nothing survives the process.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.get_item("wishlist").unwrap().is_none());
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested"));
        storage.set_item("wishlist", r#"["1","4"]"#).unwrap();

        let reopened = FileStorage::new(dir.path().join("nested"));
        assert_eq!(
            reopened.get_item("wishlist").unwrap().as_deref(),
            Some(r#"["1","4"]"#)
        );
        assert!(dir.path().join("nested/wishlist.json").exists());
    }

    #[test]
    fn set_item_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());
        storage.set_item("k", "a").unwrap();
        storage.set_item("k", "b").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn memory_storage_round_trips() {
        let mut storage = MemoryStorage::new();
        assert!(storage.get_item("k").unwrap().is_none());
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
    }
}
