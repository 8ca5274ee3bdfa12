//! In-memory storage backend
//!
//! A flat key space behind a single `RwLock`, keyed by full path. There are
//! no real directories: a path "exists" as a directory when any key lives
//! under it, which is exactly the object-store reading of the backend
//! contract. `commit_directory` re-keys a whole staging prefix under one
//! write lock, mirroring the marker-object commit an object store would
//! use. Used by unit tests and as the reference for the object-store
//! variant of the atomicity contracts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::backend::{Result, StorageBackend, StorageError};

/// In-memory backend storing files in a `BTreeMap`
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    files: RwLock<BTreeMap<PathBuf, Vec<u8>>>,
}

impl InMemoryBackend {
    /// Create an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned() -> StorageError {
        StorageError::Backend("in-memory store lock poisoned".to_string())
    }
}

impl StorageBackend for InMemoryBackend {
    fn exists(&self, path: &Path) -> Result<bool> {
        let files = self.files.read().map_err(|_| Self::lock_poisoned())?;
        Ok(files.contains_key(path) || files.keys().any(|k| k.starts_with(path) && k != path))
    }

    fn read_all(&self, path: &Path) -> Result<Vec<u8>> {
        let files = self.files.read().map_err(|_| Self::lock_poisoned())?;
        files
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.display().to_string()))
    }

    fn write_new(&self, path: &Path, data: &[u8]) -> Result<()> {
        let mut files = self.files.write().map_err(|_| Self::lock_poisoned())?;
        if files.contains_key(path) {
            return Err(StorageError::AlreadyExists(path.display().to_string()));
        }
        files.insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }

    fn list_children(&self, path: &Path) -> Result<Vec<String>> {
        let files = self.files.read().map_err(|_| Self::lock_poisoned())?;
        let mut names: Vec<String> = Vec::new();
        for key in files.keys() {
            if let Ok(rest) = key.strip_prefix(path) {
                if let Some(first) = rest.components().next() {
                    let name = first.as_os_str().to_string_lossy().to_string();
                    if names.last() != Some(&name) {
                        names.push(name);
                    }
                }
            }
        }
        // BTreeMap iteration is ordered, so names arrive sorted already.
        names.dedup();
        Ok(names)
    }

    fn commit_directory(&self, staging: &Path, final_path: &Path) -> Result<()> {
        let mut files = self.files.write().map_err(|_| Self::lock_poisoned())?;

        let staged: Vec<PathBuf> = files
            .keys()
            .filter(|k| k.starts_with(staging))
            .cloned()
            .collect();
        if staged.is_empty() {
            return Err(StorageError::NotFound(staging.display().to_string()));
        }
        if files.keys().any(|k| k.starts_with(final_path)) {
            return Err(StorageError::AlreadyExists(final_path.display().to_string()));
        }

        for key in staged {
            let data = files.remove(&key).unwrap_or_default();
            let rest = key
                .strip_prefix(staging)
                .map_err(|_| StorageError::Backend(format!("bad staging key: {}", key.display())))?
                .to_path_buf();
            files.insert(final_path.join(rest), data);
        }
        Ok(())
    }

    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        let mut files = self.files.write().map_err(|_| Self::lock_poisoned())?;
        files.insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }

    fn append_line(&self, path: &Path, line: &[u8]) -> Result<()> {
        let mut files = self.files.write().map_err(|_| Self::lock_poisoned())?;
        let entry = files.entry(path.to_path_buf()).or_default();
        entry.extend_from_slice(line);
        entry.push(b'\n');
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        let mut files = self.files.write().map_err(|_| Self::lock_poisoned())?;
        if files.remove(path).is_some() {
            return Ok(());
        }
        let nested: Vec<PathBuf> =
            files.keys().filter(|k| k.starts_with(path)).cloned().collect();
        if nested.is_empty() {
            return Err(StorageError::NotFound(path.display().to_string()));
        }
        for key in nested {
            files.remove(&key);
        }
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "memory"
    }
}
