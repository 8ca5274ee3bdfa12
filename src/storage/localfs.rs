//! Local filesystem storage backend
//!
//! Also suitable for shared HPC filesystems: both atomicity contracts are
//! built on `rename(2)`, which is atomic on POSIX filesystems (including
//! the common NFS/Lustre deployments) as long as source and destination
//! live on the same mount. Staging areas are therefore always created
//! next to their final destination, never in a system temp directory.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use super::backend::{Result, StorageBackend, StorageError};

/// Local filesystem backend
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFsBackend;

impl LocalFsBackend {
    /// Create a new local filesystem backend.
    pub fn new() -> Self {
        Self
    }

    fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl StorageBackend for LocalFsBackend {
    fn exists(&self, path: &Path) -> Result<bool> {
        Ok(path.exists())
    }

    fn read_all(&self, path: &Path) -> Result<Vec<u8>> {
        match std::fs::read(path) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write_new(&self, path: &Path, data: &[u8]) -> Result<()> {
        Self::ensure_parent(path)?;
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(data)?;
        Ok(())
    }

    fn list_children(&self, path: &Path) -> Result<Vec<String>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn commit_directory(&self, staging: &Path, final_path: &Path) -> Result<()> {
        if final_path.exists() {
            return Err(StorageError::AlreadyExists(final_path.display().to_string()));
        }
        Self::ensure_parent(final_path)?;
        match std::fs::rename(staging, final_path) {
            Ok(()) => Ok(()),
            // Lost the race between the exists() check and the rename:
            // rename onto an occupied directory fails rather than merging.
            Err(e)
                if e.kind() == std::io::ErrorKind::AlreadyExists
                    || e.kind() == std::io::ErrorKind::DirectoryNotEmpty =>
            {
                Err(StorageError::AlreadyExists(final_path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        Self::ensure_parent(path)?;
        let parent = path
            .parent()
            .ok_or_else(|| StorageError::Backend(format!("path has no parent: {}", path.display())))?;
        // Temp file in the same directory so the final rename stays on one mount.
        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| StorageError::Io(e.error))?;
        Ok(())
    }

    fn append_line(&self, path: &Path, line: &[u8]) -> Result<()> {
        Self::ensure_parent(path)?;
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line);
        buf.push(b'\n');
        let mut file = OpenOptions::new().append(true).create(true).open(path)?;
        // One buffer, one write: O_APPEND keeps concurrent appenders from
        // interleaving within a line.
        file.write_all(&buf)?;
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(StorageError::NotFound(path.display().to_string()));
        }
        if path.is_dir() {
            std::fs::remove_dir_all(path)?;
        } else {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "localfs"
    }
}
