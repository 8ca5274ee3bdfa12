//! Storage backend trait and error types
//!
//! Every higher-level registry invariant (write-once versions, no partially
//! visible registrations, no torn alias reads) reduces to the atomicity
//! contracts on this trait. Backends address a hierarchical namespace by
//! path; a "directory" is whatever grouping the backend uses for child
//! listing (real directories on a filesystem, key prefixes on an object
//! store).

use std::path::Path;

use thiserror::Error;

/// Errors from storage backend operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path already exists: {0}")]
    AlreadyExists(String),

    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Trait for registry storage backends
///
/// Implementations must uphold two atomicity contracts:
///
/// - [`commit_directory`](StorageBackend::commit_directory) makes a fully
///   written staging area visible at the final path in one step, or fails
///   with [`StorageError::AlreadyExists`] leaving the final path untouched.
///   Object stores satisfy this with a marker object written last and
///   treated as the existence signal.
/// - [`write_atomic`](StorageBackend::write_atomic) replaces a single file
///   such that a concurrent reader sees either the old bytes or the new
///   bytes, never a partial write.
pub trait StorageBackend: Send + Sync {
    /// Check whether a path holds content (file) or children (directory).
    fn exists(&self, path: &Path) -> Result<bool>;

    /// Read the full content of a file.
    fn read_all(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write a file that must not already exist.
    ///
    /// Fails with [`StorageError::AlreadyExists`] instead of overwriting.
    /// On the local filesystem this is `O_CREAT|O_EXCL`, which also makes it
    /// usable as an advisory lock acquisition.
    fn write_new(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// List immediate child names under a path, sorted.
    ///
    /// An absent path yields an empty list, not an error.
    fn list_children(&self, path: &Path) -> Result<Vec<String>>;

    /// Atomically make a fully written staging area visible at `final_path`.
    ///
    /// Fails with [`StorageError::AlreadyExists`] if `final_path` is already
    /// occupied; in that case nothing becomes visible and the staging area
    /// is left for the caller to discard.
    fn commit_directory(&self, staging: &Path, final_path: &Path) -> Result<()>;

    /// Atomically write or replace a single file.
    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Append one line to a file, creating it if absent.
    ///
    /// The line (including its trailing newline) is issued as a single
    /// write so concurrent appenders never interleave partial lines.
    fn append_line(&self, path: &Path, line: &[u8]) -> Result<()>;

    /// Remove a file or directory tree.
    ///
    /// Used to release lock files acquired via
    /// [`write_new`](StorageBackend::write_new) and to discard staging
    /// areas that lost a commit race.
    fn remove(&self, path: &Path) -> Result<()>;

    /// Backend type name for diagnostics.
    fn backend_type(&self) -> &'static str;
}
