//! Alias resolution
//!
//! Maps a symbolic reference to a concrete version directory. Resolution
//! is read-only and lock-free: a concurrently repointed alias yields
//! either the old or the new target, never a torn read, guaranteed by the
//! backend's atomic-replace contract on alias files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{RegistryError, Result};
use super::layout;
use super::refs::ModelRef;
use super::store;
use crate::storage::{StorageBackend, StorageError};

/// On-backend representation of `aliases/<name>.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasFile {
    /// Target version identifier
    pub version: String,
}

/// Read an alias target, or `None` if the alias does not exist.
pub fn read_alias(
    backend: &dyn StorageBackend,
    root: &Path,
    task: &str,
    model: &str,
    alias: &str,
) -> Result<Option<String>> {
    let path = layout::alias_path(root, task, model, alias);
    let raw = match backend.read_all(&path) {
        Ok(raw) => raw,
        Err(StorageError::NotFound(_)) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let file: AliasFile = serde_json::from_slice(&raw)
        .map_err(|e| StorageError::Backend(format!("malformed alias file {}: {e}", path.display())))?;
    Ok(Some(file.version))
}

/// Outcome of resolving a reference
#[derive(Debug, Clone)]
pub struct ResolvedVersion {
    /// Concrete version identifier
    pub version: String,
    /// Version directory on the backend
    pub path: PathBuf,
    /// Alias that was followed, if the selector named one
    pub via_alias: Option<String>,
}

/// Resolve a parsed reference to an existing version.
///
/// The selector is tried as an alias first, then as a literal version
/// identifier. After following an alias the target's existence is
/// re-checked, so a stale alias (manual tampering, partial restore)
/// surfaces as `NotFound` rather than a dangling path.
pub fn resolve(
    backend: &dyn StorageBackend,
    root: &Path,
    task: &str,
    mref: &ModelRef,
) -> Result<ResolvedVersion> {
    if let Some(target) = read_alias(backend, root, task, &mref.model, &mref.selector)? {
        let path = store::version_path(backend, root, task, &mref.model, &target)
            .map_err(|_| stale_or_missing(task, mref, &target))?;
        return Ok(ResolvedVersion {
            version: target,
            path,
            via_alias: Some(mref.selector.clone()),
        });
    }

    match store::version_path(backend, root, task, &mref.model, &mref.selector) {
        Ok(path) => Ok(ResolvedVersion { version: mref.selector.clone(), path, via_alias: None }),
        Err(RegistryError::NotFound { .. }) => {
            Err(RegistryError::not_found(task, mref.to_string()))
        }
        Err(e) => Err(e),
    }
}

fn stale_or_missing(task: &str, mref: &ModelRef, target: &str) -> RegistryError {
    RegistryError::not_found(task, format!("{mref} (alias points at missing version {target})"))
}
