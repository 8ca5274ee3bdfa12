//! Write-once version store
//!
//! Registration stages every artifact plus the engine-written provenance
//! and manifest files into a hidden staging directory next to the final
//! destination, then commits the whole set atomically. A version is either
//! fully visible or not visible at all, and once committed it never
//! changes: re-registering the same coordinates fails even when the
//! content is byte-identical.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::error::{RegistryError, Result};
use super::layout;
use super::metadata::VersionMetadata;
use super::refs::validate_identifier;
use crate::integrity::{self, FileSet, Manifest, Mismatch, MismatchKind, MANIFEST_FILE};
use crate::storage::{StorageBackend, StorageError};

/// Input to a registration
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    /// Task namespace
    pub task: String,
    /// Model name
    pub model: String,
    /// Immutable version identifier, unique within the model
    pub version: String,
    /// Artifact files to commit
    pub artifacts: FileSet,
    /// Caller-supplied open metadata, merged into `metadata.json`
    pub metadata: serde_json::Map<String, Value>,
    /// Alias to point at the new version afterwards (audited as a promotion)
    pub set_alias: Option<String>,
    /// Actor performing the registration
    pub actor: Option<String>,
    /// Reason recorded if an alias is set
    pub reason: Option<String>,
}

impl RegisterRequest {
    /// Create a request with required fields; alias defaults to none.
    pub fn new(task: &str, model: &str, version: &str, artifacts: FileSet) -> Self {
        Self {
            task: task.to_string(),
            model: model.to_string(),
            version: version.to_string(),
            artifacts,
            metadata: serde_json::Map::new(),
            set_alias: None,
            actor: None,
            reason: None,
        }
    }

    /// Set the alias to repoint after registration.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.set_alias = Some(alias.to_string());
        self
    }

    /// Set the acting identity.
    pub fn with_actor(mut self, actor: &str) -> Self {
        self.actor = Some(actor.to_string());
        self
    }

    /// Set the open metadata map.
    pub fn with_metadata(mut self, metadata: serde_json::Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set the reason recorded on the alias promotion.
    pub fn with_reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_string());
        self
    }
}

/// Outcome of a successful registration
#[derive(Debug, Clone)]
pub struct Registered {
    /// Committed version directory
    pub path: PathBuf,
    /// Version identifier
    pub version: String,
    /// Integrity manifest as committed
    pub manifest: Manifest,
    /// Alias set afterwards, if any
    pub alias_set: Option<String>,
}

fn validate_artifact_name(name: &str) -> Result<()> {
    validate_identifier("artifact", name)?;
    if name == MANIFEST_FILE || name == layout::METADATA_FILE {
        return Err(RegistryError::validation(
            "artifact",
            format!("{name:?} is written by the registry and cannot be supplied"),
        ));
    }
    Ok(())
}

/// Commit a new version. See module docs for the atomicity story.
pub fn register(
    backend: &dyn StorageBackend,
    root: &Path,
    req: &RegisterRequest,
) -> Result<Registered> {
    validate_identifier("task", &req.task)?;
    validate_identifier("model", &req.model)?;
    validate_identifier("version", &req.version)?;
    if req.artifacts.is_empty() {
        return Err(RegistryError::validation("artifacts", "at least one artifact file is required"));
    }
    for name in req.artifacts.keys() {
        validate_artifact_name(name)?;
    }

    let final_path = layout::version_dir(root, &req.task, &req.model, &req.version);
    // Fast-fail before staging anything; the commit below settles any race.
    if backend.exists(&final_path)? {
        return Err(already_exists(req));
    }

    let staging = staging_dir(root, req);
    let mut staged = req.artifacts.clone();
    let meta = VersionMetadata::from_open_map(
        &req.task,
        &req.model,
        &req.version,
        req.actor.as_deref(),
        req.metadata.clone(),
    );
    let meta_bytes = meta
        .to_json_bytes()
        .map_err(|e| StorageError::Backend(format!("metadata serialization: {e}")))?;
    staged.insert(layout::METADATA_FILE.to_string(), meta_bytes);

    let manifest = integrity::compute_manifest(&staged);
    staged.insert(MANIFEST_FILE.to_string(), integrity::render_manifest(&manifest).into_bytes());

    for (name, data) in &staged {
        backend.write_new(&staging.join(name), data)?;
    }

    match backend.commit_directory(&staging, &final_path) {
        Ok(()) => Ok(Registered {
            path: final_path,
            version: req.version.clone(),
            manifest,
            alias_set: None,
        }),
        Err(StorageError::AlreadyExists(_)) => {
            // Lost the commit race; discard our staging area.
            let _ = backend.remove(&staging);
            Err(already_exists(req))
        }
        Err(e) => Err(e.into()),
    }
}

fn already_exists(req: &RegisterRequest) -> RegistryError {
    RegistryError::AlreadyExists {
        task: req.task.clone(),
        model: req.model.clone(),
        version: req.version.clone(),
    }
}

fn staging_dir(root: &Path, req: &RegisterRequest) -> PathBuf {
    // Unique per attempt so concurrent registrations never share a staging area.
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let name = format!("{}{}-{}-{nanos}", layout::STAGING_PREFIX, req.version, std::process::id());
    layout::versions_root(root, &req.task, &req.model).join(name)
}

/// Path of an existing version directory, or `NotFound`.
pub fn version_path(
    backend: &dyn StorageBackend,
    root: &Path,
    task: &str,
    model: &str,
    version: &str,
) -> Result<PathBuf> {
    let path = layout::version_dir(root, task, model, version);
    if backend.exists(&path)? {
        Ok(path)
    } else {
        Err(RegistryError::not_found(task, format!("{model}@{version}")))
    }
}

/// Re-verify a committed version against its stored manifest.
///
/// Reads every file through the backend and returns all discrepancies; an
/// empty list means the version is intact. The version must exist.
pub fn verify_version(
    backend: &dyn StorageBackend,
    root: &Path,
    task: &str,
    model: &str,
    version: &str,
) -> Result<Vec<Mismatch>> {
    let dir = version_path(backend, root, task, model, version)?;

    let mut files = FileSet::new();
    for name in backend.list_children(&dir)? {
        if name == MANIFEST_FILE || name.starts_with('.') {
            continue;
        }
        files.insert(name.clone(), backend.read_all(&dir.join(name))?);
    }

    let manifest_raw = match backend.read_all(&dir.join(MANIFEST_FILE)) {
        Ok(raw) => raw,
        Err(StorageError::NotFound(_)) => {
            return Ok(vec![Mismatch {
                file: MANIFEST_FILE.to_string(),
                kind: MismatchKind::Missing,
            }]);
        }
        Err(e) => return Err(e.into()),
    };
    let manifest_text = match String::from_utf8(manifest_raw) {
        Ok(text) => text,
        Err(_) => {
            return Ok(vec![Mismatch {
                file: MANIFEST_FILE.to_string(),
                kind: MismatchKind::Malformed { detail: "manifest is not UTF-8".to_string() },
            }]);
        }
    };
    let manifest = match integrity::parse_manifest(&manifest_text) {
        Ok(manifest) => manifest,
        Err(detail) => {
            return Ok(vec![Mismatch {
                file: MANIFEST_FILE.to_string(),
                kind: MismatchKind::Malformed { detail },
            }]);
        }
    };

    Ok(integrity::verify_manifest(&files, &manifest))
}

/// Load an artifact directory from the local disk into a file set.
///
/// Front-end convenience for `register`: plain files only, hidden files
/// skipped, and the registry-written names (`metadata.json`,
/// `manifest.sha256`) ignored so a re-registered export does not collide
/// with the authoritative copies the engine writes.
pub fn load_artifact_dir(dir: &Path) -> Result<FileSet> {
    if !dir.is_dir() {
        return Err(RegistryError::validation(
            "artifacts",
            format!("not a directory: {}", dir.display()),
        ));
    }
    let mut files = FileSet::new();
    for entry in std::fs::read_dir(dir).map_err(StorageError::from)? {
        let entry = entry.map_err(StorageError::from)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with('.') || name == MANIFEST_FILE || name == layout::METADATA_FILE {
            continue;
        }
        files.insert(name.to_string(), std::fs::read(&path).map_err(StorageError::from)?);
    }
    if files.is_empty() {
        return Err(RegistryError::validation(
            "artifacts",
            format!("no artifact files in {}", dir.display()),
        ));
    }
    Ok(files)
}
