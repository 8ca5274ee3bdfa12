//! Promotion engine
//!
//! Atomically repoints an alias at an existing version and appends one
//! audit entry. Promotions of the same `(task, model, alias)` are
//! serialized by an advisory lock file acquired with the backend's
//! create-new primitive, so the read-modify-write of the alias and its
//! audit append never interleave between concurrent promoters.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::alias::{self, AliasFile};
use super::audit::{self, AuditEntry};
use super::error::{RegistryError, Result};
use super::layout;
use super::refs::validate_identifier;
use super::store;
use crate::storage::{StorageBackend, StorageError};

const LOCK_ATTEMPTS: u32 = 20;
const LOCK_RETRY_BASE: Duration = Duration::from_millis(10);

/// Outcome of a successful promotion
#[derive(Debug, Clone)]
pub struct Promoted {
    /// Alias that was repointed
    pub alias: String,
    /// Previous target, absent on first promotion
    pub previous: Option<String>,
    /// New target
    pub new: String,
}

/// Advisory lock on one alias, released on drop.
struct AliasLock<'a> {
    backend: &'a dyn StorageBackend,
    path: PathBuf,
}

impl<'a> AliasLock<'a> {
    fn acquire(backend: &'a dyn StorageBackend, path: PathBuf) -> Result<Self> {
        for attempt in 0..LOCK_ATTEMPTS {
            match backend.write_new(&path, std::process::id().to_string().as_bytes()) {
                Ok(()) => return Ok(Self { backend, path }),
                Err(StorageError::AlreadyExists(_)) => {
                    std::thread::sleep(LOCK_RETRY_BASE * (attempt + 1));
                }
                Err(e) => return Err(e.into()),
            }
        }
        // A crashed promoter can leave the lock behind; cleanup is a
        // maintenance action, so name the file in the error.
        Err(RegistryError::Storage(StorageError::Backend(format!(
            "could not acquire promotion lock {} after {LOCK_ATTEMPTS} attempts",
            path.display()
        ))))
    }
}

impl Drop for AliasLock<'_> {
    fn drop(&mut self) {
        let _ = self.backend.remove(&self.path);
    }
}

/// Repoint `alias` at `version`, appending one audit entry.
///
/// Fails `NotFound` without touching the alias when the target version
/// does not exist. If the alias write succeeds but the audit append fails
/// even after a retry, the error is surfaced as `Storage` and the alias
/// write is deliberately not rolled back: the pointer is correct, the
/// governance record is what is missing.
#[allow(clippy::too_many_arguments)]
pub fn promote(
    backend: &dyn StorageBackend,
    root: &Path,
    task: &str,
    model: &str,
    alias_name: &str,
    version: &str,
    actor: Option<&str>,
    reason: Option<&str>,
) -> Result<Promoted> {
    validate_identifier("task", task)?;
    validate_identifier("model", model)?;
    validate_identifier("alias", alias_name)?;
    validate_identifier("version", version)?;

    // Precondition: never let an alias point at a missing version.
    store::version_path(backend, root, task, model, version)?;

    let _lock = AliasLock::acquire(backend, layout::alias_lock_path(root, task, model, alias_name))?;

    let previous = alias::read_alias(backend, root, task, model, alias_name)?;

    let file = AliasFile { version: version.to_string() };
    let bytes = serde_json::to_vec(&file)
        .map_err(|e| StorageError::Backend(format!("alias serialization: {e}")))?;
    backend.write_atomic(&layout::alias_path(root, task, model, alias_name), &bytes)?;

    let entry = AuditEntry::promotion(alias_name, previous.as_deref(), version, actor, reason);
    if audit::append(backend, root, task, model, &entry).is_err() {
        // An alias change without an audit trail is a governance violation;
        // give the append one more chance before surfacing the failure.
        audit::append(backend, root, task, model, &entry)?;
    }

    Ok(Promoted { alias: alias_name.to_string(), previous, new: version.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrity::FileSet;
    use crate::registry::audit::AuditAction;
    use crate::registry::refs::ModelRef;
    use crate::registry::store::RegisterRequest;
    use crate::storage::InMemoryBackend;

    fn setup_with_versions(versions: &[&str]) -> (InMemoryBackend, PathBuf) {
        let backend = InMemoryBackend::new();
        let root = PathBuf::from("/registry");
        for v in versions {
            let files = FileSet::from([("model.bin".to_string(), v.as_bytes().to_vec())]);
            store::register(&backend, &root, &RegisterRequest::new("ct", "pbmc", v, files))
                .expect("register");
        }
        (backend, root)
    }

    #[test]
    fn test_first_promotion_creates_alias_and_audit_entry() {
        let (backend, root) = setup_with_versions(&["v1"]);
        let out = promote(&backend, &root, "ct", "pbmc", "production", "v1", Some("alice"), Some("ok"))
            .expect("promote");
        assert_eq!(out.previous, None);
        assert_eq!(out.new, "v1");

        let mref = ModelRef::parse("pbmc@production").expect("parse");
        let resolved = alias::resolve(&backend, &root, "ct", &mref).expect("resolve");
        assert_eq!(resolved.version, "v1");

        let log = audit::read_all(&backend, &root, "ct", "pbmc").expect("audit");
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].action, AuditAction::Create);
        assert_eq!(log[0].to_version, "v1");
        assert_eq!(log[0].actor.as_deref(), Some("alice"));
    }

    #[test]
    fn test_repromotion_records_previous_target() {
        let (backend, root) = setup_with_versions(&["v1", "v2"]);
        promote(&backend, &root, "ct", "pbmc", "production", "v1", None, None).expect("first");
        let out =
            promote(&backend, &root, "ct", "pbmc", "production", "v2", None, None).expect("second");
        assert_eq!(out.previous.as_deref(), Some("v1"));

        let log = audit::read_all(&backend, &root, "ct", "pbmc").expect("audit");
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].action, AuditAction::Update);
        assert_eq!(log[1].from_version.as_deref(), Some("v1"));
        assert_eq!(log[1].to_version, "v2");
    }

    #[test]
    fn test_promoting_missing_version_changes_nothing() {
        let (backend, root) = setup_with_versions(&["v1"]);
        promote(&backend, &root, "ct", "pbmc", "production", "v1", None, None).expect("promote");

        let err = promote(&backend, &root, "ct", "pbmc", "production", "v-missing", None, None)
            .expect_err("missing target");
        assert!(matches!(err, RegistryError::NotFound { .. }));

        // Alias and audit log are untouched.
        let target = alias::read_alias(&backend, &root, "ct", "pbmc", "production").expect("read");
        assert_eq!(target.as_deref(), Some("v1"));
        assert_eq!(audit::read_all(&backend, &root, "ct", "pbmc").expect("audit").len(), 1);
    }

    #[test]
    fn test_lock_released_after_promotion() {
        let (backend, root) = setup_with_versions(&["v1"]);
        promote(&backend, &root, "ct", "pbmc", "latest", "v1", None, None).expect("promote");
        let lock = layout::alias_lock_path(&root, "ct", "pbmc", "latest");
        assert!(!backend.exists(&lock).expect("exists"));
        // A second promotion acquires the lock without contention.
        promote(&backend, &root, "ct", "pbmc", "latest", "v1", None, None).expect("again");
    }

    #[test]
    fn test_held_lock_blocks_promotion() {
        let (backend, root) = setup_with_versions(&["v1"]);
        let lock = layout::alias_lock_path(&root, "ct", "pbmc", "latest");
        backend.write_new(&lock, b"12345").expect("hold lock");

        let err = promote(&backend, &root, "ct", "pbmc", "latest", "v1", None, None)
            .expect_err("lock held elsewhere");
        assert!(matches!(err, RegistryError::Storage(_)));
        assert!(audit::read_all(&backend, &root, "ct", "pbmc").expect("audit").is_empty());
    }

    #[test]
    fn test_no_promotion_lattice_between_alias_names() {
        let (backend, root) = setup_with_versions(&["v1"]);
        // Straight to production without passing through staging.
        promote(&backend, &root, "ct", "pbmc", "production", "v1", None, None)
            .expect("direct promotion");
    }
}
