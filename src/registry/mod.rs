//! Registry engine
//!
//! The write-once version store, integrity layer, alias resolver,
//! promotion engine, and audit log behind one facade. All state lives on
//! the storage backend; a [`Registry`] holds only its configuration and a
//! backend handle, so any number of callers (threads, processes, service
//! instances) may operate on the same registry root concurrently.
//!
//! # Example
//!
//! ```
//! use registrar::config::RegistryConfig;
//! use registrar::integrity::FileSet;
//! use registrar::registry::{Registry, RegisterRequest};
//! use registrar::storage::InMemoryBackend;
//!
//! let config = RegistryConfig::new("/registry");
//! let registry = Registry::with_backend(config, Box::new(InMemoryBackend::new()));
//!
//! let files = FileSet::from([("model.bin".to_string(), b"weights".to_vec())]);
//! let req = RegisterRequest::new("ct", "pbmc", "v1", files).with_alias("latest");
//! registry.register(&req).expect("register");
//!
//! let resolved = registry.resolve("ct", "pbmc@latest", false).expect("resolve");
//! assert_eq!(resolved.version, "v1");
//! ```

mod alias;
mod audit;
mod error;
pub mod layout;
mod metadata;
mod promote;
mod refs;
mod store;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

pub use alias::{AliasFile, ResolvedVersion};
pub use audit::{AuditAction, AuditEntry};
pub use error::{RegistryError, Result};
pub use metadata::VersionMetadata;
pub use promote::Promoted;
pub use refs::{validate_identifier, ModelRef, DEFAULT_SELECTOR};
pub use store::{load_artifact_dir, RegisterRequest, Registered};

use crate::config::{BackendKind, RegistryConfig};
use crate::integrity::Mismatch;
use crate::storage::{InMemoryBackend, LocalFsBackend, StorageBackend, StorageError};

/// Outcome of resolving a reference through the facade
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Concrete version identifier
    pub version: String,
    /// Version directory on the backend
    pub path: PathBuf,
    /// Alias that was followed, if any
    pub via_alias: Option<String>,
    /// Whether the integrity manifest was re-verified during this resolve
    pub verified: bool,
}

/// Outcome of a verify operation
#[derive(Debug, Clone)]
pub struct VerifyReport {
    /// Concrete version that was checked
    pub version: String,
    /// Version directory on the backend
    pub path: PathBuf,
    /// Every discrepancy found; empty means intact
    pub mismatches: Vec<Mismatch>,
}

impl VerifyReport {
    /// Whether the version is intact.
    pub fn ok(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Registry engine facade
///
/// Stateless beyond configuration: every operation reads and writes
/// through the backend against the configured root.
pub struct Registry {
    config: RegistryConfig,
    backend: Box<dyn StorageBackend>,
}

impl Registry {
    /// Open a registry with the backend named by the configuration.
    pub fn open(config: RegistryConfig) -> Self {
        let backend: Box<dyn StorageBackend> = match config.backend {
            BackendKind::LocalFs => Box::new(LocalFsBackend::new()),
            BackendKind::Memory => Box::new(InMemoryBackend::new()),
        };
        Self { config, backend }
    }

    /// Open a registry over an explicit backend instance.
    pub fn with_backend(config: RegistryConfig, backend: Box<dyn StorageBackend>) -> Self {
        Self { config, backend }
    }

    /// Registry root location.
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// The storage backend in use.
    pub fn backend(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }

    /// Register a new immutable version; optionally repoint an alias at it.
    ///
    /// The alias update is an ordinary audited promotion. Duplicate
    /// `(task, model, version)` coordinates fail `AlreadyExists` with no
    /// mutation, even for byte-identical content.
    pub fn register(&self, req: &RegisterRequest) -> Result<Registered> {
        let mut out = store::register(self.backend.as_ref(), self.root(), req)?;
        if let Some(alias_name) = &req.set_alias {
            self.promote(
                &req.task,
                &req.model,
                alias_name,
                &req.version,
                req.actor.as_deref(),
                req.reason.as_deref().or(Some("register")),
            )?;
            out.alias_set = Some(alias_name.clone());
        }
        Ok(out)
    }

    /// Resolve `model` or `model@selector` to a concrete version.
    ///
    /// Verification runs when asked for, or always under
    /// `strict_verify`; a mismatch is surfaced as an `Integrity` error,
    /// never silently tolerated.
    pub fn resolve(&self, task: &str, reference: &str, verify: bool) -> Result<Resolved> {
        let mref = ModelRef::parse(reference)?;
        let resolved = alias::resolve(self.backend.as_ref(), self.root(), task, &mref)?;

        let verified = verify || self.config.strict_verify;
        if verified {
            let mismatches = store::verify_version(
                self.backend.as_ref(),
                self.root(),
                task,
                &mref.model,
                &resolved.version,
            )?;
            if !mismatches.is_empty() {
                return Err(RegistryError::Integrity {
                    task: task.to_string(),
                    model: mref.model,
                    version: resolved.version,
                    mismatches,
                });
            }
        }

        Ok(Resolved {
            version: resolved.version,
            path: resolved.path,
            via_alias: resolved.via_alias,
            verified,
        })
    }

    /// Resolve a reference and load its provenance metadata.
    pub fn show(&self, task: &str, reference: &str, verify: bool) -> Result<(Resolved, VersionMetadata)> {
        let resolved = self.resolve(task, reference, verify)?;
        let raw = self.backend.read_all(&resolved.path.join(layout::METADATA_FILE))?;
        let meta: VersionMetadata = serde_json::from_slice(&raw).map_err(|e| {
            StorageError::Backend(format!("malformed {}: {e}", layout::METADATA_FILE))
        })?;
        Ok((resolved, meta))
    }

    /// Atomically repoint an alias at an existing version, with audit.
    pub fn promote(
        &self,
        task: &str,
        model: &str,
        alias_name: &str,
        version: &str,
        actor: Option<&str>,
        reason: Option<&str>,
    ) -> Result<Promoted> {
        promote::promote(
            self.backend.as_ref(),
            self.root(),
            task,
            model,
            alias_name,
            version,
            actor,
            reason,
        )
    }

    /// Re-verify a referenced version against its stored manifest.
    pub fn verify(&self, task: &str, reference: &str) -> Result<VerifyReport> {
        let mref = ModelRef::parse(reference)?;
        let resolved = alias::resolve(self.backend.as_ref(), self.root(), task, &mref)?;
        let mismatches = store::verify_version(
            self.backend.as_ref(),
            self.root(),
            task,
            &mref.model,
            &resolved.version,
        )?;
        Ok(VerifyReport { version: resolved.version, path: resolved.path, mismatches })
    }

    /// Model names registered under a task, sorted. Unknown tasks are empty.
    pub fn list_models(&self, task: &str) -> Result<Vec<String>> {
        validate_identifier("task", task)?;
        let names = self.backend.list_children(&layout::models_root(self.root(), task))?;
        Ok(names.into_iter().filter(|n| !n.starts_with('.')).collect())
    }

    /// Version identifiers of a model, sorted. Staging leftovers are hidden.
    pub fn list_versions(&self, task: &str, model: &str) -> Result<Vec<String>> {
        validate_identifier("task", task)?;
        validate_identifier("model", model)?;
        let names = self.backend.list_children(&layout::versions_root(self.root(), task, model))?;
        Ok(names.into_iter().filter(|n| !n.starts_with('.')).collect())
    }

    /// Alias names of a model with their targets, sorted by name.
    pub fn list_aliases(&self, task: &str, model: &str) -> Result<Vec<(String, String)>> {
        validate_identifier("task", task)?;
        validate_identifier("model", model)?;
        let names = self.backend.list_children(&layout::aliases_root(self.root(), task, model))?;
        let mut aliases = Vec::new();
        for name in names {
            if name.starts_with('.') {
                continue;
            }
            let Some(alias_name) = name.strip_suffix(".json") else {
                continue;
            };
            if let Some(target) =
                alias::read_alias(self.backend.as_ref(), self.root(), task, model, alias_name)?
            {
                aliases.push((alias_name.to_string(), target));
            }
        }
        Ok(aliases)
    }

    /// A model's promotion history, oldest first.
    pub fn audit_log(&self, task: &str, model: &str) -> Result<Vec<AuditEntry>> {
        validate_identifier("task", task)?;
        validate_identifier("model", model)?;
        audit::read_all(self.backend.as_ref(), self.root(), task, model)
    }
}
