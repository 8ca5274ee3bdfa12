//! Registry directory layout
//!
//! Pure path construction for the on-backend convention, stable across all
//! backend implementations:
//!
//! ```text
//! tasks/<task>/models/<model>/
//!   versions/<version>/
//!     <artifact files...>
//!     manifest.sha256
//!     metadata.json
//!   aliases/<alias>.json
//!   audit/promotions.jsonl
//! ```

use std::path::{Path, PathBuf};

/// File name of the provenance metadata document inside a version directory.
pub const METADATA_FILE: &str = "metadata.json";

/// File name of the per-model promotion audit log.
pub const AUDIT_LOG_FILE: &str = "promotions.jsonl";

/// Prefix for staging directories awaiting an atomic commit.
pub const STAGING_PREFIX: &str = ".staging-";

pub fn task_root(root: &Path, task: &str) -> PathBuf {
    root.join("tasks").join(task)
}

pub fn models_root(root: &Path, task: &str) -> PathBuf {
    task_root(root, task).join("models")
}

pub fn model_root(root: &Path, task: &str, model: &str) -> PathBuf {
    models_root(root, task).join(model)
}

pub fn versions_root(root: &Path, task: &str, model: &str) -> PathBuf {
    model_root(root, task, model).join("versions")
}

pub fn version_dir(root: &Path, task: &str, model: &str, version: &str) -> PathBuf {
    versions_root(root, task, model).join(version)
}

pub fn aliases_root(root: &Path, task: &str, model: &str) -> PathBuf {
    model_root(root, task, model).join("aliases")
}

pub fn alias_path(root: &Path, task: &str, model: &str, alias: &str) -> PathBuf {
    aliases_root(root, task, model).join(format!("{alias}.json"))
}

/// Advisory lock file serializing promotions of one alias.
pub fn alias_lock_path(root: &Path, task: &str, model: &str, alias: &str) -> PathBuf {
    aliases_root(root, task, model).join(format!(".{alias}.lock"))
}

pub fn audit_root(root: &Path, task: &str, model: &str) -> PathBuf {
    model_root(root, task, model).join("audit")
}

pub fn audit_log_path(root: &Path, task: &str, model: &str) -> PathBuf {
    audit_root(root, task, model).join(AUDIT_LOG_FILE)
}
