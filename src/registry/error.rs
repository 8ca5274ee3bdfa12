//! Registry error taxonomy
//!
//! Structured errors carrying the identifiers they concern, so a front end
//! can map them to distinct outcomes (404 vs 409 vs 422 vs 500) without
//! string parsing.

use thiserror::Error;

use crate::integrity::Mismatch;
use crate::storage::StorageError;

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Malformed identifier or request input. Caller error, never retried.
    #[error("validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    /// Register of an already-committed version. Terminal: the caller must
    /// pick a new version identifier, even for byte-identical content.
    #[error("version already exists: {task}/{model}/{version}")]
    AlreadyExists { task: String, model: String, version: String },

    /// Unknown task, model, version, or alias.
    #[error("not found: task={task}, ref={reference}")]
    NotFound { task: String, reference: String },

    /// Stored bytes disagree with the integrity manifest. Signals tampering
    /// or corruption and is never silently tolerated.
    #[error("integrity failure for {task}/{model}/{version}: {}", format_mismatches(mismatches))]
    Integrity { task: String, model: String, version: String, mismatches: Vec<Mismatch> },

    /// Backend I/O failure, surfaced verbatim. May be transient; any retry
    /// policy belongs to the backend, not the engine.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

fn format_mismatches(mismatches: &[Mismatch]) -> String {
    mismatches.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

impl RegistryError {
    /// Build a validation error for a named field.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        RegistryError::Validation { field: field.to_string(), message: message.into() }
    }

    /// Build a not-found error for a reference within a task.
    pub fn not_found(task: &str, reference: impl Into<String>) -> Self {
        RegistryError::NotFound { task: task.to_string(), reference: reference.into() }
    }
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
