//! Promotion audit log
//!
//! One JSON object per line in `audit/promotions.jsonl`, appended on every
//! alias mutation and never edited or removed. Appends go through the
//! backend's single-write append primitive so concurrent promoters never
//! interleave partial lines.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::Result;
use super::layout;
use crate::storage::{StorageBackend, StorageError};

/// What an audit entry records about the alias
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// The alias did not exist before this promotion
    Create,
    /// The alias was repointed from a previous version
    Update,
}

/// Immutable record of one alias mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the promotion happened
    pub ts: DateTime<Utc>,
    /// Validated actor identity supplied by the caller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    /// Create or update
    pub action: AuditAction,
    /// Alias that was mutated
    pub alias: String,
    /// Previous target version, absent on first promotion
    #[serde(rename = "from", default, skip_serializing_if = "Option::is_none")]
    pub from_version: Option<String>,
    /// New target version
    #[serde(rename = "to")]
    pub to_version: String,
    /// Free-text reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AuditEntry {
    /// Build an entry for a promotion happening now.
    pub fn promotion(
        alias: &str,
        from_version: Option<&str>,
        to_version: &str,
        actor: Option<&str>,
        reason: Option<&str>,
    ) -> Self {
        Self {
            ts: Utc::now(),
            actor: actor.map(str::to_string),
            action: if from_version.is_some() { AuditAction::Update } else { AuditAction::Create },
            alias: alias.to_string(),
            from_version: from_version.map(str::to_string),
            to_version: to_version.to_string(),
            reason: reason.map(str::to_string),
        }
    }
}

/// Append one entry to a model's promotion log.
pub fn append(
    backend: &dyn StorageBackend,
    root: &Path,
    task: &str,
    model: &str,
    entry: &AuditEntry,
) -> Result<()> {
    let line = serde_json::to_string(entry)
        .map_err(|e| StorageError::Backend(format!("audit entry serialization: {e}")))?;
    backend.append_line(&layout::audit_log_path(root, task, model), line.as_bytes())?;
    Ok(())
}

/// Read a model's promotion log, oldest first.
///
/// An absent log is an empty history, not an error. A malformed line is a
/// storage error: the log is append-only, so corruption means the backend
/// broke its contract.
pub fn read_all(
    backend: &dyn StorageBackend,
    root: &Path,
    task: &str,
    model: &str,
) -> Result<Vec<AuditEntry>> {
    let path = layout::audit_log_path(root, task, model);
    let raw = match backend.read_all(&path) {
        Ok(raw) => raw,
        Err(StorageError::NotFound(_)) => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let text = String::from_utf8(raw)
        .map_err(|e| StorageError::Backend(format!("audit log is not UTF-8: {e}")))?;

    let mut entries = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let entry: AuditEntry = serde_json::from_str(line).map_err(|e| {
            StorageError::Backend(format!("malformed audit entry at line {}: {e}", idx + 1))
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryBackend;
    use std::path::PathBuf;

    #[test]
    fn test_append_then_read_oldest_first() {
        let backend = InMemoryBackend::new();
        let root = PathBuf::from("/r");

        let first = AuditEntry::promotion("latest", None, "v1", Some("alice"), Some("initial"));
        let second = AuditEntry::promotion("latest", Some("v1"), "v2", Some("bob"), None);
        append(&backend, &root, "ct", "pbmc", &first).expect("append");
        append(&backend, &root, "ct", "pbmc", &second).expect("append");

        let entries = read_all(&backend, &root, "ct", "pbmc").expect("read");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, AuditAction::Create);
        assert_eq!(entries[0].to_version, "v1");
        assert_eq!(entries[1].action, AuditAction::Update);
        assert_eq!(entries[1].from_version.as_deref(), Some("v1"));
    }

    #[test]
    fn test_missing_log_is_empty_history() {
        let backend = InMemoryBackend::new();
        let entries = read_all(&backend, &PathBuf::from("/r"), "ct", "pbmc").expect("read");
        assert!(entries.is_empty());
    }

    #[test]
    fn test_wire_field_names() {
        let entry = AuditEntry::promotion("production", Some("v1"), "v2", Some("alice"), Some("ok"));
        let json = serde_json::to_string(&entry).expect("serialize");
        assert!(json.contains("\"from\":\"v1\""));
        assert!(json.contains("\"to\":\"v2\""));
        assert!(json.contains("\"action\":\"update\""));
    }

    #[test]
    fn test_malformed_line_is_storage_error() {
        let backend = InMemoryBackend::new();
        let root = PathBuf::from("/r");
        backend
            .append_line(&layout::audit_log_path(&root, "ct", "pbmc"), b"not json")
            .expect("append");
        assert!(read_all(&backend, &root, "ct", "pbmc").is_err());
    }
}
