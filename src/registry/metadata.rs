//! Version provenance metadata
//!
//! A small set of well-known typed fields plus an open extension map for
//! framework-specific keys, serialized as `metadata.json` inside the
//! version directory. The engine stamps the authoritative coordinates
//! (task, model, version, creation time); callers cannot override them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Provenance metadata for a registered version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionMetadata {
    /// Task namespace
    pub task: String,
    /// Model name
    pub model: String,
    /// Version identifier
    pub version: String,
    /// When the version was registered
    pub created_at: DateTime<Utc>,
    /// Who registered it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    /// Reference to the training code (e.g. a git commit)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_code_ref: Option<String>,
    /// Reference to the training dataset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_ref: Option<String>,
    /// Hyperparameters used for training
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hyperparameters: BTreeMap<String, Value>,
    /// Open extension map for framework-specific fields
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl VersionMetadata {
    /// Create metadata with just the engine-stamped coordinates.
    pub fn new(task: &str, model: &str, version: &str) -> Self {
        Self {
            task: task.to_string(),
            model: model.to_string(),
            version: version.to_string(),
            created_at: Utc::now(),
            creator: None,
            training_code_ref: None,
            dataset_ref: None,
            hyperparameters: BTreeMap::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Build metadata from a caller-supplied open map.
    ///
    /// Well-known keys are lifted into typed fields when their shape fits
    /// (strings for refs, an object for hyperparameters); everything else
    /// lands in `extra`. Coordinates and `created_at` come from the engine
    /// regardless of what the map says.
    pub fn from_open_map(
        task: &str,
        model: &str,
        version: &str,
        actor: Option<&str>,
        map: serde_json::Map<String, Value>,
    ) -> Self {
        let mut meta = Self::new(task, model, version);
        meta.creator = actor.map(str::to_string);

        for (key, value) in map {
            match (key.as_str(), value) {
                ("task" | "model" | "version" | "created_at", _) => {}
                ("creator", Value::String(s)) => meta.creator = Some(s),
                ("training_code_ref", Value::String(s)) => meta.training_code_ref = Some(s),
                ("dataset_ref", Value::String(s)) => meta.dataset_ref = Some(s),
                ("hyperparameters", Value::Object(obj)) => {
                    meta.hyperparameters = obj.into_iter().collect();
                }
                (_, value) => {
                    meta.extra.insert(key, value);
                }
            }
        }
        meta
    }

    /// Set the creator.
    pub fn with_creator(mut self, creator: &str) -> Self {
        self.creator = Some(creator.to_string());
        self
    }

    /// Add an extension field.
    pub fn with_extra(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    /// Serialize to the on-backend `metadata.json` representation.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_open_map_lifts_known_fields() {
        let map = json!({
            "creator": "ci-bot",
            "training_code_ref": "git:abc123",
            "hyperparameters": {"lr": 0.001},
            "framework": "torch",
            "task": "attacker-controlled",
        });
        let Value::Object(map) = map else { unreachable!() };
        let meta = VersionMetadata::from_open_map("ct", "pbmc", "v1", None, map);

        assert_eq!(meta.task, "ct");
        assert_eq!(meta.creator.as_deref(), Some("ci-bot"));
        assert_eq!(meta.training_code_ref.as_deref(), Some("git:abc123"));
        assert_eq!(meta.hyperparameters.get("lr"), Some(&json!(0.001)));
        assert_eq!(meta.extra.get("framework"), Some(&json!("torch")));
        assert!(!meta.extra.contains_key("task"));
    }

    #[test]
    fn test_actor_is_default_creator() {
        let meta =
            VersionMetadata::from_open_map("ct", "pbmc", "v1", Some("alice"), serde_json::Map::new());
        assert_eq!(meta.creator.as_deref(), Some("alice"));
    }

    #[test]
    fn test_explicit_creator_wins_over_actor() {
        let map = json!({"creator": "trainer"});
        let Value::Object(map) = map else { unreachable!() };
        let meta = VersionMetadata::from_open_map("ct", "pbmc", "v1", Some("alice"), map);
        assert_eq!(meta.creator.as_deref(), Some("trainer"));
    }

    #[test]
    fn test_json_roundtrip_preserves_extra() {
        let meta = VersionMetadata::new("ct", "pbmc", "v1")
            .with_creator("alice")
            .with_extra("framework", json!("torch"));
        let bytes = meta.to_json_bytes().expect("serialize");
        let back: VersionMetadata = serde_json::from_slice(&bytes).expect("deserialize");
        assert_eq!(back.version, "v1");
        assert_eq!(back.extra.get("framework"), Some(&json!("torch")));
    }
}
