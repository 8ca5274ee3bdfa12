//! Register command implementation - commit an artifact directory as a new version

use std::path::Path;

use serde_json::{json, Value};

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::RegisterArgs;
use crate::registry::{load_artifact_dir, RegisterRequest, Registry};

pub fn run_register(registry: &Registry, args: RegisterArgs, level: LogLevel) -> Result<(), String> {
    let artifacts = load_artifact_dir(&args.artifacts).map_err(|e| e.to_string())?;
    log(
        level,
        LogLevel::Verbose,
        &format!("  Staging {} artifact file(s) from {}", artifacts.len(), args.artifacts.display()),
    );

    let metadata = collect_metadata(&args)?;

    let mut req = RegisterRequest::new(&args.task, &args.model, &args.version, artifacts)
        .with_metadata(metadata);
    if !args.no_alias {
        req = req.with_alias(&args.set_alias);
    }
    if let Some(actor) = &args.actor {
        req = req.with_actor(actor);
    }
    if let Some(reason) = &args.reason {
        req = req.with_reason(reason);
    }

    let out = registry.register(&req).map_err(|e| e.to_string())?;

    if args.json {
        let result = json!({
            "task": args.task,
            "model": args.model,
            "version": out.version,
            "path": out.path,
            "manifest": out.manifest,
            "alias_set": out.alias_set,
        });
        log(level, LogLevel::Normal, &serde_json::to_string_pretty(&result).map_err(|e| e.to_string())?);
    } else {
        log(
            level,
            LogLevel::Normal,
            &format!("Registered: {}/{}/{}", args.task, args.model, out.version),
        );
        log(level, LogLevel::Normal, &format!("Path: {}", out.path.display()));
        for (name, digest) in &out.manifest {
            log(level, LogLevel::Verbose, &format!("  {digest}  {name}"));
        }
        if let Some(alias) = &out.alias_set {
            log(level, LogLevel::Normal, &format!("Alias set: {alias}"));
        }
    }
    Ok(())
}

/// Merge --metadata-json (file) then --metadata-inline (string), inline wins.
fn collect_metadata(args: &RegisterArgs) -> Result<serde_json::Map<String, Value>, String> {
    let mut metadata = serde_json::Map::new();
    if let Some(path) = &args.metadata_json {
        metadata.extend(read_json_object(path)?);
    }
    if let Some(inline) = &args.metadata_inline {
        let value: Value =
            serde_json::from_str(inline).map_err(|e| format!("--metadata-inline: {e}"))?;
        match value {
            Value::Object(map) => metadata.extend(map),
            _ => return Err("--metadata-inline must be a JSON object".to_string()),
        }
    }
    Ok(metadata)
}

fn read_json_object(path: &Path) -> Result<serde_json::Map<String, Value>, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("metadata file {}: {e}", path.display()))?;
    let value: Value =
        serde_json::from_str(&text).map_err(|e| format!("metadata file {}: {e}", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(format!("metadata file {} must hold a JSON object", path.display())),
    }
}
