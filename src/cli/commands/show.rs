//! Show command implementation - print provenance metadata for a reference

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{OutputFormat, ShowArgs};
use crate::registry::Registry;

pub fn run_show(registry: &Registry, args: ShowArgs, level: LogLevel) -> Result<(), String> {
    let (resolved, meta) = registry
        .show(&args.task, &args.reference, args.verify)
        .map_err(|e| e.to_string())?;

    match args.format {
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(&meta).map_err(|e| e.to_string())?;
            log(level, LogLevel::Normal, &text);
        }
        OutputFormat::Text => {
            log(level, LogLevel::Normal, &format!("Task:     {}", meta.task));
            log(level, LogLevel::Normal, &format!("Model:    {}", meta.model));
            log(level, LogLevel::Normal, &format!("Version:  {}", meta.version));
            log(level, LogLevel::Normal, &format!("Created:  {}", meta.created_at.to_rfc3339()));
            if let Some(creator) = &meta.creator {
                log(level, LogLevel::Normal, &format!("Creator:  {creator}"));
            }
            if let Some(code_ref) = &meta.training_code_ref {
                log(level, LogLevel::Normal, &format!("Code:     {code_ref}"));
            }
            if let Some(dataset) = &meta.dataset_ref {
                log(level, LogLevel::Normal, &format!("Dataset:  {dataset}"));
            }
            for (key, value) in &meta.extra {
                log(level, LogLevel::Verbose, &format!("  {key}: {value}"));
            }
            log(level, LogLevel::Normal, &format!("Path:     {}", resolved.path.display()));
        }
    }
    Ok(())
}
