//! List command implementation - models, or versions and aliases of one model

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::ListArgs;
use crate::registry::Registry;

pub fn run_list(registry: &Registry, args: ListArgs, level: LogLevel) -> Result<(), String> {
    match &args.model {
        None => {
            let models = registry.list_models(&args.task).map_err(|e| e.to_string())?;
            if models.is_empty() {
                log(level, LogLevel::Normal, &format!("No models found for task '{}'", args.task));
                return Ok(());
            }
            for model in models {
                log(level, LogLevel::Normal, &model);
            }
        }
        Some(model) => {
            let versions = registry.list_versions(&args.task, model).map_err(|e| e.to_string())?;
            let aliases = registry.list_aliases(&args.task, model).map_err(|e| e.to_string())?;
            log(level, LogLevel::Normal, &format!("Versions of {}/{model}:", args.task));
            for version in versions {
                log(level, LogLevel::Normal, &format!("  {version}"));
            }
            if !aliases.is_empty() {
                log(level, LogLevel::Normal, "Aliases:");
                for (alias, target) in aliases {
                    log(level, LogLevel::Normal, &format!("  {alias} -> {target}"));
                }
            }
        }
    }
    Ok(())
}
