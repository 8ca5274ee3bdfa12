//! Resolve command implementation - print the version directory for a reference

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::ResolveArgs;
use crate::registry::Registry;

pub fn run_resolve(registry: &Registry, args: ResolveArgs, level: LogLevel) -> Result<(), String> {
    let resolved = registry
        .resolve(&args.task, &args.reference, args.verify)
        .map_err(|e| e.to_string())?;

    if let Some(alias) = &resolved.via_alias {
        log(
            level,
            LogLevel::Verbose,
            &format!("  {} -> {} (via alias {alias})", args.reference, resolved.version),
        );
    }
    if resolved.verified {
        log(level, LogLevel::Verbose, "  Integrity verified");
    }
    // The path on stdout is the contract: scripts pipe it straight into loaders.
    log(level, LogLevel::Normal, &resolved.path.display().to_string());
    Ok(())
}
