//! Promote command implementation - repoint an alias with audit

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::PromoteArgs;
use crate::registry::Registry;

pub fn run_promote(registry: &Registry, args: PromoteArgs, level: LogLevel) -> Result<(), String> {
    let out = registry
        .promote(
            &args.task,
            &args.model,
            &args.alias,
            &args.version,
            args.actor.as_deref(),
            args.reason.as_deref(),
        )
        .map_err(|e| e.to_string())?;

    match &out.previous {
        Some(previous) => log(
            level,
            LogLevel::Normal,
            &format!("Promoted {}@{} -> {} (was {previous})", args.model, out.new, out.alias),
        ),
        None => log(
            level,
            LogLevel::Normal,
            &format!("Promoted {}@{} -> {} (new alias)", args.model, out.new, out.alias),
        ),
    }
    Ok(())
}
