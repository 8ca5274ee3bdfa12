//! Log command implementation - print the promotion audit trail

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::LogArgs;
use crate::registry::Registry;

pub fn run_log(registry: &Registry, args: LogArgs, level: LogLevel) -> Result<(), String> {
    let entries = registry.audit_log(&args.task, &args.model).map_err(|e| e.to_string())?;

    if entries.is_empty() {
        log(
            level,
            LogLevel::Normal,
            &format!("No promotions recorded for {}/{}", args.task, args.model),
        );
        return Ok(());
    }

    for entry in entries {
        if args.json {
            log(
                level,
                LogLevel::Normal,
                &serde_json::to_string(&entry).map_err(|e| e.to_string())?,
            );
        } else {
            let actor = entry.actor.as_deref().unwrap_or("-");
            let from = entry.from_version.as_deref().unwrap_or("(none)");
            let reason = entry.reason.as_deref().unwrap_or("");
            log(
                level,
                LogLevel::Normal,
                &format!(
                    "{}  {}  {} {from} -> {}  {actor}  {reason}",
                    entry.ts.to_rfc3339(),
                    entry.alias,
                    match entry.action {
                        crate::registry::AuditAction::Create => "create",
                        crate::registry::AuditAction::Update => "update",
                    },
                    entry.to_version,
                ),
            );
        }
    }
    Ok(())
}
