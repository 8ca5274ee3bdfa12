//! Verify command implementation - integrity check for a reference

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::VerifyArgs;
use crate::registry::Registry;

pub fn run_verify(registry: &Registry, args: VerifyArgs, level: LogLevel) -> Result<(), String> {
    let report = registry.verify(&args.task, &args.reference).map_err(|e| e.to_string())?;

    if report.ok() {
        log(
            level,
            LogLevel::Normal,
            &format!("OK: {}@{} is intact", args.reference, report.version),
        );
        return Ok(());
    }

    let mut message = format!(
        "Integrity verification FAILED for {} (version {}):",
        args.reference, report.version
    );
    for mismatch in &report.mismatches {
        message.push_str(&format!("\n  {mismatch}"));
    }
    Err(message)
}
