//! CLI command implementations

mod list;
mod log;
mod promote;
mod register;
mod resolve;
mod show;
mod verify;


use crate::cli::LogLevel;
use crate::config::{Cli, Command, RegistryConfig};
use crate::registry::Registry;

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    // Configure output based on verbose/quiet flags
    let log_level = if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    };

    let config = RegistryConfig::resolve(cli.root.as_deref())?;
    let registry = Registry::open(config);

    match cli.command {
        Command::Register(args) => register::run_register(&registry, args, log_level),
        Command::Resolve(args) => resolve::run_resolve(&registry, args, log_level),
        Command::Show(args) => show::run_show(&registry, args, log_level),
        Command::Promote(args) => promote::run_promote(&registry, args, log_level),
        Command::Verify(args) => verify::run_verify(&registry, args, log_level),
        Command::List(args) => list::run_list(&registry, args, log_level),
        Command::Log(args) => log::run_log(&registry, args, log_level),
    }
}
