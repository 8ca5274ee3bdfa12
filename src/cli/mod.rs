//! CLI module for registrar
//!
//! Thin request-handling layer: each command parses its arguments, builds
//! a [`crate::config::RegistryConfig`], calls exactly one engine
//! operation, and prints the result. No business logic lives here.

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::LogLevel;

// Re-export Cli from config for convenience
pub use crate::config::Cli;
