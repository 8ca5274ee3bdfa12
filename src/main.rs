//! Registrar CLI
//!
//! Command-line front end for the registry engine.
//!
//! # Usage
//!
//! ```bash
//! # Register a trained model package
//! registrar register --task ct --model pbmc --version 2026-02-13_001 \
//!     --artifacts ./out --actor ci-bot
//!
//! # Resolve a reference to a local path
//! registrar resolve --task ct --ref pbmc@production
//!
//! # Promote a version
//! registrar promote --task ct --model pbmc --alias production \
//!     --version 2026-02-13_001 --actor alice --reason "passed eval"
//!
//! # Verify integrity
//! registrar verify --task ct --ref pbmc@production
//! ```

use clap::Parser;
use registrar::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
