//! CLI argument types - Cli, Command, and per-command arg structs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Registrar: versioned model artifact registry
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "registrar")]
#[command(version)]
#[command(about = "Versioned model artifact registry with integrity manifests and audited promotion")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Registry root (falls back to REGISTRAR_ROOT)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Register an artifact directory as a new immutable version
    Register(RegisterArgs),

    /// Resolve a model reference to its version directory
    Resolve(ResolveArgs),

    /// Show provenance metadata for a model reference
    Show(ShowArgs),

    /// Promote a version to an alias (staging, production, ...)
    Promote(PromoteArgs),

    /// Verify a version's integrity manifest
    Verify(VerifyArgs),

    /// List models, versions, or aliases
    List(ListArgs),

    /// Print a model's promotion audit log
    Log(LogArgs),
}

/// Arguments for the register command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct RegisterArgs {
    /// Task namespace
    #[arg(long)]
    pub task: String,

    /// Model name
    #[arg(long)]
    pub model: String,

    /// Version identifier (immutable)
    #[arg(long)]
    pub version: String,

    /// Directory containing the artifact files
    #[arg(long, value_name = "DIR")]
    pub artifacts: PathBuf,

    /// Alias to point at the new version (default: latest)
    #[arg(long, default_value = "latest")]
    pub set_alias: String,

    /// Skip setting any alias
    #[arg(long, conflicts_with = "set_alias")]
    pub no_alias: bool,

    /// Actor registering the model
    #[arg(long)]
    pub actor: Option<String>,

    /// Reason recorded on the alias promotion
    #[arg(long)]
    pub reason: Option<String>,

    /// Path to a JSON file with metadata to merge
    #[arg(long, value_name = "FILE")]
    pub metadata_json: Option<PathBuf>,

    /// Inline JSON object with metadata to merge
    #[arg(long, value_name = "JSON")]
    pub metadata_inline: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the resolve command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ResolveArgs {
    /// Task namespace
    #[arg(long)]
    pub task: String,

    /// Model reference: <model> or <model>@<alias_or_version>
    #[arg(long = "ref", value_name = "REF")]
    pub reference: String,

    /// Verify integrity even if strict verification is disabled
    #[arg(long)]
    pub verify: bool,
}

/// Arguments for the show command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ShowArgs {
    /// Task namespace
    #[arg(long)]
    pub task: String,

    /// Model reference: <model> or <model>@<alias_or_version>
    #[arg(long = "ref", value_name = "REF")]
    pub reference: String,

    /// Verify integrity before showing
    #[arg(long)]
    pub verify: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the promote command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct PromoteArgs {
    /// Task namespace
    #[arg(long)]
    pub task: String,

    /// Model name
    #[arg(long)]
    pub model: String,

    /// Alias to repoint (e.g. production)
    #[arg(long)]
    pub alias: String,

    /// Target version identifier
    #[arg(long)]
    pub version: String,

    /// Actor performing the promotion
    #[arg(long)]
    pub actor: Option<String>,

    /// Reason for the promotion
    #[arg(long)]
    pub reason: Option<String>,
}

/// Arguments for the verify command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct VerifyArgs {
    /// Task namespace
    #[arg(long)]
    pub task: String,

    /// Model reference: <model> or <model>@<alias_or_version>
    #[arg(long = "ref", value_name = "REF")]
    pub reference: String,
}

/// Arguments for the list command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ListArgs {
    /// Task namespace
    #[arg(long)]
    pub task: String,

    /// List versions and aliases of this model instead of model names
    #[arg(long)]
    pub model: Option<String>,
}

/// Arguments for the log command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct LogArgs {
    /// Task namespace
    #[arg(long)]
    pub task: String,

    /// Model name
    #[arg(long)]
    pub model: String,

    /// Print raw JSONL entries
    #[arg(long)]
    pub json: bool,
}

/// Output format for the show command
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {s}. Valid formats: text, json")),
        }
    }
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
