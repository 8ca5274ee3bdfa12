//! Registry configuration and CLI argument types
//!
//! The registry root is always explicit configuration: either a `--root`
//! flag or the `REGISTRAR_ROOT` environment variable, resolved once when
//! a command starts and passed into the engine. There is no process-wide
//! implicit default.

mod cli;

pub use cli::{
    parse_args, Cli, Command, ListArgs, LogArgs, OutputFormat, PromoteArgs, RegisterArgs,
    ResolveArgs, ShowArgs, VerifyArgs,
};

use std::path::{Path, PathBuf};

/// Environment variable naming the registry root.
pub const ROOT_ENV: &str = "REGISTRAR_ROOT";

/// Environment variable selecting the storage backend.
pub const BACKEND_ENV: &str = "REGISTRAR_BACKEND";

/// Environment variable toggling verification on every resolve.
pub const STRICT_VERIFY_ENV: &str = "REGISTRAR_STRICT_VERIFY";

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Local or shared filesystem
    #[default]
    LocalFs,
    /// In-memory (testing; state does not outlive the process)
    Memory,
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "localfs" | "local" | "fs" => Ok(BackendKind::LocalFs),
            "memory" | "mem" => Ok(BackendKind::Memory),
            _ => Err(format!("unknown backend {s:?}. Valid backends: localfs, memory")),
        }
    }
}

/// Explicit registry configuration
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Registry root location on the backend
    pub root: PathBuf,
    /// Which storage backend to use
    pub backend: BackendKind,
    /// Verify integrity on every resolve, not only when asked
    pub strict_verify: bool,
}

impl RegistryConfig {
    /// Configuration for a root with default backend and lazy verification.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), backend: BackendKind::default(), strict_verify: false }
    }

    /// Select the storage backend.
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Toggle verification on every resolve.
    pub fn with_strict_verify(mut self, strict: bool) -> Self {
        self.strict_verify = strict;
        self
    }

    /// Resolve configuration for the CLI: explicit `--root` wins, then the
    /// environment. Strict verification defaults on, matching the posture
    /// that a resolve handing a path to inference should hand a verified
    /// one; `REGISTRAR_STRICT_VERIFY=0` opts out.
    pub fn resolve(root_flag: Option<&Path>) -> Result<Self, String> {
        let root = match root_flag {
            Some(root) => root.to_path_buf(),
            None => match std::env::var(ROOT_ENV) {
                Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
                _ => {
                    return Err(format!(
                        "registry root not configured: pass --root or set {ROOT_ENV}"
                    ))
                }
            },
        };

        let backend = match std::env::var(BACKEND_ENV) {
            Ok(v) if !v.trim().is_empty() => v.trim().parse()?,
            _ => BackendKind::LocalFs,
        };

        let strict_verify = match std::env::var(STRICT_VERIFY_ENV) {
            Ok(v) => !matches!(v.trim(), "0" | "false" | "False" | "no"),
            Err(_) => true,
        };

        Ok(Self { root, backend, strict_verify })
    }
}
