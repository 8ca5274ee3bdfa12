//! Registrar: versioned model artifact registry
//!
//! Stores immutable, content-verified model packages under a
//! `tasks/<task>/models/<model>/versions/<version>` hierarchy, resolves
//! symbolic references (`model@alias_or_version`) to concrete versions,
//! and records governed promotion of versions through named stages with
//! an append-only audit trail.
//!
//! # Architecture
//!
//! - [`storage`] - backend trait with the atomicity primitives every
//!   invariant reduces to; local-filesystem and in-memory implementations
//! - [`integrity`] - SHA-256 manifest computation and verification
//! - [`registry`] - the engine: version store, alias resolver, promotion
//!   engine, audit log, and the [`registry::Registry`] facade
//! - [`config`] - explicit registry configuration and CLI argument types
//! - [`cli`] - thin command front end over the four engine operations
//!
//! # Example
//!
//! ```no_run
//! use registrar::config::RegistryConfig;
//! use registrar::registry::{load_artifact_dir, RegisterRequest, Registry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Registry::open(RegistryConfig::new("/srv/model-registry"));
//!
//! let artifacts = load_artifact_dir("/tmp/training-output".as_ref())?;
//! let req = RegisterRequest::new("cell-typing", "pbmc", "2026-02-13_001", artifacts)
//!     .with_actor("ci-bot")
//!     .with_alias("latest");
//! let registered = registry.register(&req)?;
//! println!("committed at {}", registered.path.display());
//!
//! registry.promote("cell-typing", "pbmc", "production", "2026-02-13_001",
//!     Some("alice"), Some("passed holdout eval"))?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod integrity;
pub mod registry;
pub mod storage;
