//! Storage backends for the registry
//!
//! The registry engine talks to durable bytes only through the
//! [`StorageBackend`] trait; every invariant it needs is expressed as an
//! atomicity contract on that trait, so the same engine logic runs against
//! a local filesystem, a shared HPC filesystem, or an object store.
//!
//! # Components
//!
//! - [`backend`] - the `StorageBackend` trait and `StorageError`
//! - [`localfs`] - local/shared filesystem implementation (rename-based atomics)
//! - [`memory`] - in-memory implementation with object-store semantics

pub mod backend;
pub mod localfs;
pub mod memory;

pub use backend::{Result, StorageBackend, StorageError};
pub use localfs::LocalFsBackend;
pub use memory::InMemoryBackend;
