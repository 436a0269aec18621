//! Core library for `webfm`.
//!
//! A sandboxed file manager gateway over a public web root:
//! - `codec`: opaque `b64:` tokens for paths and names arriving from callers
//! - `sandbox`: root selection and root-contained path resolution
//! - `fs_ops`: listing, create/rename/delete/upload, copy/move, zip/unzip
//! - `gateway`: the operation surface (sync and tokio-async) tying them together
//! - `config`: XML config, validation and reloadable snapshots
//!
//! Expected conditions (missing targets, blank names, escape attempts) are
//! reported as `bool`/`Option` results or fallbacks; `FileManagerError` is
//! reserved for real failures.

pub mod codec;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod gateway;
pub mod output;
pub mod sandbox;

pub use config::{Config, ConfigStore, LogLevel};
pub use errors::{FileManagerError, Result};
pub use fs_ops::{Entry, ExtractSummary};
pub use gateway::{AsyncFileManager, FileManager};
pub use sandbox::{RootContext, RootResolver};
