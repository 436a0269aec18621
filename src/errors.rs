//! Typed error definitions for webfm.
//!
//! Only genuine failures live here. Missing targets, blank names and sandbox
//! escapes are normal outcomes of the gateway and are reported through
//! `bool`/`Option` return values or a fallback root instead.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = FileManagerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum FileManagerError {
    /// Permissions, disk errors and other OS-level failures.
    #[error("{op} '{}': {message}", path.display())]
    Io {
        op: String,
        path: PathBuf,
        message: String,
        #[source]
        source: io::Error,
    },

    /// The archive could not be read or written (corrupt, truncated, unsupported).
    #[error("archive '{}': {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    /// A blocking worker panicked or was cancelled before completing.
    #[error("file operation worker failed: {0}")]
    Worker(String),
}

impl FileManagerError {
    /// The underlying `io::ErrorKind`, when this is an I/O failure.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            FileManagerError::Io { source, .. } => Some(source.kind()),
            FileManagerError::Archive {
                source: zip::result::ZipError::Io(e),
                ..
            } => Some(e.kind()),
            _ => None,
        }
    }

    /// Short stable code for structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            FileManagerError::Io { .. } => "io_failure",
            FileManagerError::Archive { .. } => "archive_failure",
            FileManagerError::Config(_) => "config_invalid",
            FileManagerError::Worker(_) => "worker_failed",
        }
    }
}
