//! Config snapshots with reload-on-change.
//!
//! A `ConfigStore` owns the config file location and hands out immutable
//! `Arc<Config>` snapshots. The file is re-read only when its modification time
//! differs from the one the cached snapshot was built from. Callers pass the
//! snapshot into the gateway explicitly; there is no process-wide instance.

use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info};

use crate::errors::Result;
use crate::fs_ops::helpers::io_error_with_help;

use super::types::Config;
use super::xml::load_config_file;

#[derive(Debug)]
struct Cached {
    modified: SystemTime,
    config: Arc<Config>,
}

#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    cached: Mutex<Option<Cached>>,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current validated snapshot, reloading if the file changed on disk.
    pub fn snapshot(&self) -> Result<Arc<Config>> {
        let modified = fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .map_err(io_error_with_help("stat config", &self.path))?;

        let mut cached = self.cached.lock();
        if let Some(c) = cached.as_ref()
            && c.modified == modified
        {
            debug!(path = %self.path.display(), "config unchanged; reusing snapshot");
            return Ok(Arc::clone(&c.config));
        }

        let config = Arc::new(load_config_file(&self.path)?.validated()?);
        info!(path = %self.path.display(), "config (re)loaded");
        *cached = Some(Cached {
            modified,
            config: Arc::clone(&config),
        });
        Ok(config)
    }
}
