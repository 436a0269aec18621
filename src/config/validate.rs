//! Config validation logic.
//! Ensures the web root exists as a directory, canonicalizes it, and checks the
//! default-root name is a single usable leaf.

use std::fs;
use tracing::{error, info};

use crate::errors::{FileManagerError, Result};
use crate::fs_ops::helpers::io_error_with_help;
use crate::sandbox::leaf_name;

use super::types::Config;

impl Config {
    /// Validate and normalize in place. After this returns Ok, `web_root` is
    /// canonical and every containment check can compare against it directly.
    pub fn validate(&mut self) -> Result<()> {
        let web_root = &self.web_root;
        if web_root.exists() {
            if !web_root.is_dir() {
                error!("web_root exists but isn't a directory: {}", web_root.display());
                return Err(FileManagerError::Config(format!(
                    "web_root exists but isn't a directory: {}",
                    web_root.display()
                )));
            }
        } else {
            fs::create_dir_all(web_root).map_err(io_error_with_help("create web_root", web_root))?;
            info!("Created web_root directory: {}", web_root.display());
        }

        self.web_root = dunce::canonicalize(web_root)
            .map_err(io_error_with_help("canonicalize web_root", web_root))?;

        match leaf_name(&self.default_root) {
            Some(leaf) if leaf == self.default_root.trim() => {
                self.default_root = leaf;
            }
            _ => {
                return Err(FileManagerError::Config(format!(
                    "default_root must be a single directory name, got '{}'",
                    self.default_root
                )));
            }
        }
        self.web_root_alias = self.web_root_alias.trim().trim_matches('/').to_string();

        info!(
            web_root = %self.web_root.display(),
            default_root = %self.default_root,
            "Config validated"
        );
        Ok(())
    }

    /// Consume, validate and return the normalized config.
    pub fn validated(mut self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }
}
