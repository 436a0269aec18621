//! Root selection.
//!
//! A root selector picks one directory under the public web root. Blank
//! selectors, selectors that escape the web root, and selectors naming something
//! that is not an existing directory all resolve to the default root, which is
//! created on demand. The fallback is ordinary control flow, not an error.
//!
//! Known limitation: because existing directories are accepted and missing ones
//! fall back, the selector can be used to probe whether a directory exists under
//! the web root.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::Result;
use crate::fs_ops::helpers::io_error_with_help;

use super::paths::{is_within, lexical_normalize, normalize_relative};

/// The active sandbox for one request: canonical base directory + public alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootContext {
    absolute_path: PathBuf,
    url_alias: String,
}

impl RootContext {
    /// Canonical absolute directory every resolved path must stay inside.
    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }

    /// Forward-slash path of the root relative to the web root, used in URLs.
    pub fn url_alias(&self) -> &str {
        &self.url_alias
    }

    /// Public URL of `relative` under this root.
    pub fn file_url(&self, relative: &str) -> String {
        let alias = self.url_alias.trim_matches('/');
        let rel = relative.replace('\\', "/");
        let rel = rel.trim_matches('/');
        match (alias.is_empty(), rel.is_empty()) {
            (true, true) => "/".to_string(),
            (true, false) => format!("/{rel}"),
            (false, true) => format!("/{alias}"),
            (false, false) => format!("/{alias}/{rel}"),
        }
    }
}

/// Maps decoded root selectors to [`RootContext`]s below the configured web root.
#[derive(Debug, Clone, Copy)]
pub struct RootResolver<'a> {
    web_root: &'a Path,
    default_root: &'a str,
    web_root_alias: &'a str,
}

impl<'a> RootResolver<'a> {
    /// `web_root` must already be canonical (see `Config::validate`).
    pub fn new(web_root: &'a Path, default_root: &'a str, web_root_alias: &'a str) -> Self {
        Self {
            web_root,
            default_root,
            web_root_alias,
        }
    }

    pub fn from_config(config: &'a Config) -> Self {
        Self::new(&config.web_root, &config.default_root, &config.web_root_alias)
    }

    /// Resolve an already-decoded selector. Only I/O failures while provisioning
    /// the default root are errors.
    pub fn resolve(&self, selector: &str) -> Result<RootContext> {
        let normalized = normalize_relative(selector);
        if normalized.is_empty() {
            return self.default_context();
        }

        let relative = self.strip_alias(&normalized);
        let mut candidate = self.web_root.to_path_buf();
        for segment in relative.split('/').filter(|s| !s.is_empty()) {
            candidate.push(segment);
        }
        let candidate = lexical_normalize(&candidate);

        let canonical = match dunce::canonicalize(&candidate) {
            Ok(p) => p,
            Err(e) => {
                debug!(selector = %normalized, error = %e, "root selector does not resolve; using default root");
                return self.default_context();
            }
        };

        if !is_within(&canonical, self.web_root) {
            warn!(selector = %normalized, resolved = %canonical.display(), "root selector escapes web root; using default root");
            return self.default_context();
        }
        if !canonical.is_dir() {
            debug!(selector = %normalized, "root selector is not a directory; using default root");
            return self.default_context();
        }

        Ok(RootContext {
            absolute_path: canonical,
            url_alias: relative.trim_matches('/').to_string(),
        })
    }

    /// The default root, created if it does not exist yet.
    pub fn default_context(&self) -> Result<RootContext> {
        let dir = self.web_root.join(self.default_root);
        fs::create_dir_all(&dir).map_err(io_error_with_help("create default root", &dir))?;
        let absolute_path =
            dunce::canonicalize(&dir).map_err(io_error_with_help("canonicalize default root", &dir))?;
        Ok(RootContext {
            absolute_path,
            url_alias: self.default_root.to_string(),
        })
    }

    /// Drop a leading web-root alias ("wwwroot" or "wwwroot/...").
    fn strip_alias<'s>(&self, selector: &'s str) -> &'s str {
        let alias = self.web_root_alias.trim_matches('/');
        if alias.is_empty() {
            return selector;
        }
        if selector.eq_ignore_ascii_case(alias) {
            return "";
        }
        match selector.get(..alias.len() + 1) {
            Some(head)
                if head.ends_with('/') && head[..alias.len()].eq_ignore_ascii_case(alias) =>
            {
                &selector[alias.len() + 1..]
            }
            _ => selector,
        }
    }
}
