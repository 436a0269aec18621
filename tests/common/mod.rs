#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::{TempDir, tempdir};

use webfm::{Config, FileManager, RootContext, RootResolver};

/// A validated web root in a temp dir plus a gateway over it.
pub struct Fixture {
    _td: TempDir,
    pub web: PathBuf,
    pub fm: FileManager,
}

impl Fixture {
    pub fn new() -> Self {
        let td = tempdir().unwrap();
        let cfg = Config::new(td.path().join("www")).validated().unwrap();
        let web = cfg.web_root.clone();
        Self {
            _td: td,
            web,
            fm: FileManager::new(Arc::new(cfg)),
        }
    }

    /// The auto-provisioned default root (created on first use).
    pub fn default_root(&self) -> PathBuf {
        self.web.join("UserFiles")
    }

    pub fn context(&self) -> RootContext {
        RootResolver::from_config(self.fm.config()).resolve("").unwrap()
    }

    pub fn write(&self, rel: &str, data: &[u8]) -> PathBuf {
        let p = self.default_root().join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(&p, data).unwrap();
        p
    }

    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let p = self.default_root().join(rel);
        fs::create_dir_all(&p).unwrap();
        p
    }
}

/// Sorted forward-slash paths of all files below `dir`.
pub fn files_below(dir: &Path) -> Vec<String> {
    let mut out: Vec<String> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(dir)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    out.sort();
    out
}

pub fn names(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}
