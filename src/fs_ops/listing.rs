//! Directory listing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::errors::Result;
use crate::sandbox::{RootContext, combine_relative, relative_of, to_absolute};

use super::helpers::io_error_with_help;

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub name: String,
    /// Forward-slash path relative to the active root.
    pub relative_path: String,
    pub is_directory: bool,
    /// Byte length; 0 for directories.
    pub size: u64,
    pub modified_utc: DateTime<Utc>,
    /// Public URL, files only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// List `path` under `root`. The directory is created when missing, so a
/// fresh root lists as empty.
pub fn list(root: &RootContext, path: &str) -> Result<Vec<Entry>> {
    let dir = to_absolute(path, root);
    let relative = relative_of(&dir, root);
    list_directory(&dir, &relative, root)
}

/// List the direct children of `dir`, creating it if missing.
///
/// `relative` is `dir`'s normalized path below `root`. Directories come first,
/// then names compare case-insensitively. Symlinks are described by their
/// target's metadata; dangling ones are left out.
pub fn list_directory(dir: &Path, relative: &str, root: &RootContext) -> Result<Vec<Entry>> {
    fs::create_dir_all(dir).map_err(io_error_with_help("create directory", dir))?;

    let mut entries = Vec::new();
    for item in fs::read_dir(dir).map_err(io_error_with_help("read directory", dir))? {
        let item = item.map_err(io_error_with_help("read directory entry", dir))?;
        let path = item.path();
        let meta = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let name = item.file_name().to_string_lossy().into_owned();
        let relative_path = combine_relative(relative, &name);
        let modified_utc = meta
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| DateTime::<Utc>::from(std::time::UNIX_EPOCH));

        let entry = if meta.is_dir() {
            Entry {
                name,
                relative_path,
                is_directory: true,
                size: 0,
                modified_utc,
                url: None,
            }
        } else {
            Entry {
                url: Some(root.file_url(&relative_path)),
                name,
                relative_path,
                is_directory: false,
                size: meta.len(),
                modified_utc,
            }
        };
        entries.push(entry);
    }

    entries.sort_by(compare_entries);
    Ok(entries)
}

fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    b.is_directory
        .cmp(&a.is_directory)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}
