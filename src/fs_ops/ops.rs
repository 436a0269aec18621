//! Single-target file operations: create, delete, rename, upload, save.
//!
//! Every function receives the already resolved [`RootContext`] and decoded
//! relative paths. Missing targets and unusable names are reported through the
//! return value; only I/O failures are errors.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::sandbox::{RootContext, entry_path, is_within, leaf_name, same_path, to_absolute};

use super::duplicate::unique_file_path;
use super::helpers::io_error_with_help;
use super::io_copy::copy_stream;

/// Outcome of a batch delete.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeleteSummary {
    pub deleted: usize,
    pub missing: usize,
}

/// Create `name` (reduced to its leaf) inside `path`. Returns false for an
/// unusable name. Creating an existing folder is not an error.
pub fn create_folder(root: &RootContext, path: &str, name: &str) -> Result<bool> {
    let Some(leaf) = leaf_name(name) else {
        debug!(name, "create folder: empty name ignored");
        return Ok(false);
    };
    let dir = to_absolute(path, root).join(&leaf);
    fs::create_dir_all(&dir).map_err(io_error_with_help("create folder", &dir))?;
    info!(root = %root.absolute_path().display(), path = %dir.display(), "Created folder");
    Ok(true)
}

/// Delete the file or directory tree at `path`. Returns false when nothing of
/// the requested kind exists there. The root itself is never deleted, and a
/// symlink is removed as a link.
pub fn delete(root: &RootContext, path: &str, is_directory: bool) -> Result<bool> {
    let target = entry_path(path, root);
    if same_path(&target, root.absolute_path()) {
        warn!(path, "delete: refusing to delete the root directory");
        return Ok(false);
    }
    remove_entry(&target, is_directory)
}

/// Rename the entry at `path` to `new_name` within the same parent directory.
///
/// Returns false when the source is missing, the name is unusable, or `path`
/// resolves to the root. An existing sibling with the new name is never
/// replaced; that surfaces as an `AlreadyExists` I/O error.
pub fn rename(root: &RootContext, path: &str, new_name: &str, is_directory: bool) -> Result<bool> {
    let Some(leaf) = leaf_name(new_name) else {
        debug!(new_name, "rename: empty name ignored");
        return Ok(false);
    };
    let source = entry_path(path, root);
    if same_path(&source, root.absolute_path()) || !exists_as(&source, is_directory) {
        debug!(path, "rename: source not found");
        return Ok(false);
    }
    let Some(parent) = source.parent() else {
        return Ok(false);
    };
    let target = parent.join(&leaf);
    if target == source {
        return Ok(true);
    }
    // A case-only rename on a case-insensitive filesystem sees itself as the target.
    let is_self = dunce::canonicalize(&target).is_ok_and(|t| t == source);
    if target.symlink_metadata().is_ok() && !is_self {
        let e = io::Error::new(io::ErrorKind::AlreadyExists, "target name is taken");
        return Err(io_error_with_help("rename", &target)(e));
    }

    fs::rename(&source, &target).map_err(io_error_with_help("rename", &source))?;
    info!(src = %source.display(), dest = %target.display(), "Renamed");
    Ok(true)
}

/// Stream `content` into a new file named after `file_name` in `path`.
/// Never overwrites: a taken name gets a numeric suffix. Returns the written
/// path, or None for an unusable name.
pub fn upload<R: Read>(
    root: &RootContext,
    path: &str,
    file_name: &str,
    content: R,
) -> Result<Option<PathBuf>> {
    let Some(leaf) = leaf_name(file_name) else {
        debug!(file_name, "upload: empty file name ignored");
        return Ok(None);
    };
    let dir = to_absolute(path, root);
    fs::create_dir_all(&dir).map_err(io_error_with_help("create directory", &dir))?;

    let target = unique_file_path(&dir, &leaf);
    let bytes = copy_stream(content, &target).map_err(io_error_with_help("upload", &target))?;
    info!(dest = %target.display(), bytes, "Uploaded file");
    Ok(Some(target))
}

/// Delete named files and directories directly inside `path`. Each name is
/// reduced to its leaf first; missing entries are counted and skipped.
pub fn delete_multiple(
    root: &RootContext,
    path: &str,
    file_names: &[String],
    directory_names: &[String],
) -> Result<DeleteSummary> {
    let base = to_absolute(path, root);
    let mut summary = DeleteSummary::default();

    let requests = directory_names
        .iter()
        .map(|n| (n, true))
        .chain(file_names.iter().map(|n| (n, false)));
    for (name, is_directory) in requests {
        let Some(leaf) = leaf_name(name) else {
            continue;
        };
        let target = base.join(&leaf);
        if same_path(&target, root.absolute_path()) {
            warn!(name = %leaf, "delete: refusing to delete the root directory");
            continue;
        }
        if remove_entry(&target, is_directory)? {
            summary.deleted += 1;
        } else {
            summary.missing += 1;
        }
    }
    info!(base = %base.display(), deleted = summary.deleted, missing = summary.missing, "Batch delete finished");
    Ok(summary)
}

/// Write (or overwrite) a UTF-8 text file. Returns false for an unusable name.
pub fn save_text(root: &RootContext, path: &str, file_name: &str, content: &str) -> Result<bool> {
    let Some(leaf) = leaf_name(file_name) else {
        return Ok(false);
    };
    let dir = to_absolute(path, root);
    fs::create_dir_all(&dir).map_err(io_error_with_help("create directory", &dir))?;
    let target = dir.join(&leaf);
    if let Ok(meta) = target.symlink_metadata() {
        if meta.is_dir() {
            let e = io::Error::new(io::ErrorKind::AlreadyExists, "a directory has that name");
            return Err(io_error_with_help("save text", &target)(e));
        }
        // Writing follows links; only a link to a regular file inside the root is usable.
        if meta.file_type().is_symlink()
            && !dunce::canonicalize(&target).is_ok_and(|t| is_within(&t, root.absolute_path()) && t.is_file())
        {
            warn!(path = %target.display(), "save text: link target is outside root or not a file");
            return Ok(false);
        }
    }
    fs::write(&target, content).map_err(io_error_with_help("save text", &target))?;
    info!(dest = %target.display(), bytes = content.len(), "Saved text file");
    Ok(true)
}

/// Absolute path of an existing regular file `file_name` inside `path`.
pub fn read_path(root: &RootContext, path: &str, file_name: &str) -> Option<PathBuf> {
    let leaf = leaf_name(file_name)?;
    let dir = to_absolute(path, root);
    let candidate = dir.join(leaf);
    let resolved = match dunce::canonicalize(&candidate) {
        Ok(p) => p,
        Err(_) => return None,
    };
    if !is_within(&resolved, root.absolute_path()) {
        warn!(path = %candidate.display(), "read: target resolves outside root");
        return None;
    }
    resolved.is_file().then_some(resolved)
}

fn exists_as(path: &Path, is_directory: bool) -> bool {
    match path.symlink_metadata() {
        Ok(meta) if is_directory => meta.is_dir(),
        Ok(meta) => !meta.is_dir(),
        Err(_) => false,
    }
}

fn remove_entry(target: &Path, is_directory: bool) -> Result<bool> {
    if !exists_as(target, is_directory) {
        return Ok(false);
    }
    if is_directory {
        fs::remove_dir_all(target).map_err(io_error_with_help("delete directory", target))?;
    } else {
        fs::remove_file(target).map_err(io_error_with_help("delete file", target))?;
    }
    info!(path = %target.display(), is_directory, "Deleted");
    Ok(true)
}
