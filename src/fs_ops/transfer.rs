//! Batch copy/move of named files and directories.
//!
//! Directories are copied by walking the source tree, creating the directory
//! skeleton first and then copying files in parallel. A move tries a plain
//! rename first and falls back to copy + remove when that fails (for example
//! across filesystems).

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::sandbox::{RootContext, is_within, leaf_name, parent_relative, same_path, to_absolute};

use super::duplicate::{unique_directory_path, unique_file_path};
use super::helpers::io_error_with_help;
use super::io_copy::copy_file;
use super::tree::{TreeListing, walk_tree};

/// Per-batch counts. `skipped` covers missing sources and refused self-copies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransferSummary {
    pub transferred: usize,
    pub skipped: usize,
}

/// One copy/move request, already decoded.
#[derive(Debug, Clone, Copy)]
pub struct TransferRequest<'a> {
    pub source_path: &'a str,
    /// None means "one level up from `source_path`".
    pub target_path: Option<&'a str>,
    pub file_names: &'a [String],
    pub directory_names: &'a [String],
    pub move_entries: bool,
}

/// Copy or move every named entry from the source directory into the target.
/// Each entry lands under a collision-free name.
pub fn copy_or_move(root: &RootContext, req: &TransferRequest<'_>) -> Result<TransferSummary> {
    let source_base = to_absolute(req.source_path, root);
    let target_base = match req.target_path {
        Some(target) => to_absolute(target, root),
        None => to_absolute(&parent_relative(req.source_path), root),
    };
    fs::create_dir_all(&target_base).map_err(io_error_with_help("create target directory", &target_base))?;

    let verb = if req.move_entries { "move" } else { "copy" };
    let mut summary = TransferSummary::default();

    for name in req.directory_names {
        let Some(leaf) = leaf_name(name) else { continue };
        let src = source_base.join(&leaf);
        if !is_real_dir(&src) {
            debug!(path = %src.display(), "{verb}: source directory not found");
            summary.skipped += 1;
            continue;
        }
        if same_path(&src, &target_base.join(&leaf)) || is_within(&target_base, &src) {
            warn!(src = %src.display(), dest = %target_base.display(), "{verb}: refusing to place a directory inside itself");
            summary.skipped += 1;
            continue;
        }
        let dest = unique_directory_path(&target_base, &leaf);
        if req.move_entries {
            move_dir(&src, &dest)?;
        } else {
            copy_dir(&src, &dest)?;
            info!(src = %src.display(), dest = %dest.display(), "Copied directory");
        }
        summary.transferred += 1;
    }

    for name in req.file_names {
        let Some(leaf) = leaf_name(name) else { continue };
        let src = source_base.join(&leaf);
        if !is_real_file(&src) {
            debug!(path = %src.display(), "{verb}: source file not found");
            summary.skipped += 1;
            continue;
        }
        if same_path(&src, &target_base.join(&leaf)) {
            warn!(src = %src.display(), "{verb}: source and target are the same file");
            summary.skipped += 1;
            continue;
        }
        let dest = unique_file_path(&target_base, &leaf);
        if req.move_entries {
            move_file(&src, &dest)?;
        } else {
            copy_file(&src, &dest).map_err(io_error_with_help("copy file", &dest))?;
            info!(src = %src.display(), dest = %dest.display(), "Copied file");
        }
        summary.transferred += 1;
    }

    Ok(summary)
}

/// Recursively copy `src` into the not-yet-existing directory `dest`.
/// Symlinks inside the tree are skipped.
pub fn copy_dir(src: &Path, dest: &Path) -> Result<()> {
    let mut tree = TreeListing::default();
    walk_tree(src, &mut tree)?;

    fs::create_dir_all(dest).map_err(io_error_with_help("create directory", dest))?;
    for rel in &tree.dirs {
        let dir = dest.join(rel);
        fs::create_dir_all(&dir).map_err(io_error_with_help("create directory", &dir))?;
    }

    tree.files.par_iter().try_for_each(|rel: &PathBuf| -> Result<()> {
        let from = src.join(rel);
        let to = dest.join(rel);
        copy_file(&from, &to).map_err(io_error_with_help("copy file to destination", &to))?;
        Ok(())
    })
}

fn move_dir(src: &Path, dest: &Path) -> Result<()> {
    if fs::rename(src, dest).is_ok() {
        info!(src = %src.display(), dest = %dest.display(), "Renamed directory atomically");
        return Ok(());
    }
    copy_dir(src, dest)?;
    fs::remove_dir_all(src).map_err(io_error_with_help("remove source directory", src))?;
    info!(src = %src.display(), dest = %dest.display(), "Copied directory contents and removed source");
    Ok(())
}

fn move_file(src: &Path, dest: &Path) -> Result<()> {
    if fs::rename(src, dest).is_ok() {
        info!(src = %src.display(), dest = %dest.display(), "Moved file");
        return Ok(());
    }
    copy_file(src, dest).map_err(io_error_with_help("copy file to destination", dest))?;
    fs::remove_file(src).map_err(io_error_with_help("remove source file", src))?;
    info!(src = %src.display(), dest = %dest.display(), "Copied file and removed source");
    Ok(())
}

fn is_real_dir(path: &Path) -> bool {
    path.symlink_metadata().is_ok_and(|m| m.is_dir())
}

fn is_real_file(path: &Path) -> bool {
    path.symlink_metadata().is_ok_and(|m| m.is_file())
}
