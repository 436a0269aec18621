//! Iterative directory-tree traversal.
//!
//! `walk_tree` drives a [`TreeVisitor`] over everything below a directory using
//! `walkdir`, which keeps its own explicit stack so deep trees do not grow the
//! call stack. Parents are always visited before their children. Symbolic links
//! are neither followed nor reported.

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::errors::{FileManagerError, Result};

/// Callbacks for one traversal. `relative` is the entry's path below the walked
/// directory; `absolute` is where it lives on disk.
pub trait TreeVisitor {
    fn visit_dir(&mut self, relative: &Path, absolute: &Path) -> Result<()>;
    fn visit_file(&mut self, relative: &Path, absolute: &Path) -> Result<()>;
}

/// Walk everything below `root` (excluding `root` itself) in name order.
pub fn walk_tree<V: TreeVisitor + ?Sized>(root: &Path, visitor: &mut V) -> Result<()> {
    for entry in WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| FileManagerError::Io {
                op: "walk directory".into(),
                path: entry.path().to_path_buf(),
                message: "entry outside walked directory".into(),
                source: std::io::Error::other("strip_prefix failed"),
            })?;

        let file_type = entry.file_type();
        if file_type.is_dir() {
            visitor.visit_dir(relative, entry.path())?;
        } else if file_type.is_file() {
            visitor.visit_file(relative, entry.path())?;
        } else {
            debug!(path = %entry.path().display(), "skipping non-regular entry");
        }
    }
    Ok(())
}

/// Collects the tree into directory and file lists.
#[derive(Debug, Default)]
pub struct TreeListing {
    pub dirs: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
}

impl TreeVisitor for TreeListing {
    fn visit_dir(&mut self, relative: &Path, _absolute: &Path) -> Result<()> {
        self.dirs.push(relative.to_path_buf());
        Ok(())
    }

    fn visit_file(&mut self, relative: &Path, _absolute: &Path) -> Result<()> {
        self.files.push(relative.to_path_buf());
        Ok(())
    }
}

fn walk_error(root: &Path, e: walkdir::Error) -> FileManagerError {
    let path = e.path().unwrap_or(root).to_path_buf();
    let message = e.to_string();
    let source = e
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other(message.clone()));
    FileManagerError::Io {
        op: "walk directory".into(),
        path,
        message,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn lists_parents_before_children() {
        let td = tempdir().unwrap();
        fs::create_dir_all(td.path().join("a/b")).unwrap();
        fs::write(td.path().join("a/b/f.txt"), b"x").unwrap();
        fs::write(td.path().join("top.txt"), b"y").unwrap();

        let mut listing = TreeListing::default();
        walk_tree(td.path(), &mut listing).unwrap();
        assert_eq!(listing.dirs, vec![PathBuf::from("a"), PathBuf::from("a/b")]);
        assert_eq!(
            listing.files,
            vec![PathBuf::from("a/b/f.txt"), PathBuf::from("top.txt")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_skipped() {
        let td = tempdir().unwrap();
        let outside = tempdir().unwrap();
        fs::write(outside.path().join("secret"), b"s").unwrap();
        std::os::unix::fs::symlink(outside.path(), td.path().join("link")).unwrap();

        let mut listing = TreeListing::default();
        walk_tree(td.path(), &mut listing).unwrap();
        assert!(listing.dirs.is_empty());
        assert!(listing.files.is_empty());
    }
}
