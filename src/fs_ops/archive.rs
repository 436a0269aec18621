//! Zip creation and extraction.
//!
//! Archives are written next to the zipped entries under a timestamped name.
//! Extraction always goes into a fresh, collision-free directory named after the
//! archive. Entry names in an archive are untrusted: any entry that would land
//! outside the extraction directory is skipped and counted, and the rest of the
//! archive is still extracted.

use chrono::Local;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::errors::{FileManagerError, Result};
use crate::sandbox::{RootContext, is_within, leaf_name, to_absolute};

use super::duplicate::{unique_directory_path, unique_file_path};
use super::helpers::io_error_with_help;
use super::io_copy::copy_stream;
use super::tree::{TreeVisitor, walk_tree};

/// Result of one extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Directory the archive was extracted into.
    pub directory: PathBuf,
    pub extracted: usize,
    /// Entries skipped because they escaped the directory or collided.
    pub rejected: usize,
}

/// Zip the named files (at the archive root) and directories (as top-level
/// folders) found directly inside `path`. Missing names are ignored.
/// Returns the leaf name of the archive, which is written into `path`.
pub fn create_zip(
    root: &RootContext,
    path: &str,
    file_names: &[String],
    directory_names: &[String],
) -> Result<String> {
    let base = to_absolute(path, root);
    fs::create_dir_all(&base).map_err(io_error_with_help("create directory", &base))?;

    let zip_name = Local::now().format("Zip_%Y_%m_%d_%H%M%S.zip").to_string();
    let zip_path = unique_file_path(&base, &zip_name);
    let file = File::options()
        .write(true)
        .create_new(true)
        .open(&zip_path)
        .map_err(io_error_with_help("create archive", &zip_path))?;

    let result = write_entries(file, &zip_path, &base, file_names, directory_names);
    if let Err(e) = result {
        let _ = fs::remove_file(&zip_path);
        return Err(e);
    }

    let leaf = zip_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or(zip_name);
    info!(archive = %zip_path.display(), "Created archive");
    Ok(leaf)
}

fn write_entries(
    file: File,
    zip_path: &Path,
    base: &Path,
    file_names: &[String],
    directory_names: &[String],
) -> Result<()> {
    let mut zip = ArchiveBuilder {
        writer: ZipWriter::new(file),
        zip_path,
        prefix: String::new(),
        options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
    };

    let mut added = HashSet::new();
    for name in file_names {
        let Some(leaf) = leaf_name(name) else { continue };
        if !added.insert(leaf.clone()) {
            debug!(name = %leaf, "zip: file already added");
            continue;
        }
        let src = base.join(&leaf);
        if src.symlink_metadata().is_ok_and(|m| m.is_file()) {
            zip.add_file(&leaf, &src)?;
        } else {
            debug!(path = %src.display(), "zip: file not found");
        }
    }

    let mut added_dirs = HashSet::new();
    for name in directory_names {
        let Some(leaf) = leaf_name(name) else { continue };
        if !added_dirs.insert(leaf.clone()) {
            debug!(name = %leaf, "zip: directory already added");
            continue;
        }
        let src = base.join(&leaf);
        if !src.symlink_metadata().is_ok_and(|m| m.is_dir()) {
            debug!(path = %src.display(), "zip: directory not found");
            continue;
        }
        zip.add_dir(&leaf)?;
        zip.prefix = leaf;
        walk_tree(&src, &mut zip)?;
    }

    zip.writer.finish().map_err(|source| FileManagerError::Archive {
        path: zip_path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Writes walked tree entries into the archive under `prefix/`.
struct ArchiveBuilder<'a> {
    writer: ZipWriter<File>,
    zip_path: &'a Path,
    prefix: String,
    options: SimpleFileOptions,
}

impl ArchiveBuilder<'_> {
    fn zip_err(&self, source: ZipError) -> FileManagerError {
        FileManagerError::Archive {
            path: self.zip_path.to_path_buf(),
            source,
        }
    }

    fn entry_name(&self, relative: &Path) -> String {
        let rel = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}", self.prefix, rel)
    }

    fn add_dir(&mut self, name: &str) -> Result<()> {
        let name = format!("{}/", name.trim_end_matches('/'));
        self.writer
            .add_directory(name, self.options)
            .map_err(|e| self.zip_err(e))
    }

    fn add_file(&mut self, name: &str, src: &Path) -> Result<()> {
        self.writer
            .start_file(name, self.options)
            .map_err(|e| self.zip_err(e))?;
        let mut reader = File::open(src).map_err(io_error_with_help("open file", src))?;
        io::copy(&mut reader, &mut self.writer).map_err(io_error_with_help("write archive entry", src))?;
        Ok(())
    }
}

impl TreeVisitor for ArchiveBuilder<'_> {
    fn visit_dir(&mut self, relative: &Path, _absolute: &Path) -> Result<()> {
        let name = self.entry_name(relative);
        self.add_dir(&name)
    }

    fn visit_file(&mut self, relative: &Path, absolute: &Path) -> Result<()> {
        let name = self.entry_name(relative);
        self.add_file(&name, absolute)
    }
}

/// Extract the archive `zip_file_name` found directly inside `path`.
/// Returns None when no such file exists.
pub fn extract_zip(root: &RootContext, path: &str, zip_file_name: &str) -> Result<Option<ExtractSummary>> {
    let Some(leaf) = leaf_name(zip_file_name) else {
        return Ok(None);
    };
    let base = to_absolute(path, root);
    let zip_path = base.join(&leaf);
    if !zip_path.symlink_metadata().is_ok_and(|m| m.is_file()) {
        debug!(path = %zip_path.display(), "unzip: archive not found");
        return Ok(None);
    }

    let file = File::open(&zip_path).map_err(io_error_with_help("open archive", &zip_path))?;
    let archive_err = |source| FileManagerError::Archive {
        path: zip_path.clone(),
        source,
    };
    let mut archive = ZipArchive::new(file).map_err(archive_err)?;

    let stem = Path::new(&leaf)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| leaf.clone());
    let directory = unique_directory_path(&base, &stem);
    fs::create_dir_all(&directory).map_err(io_error_with_help("create extraction directory", &directory))?;

    let mut summary = ExtractSummary {
        directory,
        extracted: 0,
        rejected: 0,
    };
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(archive_err)?;
        let name = entry.name().to_string();
        let Some(target) = entry_target(&summary.directory, &name) else {
            warn!(entry = %name, archive = %zip_path.display(), "unzip: rejected entry escaping extraction directory");
            summary.rejected += 1;
            continue;
        };

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(io_error_with_help("create directory", &target))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(io_error_with_help("create directory", parent))?;
        }
        match copy_stream(&mut entry, &target) {
            Ok(_) => summary.extracted += 1,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                warn!(entry = %name, "unzip: duplicate entry skipped");
                summary.rejected += 1;
            }
            Err(e) => return Err(io_error_with_help("extract entry", &target)(e)),
        }
    }

    info!(
        archive = %zip_path.display(),
        dest = %summary.directory.display(),
        extracted = summary.extracted,
        rejected = summary.rejected,
        "Extracted archive"
    );
    Ok(Some(summary))
}

/// Where an archive entry may be written, or None if its name would leave
/// `dest`. Backslashes count as separators; absolute names, drive prefixes and
/// `..` segments are refused outright. Colons elsewhere are only refused on
/// Windows, where they name alternate data streams.
fn entry_target(dest: &Path, name: &str) -> Option<PathBuf> {
    let normalized = name.replace('\\', "/");
    if normalized.starts_with('/') {
        return None;
    }
    let mut target = dest.to_path_buf();
    let mut depth = 0usize;
    for segment in normalized.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s if depth == 0 && is_drive_prefix(s) => return None,
            s if cfg!(windows) && s.contains(':') => return None,
            s => {
                target.push(s);
                depth += 1;
            }
        }
    }
    (depth > 0 && is_within(&target, dest)).then_some(target)
}

fn is_drive_prefix(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_target_accepts_nested_names() {
        let dest = Path::new("/x/out");
        assert_eq!(entry_target(dest, "docs/a.txt"), Some(PathBuf::from("/x/out/docs/a.txt")));
        assert_eq!(entry_target(dest, "docs\\b.txt"), Some(PathBuf::from("/x/out/docs/b.txt")));
        assert_eq!(entry_target(dest, "./c.txt"), Some(PathBuf::from("/x/out/c.txt")));
    }

    #[test]
    fn entry_target_rejects_escapes() {
        let dest = Path::new("/x/out");
        for name in ["../evil.txt", "../../evil.txt", "a/../../b", "/etc/passwd", "\\abs", "C:/win.ini", "c:win.ini", "a/..\\..\\b", ""] {
            assert_eq!(entry_target(dest, name), None, "{name:?}");
        }
    }

    #[cfg(unix)]
    #[test]
    fn entry_target_allows_colons_in_unix_names() {
        let dest = Path::new("/x/out");
        assert_eq!(entry_target(dest, "12:30.txt"), Some(PathBuf::from("/x/out/12:30.txt")));
        assert_eq!(entry_target(dest, "logs/a:b.log"), Some(PathBuf::from("/x/out/logs/a:b.log")));
    }
}
