//! Name collision resolution.
//!
//! - Files: `name.ext` -> `name-1.ext`, `name-2.ext`, ...
//! - Directories: `name` -> `name_(1)`, `name_(2)`, ...
//!
//! Stem and extension are split the way `Path` does it, so `.env` has no
//! extension (`.env-1`) and `archive.tar.gz` becomes `archive.tar-1.gz`.
//!
//! This is a scan against current filesystem state. Two concurrent callers can
//! compute the same free name; whoever creates it second fails on `create_new`
//! or overwrites a directory's contents. No lock coordinates them.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::trace;

// Typical POSIX/NTFS leaf limit, in bytes.
const MAX_FILENAME_LEN: usize = 255;

/// First free path for a file called `name` inside `dir`.
pub fn unique_file_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !occupied(&candidate) {
        return candidate;
    }

    let base = Path::new(name);
    let stem: OsString = base
        .file_stem()
        .map(OsStr::to_os_string)
        .unwrap_or_else(|| OsString::from(name));
    let ext = base.extension();

    scan(dir, name, |n| build_name(&stem, ext, &format!("-{n}")))
}

/// First free path for a directory called `name` inside `dir`.
pub fn unique_directory_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !occupied(&candidate) {
        return candidate;
    }
    let stem = OsString::from(name);
    scan(dir, name, |n| build_name(&stem, None, &format!("_({n})")))
}

fn scan(dir: &Path, name: &str, make: impl Fn(u64) -> OsString) -> PathBuf {
    let mut n: u64 = 1;
    loop {
        let candidate = dir.join(make(n));
        if !occupied(&candidate) {
            return candidate;
        }
        if n == 3 {
            trace!(name, dir = %dir.display(), "duplicate: multiple collisions, still scanning");
        }
        n += 1;
    }
}

// Dangling symlinks count as taken.
fn occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// `stem + suffix + [.ext]`, shrinking the stem so the leaf stays within
/// MAX_FILENAME_LEN bytes. Truncation respects UTF-8 boundaries.
fn build_name(stem: &OsStr, ext: Option<&OsStr>, suffix: &str) -> OsString {
    let ext_len = ext.map(|e| e.len() + 1).unwrap_or(0);
    let budget = MAX_FILENAME_LEN.saturating_sub(suffix.len() + ext_len).max(1);

    let mut out = OsString::new();
    if stem.len() > budget {
        let lossy = stem.to_string_lossy();
        let mut end = budget.min(lossy.len());
        while end > 0 && !lossy.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            out.push("f");
        } else {
            out.push(&lossy[..end]);
        }
    } else {
        out.push(stem);
    }
    out.push(suffix);
    if let Some(e) = ext {
        out.push(".");
        out.push(e);
    }
    out
}
