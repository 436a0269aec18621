//! I/O helper utilities.
//!
//! Provides small adapters to enrich io::Error with actionable context/hints,
//! usable with map_err in both FileManagerError and io::Result code paths.
//!
//! Usage:
//!   // in functions returning errors::Result<_>
//!   fs::create_dir_all(dir).map_err(io_error_with_help("create dir", dir))?;
//!
//!   // in functions returning io::Result<_>
//!   File::open(p).map_err(io_error_with_help_io("open file", p))?;

use std::io;
use std::path::Path;

use crate::errors::FileManagerError;

/// Platform-aware hint for an I/O error, plus the raw OS code when present.
fn build_hint(e: &io::Error) -> String {
    let mut msg = e.to_string();

    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            match code {
                libc::EACCES | libc::EPERM => {
                    msg.push_str(" - permission denied; check ownership and write permissions.");
                }
                libc::EXDEV => {
                    msg.push_str(" - cross-filesystem; atomic rename not possible.");
                }
                libc::EBUSY => {
                    msg.push_str(" - resource busy; ensure no other process is writing.");
                }
                libc::ENOENT => {
                    msg.push_str(" - path not found; verify it exists.");
                }
                libc::EEXIST => {
                    msg.push_str(" - already exists; pick a unique name or remove the target.");
                }
                libc::ENOTEMPTY => {
                    msg.push_str(" - directory not empty.");
                }
                libc::ENOSPC => {
                    msg.push_str(" - insufficient space on device.");
                }
                libc::EROFS => {
                    msg.push_str(" - read-only filesystem; cannot write here.");
                }
                libc::ELOOP => {
                    msg.push_str(" - too many symbolic link levels (ELOOP); possible symlink cycle.");
                }
                libc::ENAMETOOLONG => {
                    msg.push_str(" - filename or path too long; shorten path segments.");
                }
                libc::EMFILE => {
                    msg.push_str(" - process file descriptor limit reached; close files or raise limits.");
                }
                _ => {}
            }
        }
        #[cfg(windows)]
        {
            match code {
                5 => msg.push_str(" - access denied; check permissions."), // ERROR_ACCESS_DENIED
                17 => msg.push_str(" - not same device; cross-filesystem move."), // ERROR_NOT_SAME_DEVICE
                32 => msg.push_str(" - sharing violation; file is in use."), // ERROR_SHARING_VIOLATION
                2 | 3 => msg.push_str(" - path not found; verify it exists."),
                80 | 183 => msg.push_str(" - already exists; pick a unique name."),
                112 => msg.push_str(" - insufficient disk space."), // ERROR_DISK_FULL
                206 => msg.push_str(" - filename or path too long (MAX_PATH exceeded)."),
                _ => {}
            }
        }
        msg.push_str(&format!(" [os code: {}]", code));
    } else {
        match e.kind() {
            io::ErrorKind::PermissionDenied => {
                msg.push_str(" - permission denied; check ownership and write permissions.");
            }
            io::ErrorKind::NotFound => {
                msg.push_str(" - path not found; verify it exists.");
            }
            io::ErrorKind::AlreadyExists => {
                msg.push_str(" - already exists; remove or choose a unique name.");
            }
            _ => {}
        }
    }

    msg
}

/// Adapter for gateway code.
/// Returns a closure suitable for `.map_err(...)` that converts io::Error -> FileManagerError.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> FileManagerError + 'a {
    move |e: io::Error| FileManagerError::Io {
        op: op.to_string(),
        path: path.to_path_buf(),
        message: build_hint(&e),
        source: e,
    }
}

/// Adapter for io::Result code (when the surrounding function returns io::Result).
/// Preserves the original ErrorKind while enriching the message.
pub fn io_error_with_help_io<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> io::Error + 'a {
    move |e: io::Error| {
        io::Error::new(
            e.kind(),
            format!("{} '{}': {}", op, path.display(), build_hint(&e)),
        )
    }
}
