//! Relative-path normalization and root containment.
//!
//! Raw relative paths come from the caller and are never trusted. `to_absolute`
//! joins them onto a root, resolves `.`/`..` lexically, resolves symlinks on the
//! longest existing prefix, and only then checks containment. Anything that ends
//! up outside the root collapses to the root itself. No character blacklist is
//! involved: the containment check is the only gate.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

use super::root::RootContext;

/// Convert backslashes to forward slashes and trim surrounding slashes.
/// Does not reject `..`; containment is enforced by [`to_absolute`].
pub fn normalize_relative(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    raw.replace('\\', "/").trim_matches('/').to_string()
}

/// Join a normalized relative path onto `base` and append `name`.
pub fn combine_relative(base: &str, name: &str) -> String {
    if base.trim().is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), name)
    }
}

/// Parent of a relative path, "" at top level.
pub fn parent_relative(relative: &str) -> String {
    let normalized = normalize_relative(relative);
    match normalized.rfind('/') {
        Some(idx) => normalized[..idx].to_string(),
        None => String::new(),
    }
}

/// Resolve `relative` under `root`, guaranteeing a root-contained result.
pub fn to_absolute(relative: &str, root: &RootContext) -> PathBuf {
    let base = root.absolute_path();
    let normalized = normalize_relative(relative);
    if normalized.is_empty() {
        return base.to_path_buf();
    }

    let mut joined = base.to_path_buf();
    for segment in normalized.split('/') {
        joined.push(segment);
    }
    let resolved = resolve_existing_prefix(&lexical_normalize(&joined));

    if is_within(&resolved, base) {
        resolved
    } else {
        warn!(
            root = %base.display(),
            requested = %normalized,
            "path escapes root; using root directory"
        );
        base.to_path_buf()
    }
}

/// Like [`to_absolute`], but the final component is not resolved, so a
/// symlink at the leaf names the link itself rather than what it points to.
pub fn entry_path(relative: &str, root: &RootContext) -> PathBuf {
    let base = root.absolute_path();
    let mut joined = base.to_path_buf();
    for segment in normalize_relative(relative).split('/') {
        joined.push(segment);
    }
    let lexical = lexical_normalize(&joined);
    let (Some(parent), Some(leaf)) = (lexical.parent(), lexical.file_name()) else {
        return base.to_path_buf();
    };
    if same_path(&lexical, base) {
        return base.to_path_buf();
    }

    let resolved_parent = resolve_existing_prefix(parent);
    if is_within(&resolved_parent, base) {
        resolved_parent.join(leaf)
    } else {
        warn!(root = %base.display(), requested = relative, "entry escapes root; using root directory");
        base.to_path_buf()
    }
}

/// Forward-slash path of `absolute` below the root, "" for the root itself or
/// anything not under it.
pub fn relative_of(absolute: &Path, root: &RootContext) -> String {
    match absolute.strip_prefix(root.absolute_path()) {
        Ok(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => String::new(),
    }
}

/// Reduce a user-supplied name to its final path component.
/// Returns None for blank names and for `.`/`..`.
pub fn leaf_name(name: &str) -> Option<String> {
    let leaf = name.rsplit(['/', '\\']).next().unwrap_or_default();
    if leaf.trim().is_empty() || leaf == "." || leaf == ".." {
        return None;
    }
    Some(leaf.to_string())
}

/// Resolve `.` and `..` without touching the filesystem. `..` never climbs above
/// the path's root.
pub fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_root = matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                );
                if !at_root {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Canonicalize the longest existing ancestor of `path` (following symlinks the
/// way the platform does) and re-append the non-existing tail.
pub fn resolve_existing_prefix(path: &Path) -> PathBuf {
    for ancestor in path.ancestors() {
        if let Ok(canonical) = dunce::canonicalize(ancestor) {
            return match path.strip_prefix(ancestor) {
                Ok(tail) if !tail.as_os_str().is_empty() => canonical.join(tail),
                _ => canonical,
            };
        }
    }
    path.to_path_buf()
}

/// True when `path` equals `root` or lies below it. Components are compared
/// case-insensitively regardless of the filesystem's own sensitivity.
pub fn is_within(path: &Path, root: &Path) -> bool {
    let mut candidate = path.components();
    for root_component in root.components() {
        match candidate.next() {
            Some(c) if component_eq(c.as_os_str(), root_component.as_os_str()) => {}
            _ => return false,
        }
    }
    true
}

/// Case-insensitive path equality.
pub fn same_path(a: &Path, b: &Path) -> bool {
    a.components().count() == b.components().count() && is_within(a, b)
}

fn component_eq(a: &OsStr, b: &OsStr) -> bool {
    a == b || a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
}
