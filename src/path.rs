//! Path manipulation utilities for devroute

use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Expand `input` to an absolute, lexically normalized path.
///
/// A leading `~` (alone or followed by `/`) is replaced by `home`. Relative
/// paths are taken relative to `cwd`. `.` and `..` components are folded
/// without touching the filesystem.
pub fn expand_path(input: &str, home: Option<&Path>, cwd: &Path) -> Result<PathBuf> {
    let input = input.trim();
    let expanded = if input == "~" || input.starts_with("~/") {
        let home = home.ok_or_else(|| Error::Path {
            message: format!("cannot expand '{}': home directory is unknown", input),
        })?;
        let rest = input.trim_start_matches('~').trim_start_matches('/');
        if rest.is_empty() {
            home.to_path_buf()
        } else {
            home.join(rest)
        }
    } else {
        let path = Path::new(input);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            cwd.join(path)
        }
    };
    Ok(normalize(&expanded))
}

/// Fold `.` and `..` components of a path lexically.
///
/// `..` at the root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() && !result.has_root() {
                    result.push(component.as_os_str());
                }
            }
            other => result.push(other.as_os_str()),
        }
    }
    result
}

/// Join `/`-separated segments onto `base` and normalize the result.
pub fn join_segments<'a, I>(base: &Path, segments: I) -> PathBuf
where
    I: IntoIterator<Item = &'a str>,
{
    let mut path = base.to_path_buf();
    for segment in segments {
        for part in segment.split('/').filter(|p| !p.is_empty()) {
            path.push(part);
        }
    }
    normalize(&path)
}

/// Whether a requested name carries a file extension, which means it names a
/// file rather than a package.
pub fn has_extension(name: &str) -> bool {
    Path::new(name).extension().is_some()
}

/// Split an `@name/rest/of/path` reference into the directory name and the
/// remaining path. Returns `None` when `input` does not start with `@`.
pub fn split_directory_reference(input: &str) -> Option<(&str, &str)> {
    let reference = input.strip_prefix('@')?;
    match reference.split_once('/') {
        Some((name, rest)) => Some((name, rest)),
        None => Some((reference, "")),
    }
}
