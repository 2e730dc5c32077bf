//! Named directories.
//!
//! A directory is defined either by an absolute path or by a path relative to
//! another named directory. Relative definitions are stored unresolved and
//! resolved through the registry on every lookup, so moving a base directory
//! moves everything defined beneath it.

use crate::name::PackageName;
use serde::Serialize;
use std::path::PathBuf;

/// How a directory's path is defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryPath {
    /// An already expanded absolute path.
    Absolute(PathBuf),
    /// A path relative to another named directory.
    Relative {
        base: PackageName,
        /// `/`-separated segments below the base, possibly empty.
        rest: String,
    },
}

impl DirectoryPath {
    pub fn absolute<P: Into<PathBuf>>(path: P) -> Self {
        DirectoryPath::Absolute(path.into())
    }

    pub fn relative<N: Into<PackageName>>(base: N, rest: &str) -> Self {
        DirectoryPath::Relative {
            base: base.into(),
            rest: rest.trim_matches('/').to_string(),
        }
    }

    /// The directory this path is defined relative to, if any.
    pub fn base(&self) -> Option<&PackageName> {
        match self {
            DirectoryPath::Absolute(_) => None,
            DirectoryPath::Relative { base, .. } => Some(base),
        }
    }
}

/// A named, relocatable filesystem location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directory {
    name: PackageName,
    path: DirectoryPath,
}

impl Directory {
    pub fn new(name: PackageName, path: DirectoryPath) -> Self {
        Self { name, path }
    }

    pub fn name(&self) -> &PackageName {
        &self.name
    }

    /// The unresolved definition. Use
    /// [`Registry::directory_path`](crate::registry::Registry::directory_path)
    /// for the resolved location.
    pub fn definition(&self) -> &DirectoryPath {
        &self.path
    }

    pub(crate) fn set_path(&mut self, path: DirectoryPath) {
        self.path = path;
    }
}
