//! Filesystem capability used by the configuration parser and the resolver.
//!
//! Everything devroute needs from the outside world goes through the
//! [`FileSystem`] trait: existence checks, reading a configuration source, and
//! the home and working directories used to expand paths. [`DiskFS`] is the
//! real implementation; [`MemoryFS`] keeps files in memory so tests can build
//! package layouts without touching the disk.

use crate::error::{Error, Result};
use crate::path;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Filesystem operations the core depends on.
pub trait FileSystem {
    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Read a whole file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// The user's home directory, used for `~` expansion.
    fn home_dir(&self) -> Option<PathBuf>;

    /// The directory relative paths are resolved against.
    fn current_dir(&self) -> Result<PathBuf>;

    /// Expand `input` (`~`-relative, relative or absolute) to an absolute path.
    fn expand_path(&self, input: &str) -> Result<PathBuf> {
        let home = self.home_dir();
        path::expand_path(input, home.as_deref(), &self.current_dir()?)
    }
}

impl<F: FileSystem + ?Sized> FileSystem for &F {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        (**self).read_to_string(path)
    }

    fn home_dir(&self) -> Option<PathBuf> {
        (**self).home_dir()
    }

    fn current_dir(&self) -> Result<PathBuf> {
        (**self).current_dir()
    }
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFS;

impl FileSystem for DiskFS {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn current_dir(&self) -> Result<PathBuf> {
        Ok(std::env::current_dir()?)
    }
}

/// In-memory filesystem for tests and dry runs.
///
/// Adding a file implicitly creates all of its parent directories.
#[derive(Debug, Clone)]
pub struct MemoryFS {
    /// Files stored as absolute path -> text content
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
    home: Option<PathBuf>,
    cwd: PathBuf,
}

impl Default for MemoryFS {
    fn default() -> Self {
        Self {
            files: HashMap::new(),
            directories: HashSet::new(),
            home: Some(PathBuf::from("/home/dev")),
            cwd: PathBuf::from("/work"),
        }
    }
}

impl MemoryFS {
    /// Create an empty filesystem with home `/home/dev` and working
    /// directory `/work`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the home directory (`None` makes `~` expansion fail).
    pub fn with_home<P: Into<PathBuf>>(mut self, home: Option<P>) -> Self {
        self.home = home.map(Into::into);
        self
    }

    /// Replace the working directory.
    pub fn with_current_dir<P: Into<PathBuf>>(mut self, cwd: P) -> Self {
        self.cwd = cwd.into();
        self
    }

    /// Add or replace a file. Relative paths are placed under the working
    /// directory.
    pub fn add_file_string<P: AsRef<Path>>(&mut self, path: P, content: &str) -> Result<()> {
        let path = self.absolute(path.as_ref());
        let mut parent = path.parent();
        while let Some(dir) = parent {
            self.directories.insert(dir.to_path_buf());
            parent = dir.parent();
        }
        self.files.insert(path, content.to_string());
        Ok(())
    }

    /// Add an empty file.
    pub fn touch<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.add_file_string(path, "")
    }

    /// Create an empty directory (and its parents).
    pub fn add_dir<P: AsRef<Path>>(&mut self, path: P) {
        let path = self.absolute(path.as_ref());
        let mut current = Some(path.as_path());
        while let Some(dir) = current {
            self.directories.insert(dir.to_path_buf());
            current = dir.parent();
        }
    }

    /// Remove a file
    pub fn remove_file<P: AsRef<Path>>(&mut self, path: P) -> Option<String> {
        let path = self.absolute(path.as_ref());
        self.files.remove(&path)
    }

    /// Get the number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if filesystem is empty
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path::normalize(path)
        } else {
            path::normalize(&self.cwd.join(path))
        }
    }
}

impl FileSystem for MemoryFS {
    fn exists(&self, path: &Path) -> bool {
        let path = self.absolute(path);
        self.files.contains_key(&path) || self.directories.contains(&path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.directories.contains(&self.absolute(path))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let path = self.absolute(path);
        self.files.get(&path).cloned().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            ))
        })
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home.clone()
    }

    fn current_dir(&self) -> Result<PathBuf> {
        Ok(self.cwd.clone())
    }
}
