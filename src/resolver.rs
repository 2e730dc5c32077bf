//! # Resolution Engine
//!
//! Decides, for a requested package name, whether a local checkout should be
//! loaded instead of the installed package, and which file to load.
//!
//! Resolution runs these checks in order, first match wins:
//!
//! 1. A name with a file extension is not a package request.
//! 2. A package redirected earlier in the session is already satisfied.
//! 3. The package must be enabled, either through the global name sets or
//!    its own entity flag.
//! 4. The package's bound directory (from a location binding, or its own
//!    directory) is probed.
//! 5. The general search paths are probed in declaration order.
//!
//! Each probe accepts two shapes: the candidate directory is the package root
//! (`<dir>/lib/<name>.rb` exists), or it contains the package root in a
//! subdirectory named after the package (`<dir>/<name>/lib/<name>.rb`).
//!
//! [`try_resolve`] only reports the decision. [`require`] also marks the
//! package as loaded and hands the file to a [`Loader`].

use crate::defaults::{DEFAULT_EXTENSION, DEFAULT_LIB_DIR};
use crate::error::Result;
use crate::filesystem::FileSystem;
use crate::name::PackageName;
use crate::path;
use crate::registry::Registry;
use log::{debug, trace};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a package's source file lives below its root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    /// Directory below the package root holding source files
    pub lib_dir: String,
    /// Source file extension, without the dot
    pub extension: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            lib_dir: DEFAULT_LIB_DIR.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl Layout {
    pub fn new<L: Into<String>, E: Into<String>>(lib_dir: L, extension: E) -> Self {
        Self {
            lib_dir: lib_dir.into(),
            extension: extension.into().trim_start_matches('.').to_string(),
        }
    }

    /// The entry file of a package rooted at `root`, for the name as it was
    /// requested.
    pub fn source_file(&self, root: &Path, requested: &str) -> PathBuf {
        let file = format!("{}.{}", requested, self.extension);
        path::join_segments(root, [self.lib_dir.as_str(), file.as_str()])
    }
}

/// Which part of the configuration produced a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResolutionSource {
    /// A location binding to the named directory
    Location(PackageName),
    /// The package's own directory
    PackageDirectory(PackageName),
    /// A general search path
    GeneralPath(PathBuf),
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionSource::Location(directory) => write!(f, "location @{}", directory),
            ResolutionSource::PackageDirectory(directory) => {
                write!(f, "package directory +{}", directory)
            }
            ResolutionSource::GeneralPath(path) => write!(f, "search path {}", path.display()),
        }
    }
}

/// A package found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPackage {
    pub name: PackageName,
    /// The package root directory
    pub root: PathBuf,
    /// The entry source file to load
    pub file: PathBuf,
    pub source: ResolutionSource,
}

/// The outcome of [`try_resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    /// The request names a file, not a package.
    NotAPackage,
    /// The package was already redirected in this session.
    AlreadyLoaded,
    /// Neither the enable state nor the package's flag enables it.
    NotEnabled,
    /// Enabled, but no candidate directory holds its source file.
    NotFound,
    Resolved(ResolvedPackage),
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    /// Short human-readable reason.
    pub fn describe(&self) -> String {
        match self {
            Resolution::NotAPackage => "not a package (has a file extension)".to_string(),
            Resolution::AlreadyLoaded => "already loaded".to_string(),
            Resolution::NotEnabled => "not enabled".to_string(),
            Resolution::NotFound => "enabled, but not found in any candidate".to_string(),
            Resolution::Resolved(package) => {
                format!("{} (via {})", package.file.display(), package.source)
            }
        }
    }
}

/// What [`require`] did with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The local source file was handed to the loader.
    Loaded(ResolvedPackage),
    /// Already redirected earlier; the request is handled and nothing happens.
    AlreadySatisfied,
    /// No override applies; the default loader should take over.
    NotApplicable,
}

impl LoadOutcome {
    /// Whether the caller should skip its default loading behaviour.
    pub fn is_handled(&self) -> bool {
        !matches!(self, LoadOutcome::NotApplicable)
    }
}

/// Host facility that loads a source file by path.
pub trait Loader {
    fn load(&mut self, file: &Path) -> Result<()>;
}

impl<F> Loader for F
where
    F: FnMut(&Path) -> Result<()>,
{
    fn load(&mut self, file: &Path) -> Result<()> {
        self(file)
    }
}

/// Whether a package should be considered for redirection.
pub fn should_attempt(registry: &Registry, name: &PackageName) -> bool {
    registry.enable_state().should_attempt(name)
        || registry
            .get_package(name)
            .is_some_and(|package| package.is_enabled())
}

/// Decide where `requested` would be loaded from, without loading it.
pub fn try_resolve<F: FileSystem>(
    registry: &Registry,
    fs: &F,
    layout: &Layout,
    requested: &str,
) -> Resolution {
    let requested = requested.trim();
    if path::has_extension(requested) {
        return Resolution::NotAPackage;
    }
    let name = PackageName::new(requested);
    if registry.is_loaded(&name) {
        return Resolution::AlreadyLoaded;
    }
    if !should_attempt(registry, &name) {
        debug!("{} is not enabled", name);
        return Resolution::NotEnabled;
    }

    if let Some((directory, source)) = bound_directory(registry, &name) {
        if let Some(candidate) = registry.directory_path(&directory) {
            if let Some(resolved) = probe(fs, layout, &name, requested, &candidate, source) {
                return resolved;
            }
        }
    }

    for search_path in registry.general_paths() {
        let source = ResolutionSource::GeneralPath(search_path.clone());
        if let Some(resolved) = probe(fs, layout, &name, requested, search_path, source) {
            return resolved;
        }
    }

    debug!("{} is enabled but was not found", name);
    Resolution::NotFound
}

/// Resolve `requested` and, if a local override applies, mark it loaded and
/// hand its source file to `loader`.
///
/// The package is marked before the loader runs, so a request for the same
/// package made while loading is already satisfied.
pub fn require<F: FileSystem, L: Loader>(
    registry: &mut Registry,
    fs: &F,
    layout: &Layout,
    requested: &str,
    loader: &mut L,
) -> Result<LoadOutcome> {
    match try_resolve(registry, fs, layout, requested) {
        Resolution::Resolved(package) => {
            registry.mark_loaded(&package.name);
            debug!("loading {} from {}", package.name, package.file.display());
            loader.load(&package.file)?;
            Ok(LoadOutcome::Loaded(package))
        }
        Resolution::AlreadyLoaded => Ok(LoadOutcome::AlreadySatisfied),
        Resolution::NotAPackage | Resolution::NotEnabled | Resolution::NotFound => {
            Ok(LoadOutcome::NotApplicable)
        }
    }
}

fn bound_directory(
    registry: &Registry,
    name: &PackageName,
) -> Option<(PackageName, ResolutionSource)> {
    if let Some(directory) = registry.location_of(name) {
        return Some((
            directory.clone(),
            ResolutionSource::Location(directory.clone()),
        ));
    }
    let directory = registry.get_package(name)?.directory()?;
    Some((
        directory.clone(),
        ResolutionSource::PackageDirectory(directory.clone()),
    ))
}

fn probe<F: FileSystem>(
    fs: &F,
    layout: &Layout,
    name: &PackageName,
    requested: &str,
    candidate: &Path,
    source: ResolutionSource,
) -> Option<Resolution> {
    let roots = [
        candidate.to_path_buf(),
        path::join_segments(candidate, [name.as_str()]),
    ];
    for (index, root) in roots.into_iter().enumerate() {
        if index > 0 && !fs.is_dir(&root) {
            continue;
        }
        let file = layout.source_file(&root, requested);
        trace!("probing {}", file.display());
        if fs.exists(&file) {
            debug!("{} resolved to {}", name, file.display());
            return Some(Resolution::Resolved(ResolvedPackage {
                name: name.clone(),
                root,
                file,
                source,
            }));
        }
    }
    None
}
