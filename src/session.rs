//! Bootstrap context bundling a registry with the filesystem and source
//! layout it is resolved against.
//!
//! A [`Session`] is what an embedding host constructs once: it loads the
//! configuration, then routes every package request through
//! [`Session::require`].

use crate::config::{self, ParseOptions};
use crate::defaults::DEFAULT_CONFIG_FILENAME;
use crate::error::{Error, Result};
use crate::filesystem::{DiskFS, FileSystem};
use crate::registry::Registry;
use crate::resolver::{self, Layout, LoadOutcome, Loader, Resolution};
use log::{debug, info};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Session<F: FileSystem = DiskFS> {
    registry: Registry,
    fs: F,
    layout: Layout,
    options: ParseOptions,
}

impl Session<DiskFS> {
    /// A session over the real filesystem with the default layout.
    pub fn new() -> Self {
        Self::with_fs(DiskFS)
    }
}

impl Default for Session<DiskFS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSystem> Session<F> {
    pub fn with_fs(fs: F) -> Self {
        Self {
            registry: Registry::new(),
            fs,
            layout: Layout::default(),
            options: ParseOptions::default(),
        }
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Direct configuration API access.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Apply configuration text. Returns the number of expressions applied.
    pub fn load_config_str(&mut self, source: &str) -> Result<usize> {
        config::load(&mut self.registry, &self.fs, source, self.options)
    }

    /// Apply a configuration file.
    ///
    /// A missing file is nothing to load (`Ok(false)`) unless `required`,
    /// in which case it is a [`Error::ConfigNotFound`].
    pub fn load_config_file(&mut self, path: &Path, required: bool) -> Result<bool> {
        if !self.fs.exists(path) {
            if required {
                return Err(Error::ConfigNotFound {
                    path: path.to_path_buf(),
                });
            }
            debug!("no configuration at {}", path.display());
            return Ok(false);
        }
        let source = self.fs.read_to_string(path)?;
        let applied = self.load_config_str(&source)?;
        info!("loaded {} expressions from {}", applied, path.display());
        Ok(true)
    }

    /// Where the default configuration file would be, `~/.devroute`.
    pub fn default_config_path(&self) -> Option<PathBuf> {
        self.fs
            .home_dir()
            .map(|home| home.join(DEFAULT_CONFIG_FILENAME))
    }

    /// Apply `~/.devroute` if it exists.
    pub fn load_default_config(&mut self) -> Result<bool> {
        match self.default_config_path() {
            Some(path) => self.load_config_file(&path, false),
            None => Ok(false),
        }
    }

    pub fn try_resolve(&self, requested: &str) -> Resolution {
        resolver::try_resolve(&self.registry, &self.fs, &self.layout, requested)
    }

    pub fn require<L: Loader>(&mut self, requested: &str, loader: &mut L) -> Result<LoadOutcome> {
        resolver::require(
            &mut self.registry,
            &self.fs,
            &self.layout,
            requested,
            loader,
        )
    }

    /// Forget all configuration and loaded packages.
    pub fn clear(&mut self) {
        self.registry.clear();
    }
}
