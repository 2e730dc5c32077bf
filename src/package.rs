//! Packages: the units a load request names.

use crate::name::PackageName;
use serde::Serialize;

/// A symbolically named package.
///
/// The `enabled` flag is the per-entity switch flipped by the direct
/// configuration API. It starts out disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    name: PackageName,
    directory: Option<PackageName>,
    enabled: bool,
}

impl Package {
    pub fn new(name: PackageName) -> Self {
        Self {
            name,
            directory: None,
            enabled: false,
        }
    }

    pub fn name(&self) -> &PackageName {
        &self.name
    }

    /// Name of the directory this package was placed in, if any.
    pub fn directory(&self) -> Option<&PackageName> {
        self.directory.as_ref()
    }

    pub fn set_directory(&mut self, directory: Option<PackageName>) {
        self.directory = directory;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_disabled(&self) -> bool {
        !self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }
}
