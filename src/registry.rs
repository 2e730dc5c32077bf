//! # Name Registry
//!
//! The [`Registry`] is the context object holding everything a configuration
//! declares: named directories, packages, groups, location bindings, the
//! general search paths, the global enable state and the set of packages
//! already redirected. It is constructed explicitly and passed by reference
//! to the parser and the resolver; tests build a fresh one instead of
//! resetting shared state.
//!
//! ## Two enable mechanisms
//!
//! - The direct API ([`Registry::enable`], [`Registry::disable`],
//!   [`Registry::enable_all`], [`Registry::disable_all`]) flips the
//!   per-entity flags of packages and groups, sweeping group members
//!   recursively at call time.
//! - Configuration expressions (`!enable`, `!disable`) only touch the global
//!   name sets in [`EnableState`], through [`Registry::enable_names`] and
//!   [`Registry::disable_names`].
//!
//! Both are consulted by the resolver.
//!
//! ## Entity creation
//!
//! Entities are created on first reference. [`Registry::package`] is the
//! get-or-create operation for packages; adding an unknown name to a group
//! creates the package as a side effect.

use crate::directory::{Directory, DirectoryPath};
use crate::enable::EnableState;
use crate::error::{Error, Result};
use crate::group::{Member, MemberOp, MemberRef, PackageGroup};
use crate::name::{NameSet, PackageName};
use crate::package::Package;
use crate::path;
use crate::suggestions;
use log::{debug, warn};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Process-wide configuration state.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    directories: BTreeMap<PackageName, Directory>,
    groups: BTreeMap<PackageName, PackageGroup>,
    packages: BTreeMap<PackageName, Package>,
    /// Flat package -> directory table built from location bindings
    locations: BTreeMap<PackageName, PackageName>,
    general_paths: Vec<PathBuf>,
    enable_state: EnableState,
    loaded: NameSet,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    // ------------------------------------------------------------------
    // Directories
    // ------------------------------------------------------------------

    /// Declare a directory, or update the path of an existing one.
    ///
    /// A relative definition must name an already declared base directory and
    /// may not make the directory depend on itself. Declaring a directory also
    /// declares a group of the same name, and links a same-named package
    /// that has no directory yet.
    pub fn directory<N: Into<PackageName>>(
        &mut self,
        name: N,
        path: DirectoryPath,
    ) -> Result<&Directory> {
        let name = name.into();
        if let Some(base) = path.base() {
            if !self.directories.contains_key(base) {
                return Err(self.unknown_directory(base));
            }
            if self.depends_on(base, &name) {
                return Err(Error::DirectoryCycle {
                    name: name.to_string(),
                    line: None,
                });
            }
        }

        let group = self
            .groups
            .entry(name.clone())
            .or_insert_with(|| PackageGroup::new(name.clone()));
        if group.directory().is_none() {
            group.set_directory(Some(name.clone()));
        }
        if let Some(package) = self.packages.get_mut(&name) {
            if package.directory().is_none() {
                package.set_directory(Some(name.clone()));
            }
        }

        debug!("directory {} = {:?}", name, path);
        let directory = match self.directories.entry(name.clone()) {
            Entry::Occupied(entry) => {
                let directory = entry.into_mut();
                directory.set_path(path);
                directory
            }
            Entry::Vacant(entry) => entry.insert(Directory::new(name, path)),
        };
        Ok(&*directory)
    }

    pub fn get_directory<N: Into<PackageName>>(&self, name: N) -> Option<&Directory> {
        self.directories.get(&name.into())
    }

    /// All declared directories, ordered by name.
    pub fn directories(&self) -> impl Iterator<Item = &Directory> {
        self.directories.values()
    }

    /// The current absolute path of a directory, following relative
    /// definitions through their bases.
    pub fn directory_path<N: Into<PackageName>>(&self, name: N) -> Option<PathBuf> {
        self.resolve_directory(&name.into(), 0)
    }

    /// Resolve `rest` (`/`-separated, possibly empty) below a named directory.
    pub fn path_in_directory<N: Into<PackageName>>(&self, name: N, rest: &str) -> Result<PathBuf> {
        let name = name.into();
        let base = self
            .directory_path(&name)
            .ok_or_else(|| self.unknown_directory(&name))?;
        Ok(path::join_segments(&base, [rest]))
    }

    /// Members bound to a directory (the members of its same-named group).
    pub fn directory_members<N: Into<PackageName>>(&self, name: N) -> &[Member] {
        let name = name.into();
        if !self.directories.contains_key(&name) {
            return &[];
        }
        self.groups
            .get(&name)
            .map(|group| group.members())
            .unwrap_or(&[])
    }

    fn resolve_directory(&self, name: &PackageName, depth: usize) -> Option<PathBuf> {
        if depth > self.directories.len() {
            return None;
        }
        match self.directories.get(name)?.definition() {
            DirectoryPath::Absolute(path) => Some(path.clone()),
            DirectoryPath::Relative { base, rest } => {
                let base_path = self.resolve_directory(base, depth + 1)?;
                Some(path::join_segments(&base_path, [rest.as_str()]))
            }
        }
    }

    /// Whether `start` is, or is defined relative to, `target`.
    fn depends_on(&self, start: &PackageName, target: &PackageName) -> bool {
        let mut current = Some(start);
        let mut steps = 0;
        while let Some(name) = current {
            if name == target {
                return true;
            }
            steps += 1;
            if steps > self.directories.len() {
                return true;
            }
            current = self
                .directories
                .get(name)
                .and_then(|directory| directory.definition().base());
        }
        false
    }

    fn unknown_directory(&self, name: &PackageName) -> Error {
        let declared: Vec<&str> = self.directories.keys().map(|k| k.as_str()).collect();
        Error::UnknownDirectory {
            name: name.to_string(),
            line: None,
            hint: suggestions::unknown_directory_hint(name.as_str(), &declared),
        }
    }

    // ------------------------------------------------------------------
    // Packages
    // ------------------------------------------------------------------

    /// Get a package, creating it on first reference.
    pub fn package<N: Into<PackageName>>(&mut self, name: N) -> &mut Package {
        let name = name.into();
        let directory = self
            .directories
            .contains_key(&name)
            .then(|| name.clone());
        self.packages.entry(name.clone()).or_insert_with(|| {
            debug!("package {} created", name);
            let mut package = Package::new(name);
            package.set_directory(directory);
            package
        })
    }

    pub fn get_package<N: Into<PackageName>>(&self, name: N) -> Option<&Package> {
        self.packages.get(&name.into())
    }

    /// All known packages, ordered by name.
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    /// Place a package in a declared directory.
    pub fn set_package_directory<N, D>(&mut self, name: N, directory: D) -> Result<&Package>
    where
        N: Into<PackageName>,
        D: Into<PackageName>,
    {
        let directory = directory.into();
        if !self.directories.contains_key(&directory) {
            return Err(self.unknown_directory(&directory));
        }
        let package = self.package(name);
        package.set_directory(Some(directory));
        Ok(&*package)
    }

    /// Declare a package living at `path`, give it a directory of its own
    /// name, and enable it.
    pub fn enable_with_path<N: Into<PackageName>>(
        &mut self,
        name: N,
        path: DirectoryPath,
    ) -> Result<&Package> {
        let name = name.into();
        self.directory(name.clone(), path)?;
        let package = self.package(name.clone());
        package.set_directory(Some(name));
        package.enable();
        Ok(&*package)
    }

    // ------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------

    /// Declare a group (if needed) and add members to it.
    pub fn group<N, I, M>(&mut self, name: N, members: I) -> &PackageGroup
    where
        N: Into<PackageName>,
        I: IntoIterator<Item = M>,
        M: Into<PackageName>,
    {
        let name = name.into();
        self.declare_group(&name);
        self.add_members(name.clone(), members);
        &self.groups[&name]
    }

    /// Declare a group in its own right and apply `+name` / `-name`
    /// references to it.
    pub fn define_group<N: Into<PackageName>>(&mut self, name: N, refs: &[MemberRef]) {
        let name = name.into();
        self.declare_group(&name);
        self.apply_member_refs(name, refs);
    }

    pub fn get_group<N: Into<PackageName>>(&self, name: N) -> Option<&PackageGroup> {
        self.groups.get(&name.into())
    }

    /// All groups, ordered by name. Includes the groups implied by directories.
    pub fn groups(&self) -> impl Iterator<Item = &PackageGroup> {
        self.groups.values()
    }

    /// Add members to a group, creating the group and any unknown packages.
    ///
    /// A name matching an existing group adds that group; a name matching an
    /// existing package adds that package; a name matching neither creates a
    /// package. A group implied only by a directory never hides the package of
    /// the same name.
    pub fn add_members<N, I, M>(&mut self, group: N, members: I)
    where
        N: Into<PackageName>,
        I: IntoIterator<Item = M>,
        M: Into<PackageName>,
    {
        let group = group.into();
        self.ensure_group(&group);
        let mut resolved = Vec::new();
        for member in members {
            resolved.extend(self.member_entities(member.into()));
        }
        if let Some(target) = self.groups.get_mut(&group) {
            for member in resolved {
                target.insert(member);
            }
        }
    }

    /// Remove members from a group by name. Unknown names are ignored.
    pub fn remove_members<N, I, M>(&mut self, group: N, members: I)
    where
        N: Into<PackageName>,
        I: IntoIterator<Item = M>,
        M: Into<PackageName>,
    {
        if let Some(target) = self.groups.get_mut(&group.into()) {
            for member in members {
                target.remove_named(&member.into());
            }
        }
    }

    /// Apply a list of `+name` / `-name` references to a group, in order.
    pub fn apply_member_refs<N: Into<PackageName>>(&mut self, group: N, refs: &[MemberRef]) {
        let group = group.into();
        self.ensure_group(&group);
        for member in refs {
            match member.op {
                MemberOp::Add => self.add_members(group.clone(), [&member.name]),
                MemberOp::Remove => self.remove_members(group.clone(), [&member.name]),
            }
        }
    }

    /// Every member reachable from the group `name`, recursively, in
    /// first-seen order. Cycles between groups are visited once.
    pub fn reachable_members<N: Into<PackageName>>(&self, name: N) -> Vec<Member> {
        let root = name.into();
        let mut seen = HashSet::new();
        seen.insert(root.clone());
        let mut out = Vec::new();
        self.collect_members(&root, &mut seen, &mut out);
        out
    }

    fn collect_members(
        &self,
        group: &PackageName,
        seen: &mut HashSet<PackageName>,
        out: &mut Vec<Member>,
    ) {
        let Some(group) = self.groups.get(group) else {
            return;
        };
        for member in group.members() {
            if !out.contains(member) {
                out.push(member.clone());
            }
            if let Member::Group(name) = member {
                if seen.insert(name.clone()) {
                    self.collect_members(name, seen, out);
                }
            }
        }
    }

    /// The packages a name stands for: the package itself if one exists, plus
    /// every package reachable through a group of that name.
    pub fn expand_packages<N: Into<PackageName>>(&self, name: N) -> Vec<PackageName> {
        let name = name.into();
        let mut packages = NameSet::new();
        if self.packages.contains_key(&name) {
            packages.insert(name.clone());
        }
        for member in self.reachable_members(name) {
            if let Member::Package(package) = member {
                packages.insert(package);
            }
        }
        packages.iter().cloned().collect()
    }

    /// Whether a name refers to a known package or group.
    pub fn is_known(&self, name: &PackageName) -> bool {
        self.packages.contains_key(name) || self.groups.contains_key(name)
    }

    fn ensure_group(&mut self, name: &PackageName) {
        if !self.groups.contains_key(name) {
            let mut group = PackageGroup::new(name.clone());
            if self.directories.contains_key(name) {
                group.set_directory(Some(name.clone()));
            }
            self.groups.insert(name.clone(), group);
        }
    }

    fn declare_group(&mut self, name: &PackageName) {
        self.ensure_group(name);
        if let Some(group) = self.groups.get_mut(name) {
            group.mark_declared();
        }
    }

    /// A group that exists only because a directory has its name.
    fn is_directory_group(&self, name: &PackageName) -> bool {
        self.directories.contains_key(name)
            && self
                .groups
                .get(name)
                .is_some_and(|group| !group.is_declared())
    }

    fn member_entities(&mut self, name: PackageName) -> Vec<Member> {
        let mut members = Vec::new();
        if self.is_directory_group(&name) {
            self.package(name.clone());
            members.push(Member::Package(name));
            return members;
        }
        if self.groups.contains_key(&name) {
            members.push(Member::Group(name.clone()));
        }
        if self.packages.contains_key(&name) || members.is_empty() {
            self.package(name.clone());
            members.push(Member::Package(name));
        }
        members
    }

    // ------------------------------------------------------------------
    // Location bindings
    // ------------------------------------------------------------------

    /// Bind packages and groups to a declared directory.
    ///
    /// Added references join the directory's member set and every package
    /// they expand to is recorded in the flat location table, replacing any
    /// earlier binding (last write wins). Removed references leave the member
    /// set and drop their table entries that point at this directory.
    pub fn bind_location<D: Into<PackageName>>(
        &mut self,
        directory: D,
        refs: &[MemberRef],
    ) -> Result<()> {
        let directory = directory.into();
        if !self.directories.contains_key(&directory) {
            return Err(self.unknown_directory(&directory));
        }
        self.apply_member_refs(directory.clone(), refs);

        for member in refs {
            match member.op {
                MemberOp::Add => {
                    let directory_group = self.is_directory_group(&member.name);
                    if let Some(group) = self.groups.get_mut(&member.name) {
                        if member.name != directory && !directory_group {
                            group.set_directory(Some(directory.clone()));
                        }
                    }
                    for package in self.expand_packages(&member.name) {
                        self.record_location(package, &directory);
                    }
                }
                MemberOp::Remove => {
                    for package in self.expand_packages(&member.name) {
                        if self.locations.get(&package) == Some(&directory) {
                            debug!("unbinding {} from {}", package, directory);
                            self.locations.remove(&package);
                            if let Some(entity) = self.packages.get_mut(&package) {
                                entity.set_directory(None);
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn record_location(&mut self, package: PackageName, directory: &PackageName) {
        if let Some(previous) = self.locations.insert(package.clone(), directory.clone()) {
            if &previous != directory {
                warn!(
                    "package {} was bound to {}, now bound to {}",
                    package, previous, directory
                );
            }
        }
        self.package(package).set_directory(Some(directory.clone()));
    }

    /// The directory a package is bound to by a location expression.
    pub fn location_of<N: Into<PackageName>>(&self, name: N) -> Option<&PackageName> {
        self.locations.get(&name.into())
    }

    /// The flat package -> directory table, ordered by package name.
    pub fn locations(&self) -> impl Iterator<Item = (&PackageName, &PackageName)> {
        self.locations.iter()
    }

    // ------------------------------------------------------------------
    // General search paths
    // ------------------------------------------------------------------

    /// Append an absolute search path. Duplicates are ignored.
    pub fn add_general_path<P: Into<PathBuf>>(&mut self, path: P) -> bool {
        let path = path.into();
        if self.general_paths.contains(&path) {
            false
        } else {
            debug!("general path {}", path.display());
            self.general_paths.push(path);
            true
        }
    }

    /// Remove a search path. Returns whether it was present.
    pub fn remove_general_path(&mut self, path: &Path) -> bool {
        let before = self.general_paths.len();
        self.general_paths.retain(|existing| existing != path);
        self.general_paths.len() != before
    }

    /// Search paths in declaration order.
    pub fn general_paths(&self) -> &[PathBuf] {
        &self.general_paths
    }

    // ------------------------------------------------------------------
    // Enable state
    // ------------------------------------------------------------------

    pub fn enable_state(&self) -> &EnableState {
        &self.enable_state
    }

    pub fn enable_state_mut(&mut self) -> &mut EnableState {
        &mut self.enable_state
    }

    pub fn enabled_for_all(&self) -> bool {
        self.enable_state.enabled_for_all()
    }

    /// Enable everything: turns on `enabled_for_all` and every entity flag.
    pub fn enable_all(&mut self) {
        self.enable_state.enable_all();
        self.set_all_flags(true);
    }

    /// Disable everything: turns off `enabled_for_all` and every entity flag.
    pub fn disable_all(&mut self) {
        self.enable_state.disable_all();
        self.set_all_flags(false);
    }

    /// Enable packages and groups by name, flipping entity flags. Groups sweep
    /// all of their current members.
    pub fn enable<I, M>(&mut self, names: I)
    where
        I: IntoIterator<Item = M>,
        M: Into<PackageName>,
    {
        for name in names {
            self.set_flag(&name.into(), true);
        }
    }

    /// Mirror of [`enable`](Self::enable).
    pub fn disable<I, M>(&mut self, names: I)
    where
        I: IntoIterator<Item = M>,
        M: Into<PackageName>,
    {
        for name in names {
            self.set_flag(&name.into(), false);
        }
    }

    /// Move names, and everything reachable from them, into the global
    /// enabled set. Entity flags are not touched.
    pub fn enable_names<I, M>(&mut self, names: I)
    where
        I: IntoIterator<Item = M>,
        M: Into<PackageName>,
    {
        for name in names {
            for reached in self.name_closure(name.into()) {
                self.enable_state.enable(reached);
            }
        }
    }

    /// Mirror of [`enable_names`](Self::enable_names).
    pub fn disable_names<I, M>(&mut self, names: I)
    where
        I: IntoIterator<Item = M>,
        M: Into<PackageName>,
    {
        for name in names {
            for reached in self.name_closure(name.into()) {
                self.enable_state.disable(reached);
            }
        }
    }

    fn name_closure(&self, name: PackageName) -> Vec<PackageName> {
        let mut names = NameSet::new();
        names.insert(name.clone());
        for member in self.reachable_members(name) {
            names.insert(member.name().clone());
        }
        names.iter().cloned().collect()
    }

    fn set_flag(&mut self, name: &PackageName, enabled: bool) {
        if let Some(package) = self.packages.get_mut(name) {
            if enabled {
                package.enable();
            } else {
                package.disable();
            }
        }
        if self.groups.contains_key(name) {
            for member in self.reachable_members(name) {
                match member {
                    Member::Package(package) => {
                        if let Some(package) = self.packages.get_mut(&package) {
                            if enabled {
                                package.enable();
                            } else {
                                package.disable();
                            }
                        }
                    }
                    Member::Group(group) => {
                        if let Some(group) = self.groups.get_mut(&group) {
                            group.set_enabled(enabled);
                        }
                    }
                }
            }
            if let Some(group) = self.groups.get_mut(name) {
                group.set_enabled(enabled);
            }
        }
    }

    fn set_all_flags(&mut self, enabled: bool) {
        for package in self.packages.values_mut() {
            if enabled {
                package.enable();
            } else {
                package.disable();
            }
        }
        for group in self.groups.values_mut() {
            group.set_enabled(enabled);
        }
    }

    // ------------------------------------------------------------------
    // Loaded packages
    // ------------------------------------------------------------------

    /// Whether a package was already redirected during this session.
    pub fn is_loaded<N: Into<PackageName>>(&self, name: N) -> bool {
        self.loaded.contains(&name.into())
    }

    /// Record a package as redirected. Returns `false` if it already was.
    pub fn mark_loaded<N: Into<PackageName>>(&mut self, name: N) -> bool {
        self.loaded.insert(name.into())
    }

    /// Names redirected so far, in load order.
    pub fn loaded(&self) -> &NameSet {
        &self.loaded
    }
}
