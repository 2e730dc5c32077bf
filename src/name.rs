//! Canonical package names and ordered name sets.
//!
//! A package can be spelled two ways: the directory spelling (`foo-bar`),
//! which is how its checkout is named on disk, and the require spelling
//! (`foo/bar`), which is how code asks for it. Both refer to the same entity;
//! every registry lookup is keyed by the directory spelling.

use regex::Regex;
use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;
use std::sync::OnceLock;

/// Convert a name to its directory spelling (`/` becomes `-`).
pub fn directory_name(name: &str) -> String {
    name.replace('/', "-")
}

/// Convert a name to its require spelling (`-` becomes `/`).
pub fn require_name(name: &str) -> String {
    name.replace('-', "/")
}

/// A canonical (directory-spelled) name of a package, group or directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    /// Canonicalize `name`. Normalizing an already canonical name is a no-op.
    pub fn new(name: &str) -> Self {
        Self(directory_name(name.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The require spelling of this name.
    pub fn require_name(&self) -> String {
        require_name(&self.0)
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PackageName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&String> for PackageName {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl From<&PackageName> for PackageName {
    fn from(name: &PackageName) -> Self {
        name.clone()
    }
}

impl Borrow<str> for PackageName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// An insertion-ordered set of names without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NameSet(Vec<PackageName>);

impl NameSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `name` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, name: PackageName) -> bool {
        if self.contains(&name) {
            false
        } else {
            self.0.push(name);
            true
        }
    }

    /// Remove `name`. Returns whether it was present.
    pub fn remove(&mut self, name: &PackageName) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != name);
        self.0.len() != before
    }

    pub fn contains(&self, name: &PackageName) -> bool {
        self.0.iter().any(|existing| existing == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PackageName> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Move every name out of the set, leaving it empty.
    pub fn drain(&mut self) -> std::vec::Drain<'_, PackageName> {
        self.0.drain(..)
    }
}

impl<'a> IntoIterator for &'a NameSet {
    type Item = &'a PackageName;
    type IntoIter = std::slice::Iter<'a, PackageName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<PackageName> for NameSet {
    fn from_iter<I: IntoIterator<Item = PackageName>>(iter: I) -> Self {
        let mut set = NameSet::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

fn separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[\s,]+").expect("separator pattern is valid"))
}

/// Split a member list on commas and whitespace, dropping empty tokens.
///
/// `"a, +b,-c d,"` yields `["a", "+b", "-c", "d"]`.
pub fn split_members(list: &str) -> Vec<&str> {
    separator()
        .split(list)
        .filter(|token| !token.is_empty())
        .collect()
}
