//! Package groups.
//!
//! A group is an ordered, duplicate-free list of packages and other groups
//! that can be enabled or disabled as a unit. Every named directory is also a
//! group of the same name whose members are the packages bound to it.

use crate::name::PackageName;
use serde::Serialize;

/// One entry of a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Member {
    Package(PackageName),
    Group(PackageName),
}

impl Member {
    pub fn name(&self) -> &PackageName {
        match self {
            Member::Package(name) | Member::Group(name) => name,
        }
    }
}

/// Whether a member reference adds to or removes from a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberOp {
    Add,
    Remove,
}

/// A member reference from a configuration expression: `pkg`, `+pkg` or `-pkg`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRef {
    pub op: MemberOp,
    pub name: PackageName,
}

impl MemberRef {
    pub fn add<N: Into<PackageName>>(name: N) -> Self {
        Self {
            op: MemberOp::Add,
            name: name.into(),
        }
    }

    pub fn remove<N: Into<PackageName>>(name: N) -> Self {
        Self {
            op: MemberOp::Remove,
            name: name.into(),
        }
    }

    /// Parse a single token. A trailing comma is ignored; a leading `+` or
    /// `-` selects the operation. Returns `None` if no name is left.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim().trim_end_matches(',');
        let (op, name) = if let Some(name) = token.strip_prefix('+') {
            (MemberOp::Add, name)
        } else if let Some(name) = token.strip_prefix('-') {
            (MemberOp::Remove, name)
        } else {
            (MemberOp::Add, token)
        };
        if name.is_empty() {
            None
        } else {
            Some(Self {
                op,
                name: PackageName::new(name),
            })
        }
    }
}

/// A named, ordered set of packages and groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageGroup {
    name: PackageName,
    members: Vec<Member>,
    directory: Option<PackageName>,
    enabled: bool,
    #[serde(skip)]
    declared: bool,
}

impl PackageGroup {
    pub fn new(name: PackageName) -> Self {
        Self {
            name,
            members: Vec::new(),
            directory: None,
            enabled: false,
            declared: false,
        }
    }

    pub fn name(&self) -> &PackageName {
        &self.name
    }

    /// Members in insertion order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn contains(&self, member: &Member) -> bool {
        self.members.contains(member)
    }

    /// Append a member unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, member: Member) -> bool {
        if self.contains(&member) {
            false
        } else {
            self.members.push(member);
            true
        }
    }

    /// Remove every member (package or group) with the given name.
    pub fn remove_named(&mut self, name: &PackageName) -> bool {
        let before = self.members.len();
        self.members.retain(|member| member.name() != name);
        self.members.len() != before
    }

    pub fn directory(&self) -> Option<&PackageName> {
        self.directory.as_ref()
    }

    pub fn set_directory(&mut self, directory: Option<PackageName>) {
        self.directory = directory;
    }

    /// Whether the group was declared in its own right rather than only
    /// implied by a directory of the same name.
    pub fn is_declared(&self) -> bool {
        self.declared
    }

    pub(crate) fn mark_declared(&mut self) {
        self.declared = true;
    }

    /// The group's own flag. Propagation to members is done by the registry.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
