//! Global enable state driven by `!enable` / `!disable` expressions.
//!
//! `enabled` and `disabled` never share a name: inserting into one removes
//! from the other.

use crate::name::{NameSet, PackageName};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnableState {
    enabled_for_all: bool,
    enabled: NameSet,
    disabled: NameSet,
}

impl EnableState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled_for_all(&self) -> bool {
        self.enabled_for_all
    }

    pub fn enabled_names(&self) -> &NameSet {
        &self.enabled
    }

    pub fn disabled_names(&self) -> &NameSet {
        &self.disabled
    }

    /// Enable everything: turn on `enabled_for_all` and move every disabled
    /// name into the enabled set.
    pub fn enable_all(&mut self) {
        self.enabled_for_all = true;
        let moved: Vec<PackageName> = self.disabled.drain().collect();
        for name in moved {
            self.enabled.insert(name);
        }
    }

    /// Mirror of [`enable_all`](Self::enable_all).
    pub fn disable_all(&mut self) {
        self.enabled_for_all = false;
        let moved: Vec<PackageName> = self.enabled.drain().collect();
        for name in moved {
            self.disabled.insert(name);
        }
    }

    pub fn enable(&mut self, name: PackageName) {
        self.disabled.remove(&name);
        self.enabled.insert(name);
    }

    pub fn disable(&mut self, name: PackageName) {
        self.enabled.remove(&name);
        self.disabled.insert(name);
    }

    /// Whether a load request for `name` should be considered for redirection.
    pub fn should_attempt(&self, name: &PackageName) -> bool {
        self.enabled.contains(name) || (self.enabled_for_all && !self.disabled.contains(name))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
