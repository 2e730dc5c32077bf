//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures and helper functions to reduce
//! duplication across test files.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_config(configs::WEB_STACK);
//!     fixture.command_with_config("check").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    pub use super::TestFixture;
}

/// Common configuration snippets for testing.
#[allow(dead_code)]
pub mod configs {
    /// A directory, a group bound to it, and the group enabled.
    pub const WEB_STACK: &str = "\
# web development checkouts
+code ~/Projects
=web rack,
     sinatra
@code web
!enable web
";

    /// Everything enabled, found through a search path.
    pub const SEARCH_PATH: &str = "\
~/src
!enable
!disable legacy
";

    /// Missing path on a directory expression (line 2).
    pub const MALFORMED: &str = "+code ~/Projects\n+broken\n";

    /// Location binding to an undeclared directory (line 3).
    pub const UNKNOWN_DIRECTORY: &str = "+projects ~/Projects\n\n@projets rack\n";
}

/// A temporary home directory holding an optional `.devroute` file and
/// package checkouts.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `.devroute` with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child(".devroute")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Create an (empty) entry source file for a package checkout at
    /// `root`, relative to the fixture, e.g. `Projects/rack` with name `rack`.
    pub fn with_package(self, root: &str, name: &str) -> Self {
        self.temp_dir
            .child(root)
            .child("lib")
            .child(format!("{}.rb", name))
            .touch()
            .expect("Failed to create package file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join(".devroute")
    }

    /// A command with this fixture as working and home directory, and no
    /// inherited configuration override.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("devroute");
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env_remove("DEVROUTE_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--color")
            .arg("never");
        cmd
    }

    /// Run `subcommand` with `--config` pointing at this fixture's `.devroute`.
    #[allow(dead_code)]
    pub fn command_with_config(&self, subcommand: &str) -> assert_cmd::Command {
        let mut cmd = self.command();
        cmd.arg(subcommand).arg("--config").arg(self.config_path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
