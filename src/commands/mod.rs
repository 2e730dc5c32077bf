//! # CLI Command Implementations
//!
//! Each subcommand of the `devroute` tool lives in its own file with an
//! `Args` struct derived using `clap` and an `execute` function. Commands are
//! read-only: they load a configuration into a fresh session and report on it.
//!
//! [`ConfigArgs`] holds the options shared by every command that reads a
//! configuration.

pub mod check;
pub mod completions;
pub mod resolve;
pub mod show;
pub mod tree;

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use devroute::config::ParseOptions;
use devroute::defaults::{self, DEFAULT_EXTENSION, DEFAULT_LIB_DIR};
use devroute::resolver::Layout;
use devroute::session::Session;
use devroute::suggestions;

/// Options for locating and reading a configuration file.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Configuration file to load.
    ///
    /// Defaults to `~/.devroute`, which is skipped if it does not exist. An
    /// explicitly given file must exist.
    #[arg(short, long, value_name = "FILE", env = defaults::CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// Directory below a package root that holds its source files
    #[arg(long, value_name = "DIR", default_value = DEFAULT_LIB_DIR)]
    pub lib_dir: String,

    /// Extension of a package's entry source file
    #[arg(long, value_name = "EXT", default_value = DEFAULT_EXTENSION)]
    pub extension: String,
}

impl ConfigArgs {
    /// The configuration file that will be read, if any can be determined.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(defaults::default_config_path)
    }

    /// Build a session over the real filesystem and load the configuration.
    pub fn load_session(&self, options: ParseOptions) -> Result<Session> {
        let mut session = Session::new()
            .with_layout(Layout::new(self.lib_dir.as_str(), self.extension.as_str()))
            .with_options(options);

        match &self.config {
            Some(path) => {
                if !path.exists() {
                    return Err(suggestions::config_not_found(path));
                }
                session.load_config_file(path, true).map_err(|e| {
                    anyhow::anyhow!("Failed to load config from {}: {}", path.display(), e)
                })?;
            }
            None => {
                session
                    .load_default_config()
                    .map_err(|e| anyhow::anyhow!("Failed to load default config: {}", e))?;
            }
        }
        Ok(session)
    }
}
