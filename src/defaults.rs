//! Default values for devroute configuration.
//!
//! This module provides centralized default values used across the library
//! and the commands, ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Name of the configuration file looked up in the home directory.
pub const DEFAULT_CONFIG_FILENAME: &str = ".devroute";

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV_VAR: &str = "DEVROUTE_CONFIG";

/// Directory below a package root that holds its source files.
pub const DEFAULT_LIB_DIR: &str = "lib";

/// Extension of a package's entry source file.
pub const DEFAULT_EXTENSION: &str = "rb";

/// Returns the default configuration file path, `~/.devroute`.
///
/// Returns `None` if the home directory cannot be determined. This can be
/// overridden by the `--config` CLI flag or the `DEVROUTE_CONFIG`
/// environment variable.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path_ends_with_filename() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with(DEFAULT_CONFIG_FILENAME));
        }
    }

    #[test]
    fn test_default_layout_values() {
        assert_eq!(DEFAULT_LIB_DIR, "lib");
        assert_eq!(DEFAULT_EXTENSION, "rb");
    }
}
