//! # Output Configuration
//!
//! Controls how CLI output looks: whether colors and status markers are used,
//! based on terminal capabilities and user preferences.
//!
//! The following flags and environment variables are respected:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use console::style;
use std::env;
use std::fmt::Display;

/// Output configuration for controlling colors and markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from the environment and the value of
    /// the `--color` flag (`always`, `never` or `auto`).
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };
        Self { use_color }
    }

    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    fn detect_color_support() -> bool {
        // presence alone disables, even if empty
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }
        console::Term::stdout().features().colors_supported()
    }

    /// Marker for a successful outcome.
    pub fn ok(&self) -> String {
        if self.use_color {
            style("✓").green().to_string()
        } else {
            "[ok]".to_string()
        }
    }

    /// Marker for a declined or failed outcome.
    pub fn skip(&self) -> String {
        if self.use_color {
            style("✗").yellow().to_string()
        } else {
            "[--]".to_string()
        }
    }

    /// Section heading.
    pub fn heading<T: Display>(&self, text: T) -> String {
        if self.use_color {
            style(text).bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// A name from the configuration (directory, group, package).
    pub fn name<T: Display>(&self, text: T) -> String {
        if self.use_color {
            style(text).cyan().to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}
