//! # Check Command Implementation
//!
//! This module implements the `check` subcommand, which loads a configuration
//! file into a fresh registry and reports a summary of what it declares. The
//! first malformed expression or unknown name stops the check with an error
//! naming its line.
//!
//! With `--strict`, enable/disable names and member removals must refer to
//! known packages or groups.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;

use super::ConfigArgs;
use devroute::config::ParseOptions;
use devroute::output::OutputConfig;
use devroute::registry::Registry;

/// Validate a configuration file
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Reject references to unknown packages and groups
    #[arg(long)]
    pub strict: bool,
}

/// Execute the `check` command.
pub fn execute(args: CheckArgs, output: &OutputConfig) -> Result<()> {
    match args.config.config_path() {
        Some(path) => println!("Loading configuration from: {}", path.display()),
        None => println!("No home directory; nothing to load"),
    }

    let options = ParseOptions {
        strict: args.strict,
    };
    let session = args.config.load_session(options)?;

    println!("{} Configuration is valid", output.ok());
    for line in summary(session.registry()) {
        println!("   {}", line);
    }
    Ok(())
}

/// Counts of what a registry holds, one line per kind.
fn summary(registry: &Registry) -> Vec<String> {
    let state = registry.enable_state();
    let enabled = if state.enabled_for_all() {
        format!(
            "all packages enabled ({} disabled by name)",
            state.disabled_names().len()
        )
    } else {
        format!("{} names enabled", state.enabled_names().len())
    };
    vec![
        format!("{} directories", registry.directories().count()),
        format!("{} groups", registry.groups().count()),
        format!("{} packages", registry.packages().count()),
        format!("{} location bindings", registry.locations().count()),
        format!("{} search paths", registry.general_paths().len()),
        enabled,
    ]
}
