//! # Show Command Implementation
//!
//! Prints everything a configuration declares: directories with their live
//! paths, groups, packages, location bindings, search paths, and the global
//! enable state. `--json` prints the same as a JSON document.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::ConfigArgs;
use devroute::config::ParseOptions;
use devroute::directory::DirectoryPath;
use devroute::enable::EnableState;
use devroute::group::PackageGroup;
use devroute::name::PackageName;
use devroute::output::OutputConfig;
use devroute::package::Package;
use devroute::registry::Registry;

/// Print the registry state a configuration produces
#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct DirectoryEntry<'a> {
    name: &'a PackageName,
    definition: &'a DirectoryPath,
    path: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    directories: Vec<DirectoryEntry<'a>>,
    groups: Vec<&'a PackageGroup>,
    packages: Vec<&'a Package>,
    locations: BTreeMap<&'a PackageName, &'a PackageName>,
    general_paths: &'a [PathBuf],
    enable_state: &'a EnableState,
}

impl<'a> Snapshot<'a> {
    fn new(registry: &'a Registry) -> Self {
        Self {
            directories: registry
                .directories()
                .map(|directory| DirectoryEntry {
                    name: directory.name(),
                    definition: directory.definition(),
                    path: registry.directory_path(directory.name()),
                })
                .collect(),
            groups: registry.groups().collect(),
            packages: registry.packages().collect(),
            locations: registry.locations().collect(),
            general_paths: registry.general_paths(),
            enable_state: registry.enable_state(),
        }
    }
}

/// Execute the `show` command.
pub fn execute(args: ShowArgs, output: &OutputConfig) -> Result<()> {
    let session = args.config.load_session(ParseOptions::default())?;
    let snapshot = Snapshot::new(session.registry());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render(&snapshot, output));
    }
    Ok(())
}

fn render(snapshot: &Snapshot<'_>, output: &OutputConfig) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", output.heading("Directories")));
    for directory in &snapshot.directories {
        let path = directory
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "?".to_string());
        let definition = match directory.definition {
            DirectoryPath::Absolute(_) => String::new(),
            DirectoryPath::Relative { base, rest } => format!("  (@{}/{})", base, rest),
        };
        out.push_str(&format!(
            "  {} {}{}\n",
            output.name(directory.name),
            path,
            definition
        ));
    }

    out.push_str(&format!("{}\n", output.heading("Groups")));
    for group in &snapshot.groups {
        let members: Vec<&str> = group.members().iter().map(|m| m.name().as_str()).collect();
        out.push_str(&format!(
            "  {}: {}\n",
            output.name(group.name()),
            members.join(", ")
        ));
    }

    out.push_str(&format!("{}\n", output.heading("Locations")));
    for (package, directory) in &snapshot.locations {
        out.push_str(&format!("  {} -> @{}\n", output.name(package), directory));
    }

    out.push_str(&format!("{}\n", output.heading("Search paths")));
    for path in snapshot.general_paths {
        out.push_str(&format!("  {}\n", path.display()));
    }

    let state = snapshot.enable_state;
    out.push_str(&format!("{}\n", output.heading("Enabled")));
    out.push_str(&format!("  for all: {}\n", state.enabled_for_all()));
    let enabled: Vec<&str> = state.enabled_names().iter().map(|n| n.as_str()).collect();
    let disabled: Vec<&str> = state.disabled_names().iter().map(|n| n.as_str()).collect();
    out.push_str(&format!("  enabled: {}\n", enabled.join(", ")));
    out.push_str(&format!("  disabled: {}\n", disabled.join(", ")));
    out
}
