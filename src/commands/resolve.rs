//! # Resolve Command Implementation
//!
//! Explains, for each requested name, where the package would be loaded from
//! under the loaded configuration, or why no override applies. Nothing is
//! loaded and no state is recorded between names.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::ConfigArgs;
use devroute::config::ParseOptions;
use devroute::output::OutputConfig;
use devroute::resolver::Resolution;

/// Explain package resolution
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Package names as they would be requested (e.g. `rack`, `module/cluster`)
    #[arg(required = true, value_name = "NAME")]
    pub names: Vec<String>,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Print decisions as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct Decision<'a> {
    name: &'a str,
    resolution: Resolution,
}

/// Execute the `resolve` command.
pub fn execute(args: ResolveArgs, output: &OutputConfig) -> Result<()> {
    let session = args.config.load_session(ParseOptions::default())?;

    let decisions: Vec<Decision<'_>> = args
        .names
        .iter()
        .map(|name| Decision {
            name,
            resolution: session.try_resolve(name),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decisions)?);
        return Ok(());
    }

    for decision in &decisions {
        let marker = if decision.resolution.is_resolved() {
            output.ok()
        } else {
            output.skip()
        };
        println!(
            "{} {}: {}",
            marker,
            output.name(decision.name),
            decision.resolution.describe()
        );
    }
    Ok(())
}
