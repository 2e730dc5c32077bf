//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

use crate::commands;
use devroute::output::OutputConfig;

/// devroute - Redirect package loads to local development checkouts
#[derive(Parser, Debug)]
#[command(name = "devroute")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse and apply a configuration file, reporting the first error
    Check(commands::check::CheckArgs),

    /// Explain where package requests would be loaded from
    Resolve(commands::resolve::ResolveArgs),

    /// Print the state a configuration produces
    Show(commands::show::ShowArgs),

    /// Display directories and groups as a tree
    Tree(commands::tree::TreeArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        // RUST_LOG wins over --log-level when set
        let _ = env_logger::Builder::from_env(Env::default().default_filter_or(&self.log_level))
            .format_timestamp(None)
            .try_init();

        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Check(args) => commands::check::execute(args, &output),
            Commands::Resolve(args) => commands::resolve::execute(args, &output),
            Commands::Show(args) => commands::show::execute(args, &output),
            Commands::Tree(args) => commands::tree::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
