//! # devroute CLI
//!
//! This is the binary entry point for the `devroute` command-line tool.
//!
//! It parses command-line arguments with `clap`, runs the selected command,
//! and reports top-level errors. The core logic lives in the library crate;
//! the binary only inspects configurations and explains resolution decisions.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
