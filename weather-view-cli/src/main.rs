//! Binary crate for the `weather-view` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive search session and configuration prompts
//! - Terminal rendering of the component's result container

use clap::Parser;

mod cli;
mod display;
mod session;
mod tracing_setup;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    tracing_setup::init_subscriber(tracing_setup::Verbosity::from_flags(cmd.verbose, cmd.quiet));
    cmd.run().await
}
