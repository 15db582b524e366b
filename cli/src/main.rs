//! flashlab - flash-loan price manipulation simulator.
//!
//! This is the entry point for the `flashlab` binary.

use std::io;

use anyhow::Result;
use clap::Parser;

use flashlab_cli::{execute, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    let stdout = io::stdout();
    execute(&cli.command, &mut stdout.lock())
}
