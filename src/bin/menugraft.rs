//! Menugraft CLI Binary
//!
//! Command-line interface for grafting group menus into site menus.

use anyhow::Context;
use clap::Parser;
use menugraft::logging::init_logging;
use menugraft::tooling::cli::{Cli, CliContext};
use std::process;

fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = CliContext::load_config(cli.config.as_deref())
        .context("Error loading configuration")?;

    init_logging(Some(&cli.logging_config(&config.logging)))
        .context("Error initializing logging")?;

    let context = CliContext::from_config(config, cli.store.clone())
        .context("Error opening menu store")?;

    Ok(context.execute(&cli.command)?)
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
