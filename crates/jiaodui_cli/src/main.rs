//! Jiaodui CLI
//!
//! Proofreads article payloads with the deterministic rule engine, merges
//! AI findings and gates publishing through the exit code.

mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::{run_check, run_init, run_merge, run_rules};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(blocked) => {
            if blocked {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether any report has a blocking issue.
fn run(cli: &Cli) -> Result<bool> {
    match &cli.command {
        Commands::Check {
            payloads,
            ai,
            format,
            timings,
        } => run_check(cli, payloads, ai.as_deref(), *format, *timings),
        Commands::Merge { ai, script, format } => run_merge(ai, script, *format),
        Commands::Rules { category } => run_rules(cli, *category).map(|_| false),
        Commands::Init { force } => run_init(*force).map(|_| false),
    }
}
