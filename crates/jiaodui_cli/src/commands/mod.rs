//! Subcommand implementations

mod check;
mod init;
mod merge;
mod rules;

use std::fs;
use std::path::Path;

use miette::{IntoDiagnostic, Result, WrapErr};
use serde::de::DeserializeOwned;
use tracing::info;

use jiaodui_core::EngineConfig;

use crate::cli::Cli;

pub use check::run_check;
pub use init::run_init;
pub use merge::run_merge;
pub use rules::run_rules;

/// Loads `--config`, or a config file found in the working directory.
pub fn load_config(cli: &Cli) -> Result<EngineConfig> {
    if let Some(path) = &cli.config {
        return EngineConfig::from_file(path).into_diagnostic();
    }

    if let Some(path) = EngineConfig::discover(".") {
        info!("Using config: {}", path.display());
        return EngineConfig::from_file(&path).into_diagnostic();
    }

    info!("No config file found, using defaults");
    Ok(EngineConfig::new())
}

/// Reads and deserializes a JSON input file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .into_diagnostic()
        .wrap_err_with(|| format!("Invalid JSON in {}", path.display()))
}
