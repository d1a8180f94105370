//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use jiaodui_core::Category;

/// Jiaodui - proofreading gate for Chinese articles
#[derive(Parser)]
#[command(name = "jdlint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Proofread article payloads
    Check {
        /// Payload JSON files
        #[arg(required = true)]
        payloads: Vec<PathBuf>,

        /// AI result to merge with the rule engine findings
        #[arg(long)]
        ai: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Measure per-rule performance
        #[arg(long)]
        timings: bool,
    },

    /// Merge an AI result with rule engine issues
    Merge {
        /// AI result JSON
        ai: PathBuf,

        /// Rule engine issues: an array of issues or a result object
        script: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the loaded rules
    Rules {
        /// Only show one category (A-F)
        #[arg(long, value_parser = parse_category)]
        category: Option<Category>,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Sarif,
}

fn parse_category(value: &str) -> Result<Category, String> {
    Category::from_letter(value).ok_or_else(|| format!("unknown category '{value}', expected A-F"))
}
