//! Output formatting module

mod json;
mod sarif;
mod text;

use miette::Result;

use jiaodui_core::{ProofreadingResult, RuleFailure, RuleTiming};

use crate::cli::OutputFormat;

/// One proofread article, ready for printing.
pub struct Report {
    /// Input file the report was produced from.
    pub name: String,
    pub result: ProofreadingResult,
    pub failures: Vec<RuleFailure>,
    pub timings: Vec<RuleTiming>,
}

/// Prints the reports and returns whether any of them blocks publishing.
pub fn output_reports(reports: &[Report], format: OutputFormat, timings: bool) -> Result<bool> {
    let blocked = reports.iter().any(|r| !r.result.is_publishable());

    match format {
        OutputFormat::Sarif => sarif::output_sarif(reports)?,
        OutputFormat::Json => json::output_json(reports)?,
        OutputFormat::Text => text::output_text(reports, timings),
    }

    Ok(blocked)
}
