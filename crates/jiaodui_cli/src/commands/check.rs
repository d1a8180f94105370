//! Check command implementation

use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result, miette};
use tracing::{info, warn};

use jiaodui_core::{ArticlePayload, ProofreadingResult, RuleEngine, merge};

use super::{load_config, read_json};
use crate::cli::{Cli, OutputFormat};
use crate::output::{Report, output_reports};

pub fn run_check(
    cli: &Cli,
    paths: &[PathBuf],
    ai: Option<&Path>,
    format: OutputFormat,
    timings: bool,
) -> Result<bool> {
    if ai.is_some() && paths.len() > 1 {
        return Err(miette!("--ai can only be used with a single payload"));
    }

    let mut config = load_config(cli)?;
    if timings {
        config.timings = true;
    }
    let timings_enabled = config.timings;

    let payloads = paths
        .iter()
        .map(|path| read_json::<ArticlePayload>(path))
        .collect::<Result<Vec<_>>>()?;

    let engine = RuleEngine::new(config).into_diagnostic()?;
    info!(
        "Checking {} payload(s) with {} rules",
        payloads.len(),
        engine.registry().len()
    );

    let evaluations = engine.evaluate_batch_detailed(&payloads);

    let ai_result = ai.map(read_json::<ProofreadingResult>).transpose()?;

    let reports: Vec<Report> = paths
        .iter()
        .zip(evaluations)
        .map(|(path, evaluation)| {
            if !evaluation.failures.is_empty() {
                warn!(
                    "{}: {} rule(s) failed",
                    path.display(),
                    evaluation.failures.len()
                );
            }
            let result = match &ai_result {
                Some(ai_result) => merge(ai_result, &evaluation.result.issues),
                None => evaluation.result,
            };
            Report {
                name: path.display().to_string(),
                result,
                failures: evaluation.failures,
                timings: evaluation.timings,
            }
        })
        .collect();

    output_reports(&reports, format, timings_enabled)
}
