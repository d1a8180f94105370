//! Merge command implementation

use std::path::Path;

use miette::{IntoDiagnostic, Result, WrapErr};
use serde_json::Value;
use tracing::info;

use jiaodui_core::{ProofreadingIssue, ProofreadingResult, RuleSource, merge_with_outcome};

use super::read_json;
use crate::cli::OutputFormat;
use crate::output::{Report, output_reports};

pub fn run_merge(ai: &Path, script: &Path, format: OutputFormat) -> Result<bool> {
    let ai_result: ProofreadingResult = read_json(ai)?;
    let script_issues = parse_script_issues(read_json(script)?)
        .wrap_err_with(|| format!("Invalid script issues in {}", script.display()))?;

    let (result, outcome) = merge_with_outcome(&ai_result, &script_issues);
    info!(
        "Merged: {} ai-only, {} script-only, {} shared",
        outcome.ai_only,
        outcome.script_only,
        outcome.merged
    );

    let report = Report {
        name: ai.display().to_string(),
        result,
        failures: Vec::new(),
        timings: Vec::new(),
    };
    output_reports(&[report], format, false)
}

/// Accepts either an array of issues or a full result object.
///
/// Issues without an explicit `source` deserialize as AI findings; here they
/// came from the rule engine, so they are tagged as such.
fn parse_script_issues(value: Value) -> Result<Vec<ProofreadingIssue>> {
    let issues: Vec<ProofreadingIssue> = if value.is_array() {
        serde_json::from_value(value).into_diagnostic()?
    } else {
        serde_json::from_value::<ProofreadingResult>(value)
            .into_diagnostic()?
            .issues
    };

    Ok(issues
        .into_iter()
        .map(|issue| match issue.source {
            RuleSource::Ai => issue.with_source(RuleSource::Script),
            _ => issue,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_input_is_tagged_as_script() {
        let value = json!([{ "rule_id": "A-TYPO-001", "category": "A", "evidence": "按装" }]);

        let issues = parse_script_issues(value).unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].source, RuleSource::Script);
    }

    #[test]
    fn test_result_object_input() {
        let value = json!({
            "issues": [
                { "rule_id": "A-TYPO-001", "category": "A" },
                { "rule_id": "B-DE-001", "category": "B", "source": "SCRIPT" }
            ]
        });

        let issues = parse_script_issues(value).unwrap();

        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.source == RuleSource::Script));
    }

    #[test]
    fn test_missing_rule_id_fails() {
        let value = json!([{ "category": "A" }]);
        assert!(parse_script_issues(value).is_err());
    }
}
