//! JSON output formatter

use miette::{IntoDiagnostic, Result};

use super::Report;

pub fn output_json(reports: &[Report]) -> Result<()> {
    let output: Vec<_> = reports.iter().map(report_json).collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&output).into_diagnostic()?
    );
    Ok(())
}

fn report_json(report: &Report) -> serde_json::Value {
    let failures: Vec<_> = report
        .failures
        .iter()
        .map(|f| serde_json::json!({ "rule_id": f.rule_id, "message": f.message }))
        .collect();

    serde_json::json!({
        "path": report.name,
        "publishable": report.result.is_publishable(),
        "result": report.result,
        "failures": failures,
    })
}
