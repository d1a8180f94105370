//! SARIF (Static Analysis Results Interchange Format) output formatter.
//!
//! Emits SARIF 2.1.0 with one run. Regions use character offsets into the
//! payload field named by the artifact URI fragment.

use std::collections::BTreeMap;

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use jiaodui_core::{ProofreadingIssue, Severity};

use super::Report;

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str =
    "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "jdlint";

pub fn output_sarif(reports: &[Report]) -> Result<()> {
    println!("{}", generate_sarif(reports).into_diagnostic()?);
    Ok(())
}

fn generate_sarif(reports: &[Report]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&SarifLog::from_reports(reports))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLog {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: Vec<Run>,
}

impl SarifLog {
    fn from_reports(reports: &[Report]) -> Self {
        Self {
            schema: SARIF_SCHEMA,
            version: SARIF_VERSION,
            runs: vec![Run::from_reports(reports)],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Run {
    tool: Tool,
    results: Vec<SarifResult>,
}

impl Run {
    fn from_reports(reports: &[Report]) -> Self {
        let mut results = Vec::new();
        let mut rules: BTreeMap<String, ReportingDescriptor> = BTreeMap::new();

        for report in reports {
            for issue in &report.result.issues {
                results.push(SarifResult::from_issue(issue, &report.name));
                rules
                    .entry(issue.rule_id.clone())
                    .or_insert_with(|| ReportingDescriptor::new(issue));
            }
        }

        Self {
            tool: Tool {
                driver: ToolComponent {
                    name: TOOL_NAME,
                    version: option_env!("CARGO_PKG_VERSION"),
                    rules: rules.into_values().collect(),
                },
            },
            results,
        }
    }
}

#[derive(Debug, Serialize)]
struct Tool {
    driver: ToolComponent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolComponent {
    name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    rules: Vec<ReportingDescriptor>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportingDescriptor {
    id: String,
    short_description: Message,
}

impl ReportingDescriptor {
    fn new(issue: &ProofreadingIssue) -> Self {
        Self {
            id: issue.rule_id.clone(),
            short_description: Message::text(issue.category.description()),
        }
    }
}

#[derive(Debug, Serialize)]
struct Message {
    text: String,
}

impl Message {
    fn text(s: impl Into<String>) -> Self {
        Self { text: s.into() }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult {
    rule_id: String,
    level: &'static str,
    message: Message,
    locations: Vec<Location>,
    properties: Properties,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Properties {
    category: String,
    source: String,
    confidence: f64,
    blocks_publish: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<String>,
}

impl SarifResult {
    fn from_issue(issue: &ProofreadingIssue, name: &str) -> Self {
        let level = match issue.severity {
            Severity::Critical | Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "note",
        };

        Self {
            rule_id: issue.rule_id.clone(),
            level,
            message: Message::text(&issue.message),
            locations: vec![Location::from_issue(issue, name)],
            properties: Properties {
                category: issue.category.to_string(),
                source: issue.source.to_string(),
                confidence: issue.confidence,
                blocks_publish: issue.blocks_publish,
                suggestion: issue.suggestion.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Location {
    physical_location: PhysicalLocation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PhysicalLocation {
    artifact_location: ArtifactLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<Region>,
}

#[derive(Debug, Serialize)]
struct ArtifactLocation {
    uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Region {
    char_offset: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    char_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    snippet: Option<Message>,
}

impl Location {
    fn from_issue(issue: &ProofreadingIssue, name: &str) -> Self {
        let location = issue.location.as_ref();
        let uri = match location.and_then(|loc| loc.field.as_deref()) {
            Some(field) => format!("{name}#{field}"),
            None => name.to_string(),
        };
        let region = location
            .and_then(|loc| loc.offset.map(|offset| (offset, loc.length)))
            .map(|(char_offset, char_length)| Region {
                char_offset,
                char_length,
                snippet: issue.evidence.as_deref().map(Message::text),
            });

        Self {
            physical_location: PhysicalLocation {
                artifact_location: ArtifactLocation { uri },
                region,
            },
        }
    }
}
