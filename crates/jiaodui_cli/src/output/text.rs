//! Text output formatter

use std::collections::HashMap;
use std::time::Duration;

use jiaodui_core::ProofreadingIssue;

use super::Report;

pub fn output_text(reports: &[Report], timings: bool) {
    for report in reports {
        let result = &report.result;
        println!("\n{}:", report.name);

        for issue in &result.issues {
            println!("  {}", format_issue(issue));
        }
        for failure in &report.failures {
            println!("  rule failed [{}]: {}", failure.rule_id, failure.message);
        }

        let verdict = if result.is_publishable() {
            "publishable"
        } else {
            "BLOCKED"
        };
        println!(
            "  {} issues ({} blocking), {}",
            result.statistics.total_issues, result.statistics.blocking_issue_count, verdict
        );
    }

    let total_issues: usize = reports.iter().map(|r| r.result.issues.len()).sum();
    let blocked = reports
        .iter()
        .filter(|r| !r.result.is_publishable())
        .count();

    println!();
    println!(
        "Checked {} articles ({} blocked), found {} issues",
        reports.len(),
        blocked,
        total_issues
    );

    if timings {
        output_timings(reports);
    }
}

fn format_issue(issue: &ProofreadingIssue) -> String {
    let position = issue
        .location
        .as_ref()
        .and_then(|loc| match (&loc.field, loc.offset) {
            (Some(field), Some(offset)) => Some(format!("{field}:{offset}")),
            (Some(field), None) => Some(field.clone()),
            (None, Some(offset)) => Some(offset.to_string()),
            (None, None) => None,
        })
        .unwrap_or_else(|| "-".to_string());

    let mut line = format!(
        "{} {} [{}] {}: {}",
        position, issue.severity, issue.rule_id, issue.source, issue.message
    );
    if let Some(suggestion) = issue.suggestion.as_deref().filter(|s| !s.is_empty()) {
        line.push_str(&format!(" (suggest: {suggestion})"));
    }
    if issue.blocks_publish {
        line.push_str(" [blocks publish]");
    }
    line
}

fn output_timings(reports: &[Report]) {
    let mut total_duration = Duration::new(0, 0);
    let mut rule_timings: HashMap<&str, Duration> = HashMap::new();

    for report in reports {
        for timing in &report.timings {
            *rule_timings.entry(&timing.rule_id).or_default() += timing.duration;
            total_duration += timing.duration;
        }
    }

    if !rule_timings.is_empty() {
        println!("\nPerformance Timings:");
        println!("{:<30} | {:<15} | {:<10}", "Rule", "Duration", "%");
        println!("{:-<30}-+-{:-<15}-+-{:-<10}", "", "", "");

        let mut sorted_timings: Vec<_> = rule_timings.into_iter().collect();
        sorted_timings.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

        for (rule, duration) in sorted_timings.iter().take(20) {
            let percentage = if total_duration.as_secs_f64() > 0.0 {
                (duration.as_secs_f64() / total_duration.as_secs_f64()) * 100.0
            } else {
                0.0
            };
            println!("{:<30} | {:<15?} | {:<10.1}%", rule, duration, percentage);
        }
        println!("{:-<30}-+-{:-<15}-+-{:-<10}", "", "", "");
        println!("{:<30} | {:<15?}", "Total", total_duration);
    }
}
