//! Proofreading report.

use serde::{Deserialize, Serialize};

use crate::{ProofreadingIssue, ProofreadingStatistics};

/// A proofreading report: issues plus their statistics.
///
/// Produced by the rule engine, by the AI pipeline, and by the merger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProofreadingResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_id: Option<String>,

    #[serde(default)]
    pub issues: Vec<ProofreadingIssue>,

    /// Missing or partial statistics deserialize as zeros.
    #[serde(default)]
    pub statistics: ProofreadingStatistics,
}

impl ProofreadingResult {
    /// Builds a result whose statistics are computed from `issues`.
    pub fn from_issues(article_id: Option<String>, issues: Vec<ProofreadingIssue>) -> Self {
        let statistics = ProofreadingStatistics::from_issues(&issues);
        Self {
            article_id,
            issues,
            statistics,
        }
    }

    /// Whether downstream publishing may proceed.
    pub fn is_publishable(&self) -> bool {
        self.statistics.blocking_issue_count == 0
    }

    pub fn blocking_issues(&self) -> impl Iterator<Item = &ProofreadingIssue> {
        self.issues.iter().filter(|issue| issue.blocks_publish)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;

    #[test]
    fn test_publishable_without_blocking_issues() {
        let result = ProofreadingResult::from_issues(
            None,
            vec![ProofreadingIssue::new("a", Category::A, "m")],
        );
        assert!(result.is_publishable());
        assert_eq!(result.blocking_issues().count(), 0);
    }

    #[test]
    fn test_blocked_by_blocking_issue() {
        let result = ProofreadingResult::from_issues(
            Some("article-1".to_string()),
            vec![ProofreadingIssue::new("e", Category::E, "m").with_blocks_publish(true)],
        );
        assert!(!result.is_publishable());
        assert_eq!(result.blocking_issues().count(), 1);
    }

    #[test]
    fn test_deserialize_without_statistics() {
        let json = r#"{ "issues": [ { "rule_id": "X", "category": "A" } ] }"#;
        let result: ProofreadingResult = serde_json::from_str(json).unwrap();

        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.statistics.total_issues, 0);
    }
}
