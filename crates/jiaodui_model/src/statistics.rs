//! Aggregate counts over an issue list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Category, ProofreadingIssue};

/// `source_breakdown` key for AI findings with no rule engine counterpart.
pub const AI_ONLY_KEY: &str = "ai_only";
/// `source_breakdown` key for rule engine findings with no AI counterpart.
pub const SCRIPT_ONLY_KEY: &str = "script_only";

/// Aggregate counts used by publish gating.
///
/// Every field defaults to zero, so a partial statistics object coming from
/// the AI pipeline deserializes instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProofreadingStatistics {
    pub total_issues: usize,
    /// Issues with source AI or MERGED.
    pub ai_issue_count: usize,
    /// Issues with source SCRIPT or MERGED.
    pub script_issue_count: usize,
    pub blocking_issue_count: usize,
    pub categories: BTreeMap<Category, usize>,
    pub source_breakdown: BTreeMap<String, usize>,
}

impl ProofreadingStatistics {
    /// Computes statistics from an issue list.
    pub fn from_issues(issues: &[ProofreadingIssue]) -> Self {
        let mut stats = Self {
            total_issues: issues.len(),
            ..Default::default()
        };

        for issue in issues {
            if issue.source.includes_script() {
                stats.script_issue_count += 1;
            }
            if issue.source.includes_ai() {
                stats.ai_issue_count += 1;
            }
            if issue.blocks_publish {
                stats.blocking_issue_count += 1;
            }
            *stats.categories.entry(issue.category).or_default() += 1;
            *stats
                .source_breakdown
                .entry(issue.source.as_str().to_string())
                .or_default() += 1;
        }

        stats
    }

    /// Adds the `ai_only` / `script_only` counters unless those keys already exist.
    pub fn with_key_diagnostics(mut self, ai_only: usize, script_only: usize) -> Self {
        self.source_breakdown
            .entry(AI_ONLY_KEY.to_string())
            .or_insert(ai_only);
        self.source_breakdown
            .entry(SCRIPT_ONLY_KEY.to_string())
            .or_insert(script_only);
        self
    }

    /// Count for a single category.
    pub fn category_count(&self, category: Category) -> usize {
        self.categories.get(&category).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuleSource;
    use pretty_assertions::assert_eq;

    fn issue(rule: &str, category: Category, source: RuleSource, blocks: bool) -> ProofreadingIssue {
        ProofreadingIssue::new(rule, category, "m")
            .with_source(source)
            .with_blocks_publish(blocks)
    }

    #[test]
    fn test_from_issues_counts() {
        let issues = vec![
            issue("a", Category::A, RuleSource::Ai, false),
            issue("b", Category::A, RuleSource::Script, true),
            issue("c", Category::E, RuleSource::Merged, true),
        ];

        let stats = ProofreadingStatistics::from_issues(&issues);

        assert_eq!(stats.total_issues, 3);
        assert_eq!(stats.ai_issue_count, 2);
        assert_eq!(stats.script_issue_count, 2);
        assert_eq!(stats.blocking_issue_count, 2);
        assert_eq!(stats.category_count(Category::A), 2);
        assert_eq!(stats.category_count(Category::E), 1);
        assert_eq!(stats.category_count(Category::F), 0);
        assert_eq!(stats.source_breakdown.get("MERGED"), Some(&1));
    }

    #[test]
    fn test_key_diagnostics_do_not_override_existing() {
        let mut stats = ProofreadingStatistics::default();
        stats.source_breakdown.insert(AI_ONLY_KEY.to_string(), 9);

        let stats = stats.with_key_diagnostics(1, 2);

        assert_eq!(stats.source_breakdown.get(AI_ONLY_KEY), Some(&9));
        assert_eq!(stats.source_breakdown.get(SCRIPT_ONLY_KEY), Some(&2));
    }

    #[test]
    fn test_partial_statistics_deserialize() {
        let stats: ProofreadingStatistics =
            serde_json::from_str(r#"{ "total_issues": 4 }"#).unwrap();

        assert_eq!(stats.total_issues, 4);
        assert_eq!(stats.blocking_issue_count, 0);
        assert!(stats.categories.is_empty());
    }

    #[test]
    fn test_categories_serialize_as_letters() {
        let issues = vec![issue("a", Category::C, RuleSource::Script, false)];
        let json = serde_json::to_value(ProofreadingStatistics::from_issues(&issues)).unwrap();
        assert_eq!(json["categories"]["C"], 1);
    }
}
