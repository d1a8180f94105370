//! Reconciles AI findings with rule engine findings.
//!
//! Issues are matched by [`MergeKey`]: the rule id plus the first
//! [`EVIDENCE_PREFIX_CHARS`](jiaodui_model::EVIDENCE_PREFIX_CHARS) characters
//! of the evidence. The match is a prefix heuristic; two distinct findings
//! from one rule whose evidence starts identically are unified.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use jiaodui_model::{
    MergeKey, ProofreadingIssue, ProofreadingResult, ProofreadingStatistics, RuleSource,
};

/// Key-level counts of one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// AI identities with no rule engine counterpart.
    pub ai_only: usize,
    /// Rule engine identities with no AI counterpart.
    pub script_only: usize,
    /// Identities present on both sides.
    pub merged: usize,
}

/// Merges an AI result with rule engine issues into a new result.
///
/// Neither input is modified. Statistics are recomputed from the merged
/// issues, so whatever statistics the AI result carried are ignored.
pub fn merge(ai_result: &ProofreadingResult, script_issues: &[ProofreadingIssue]) -> ProofreadingResult {
    merge_with_outcome(ai_result, script_issues).0
}

pub fn merge_with_outcome(
    ai_result: &ProofreadingResult,
    script_issues: &[ProofreadingIssue],
) -> (ProofreadingResult, MergeOutcome) {
    let mut entries = IssueMap::default();
    let mut ai_originals: HashMap<MergeKey, &ProofreadingIssue> = HashMap::new();

    for issue in &ai_result.issues {
        let key = issue.merge_key();
        ai_originals.insert(key.clone(), issue);
        entries.put(key, issue.clone());
    }

    let mut script_keys = HashSet::new();
    for issue in script_issues {
        let key = issue.merge_key();
        let entry = match ai_originals.get(&key) {
            Some(ai) => merge_pair(ai, issue),
            None => issue.clone(),
        };
        script_keys.insert(key.clone());
        entries.put(key, entry);
    }

    let merged = script_keys
        .iter()
        .filter(|key| ai_originals.contains_key(*key))
        .count();
    let outcome = MergeOutcome {
        ai_only: ai_originals.len() - merged,
        script_only: script_keys.len() - merged,
        merged,
    };

    debug!(
        "Merged {} AI and {} script issues: {:?}",
        ai_result.issues.len(),
        script_issues.len(),
        outcome
    );

    let issues = entries.into_issues();
    let statistics = ProofreadingStatistics::from_issues(&issues)
        .with_key_diagnostics(outcome.ai_only, outcome.script_only);

    let result = ProofreadingResult {
        article_id: ai_result.article_id.clone(),
        issues,
        statistics,
    };
    (result, outcome)
}

/// Copy of the script issue, with AI values filling its gaps.
fn merge_pair(ai: &ProofreadingIssue, script: &ProofreadingIssue) -> ProofreadingIssue {
    let mut merged = script.clone();
    merged.source = RuleSource::Merged;
    merged.confidence = ai.confidence.max(script.confidence);
    merged.can_auto_fix = ai.can_auto_fix || script.can_auto_fix;

    if non_empty(script.suggestion.as_deref()).is_none() {
        merged.suggestion = non_empty(ai.suggestion.as_deref()).map(str::to_string);
    }
    if script.message.is_empty() {
        merged.message = ai.message.clone();
    }
    merged.attributed_by = Some(format!(
        "{},{}",
        non_empty(ai.attributed_by.as_deref()).unwrap_or("ai"),
        non_empty(script.attributed_by.as_deref()).unwrap_or("script"),
    ));
    merged
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Insertion-ordered map from merge identity to issue.
#[derive(Default)]
struct IssueMap {
    slots: Vec<ProofreadingIssue>,
    index: HashMap<MergeKey, usize>,
}

impl IssueMap {
    /// Inserts or replaces; a replaced issue keeps its original position.
    fn put(&mut self, key: MergeKey, issue: ProofreadingIssue) {
        match self.index.get(&key) {
            Some(&slot) => self.slots[slot] = issue,
            None => {
                self.index.insert(key, self.slots.len());
                self.slots.push(issue);
            }
        }
    }

    fn into_issues(self) -> Vec<ProofreadingIssue> {
        self.slots
    }
}
