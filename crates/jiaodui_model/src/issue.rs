//! Proofreading issue types.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::IssueLocation;

/// Number of evidence characters that take part in the merge identity.
pub const EVIDENCE_PREFIX_CHARS: usize = 64;

/// Severity level for issues.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, no action required.
    Info,
    /// Should be reviewed.
    #[default]
    Warning,
    /// Must be fixed.
    Error,
    /// Must be fixed before anything else.
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }

    /// Parses a lowercase severity name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "info" => Some(Severity::Info),
            "warning" => Some(Severity::Warning),
            "error" => Some(Severity::Error),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Rule category.
///
/// | Letter | Scope |
/// |--------|-------|
/// | A | typo correction |
/// | B | grammar and word usage |
/// | C | punctuation |
/// | D | style and wording policy |
/// | E | structure (HTML body, title) |
/// | F | media (images) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(alias = "a")]
    A,
    #[serde(alias = "b")]
    B,
    #[serde(alias = "c")]
    C,
    #[serde(alias = "d")]
    D,
    #[serde(alias = "e")]
    E,
    #[serde(alias = "f")]
    F,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::A,
        Category::B,
        Category::C,
        Category::D,
        Category::E,
        Category::F,
    ];

    pub fn letter(&self) -> char {
        match self {
            Category::A => 'A',
            Category::B => 'B',
            Category::C => 'C',
            Category::D => 'D',
            Category::E => 'E',
            Category::F => 'F',
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::A => "typo",
            Category::B => "grammar",
            Category::C => "punctuation",
            Category::D => "style",
            Category::E => "structure",
            Category::F => "media",
        }
    }

    /// Parses a category letter, case-insensitively.
    pub fn from_letter(value: &str) -> Option<Self> {
        match value.trim() {
            "A" | "a" => Some(Category::A),
            "B" | "b" => Some(Category::B),
            "C" | "c" => Some(Category::C),
            "D" | "d" => Some(Category::D),
            "E" | "e" => Some(Category::E),
            "F" | "f" => Some(Category::F),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Where a finding came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleSource {
    /// Produced by the external AI pipeline.
    ///
    /// This is the default for issues deserialized without a `source`, since
    /// only the AI contract carries issues across a process boundary.
    #[default]
    #[serde(alias = "ai")]
    Ai,
    /// Produced by the deterministic rule engine.
    #[serde(alias = "script")]
    Script,
    /// The AI and the rule engine reported the same finding.
    #[serde(alias = "merged")]
    Merged,
}

impl RuleSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleSource::Ai => "AI",
            RuleSource::Script => "SCRIPT",
            RuleSource::Merged => "MERGED",
        }
    }

    /// Whether the AI pipeline reported this finding.
    pub fn includes_ai(&self) -> bool {
        matches!(self, RuleSource::Ai | RuleSource::Merged)
    }

    /// Whether the rule engine reported this finding.
    pub fn includes_script(&self) -> bool {
        matches!(self, RuleSource::Script | RuleSource::Merged)
    }
}

impl fmt::Display for RuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Identity used to pair AI findings with rule engine findings.
///
/// Two issues share a key when their `rule_id` is equal and the first
/// [`EVIDENCE_PREFIX_CHARS`] characters of their evidence are equal. Missing
/// evidence counts as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MergeKey {
    pub rule_id: String,
    pub evidence_prefix: String,
}

impl fmt::Display for MergeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.rule_id, self.evidence_prefix)
    }
}

/// A single proofreading finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofreadingIssue {
    /// The rule that produced this finding.
    pub rule_id: String,

    /// Rule category (A–F).
    pub category: Category,

    /// Finer grouping inside the category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    /// Human-readable description.
    #[serde(default)]
    pub message: String,

    /// Suggested replacement or remediation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    #[serde(default)]
    pub severity: Severity,

    /// Confidence in `[0, 1]`.
    #[serde(default = "default_confidence", deserialize_with = "deserialize_confidence")]
    pub confidence: f64,

    #[serde(default)]
    pub can_auto_fix: bool,

    /// Presence of this issue must prevent publishing.
    #[serde(default)]
    pub blocks_publish: bool,

    #[serde(default)]
    pub source: RuleSource,

    /// Provenance trail, e.g. `"gpt-review,jiaodui-engine"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributed_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<IssueLocation>,

    /// Short excerpt supporting the finding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

fn default_confidence() -> f64 {
    1.0
}

fn deserialize_confidence<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(format!(
            "confidence must be within [0, 1], got {}",
            value
        )))
    }
}

impl ProofreadingIssue {
    /// Creates a new script-sourced issue with warning severity.
    pub fn new(rule_id: impl Into<String>, category: Category, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            category,
            subcategory: None,
            message: message.into(),
            suggestion: None,
            severity: Severity::Warning,
            confidence: 1.0,
            can_auto_fix: false,
            blocks_publish: false,
            source: RuleSource::Script,
            attributed_by: None,
            location: None,
            evidence: None,
        }
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the confidence, clamped to `[0, 1]`.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        self
    }

    pub fn with_auto_fix(mut self, can_auto_fix: bool) -> Self {
        self.can_auto_fix = can_auto_fix;
        self
    }

    pub fn with_blocks_publish(mut self, blocks_publish: bool) -> Self {
        self.blocks_publish = blocks_publish;
        self
    }

    pub fn with_source(mut self, source: RuleSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_attributed_by(mut self, attributed_by: impl Into<String>) -> Self {
        self.attributed_by = Some(attributed_by.into());
        self
    }

    pub fn with_location(mut self, location: IssueLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }

    /// Returns the evidence prefix that takes part in the merge identity.
    pub fn evidence_prefix(&self) -> String {
        self.evidence
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(EVIDENCE_PREFIX_CHARS)
            .collect()
    }

    /// Returns the merge identity of this issue. Independent of `source`.
    pub fn merge_key(&self) -> MergeKey {
        MergeKey {
            rule_id: self.rule_id.clone(),
            evidence_prefix: self.evidence_prefix(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_issue_new_defaults() {
        let issue = ProofreadingIssue::new("A-TYPO-001", Category::A, "typo");

        assert_eq!(issue.rule_id, "A-TYPO-001");
        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!(issue.source, RuleSource::Script);
        assert!(!issue.blocks_publish);
        assert!(issue.evidence.is_none());
    }

    #[test]
    fn test_with_confidence_clamps() {
        let high = ProofreadingIssue::new("r", Category::A, "m").with_confidence(1.7);
        let low = ProofreadingIssue::new("r", Category::A, "m").with_confidence(-0.2);
        let nan = ProofreadingIssue::new("r", Category::A, "m").with_confidence(f64::NAN);

        assert_eq!(high.confidence, 1.0);
        assert_eq!(low.confidence, 0.0);
        assert_eq!(nan.confidence, 0.0);
    }

    #[test]
    fn test_merge_key_truncates_evidence_to_64_chars() {
        let shared: String = "校".repeat(EVIDENCE_PREFIX_CHARS);
        let a = ProofreadingIssue::new("X", Category::B, "m").with_evidence(format!("{shared}甲"));
        let b = ProofreadingIssue::new("X", Category::B, "m").with_evidence(format!("{shared}乙"));

        assert_eq!(a.merge_key(), b.merge_key());
        assert_eq!(a.evidence_prefix().chars().count(), EVIDENCE_PREFIX_CHARS);
    }

    #[test]
    fn test_merge_key_ignores_source() {
        let ai = ProofreadingIssue::new("X", Category::B, "m")
            .with_evidence("abc")
            .with_source(RuleSource::Ai);
        let script = ai.clone().with_source(RuleSource::Script);

        assert_eq!(ai.merge_key(), script.merge_key());
    }

    #[test]
    fn test_merge_key_missing_evidence_is_empty() {
        let issue = ProofreadingIssue::new("X", Category::B, "m");
        assert_eq!(issue.merge_key().evidence_prefix, "");
    }

    #[test]
    fn test_deserialize_minimal_ai_issue() {
        let json = r#"{ "rule_id": "B-GRAMMAR-003", "category": "B", "evidence": "认真的学习" }"#;
        let issue: ProofreadingIssue = serde_json::from_str(json).unwrap();

        assert_eq!(issue.source, RuleSource::Ai);
        assert_eq!(issue.confidence, 1.0);
        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!(issue.evidence.as_deref(), Some("认真的学习"));
    }

    #[test]
    fn test_deserialize_rejects_missing_rule_id() {
        let json = r#"{ "category": "B", "evidence": "x" }"#;
        let result: Result<ProofreadingIssue, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_confidence() {
        let json = r#"{ "rule_id": "X", "category": "A", "confidence": 1.5 }"#;
        let err = serde_json::from_str::<ProofreadingIssue>(json).unwrap_err();
        assert!(err.to_string().contains("confidence"));
    }

    #[test]
    fn test_source_serialization() {
        let json = serde_json::to_string(&RuleSource::Merged).unwrap();
        assert_eq!(json, "\"MERGED\"");

        let parsed: RuleSource = serde_json::from_str("\"script\"").unwrap();
        assert_eq!(parsed, RuleSource::Script);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Error < Severity::Critical);
        assert_eq!(Severity::parse("critical"), Some(Severity::Critical));
        assert_eq!(Severity::parse("fatal"), None);
    }

    #[test]
    fn test_category_from_letter() {
        assert_eq!(Category::from_letter("e"), Some(Category::E));
        assert_eq!(Category::from_letter("G"), None);
        assert_eq!(Category::F.to_string(), "F");
    }

    #[rstest]
    #[case("info", Some(Severity::Info))]
    #[case("warning", Some(Severity::Warning))]
    #[case("error", Some(Severity::Error))]
    #[case("critical", Some(Severity::Critical))]
    #[case("off", None)]
    #[case("Error", None)]
    fn test_severity_parse(#[case] value: &str, #[case] expected: Option<Severity>) {
        assert_eq!(Severity::parse(value), expected);
    }
}
