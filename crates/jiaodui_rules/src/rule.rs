//! The rule capability.

use serde::Serialize;

use jiaodui_model::{Category, ProofreadingIssue, RuleSource, Severity};

use crate::{EvalContext, RuleError};

/// Identity and policy shared by every rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleMeta {
    pub rule_id: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub severity: Severity,
    pub confidence: f64,
    /// Higher priorities are evaluated first.
    pub priority: u8,
    pub can_auto_fix: bool,
    pub blocks_publish: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl RuleMeta {
    pub fn new(rule_id: impl Into<String>, category: Category) -> Self {
        Self {
            rule_id: rule_id.into(),
            category,
            subcategory: None,
            severity: Severity::Warning,
            confidence: 1.0,
            priority: 50,
            can_auto_fix: false,
            blocks_publish: false,
            description: String::new(),
        }
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
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

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Starts a script-sourced issue carrying this rule's identity.
    pub fn issue(&self, message: impl Into<String>) -> ProofreadingIssue {
        let issue = ProofreadingIssue::new(self.rule_id.clone(), self.category, message)
            .with_severity(self.severity)
            .with_confidence(self.confidence)
            .with_auto_fix(self.can_auto_fix)
            .with_blocks_publish(self.blocks_publish)
            .with_source(RuleSource::Script);
        match &self.subcategory {
            Some(subcategory) => issue.with_subcategory(subcategory.clone()),
            None => issue,
        }
    }
}

/// A deterministic check over one payload.
///
/// Implementations hold no mutable state: the same context always yields
/// the same issues in the same order. Optional payload fields that are
/// missing mean "not applicable", never an error.
pub trait Rule: Send + Sync {
    fn meta(&self) -> &RuleMeta;

    /// Mutable access for configuration overrides (severity) applied when
    /// the registry is built.
    fn meta_mut(&mut self) -> &mut RuleMeta;

    fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<Vec<ProofreadingIssue>, RuleError>;

    /// Stable text describing the rule's logic and parameters.
    ///
    /// Two rules with equal metadata and equal definitions behave the same.
    /// Used to fingerprint a registry.
    fn definition(&self) -> String;

    fn id(&self) -> &str {
        &self.meta().rule_id
    }
}
