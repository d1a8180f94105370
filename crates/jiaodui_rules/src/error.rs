//! Rule and corpus error types.

use thiserror::Error;

/// Errors raised while a rule evaluates a payload.
///
/// The engine treats these as defects of a single rule: the error is logged
/// and the rule's findings for that payload are dropped.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Rule '{rule_id}' failed: {message}")]
    Evaluation { rule_id: String, message: String },
}

impl RuleError {
    pub fn evaluation(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Evaluation {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while loading a corpus table. All of them are startup
/// failures.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The table is not valid JSONC.
    #[error("Failed to parse corpus '{origin}': {message}")]
    Parse { origin: String, message: String },

    /// The table does not match the corpus schema.
    #[error("Corpus '{origin}' validation failed: {message}")]
    Validation { origin: String, message: String },

    #[error("Rule '{rule_id}' has an invalid pattern: {message}")]
    InvalidPattern { rule_id: String, message: String },

    #[error("Rule '{rule_id}' has an empty pattern")]
    EmptyPattern { rule_id: String },

    #[error("Duplicate rule id: {0}")]
    DuplicateRuleId(String),
}

impl CorpusError {
    pub fn parse(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            origin: origin.into(),
            message: message.into(),
        }
    }

    pub fn validation(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            origin: origin.into(),
            message: message.into(),
        }
    }
}
