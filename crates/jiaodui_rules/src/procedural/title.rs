//! Title length check.

use jiaodui_model::{Category, IssueLocation, PayloadField, ProofreadingIssue, Severity};

use crate::{EvalContext, Rule, RuleError, RuleMeta};

/// Titles must fall within a character range. An empty title is treated
/// as absent.
pub struct TitleLengthRule {
    meta: RuleMeta,
    min_chars: usize,
    max_chars: usize,
}

impl TitleLengthRule {
    pub fn new(min_chars: usize, max_chars: usize) -> Self {
        let meta = RuleMeta::new("E-TITLE-LENGTH", Category::E)
            .with_subcategory("title")
            .with_severity(Severity::Warning)
            .with_confidence(1.0)
            .with_priority(70)
            .with_description("Title length out of range");
        Self {
            meta,
            min_chars,
            max_chars,
        }
    }
}

impl Rule for TitleLengthRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RuleMeta {
        &mut self.meta
    }

    fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<Vec<ProofreadingIssue>, RuleError> {
        let title = ctx.payload().title.trim();
        if title.is_empty() {
            return Ok(Vec::new());
        }

        let len = title.chars().count();
        let message = if len < self.min_chars {
            format!("标题过短（{len} 字），至少需要 {} 字", self.min_chars)
        } else if len > self.max_chars {
            format!("标题过长（{len} 字），不应超过 {} 字", self.max_chars)
        } else {
            return Ok(Vec::new());
        };

        Ok(vec![
            self.meta
                .issue(message)
                .with_location(IssueLocation::field(PayloadField::Title))
                .with_evidence(title),
        ])
    }

    fn definition(&self) -> String {
        format!("title-length:{}..={}", self.min_chars, self.max_chars)
    }
}
