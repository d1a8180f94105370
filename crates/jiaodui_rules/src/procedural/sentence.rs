//! Sentence length check.

use jiaodui_model::{Category, IssueLocation, PayloadField, ProofreadingIssue, Severity};

use crate::{EvalContext, Rule, RuleError, RuleMeta};

/// Evidence keeps the head of an overlong sentence.
const EVIDENCE_CHARS: usize = 30;

pub struct SentenceLengthRule {
    meta: RuleMeta,
    max_chars: usize,
}

impl SentenceLengthRule {
    pub fn new(max_chars: usize) -> Self {
        let meta = RuleMeta::new("D-STYLE-SENTENCE-LENGTH", Category::D)
            .with_subcategory("readability")
            .with_severity(Severity::Info)
            .with_confidence(0.8)
            .with_priority(20)
            .with_description("Sentence too long");
        Self { meta, max_chars }
    }
}

impl Rule for SentenceLengthRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RuleMeta {
        &mut self.meta
    }

    fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<Vec<ProofreadingIssue>, RuleError> {
        let text = ctx.content();
        let mut issues = Vec::new();

        for sentence in ctx.sentences() {
            let len = sentence.display_len();
            if len <= self.max_chars {
                continue;
            }

            let trimmed = sentence.text.trim();
            let mut evidence: String = trimmed.chars().take(EVIDENCE_CHARS).collect();
            if trimmed.chars().count() > EVIDENCE_CHARS {
                evidence.push('…');
            }

            let offset = text.char_offset(sentence.span.start);
            let length = text.char_offset(sentence.span.end) - offset;
            issues.push(
                self.meta
                    .issue(format!(
                        "句子过长（{len} 字，建议不超过 {} 字），可考虑拆分",
                        self.max_chars
                    ))
                    .with_location(IssueLocation::span(PayloadField::Content, offset, length))
                    .with_evidence(evidence),
            );
        }

        Ok(issues)
    }

    fn definition(&self) -> String {
        format!("sentence-length:>{}", self.max_chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiaodui_model::ArticlePayload;
    use pretty_assertions::assert_eq;

    fn run(max: usize, content: &str) -> Vec<ProofreadingIssue> {
        let payload = ArticlePayload::new(content);
        SentenceLengthRule::new(max)
            .evaluate(&EvalContext::new(&payload))
            .unwrap()
    }

    #[test]
    fn test_long_sentence_is_flagged() {
        let long = format!("{}。", "长".repeat(10));
        let issues = run(10, &format!("短句。{long}"));

        assert_eq!(issues.len(), 1);
        let location = issues[0].location.as_ref().unwrap();
        assert_eq!(location.offset, Some(3));
        assert_eq!(location.length, Some(11));
    }

    #[test]
    fn test_limit_is_inclusive() {
        assert!(run(10, &format!("{}。", "字".repeat(9))).is_empty());
    }

    #[test]
    fn test_evidence_is_truncated() {
        let issues = run(10, &"字".repeat(50));
        let evidence = issues[0].evidence.as_deref().unwrap();

        assert_eq!(evidence.chars().count(), EVIDENCE_CHARS + 1);
        assert!(evidence.ends_with('…'));
    }
}
