//! Half-width punctuation in Chinese text.

use jiaodui_model::{Category, IssueLocation, PayloadField, ProofreadingIssue, Severity};
use jiaodui_text::{is_cjk, is_digit};

use crate::{EVIDENCE_RADIUS, EvalContext, Rule, RuleError, RuleMeta};

/// Flags a half-width mark that should be its full-width counterpart.
///
/// A mark with a digit on either side is part of a number or a time
/// (`1,000`, `12:30`) and is never flagged. Except for the comma, the mark
/// must also touch a CJK ideograph, which keeps URLs and English phrases
/// out.
pub struct HalfwidthPunctuationRule {
    meta: RuleMeta,
    mark: char,
    fullwidth: char,
    require_cjk: bool,
}

impl HalfwidthPunctuationRule {
    fn new(suffix: &str, mark: char, fullwidth: char, require_cjk: bool) -> Self {
        let meta = RuleMeta::new(format!("C-PUNCT-HALFWIDTH-{suffix}"), Category::C)
            .with_subcategory("halfwidth-mark")
            .with_severity(Severity::Warning)
            .with_confidence(0.9)
            .with_priority(50)
            .with_auto_fix(true)
            .with_description(format!("Half-width '{mark}' in Chinese text"));
        Self {
            meta,
            mark,
            fullwidth,
            require_cjk,
        }
    }

    pub fn comma() -> Self {
        Self::new("COMMA", ',', '，', false)
    }

    pub fn semicolon() -> Self {
        Self::new("SEMICOLON", ';', '；', true)
    }

    pub fn colon() -> Self {
        Self::new("COLON", ':', '：', true)
    }

    pub fn question() -> Self {
        Self::new("QUESTION", '?', '？', true)
    }

    pub fn exclamation() -> Self {
        Self::new("EXCLAMATION", '!', '！', true)
    }

    pub fn all() -> Vec<Self> {
        vec![
            Self::comma(),
            Self::semicolon(),
            Self::colon(),
            Self::question(),
            Self::exclamation(),
        ]
    }
}

impl Rule for HalfwidthPunctuationRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RuleMeta {
        &mut self.meta
    }

    fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<Vec<ProofreadingIssue>, RuleError> {
        let text = ctx.content();
        let mut issues = Vec::new();

        for (start, c) in text.as_str().match_indices(self.mark) {
            let end = start + c.len();
            let before = text.char_before(start);
            let after = text.char_at(end);

            if before.is_some_and(is_digit) || after.is_some_and(is_digit) {
                continue;
            }
            if self.require_cjk && !(before.is_some_and(is_cjk) || after.is_some_and(is_cjk)) {
                continue;
            }

            let issue = self
                .meta
                .issue(format!(
                    "中文语境中应使用全角“{}”而非半角“{}”",
                    self.fullwidth, self.mark
                ))
                .with_suggestion(self.fullwidth.to_string())
                .with_location(IssueLocation::span(
                    PayloadField::Content,
                    text.char_offset(start),
                    1,
                ))
                .with_evidence(text.window(start, end, EVIDENCE_RADIUS));
            issues.push(issue);
        }

        Ok(issues)
    }

    fn definition(&self) -> String {
        format!(
            "halfwidth:{}|{}|cjk={}",
            self.mark, self.fullwidth, self.require_cjk
        )
    }
}
