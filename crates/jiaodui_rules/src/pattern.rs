//! Regex-backed rules compiled from corpus tables.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use jiaodui_model::{IssueLocation, ProofreadingIssue};
use jiaodui_text::{IndexedText, is_cjk, is_digit};

use crate::{CorpusError, EVIDENCE_RADIUS, EvalContext, Rule, RuleError, RuleMeta, Scope};

/// Guard evaluated around a match.
///
/// The `regex` crate has no lookaround, so neighbor checks that a pattern
/// would otherwise express with `(?<!\d)` and friends live here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// The character before the match is not a digit.
    NotAfterDigit,
    /// The character after the match is not a digit.
    NotBeforeDigit,
    /// The character before the match is a CJK ideograph.
    CjkBefore,
    /// The character after the match is a CJK ideograph.
    CjkAfter,
    /// A CJK ideograph on at least one side.
    CjkAdjacent,
    /// The match starts a line.
    LineStart,
    /// The match is not part of a longer run of its edge characters.
    NotRepeated,
}

impl Condition {
    pub fn holds(&self, text: &IndexedText<'_>, start: usize, end: usize) -> bool {
        let before = text.char_before(start);
        let after = text.char_at(end);
        match self {
            Condition::NotAfterDigit => !before.is_some_and(is_digit),
            Condition::NotBeforeDigit => !after.is_some_and(is_digit),
            Condition::CjkBefore => before.is_some_and(is_cjk),
            Condition::CjkAfter => after.is_some_and(is_cjk),
            Condition::CjkAdjacent => before.is_some_and(is_cjk) || after.is_some_and(is_cjk),
            Condition::LineStart => matches!(before, None | Some('\n')),
            Condition::NotRepeated => {
                let matched = &text.as_str()[start..end];
                before.is_none_or(|c| Some(c) != matched.chars().next())
                    && after.is_none_or(|c| Some(c) != matched.chars().next_back())
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::NotAfterDigit => "not_after_digit",
            Condition::NotBeforeDigit => "not_before_digit",
            Condition::CjkBefore => "cjk_before",
            Condition::CjkAfter => "cjk_after",
            Condition::CjkAdjacent => "cjk_adjacent",
            Condition::LineStart => "line_start",
            Condition::NotRepeated => "not_repeated",
        }
    }
}

/// A rule that reports every guarded match of one regex in one field.
#[derive(Debug, Clone)]
pub struct PatternRule {
    meta: RuleMeta,
    regex: Regex,
    replacement: Option<String>,
    message: String,
    scope: Scope,
    conditions: Vec<Condition>,
}

impl PatternRule {
    /// Compiles `pattern`. Fails on an empty or invalid pattern.
    pub fn new(meta: RuleMeta, pattern: &str, scope: Scope) -> Result<Self, CorpusError> {
        if pattern.is_empty() {
            return Err(CorpusError::EmptyPattern {
                rule_id: meta.rule_id,
            });
        }
        let regex = Regex::new(pattern).map_err(|e| CorpusError::InvalidPattern {
            rule_id: meta.rule_id.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            message: meta.description.clone(),
            meta,
            regex,
            replacement: None,
            scope,
            conditions: Vec::new(),
        })
    }

    /// Replacement template; `$1`/`${1}` refer to capture groups.
    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }

    /// Message template; `{matched}` and `{replacement}` are filled per match.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_conditions(mut self, conditions: Vec<Condition>) -> Self {
        self.conditions = conditions;
        self
    }

    fn suggestion(&self, caps: &Captures<'_>) -> Option<String> {
        self.replacement.as_ref().map(|template| {
            let mut out = String::new();
            caps.expand(template, &mut out);
            out
        })
    }

    fn render_message(&self, matched: &str, suggestion: Option<&str>) -> String {
        self.message
            .replace("{matched}", matched)
            .replace("{replacement}", suggestion.unwrap_or_default())
    }
}

impl Rule for PatternRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RuleMeta {
        &mut self.meta
    }

    fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<Vec<ProofreadingIssue>, RuleError> {
        let Some(text) = ctx.text(self.scope) else {
            return Ok(Vec::new());
        };

        let mut issues = Vec::new();
        for caps in self.regex.captures_iter(text.as_str()) {
            let Some(m) = caps.get(0) else {
                continue;
            };
            if m.is_empty() {
                continue;
            }
            if !self
                .conditions
                .iter()
                .all(|condition| condition.holds(text, m.start(), m.end()))
            {
                continue;
            }

            let suggestion = self.suggestion(&caps);
            let message = self.render_message(m.as_str(), suggestion.as_deref());
            let offset = text.char_offset(m.start());
            let length = text.char_offset(m.end()) - offset;

            let mut issue = self
                .meta
                .issue(message)
                .with_location(IssueLocation::span(self.scope.field(), offset, length))
                .with_evidence(text.window(m.start(), m.end(), EVIDENCE_RADIUS));
            if let Some(suggestion) = suggestion {
                issue = issue.with_suggestion(suggestion);
            }
            issues.push(issue);
        }

        Ok(issues)
    }

    fn definition(&self) -> String {
        let conditions: Vec<&str> = self.conditions.iter().map(Condition::as_str).collect();
        format!(
            "pattern:{}|{}|{}|{}|{}",
            self.scope.as_str(),
            self.regex.as_str(),
            self.replacement.as_deref().unwrap_or_default(),
            conditions.join(","),
            self.message
        )
    }
}
