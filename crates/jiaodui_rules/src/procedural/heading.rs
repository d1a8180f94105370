//! Heading checks on the markup body.

use std::sync::LazyLock;

use regex::Regex;

use jiaodui_model::{Category, IssueLocation, ProofreadingIssue, Severity};

use crate::{EvalContext, Rule, RuleError, RuleMeta};

/// Characters kept after the opening tag in `evidence`.
const TRAILING_CHARS: usize = 40;

// Levels 2 and 3 are excluded by construction.
static DISALLOWED_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h([1456])\b[^>]*>").expect("Invalid heading pattern"));

static SUBHEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h([23])\b[^>]*>").expect("Invalid subheading pattern"));

/// Only `<h2>` and `<h3>` may be used as in-body subheadings.
pub struct HeadingLevelRule {
    meta: RuleMeta,
}

impl HeadingLevelRule {
    pub fn new() -> Self {
        let meta = RuleMeta::new("E-STRUCT-HEADING-LEVEL", Category::E)
            .with_subcategory("heading")
            .with_severity(Severity::Error)
            .with_confidence(1.0)
            .with_priority(90)
            .with_blocks_publish(true)
            .with_description("Body headings must be H2 or H3");
        Self { meta }
    }
}

impl Default for HeadingLevelRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for HeadingLevelRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RuleMeta {
        &mut self.meta
    }

    fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<Vec<ProofreadingIssue>, RuleError> {
        let Some(html) = ctx.html() else {
            return Ok(Vec::new());
        };

        let issues = DISALLOWED_HEADING
            .captures_iter(html.as_str())
            .filter_map(|caps| {
                let tag = caps.get(0)?;
                let level = caps.get(1)?.as_str();
                let issue = self
                    .meta
                    .issue(format!("正文小标题只允许使用 H2/H3，不应使用 H{level}"))
                    .with_suggestion("改用 <h2> 或 <h3>")
                    .with_location(IssueLocation::tag(
                        format!("h{level}"),
                        html.char_offset(tag.start()),
                    ))
                    .with_evidence(html.extend_after(tag.start(), tag.end(), TRAILING_CHARS));
                Some(issue)
            })
            .collect();

        Ok(issues)
    }

    fn definition(&self) -> String {
        format!("heading-level:{}", DISALLOWED_HEADING.as_str())
    }
}

/// An `<h3>` must not appear before the first `<h2>`.
pub struct HeadingOrderRule {
    meta: RuleMeta,
}

impl HeadingOrderRule {
    pub fn new() -> Self {
        let meta = RuleMeta::new("E-STRUCT-HEADING-ORDER", Category::E)
            .with_subcategory("heading")
            .with_severity(Severity::Warning)
            .with_confidence(0.9)
            .with_priority(60)
            .with_description("H3 before the first H2");
        Self { meta }
    }
}

impl Default for HeadingOrderRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for HeadingOrderRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RuleMeta {
        &mut self.meta
    }

    fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<Vec<ProofreadingIssue>, RuleError> {
        let Some(html) = ctx.html() else {
            return Ok(Vec::new());
        };

        let mut issues = Vec::new();
        for caps in SUBHEADING.captures_iter(html.as_str()) {
            let (Some(tag), Some(level)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if level.as_str() == "2" {
                break;
            }
            issues.push(
                self.meta
                    .issue("三级标题出现在第一个二级标题之前")
                    .with_location(IssueLocation::tag("h3", html.char_offset(tag.start())))
                    .with_evidence(html.extend_after(tag.start(), tag.end(), TRAILING_CHARS)),
            );
        }

        Ok(issues)
    }

    fn definition(&self) -> String {
        format!("heading-order:{}", SUBHEADING.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use jiaodui_model::ArticlePayload;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn run(rule: &dyn Rule, html: Option<&str>) -> Vec<ProofreadingIssue> {
        let mut payload = ArticlePayload::new("正文");
        if let Some(html) = html {
            payload = payload.with_html(html);
        }
        rule.evaluate(&EvalContext::new(&payload)).unwrap()
    }

    #[rstest]
    #[case("<h1>Title</h1>", 1)]
    #[case("<h4>Sub</h4>", 1)]
    #[case("<H5 class=\"x\">Sub</H5>", 1)]
    #[case("<h6>Sub</h6>", 1)]
    #[case("<h2>Sub</h2>", 0)]
    #[case("<h3>Sub</h3>", 0)]
    #[case("<header>nav</header>", 0)]
    fn test_heading_levels(#[case] html: &str, #[case] expected: usize) {
        let issues = run(&HeadingLevelRule::new(), Some(html));
        assert_eq!(issues.len(), expected);
        assert!(issues.iter().all(|issue| issue.blocks_publish));
        assert!(issues.iter().all(|issue| issue.severity == Severity::Error));
    }

    #[test]
    fn test_heading_location_and_evidence() {
        let issues = run(&HeadingLevelRule::new(), Some("<p>引言</p><h4>小节</h4>"));

        let location = issues[0].location.as_ref().unwrap();
        assert_eq!(location.tag.as_deref(), Some("h4"));
        assert_eq!(location.offset, Some(9));
        assert_snapshot!(issues[0].evidence.as_deref().unwrap(), @"<h4>小节</h4>");
    }

    #[test]
    fn test_absent_html_is_not_applicable() {
        assert!(run(&HeadingLevelRule::new(), None).is_empty());
        assert!(run(&HeadingLevelRule::new(), Some("")).is_empty());
        assert!(run(&HeadingOrderRule::new(), None).is_empty());
    }

    #[test]
    fn test_h3_before_first_h2() {
        let issues = run(
            &HeadingOrderRule::new(),
            Some("<h3>a</h3><h3>b</h3><h2>c</h2><h3>d</h3>"),
        );
        assert_eq!(issues.len(), 2);
        assert!(run(&HeadingOrderRule::new(), Some("<h2>a</h2><h3>b</h3>")).is_empty());
    }
}
