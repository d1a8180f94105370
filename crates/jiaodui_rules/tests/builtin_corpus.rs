//! Checks over the embedded corpus tables.

use std::collections::HashSet;

use jiaodui_model::{ArticlePayload, Category};
use jiaodui_rules::{EvalContext, Rule, RuleLimits, builtin_tables, procedural_rules};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn all_rules() -> Vec<Box<dyn Rule>> {
    let mut rules: Vec<Box<dyn Rule>> = Vec::new();
    for table in builtin_tables().expect("builtin tables parse") {
        for rule in table.compile().expect("builtin tables compile") {
            rules.push(Box::new(rule));
        }
    }
    rules.extend(procedural_rules(&RuleLimits::default()));
    rules
}

fn fired(payload: &ArticlePayload) -> Vec<String> {
    let ctx = EvalContext::new(payload);
    all_rules()
        .iter()
        .flat_map(|rule| rule.evaluate(&ctx).unwrap())
        .map(|issue| issue.rule_id)
        .collect()
}

#[test]
fn test_builtin_corpus_is_large_and_unique() {
    let rules = all_rules();
    let ids: HashSet<&str> = rules.iter().map(|rule| rule.id()).collect();

    assert_eq!(ids.len(), rules.len(), "rule ids must be unique");
    assert!(rules.len() >= 380, "only {} rules", rules.len());
}

#[test]
fn test_every_category_is_covered() {
    let rules = all_rules();
    for category in Category::ALL {
        assert!(
            rules.iter().any(|rule| rule.meta().category == category),
            "no rule in category {category}"
        );
    }
}

#[test]
fn test_rule_id_prefix_matches_category() {
    for rule in all_rules() {
        let letter = rule.id().chars().next().unwrap();
        assert_eq!(letter, rule.meta().category.letter(), "{}", rule.id());
    }
}

#[test]
fn test_clean_text_has_no_issues() {
    let payload = ArticlePayload::new("今天天气很好。我们一起去公园散步，看到了很多花。")
        .with_title("周末去公园散步")
        .with_html("<h2>散步</h2><p>今天天气很好。</p>");

    assert_eq!(fired(&payload), Vec::<String>::new());
}

#[rstest]
#[case("请先按装软件。", "A-TYPO-001")]
#[case("他迫不急待地打开了包裹。", "A-IDIOM-010")]
#[case("我们们出发了。", "A-DUP-001")]
#[case("这是全网最低价。", "D-AD-ABSOLUTE-004")]
#[case("这里的内容待补充。", "D-PLACEHOLDER-004")]
#[case("会议已经结束，，大家散了。", "C-PUNCT-DOUBLE-001")]
fn test_corpus_entries_fire(#[case] content: &str, #[case] rule_id: &str) {
    let ids = fired(&ArticlePayload::new(content));
    assert!(ids.iter().any(|id| id == rule_id), "{rule_id} not in {ids:?}");
}

#[test]
fn test_forbidden_markup_blocks_publish() {
    let payload = ArticlePayload::new("正文。").with_html("<p>正文。</p><script>alert(1)</script>");
    let ctx = EvalContext::new(&payload);

    let blocking: Vec<String> = all_rules()
        .iter()
        .flat_map(|rule| rule.evaluate(&ctx).unwrap())
        .filter(|issue| issue.blocks_publish)
        .map(|issue| issue.rule_id)
        .collect();

    assert_eq!(blocking, vec!["E-HTML-FORBIDDEN-001".to_string()]);
}

#[rstest]
#[case("等…的…好……", "C-PUNCT-ELLIPSIS-002", 2)]
#[case("他—我——你—", "C-PUNCT-ELLIPSIS-005", 2)]
fn test_single_ellipsis_and_dash_are_each_reported(
    #[case] content: &str,
    #[case] rule_id: &str,
    #[case] expected: usize,
) {
    let ids = fired(&ArticlePayload::new(content));
    assert_eq!(ids.iter().filter(|id| *id == rule_id).count(), expected);
}
