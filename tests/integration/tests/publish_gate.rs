//! End-to-end publish gating: payload fixtures through the rule engine and
//! the AI merge.

use std::fs;
use std::path::PathBuf;

use jiaodui_core::{
    ArticlePayload, EngineConfig, ProofreadingResult, RuleEngine, RuleSource, merge,
};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load<T: serde::de::DeserializeOwned>(name: &str) -> T {
    let content = fs::read_to_string(fixtures_dir().join(name)).expect("fixture exists");
    serde_json::from_str(&content).expect("fixture is valid JSON")
}

#[fixture]
fn engine() -> RuleEngine {
    RuleEngine::new(EngineConfig::default()).expect("default engine loads")
}

fn blocking_ids(result: &ProofreadingResult) -> Vec<&str> {
    result
        .blocking_issues()
        .map(|issue| issue.rule_id.as_str())
        .collect()
}

#[rstest]
fn clean_article_is_publishable(engine: RuleEngine) {
    let payload: ArticlePayload = load("clean.json");

    let result = engine.evaluate(&payload);

    assert!(result.issues.is_empty(), "{:#?}", result.issues);
    assert!(result.is_publishable());
}

#[rstest]
#[case("placeholder.json", "D-PLACEHOLDER-004")]
#[case("advertising.json", "D-AD-ABSOLUTE-004")]
#[case("script_tag.json", "E-HTML-FORBIDDEN-001")]
#[case("square_cover.json", "F-MEDIA-FEATURED-RATIO")]
fn blocking_findings_stop_publishing(
    engine: RuleEngine,
    #[case] fixture: &str,
    #[case] rule_id: &str,
) {
    let payload: ArticlePayload = load(fixture);

    let result = engine.evaluate(&payload);

    assert!(!result.is_publishable());
    assert_eq!(blocking_ids(&result), vec![rule_id]);
    assert_eq!(result.statistics.blocking_issue_count, 1);
}

#[rstest]
fn ai_findings_can_block_a_clean_article(engine: RuleEngine) {
    let payload: ArticlePayload = load("clean.json");
    let ai: ProofreadingResult = load("ai_result.json");

    let script = engine.evaluate(&payload);
    let report = merge(&ai, &script.issues);

    assert_eq!(report.article_id.as_deref(), Some("clean"));
    assert_eq!(report.statistics.total_issues, 2);
    assert_eq!(report.statistics.ai_issue_count, 2);
    assert_eq!(report.statistics.script_issue_count, 0);
    assert_eq!(blocking_ids(&report), vec!["D-AI-FACT"]);
    assert!(!report.is_publishable());
}

#[rstest]
fn shared_finding_is_reported_once(engine: RuleEngine) {
    let payload: ArticlePayload = load("advertising.json");
    let script = engine.evaluate(&payload);
    let engine_issue = &script.issues[0];

    let ai = ProofreadingResult::from_issues(
        payload.article_id.clone(),
        vec![
            engine_issue
                .clone()
                .with_source(RuleSource::Ai)
                .with_blocks_publish(false)
                .with_confidence(0.3)
                .with_attributed_by("reviewer-model"),
        ],
    );

    let report = merge(&ai, &script.issues);

    assert_eq!(report.issues.len(), script.issues.len());
    let merged = &report.issues[0];
    assert_eq!(merged.source, RuleSource::Merged);
    assert!(merged.blocks_publish);
    assert_eq!(merged.confidence, engine_issue.confidence.max(0.3));
    assert_eq!(
        merged.attributed_by.as_deref(),
        Some("reviewer-model,jiaodui-engine")
    );
    assert!(!report.is_publishable());
}

#[rstest]
fn batch_gates_each_article(engine: RuleEngine) {
    let names = [
        "clean.json",
        "placeholder.json",
        "advertising.json",
        "script_tag.json",
        "square_cover.json",
    ];
    let payloads: Vec<ArticlePayload> = names.iter().map(|name| load(name)).collect();

    let results = engine.evaluate_batch(&payloads);

    let publishable: Vec<(Option<&str>, bool)> = results
        .iter()
        .map(|r| (r.article_id.as_deref(), r.is_publishable()))
        .collect();
    assert_eq!(
        publishable,
        vec![
            (Some("clean"), true),
            (Some("placeholder"), false),
            (Some("advertising"), false),
            (Some("script-tag"), false),
            (Some("square-cover"), false),
        ]
    );
}
