//! Deterministic rule engine.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, warn};

use jiaodui_model::{ArticlePayload, ProofreadingIssue, ProofreadingResult, RuleSource};
use jiaodui_rules::{EvalContext, Rule};

use crate::{EngineConfig, EngineError, RuleRegistry};

/// `attributed_by` of every issue the engine produces.
pub const ENGINE_NAME: &str = "jiaodui-engine";

/// A rule that failed on one payload. Its findings for that payload are
/// dropped; every other rule still runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFailure {
    pub rule_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTiming {
    pub rule_id: String,
    pub duration: Duration,
}

/// Script-only result plus evaluation diagnostics.
#[derive(Debug, Clone, Default)]
pub struct EvaluationReport {
    pub result: ProofreadingResult,
    pub failures: Vec<RuleFailure>,
    /// Empty unless timings are enabled.
    pub timings: Vec<RuleTiming>,
}

/// Runs every registered rule against a payload.
///
/// The engine holds no mutable state, so one instance can evaluate many
/// payloads concurrently.
pub struct RuleEngine {
    registry: RuleRegistry,
    timings: bool,
}

impl RuleEngine {
    /// Creates an engine with the registry described by `config`.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let registry = RuleRegistry::load(&config)?;
        Ok(Self::with_registry(registry, config.timings))
    }

    pub fn with_registry(registry: RuleRegistry, timings: bool) -> Self {
        Self { registry, timings }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Evaluates one payload. Rule failures are logged and skipped.
    pub fn evaluate(&self, payload: &ArticlePayload) -> ProofreadingResult {
        self.evaluate_detailed(payload).result
    }

    /// Evaluates one payload and keeps the diagnostics.
    pub fn evaluate_detailed(&self, payload: &ArticlePayload) -> EvaluationReport {
        let ctx = EvalContext::new(payload);
        let mut issues = Vec::new();
        let mut failures = Vec::new();
        let mut timings = Vec::new();

        for rule in self.registry.rules() {
            let start = Instant::now();
            let outcome = run_isolated(rule.as_ref(), &ctx);
            if self.timings {
                timings.push(RuleTiming {
                    rule_id: rule.id().to_string(),
                    duration: start.elapsed(),
                });
            }

            match outcome {
                Ok(found) => issues.extend(found.into_iter().map(|issue| {
                    issue
                        .with_source(RuleSource::Script)
                        .with_attributed_by(ENGINE_NAME)
                })),
                Err(message) => {
                    warn!("Rule '{}' failed and was skipped: {}", rule.id(), message);
                    failures.push(RuleFailure {
                        rule_id: rule.id().to_string(),
                        message,
                    });
                }
            }
        }

        debug!(
            "Evaluated {} rules: {} issues, {} failures",
            self.registry.len(),
            issues.len(),
            failures.len()
        );

        EvaluationReport {
            result: ProofreadingResult::from_issues(payload.article_id.clone(), issues),
            failures,
            timings,
        }
    }

    /// Evaluates payloads in parallel. Results keep the input order.
    pub fn evaluate_batch(&self, payloads: &[ArticlePayload]) -> Vec<ProofreadingResult> {
        payloads
            .par_iter()
            .map(|payload| self.evaluate(payload))
            .collect()
    }

    pub fn evaluate_batch_detailed(&self, payloads: &[ArticlePayload]) -> Vec<EvaluationReport> {
        payloads
            .par_iter()
            .map(|payload| self.evaluate_detailed(payload))
            .collect()
    }
}

/// Runs one rule, turning both error returns and panics into a message.
fn run_isolated(rule: &dyn Rule, ctx: &EvalContext<'_>) -> Result<Vec<ProofreadingIssue>, String> {
    match panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(ctx))) {
        Ok(Ok(issues)) => Ok(issues),
        Ok(Err(e)) => Err(e.to_string()),
        Err(payload) => Err(format!("panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiaodui_model::Category;
    use jiaodui_rules::{RuleError, RuleMeta};
    use pretty_assertions::assert_eq;

    struct FailingRule(RuleMeta);

    impl Rule for FailingRule {
        fn meta(&self) -> &RuleMeta {
            &self.0
        }
        fn meta_mut(&mut self) -> &mut RuleMeta {
            &mut self.0
        }
        fn evaluate(&self, _ctx: &EvalContext<'_>) -> Result<Vec<ProofreadingIssue>, RuleError> {
            Err(RuleError::evaluation(self.0.rule_id.clone(), "broken"))
        }
        fn definition(&self) -> String {
            "failing".to_string()
        }
    }

    struct PanickingRule(RuleMeta);

    impl Rule for PanickingRule {
        fn meta(&self) -> &RuleMeta {
            &self.0
        }
        fn meta_mut(&mut self) -> &mut RuleMeta {
            &mut self.0
        }
        fn evaluate(&self, _ctx: &EvalContext<'_>) -> Result<Vec<ProofreadingIssue>, RuleError> {
            panic!("index out of bounds")
        }
        fn definition(&self) -> String {
            "panicking".to_string()
        }
    }

    struct AlwaysRule(RuleMeta);

    impl Rule for AlwaysRule {
        fn meta(&self) -> &RuleMeta {
            &self.0
        }
        fn meta_mut(&mut self) -> &mut RuleMeta {
            &mut self.0
        }
        fn evaluate(&self, _ctx: &EvalContext<'_>) -> Result<Vec<ProofreadingIssue>, RuleError> {
            Ok(vec![self.0.issue("found").with_evidence("e")])
        }
        fn definition(&self) -> String {
            "always".to_string()
        }
    }

    fn engine(timings: bool) -> RuleEngine {
        let rules: Vec<Box<dyn Rule>> = vec![
            Box::new(FailingRule(RuleMeta::new("A-FAIL", Category::A))),
            Box::new(PanickingRule(RuleMeta::new("B-PANIC", Category::B))),
            Box::new(AlwaysRule(RuleMeta::new("C-OK", Category::C))),
        ];
        let registry = RuleRegistry::from_rules(rules, &EngineConfig::default()).unwrap();
        RuleEngine::with_registry(registry, timings)
    }

    #[test]
    fn test_failing_rules_are_isolated() {
        let report = engine(false).evaluate_detailed(&ArticlePayload::new("正文"));

        assert_eq!(report.result.issues.len(), 1);
        assert_eq!(report.result.issues[0].rule_id, "C-OK");

        let failed: Vec<&str> = report.failures.iter().map(|f| f.rule_id.as_str()).collect();
        assert_eq!(failed, vec!["A-FAIL", "B-PANIC"]);
        assert!(report.failures[1].message.contains("index out of bounds"));
        assert!(report.timings.is_empty());
    }

    #[test]
    fn test_issues_are_tagged_as_script() {
        let result = engine(false).evaluate(&ArticlePayload::new("正文").with_article_id("a-1"));

        assert_eq!(result.article_id.as_deref(), Some("a-1"));
        assert_eq!(result.issues[0].source, RuleSource::Script);
        assert_eq!(result.issues[0].attributed_by.as_deref(), Some(ENGINE_NAME));
        assert_eq!(result.statistics.script_issue_count, 1);
        assert_eq!(result.statistics.ai_issue_count, 0);
    }

    #[test]
    fn test_timings_cover_every_rule() {
        let report = engine(true).evaluate_detailed(&ArticlePayload::new("正文"));
        assert_eq!(report.timings.len(), 3);
    }

    #[test]
    fn test_batch_keeps_order() {
        let payloads = vec![
            ArticlePayload::new("一").with_article_id("1"),
            ArticlePayload::new("二").with_article_id("2"),
            ArticlePayload::new("三").with_article_id("3"),
        ];
        let results = engine(false).evaluate_batch(&payloads);

        let ids: Vec<Option<&str>> = results.iter().map(|r| r.article_id.as_deref()).collect();
        assert_eq!(ids, vec![Some("1"), Some("2"), Some("3")]);
    }
}
