//! # jiaodui_core
//!
//! Core proofreading engine for Jiaodui.
//!
//! This crate provides:
//! - [`RuleRegistry`]: the rule corpus, assembled and validated once
//! - [`RuleEngine`]: fail-open evaluation of every rule against a payload
//! - [`merge`]: reconciliation of engine findings with an AI-produced report
//! - [`EngineConfig`]: configuration loading
//!
//! ## Example
//!
//! ```rust,ignore
//! use jiaodui_core::{EngineConfig, RuleEngine, merge};
//!
//! let engine = RuleEngine::new(EngineConfig::default())?;
//! let script = engine.evaluate(&payload);
//! let report = merge(&ai_result, &script.issues);
//! if !report.is_publishable() {
//!     println!("{} blocking issues", report.statistics.blocking_issue_count);
//! }
//! ```

mod config;
mod engine;
mod error;
mod merger;
mod registry;

pub use config::{CONFIG_FILES, EngineConfig, RuleOption};
pub use engine::{ENGINE_NAME, EvaluationReport, RuleEngine, RuleFailure, RuleTiming};
pub use error::EngineError;
pub use merger::{MergeOutcome, merge, merge_with_outcome};
pub use registry::RuleRegistry;

pub use jiaodui_model::{
    AI_ONLY_KEY, ArticlePayload, Category, ImageMetadata, IssueLocation, MergeKey, PayloadField,
    ProofreadingIssue, ProofreadingResult, ProofreadingStatistics, RuleSource, SCRIPT_ONLY_KEY,
    Severity,
};
pub use jiaodui_rules::{Rule, RuleLimits, RuleMeta};
