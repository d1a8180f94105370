//! # jiaodui_rules
//!
//! Rules for the Jiaodui proofreading engine.
//!
//! This crate provides:
//! - The [`Rule`] trait and the [`RuleMeta`] identity every rule carries
//! - [`PatternRule`], the regex-backed rule compiled from corpus tables
//! - [`CorpusTable`], the declarative JSONC table format and its loader
//! - The hand-written procedural rules in [`procedural`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use jiaodui_model::ArticlePayload;
//! use jiaodui_rules::{EvalContext, Rule, procedural::HalfwidthPunctuationRule};
//!
//! let payload = ArticlePayload::new("你好,世界");
//! let rule = HalfwidthPunctuationRule::comma();
//! let issues = rule.evaluate(&EvalContext::new(&payload))?;
//! assert_eq!(issues.len(), 1);
//! ```

pub mod builtin;
mod context;
mod error;
mod limits;
mod pattern;
pub mod procedural;
mod rule;
mod table;

pub use builtin::{BUILTIN_TABLES, builtin_tables, procedural_rules};
pub use context::{EvalContext, Scope};
pub use error::{CorpusError, RuleError};
pub use limits::RuleLimits;
pub use pattern::{Condition, PatternRule};
pub use rule::{Rule, RuleMeta};
pub use table::{CorpusTable, EntryDetail, RuleGroup, TableEntry};

/// Characters of context kept on each side of a match in `evidence`.
pub const EVIDENCE_RADIUS: usize = 12;
