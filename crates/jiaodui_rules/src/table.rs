//! Declarative corpus tables.
//!
//! A table is a JSONC document of rule groups. Each group holds shared
//! metadata and a list of entries; every entry compiles into one
//! [`PatternRule`]. Tables are validated against `schemas/v1/corpus.json`
//! before deserialization, and every pattern is compiled eagerly so that a
//! broken table fails at startup.

use std::collections::HashSet;
use std::sync::OnceLock;

use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use serde::Deserialize;
use tracing::debug;

use jiaodui_model::{Category, Severity};

use crate::{Condition, CorpusError, PatternRule, RuleMeta, Scope};

const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/corpus.json");
static CORPUS_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// A parsed corpus table.
#[derive(Debug, Clone, Deserialize)]
pub struct CorpusTable {
    /// Name used in error messages, usually the file name.
    #[serde(skip)]
    pub origin: String,
    pub version: u32,
    #[serde(default)]
    pub description: Option<String>,
    pub groups: Vec<RuleGroup>,
}

/// Entries sharing one id prefix and one set of defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleGroup {
    pub prefix: String,
    pub category: Category,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub can_auto_fix: bool,
    #[serde(default)]
    pub blocks_publish: bool,
    #[serde(default)]
    pub scope: Scope,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Message template with `{matched}` / `{replacement}` placeholders.
    pub message: String,
    pub entries: Vec<TableEntry>,
}

fn default_confidence() -> f64 {
    0.8
}

fn default_priority() -> u8 {
    50
}

/// One table entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TableEntry {
    /// A bare pattern, reported without a suggestion.
    Pattern(String),
    /// `[pattern, replacement]`.
    Pair(String, String),
    /// Object form overriding group defaults.
    Detailed(EntryDetail),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryDetail {
    #[serde(default)]
    pub id: Option<String>,
    pub pattern: String,
    #[serde(default)]
    pub replacement: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub priority: Option<u8>,
    #[serde(default)]
    pub can_auto_fix: Option<bool>,
    #[serde(default)]
    pub blocks_publish: Option<bool>,
    #[serde(default)]
    pub conditions: Option<Vec<Condition>>,
}

impl TableEntry {
    fn into_detail(self) -> EntryDetail {
        match self {
            TableEntry::Pattern(pattern) => EntryDetail {
                pattern,
                ..Default::default()
            },
            TableEntry::Pair(pattern, replacement) => EntryDetail {
                pattern,
                replacement: Some(replacement),
                ..Default::default()
            },
            TableEntry::Detailed(detail) => detail,
        }
    }
}

impl CorpusTable {
    /// Parses and validates a JSONC table.
    pub fn from_jsonc(origin: impl Into<String>, content: &str) -> Result<Self, CorpusError> {
        let origin = origin.into();

        let value = jsonc_parser::parse_to_serde_value(content, &ParseOptions::default())
            .map_err(|e| CorpusError::parse(&origin, e.to_string()))?
            .ok_or_else(|| CorpusError::parse(&origin, "empty document"))?;

        let schema = CORPUS_SCHEMA.get_or_init(|| {
            let schema_json: serde_json::Value =
                serde_json::from_str(SCHEMA_JSON).expect("Invalid embedded corpus schema");
            Validator::new(&schema_json).expect("Invalid corpus schema compilation")
        });

        if let Err(e) = schema.validate(&value) {
            return Err(CorpusError::validation(
                &origin,
                format!("{} at {}", e, e.instance_path()),
            ));
        }

        let mut table: CorpusTable = serde_json::from_value(value)
            .map_err(|e| CorpusError::validation(&origin, e.to_string()))?;
        table.origin = origin;
        Ok(table)
    }

    /// Number of entries across all groups.
    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|group| group.entries.len()).sum()
    }

    /// Compiles every entry into a rule.
    ///
    /// Entries without an explicit `id` are named `<prefix>-<NNN>` by their
    /// 1-based position in the group.
    pub fn compile(&self) -> Result<Vec<PatternRule>, CorpusError> {
        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(self.entry_count());

        for group in &self.groups {
            for (index, entry) in group.entries.iter().cloned().enumerate() {
                let detail = entry.into_detail();
                let rule_id = detail
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("{}-{:03}", group.prefix, index + 1));

                if !seen.insert(rule_id.clone()) {
                    return Err(CorpusError::DuplicateRuleId(rule_id));
                }

                rules.push(compile_entry(group, rule_id, detail)?);
            }
        }

        debug!("Compiled {} rules from {}", rules.len(), self.origin);
        Ok(rules)
    }
}

fn compile_entry(
    group: &RuleGroup,
    rule_id: String,
    detail: EntryDetail,
) -> Result<PatternRule, CorpusError> {
    let mut meta = RuleMeta::new(rule_id, group.category)
        .with_severity(detail.severity.unwrap_or(group.severity))
        .with_confidence(detail.confidence.unwrap_or(group.confidence))
        .with_priority(detail.priority.unwrap_or(group.priority))
        .with_auto_fix(detail.can_auto_fix.unwrap_or(group.can_auto_fix))
        .with_blocks_publish(detail.blocks_publish.unwrap_or(group.blocks_publish));
    if let Some(subcategory) = detail.subcategory.or_else(|| group.subcategory.clone()) {
        meta = meta.with_subcategory(subcategory);
    }
    if let Some(description) = &group.description {
        meta = meta.with_description(description.clone());
    }

    let message = detail.message.unwrap_or_else(|| group.message.clone());
    let conditions = detail
        .conditions
        .unwrap_or_else(|| group.conditions.clone());

    let mut rule = PatternRule::new(meta, &detail.pattern, group.scope)?
        .with_message(message)
        .with_conditions(conditions);
    if let Some(replacement) = detail.replacement {
        rule = rule.with_replacement(replacement);
    }
    Ok(rule)
}
