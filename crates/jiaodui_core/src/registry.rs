//! Rule registry.
//!
//! Assembles the built-in corpus tables, any extra tables named in the
//! configuration and the procedural rules into one ordered, immutable rule
//! set. Every failure here is a startup failure.

use std::collections::HashSet;
use std::fs;

use tracing::{debug, info, warn};

use jiaodui_rules::{CorpusError, CorpusTable, Rule, RuleMeta, builtin_tables, procedural_rules};

use crate::{EngineConfig, EngineError};

/// The loaded rule set, sorted by priority (descending) then rule id.
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
    fingerprint: String,
}

impl RuleRegistry {
    /// Loads built-in and configured rules.
    pub fn load(config: &EngineConfig) -> Result<Self, EngineError> {
        let mut tables = builtin_tables()?;
        for path in config.corpus_paths() {
            let content = fs::read_to_string(&path).map_err(|e| {
                EngineError::config(format!(
                    "Failed to read corpus '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            tables.push(CorpusTable::from_jsonc(path.display().to_string(), &content)?);
        }

        let mut rules: Vec<Box<dyn Rule>> = Vec::new();
        for table in &tables {
            for rule in table.compile()? {
                rules.push(Box::new(rule));
            }
        }
        rules.extend(procedural_rules(&config.limits));

        Self::from_rules(rules, config)
    }

    /// Builds a registry from an explicit rule list.
    ///
    /// Rule ids must be unique across the whole list, including rules the
    /// configuration later filters out.
    pub fn from_rules(rules: Vec<Box<dyn Rule>>, config: &EngineConfig) -> Result<Self, EngineError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.id().to_string()) {
                return Err(CorpusError::DuplicateRuleId(rule.id().to_string()).into());
            }
        }

        for rule_id in config.rules.keys() {
            if !seen.contains(rule_id) {
                warn!("Unknown rule in config: {}", rule_id);
            }
        }

        let total = rules.len();
        let mut kept: Vec<Box<dyn Rule>> = Vec::with_capacity(total);
        for mut rule in rules {
            let meta = rule.meta();
            if !config.is_category_enabled(meta.category)
                || meta.confidence < config.min_confidence
            {
                continue;
            }
            if let Some(option) = config.rules.get(rule.id()) {
                if !option.is_enabled() {
                    continue;
                }
                if let Some(severity) = option.severity() {
                    rule.meta_mut().severity = severity;
                }
            }
            kept.push(rule);
        }

        kept.sort_by(|a, b| {
            b.meta()
                .priority
                .cmp(&a.meta().priority)
                .then_with(|| a.id().cmp(b.id()))
        });

        let fingerprint = fingerprint(&kept);
        info!("Loaded {} rules ({} disabled)", kept.len(), total - kept.len());
        debug!("Registry fingerprint: {}", fingerprint);

        Ok(Self {
            rules: kept,
            fingerprint,
        })
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, rule_id: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|rule| rule.id() == rule_id)
            .map(|rule| rule.as_ref())
    }

    pub fn metas(&self) -> impl Iterator<Item = &RuleMeta> {
        self.rules.iter().map(|rule| rule.meta())
    }

    /// Digest over the ordered rule definitions.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn fingerprint(rules: &[Box<dyn Rule>]) -> String {
    let mut hasher = blake3::Hasher::new();
    for rule in rules {
        let meta = serde_json::to_string(rule.meta()).unwrap_or_default();
        hasher.update(meta.as_bytes());
        hasher.update(rule.definition().as_bytes());
        hasher.update(b"\n");
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuleOption;
    use jiaodui_model::{Category, Severity};
    use jiaodui_rules::{PatternRule, Scope};
    use pretty_assertions::assert_eq;

    fn pattern(id: &str, category: Category, priority: u8) -> Box<dyn Rule> {
        let meta = RuleMeta::new(id, category).with_priority(priority);
        Box::new(PatternRule::new(meta, "x", Scope::Content).unwrap())
    }

    #[test]
    fn test_duplicate_ids_fail() {
        let rules = vec![pattern("A-X-001", Category::A, 50), pattern("A-X-001", Category::A, 50)];
        let err = RuleRegistry::from_rules(rules, &EngineConfig::default())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            EngineError::Corpus(CorpusError::DuplicateRuleId(ref id)) if id == "A-X-001"
        ));
    }

    #[test]
    fn test_order_is_priority_then_id() {
        let rules = vec![
            pattern("B-X-002", Category::B, 10),
            pattern("A-X-002", Category::A, 90),
            pattern("A-X-001", Category::A, 90),
        ];
        let registry = RuleRegistry::from_rules(rules, &EngineConfig::default()).unwrap();

        let ids: Vec<&str> = registry.rules().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["A-X-001", "A-X-002", "B-X-002"]);
    }

    #[test]
    fn test_config_filters_and_overrides() {
        let mut config = EngineConfig::default();
        config.categories = vec![Category::A, Category::C];
        config
            .rules
            .insert("A-X-001".to_string(), RuleOption::Enabled(false));
        config
            .rules
            .insert("A-X-002".to_string(), RuleOption::Severity("critical".to_string()));

        let rules = vec![
            pattern("A-X-001", Category::A, 50),
            pattern("A-X-002", Category::A, 50),
            pattern("B-X-001", Category::B, 50),
            pattern("C-X-001", Category::C, 50),
        ];
        let registry = RuleRegistry::from_rules(rules, &config).unwrap();

        let ids: Vec<&str> = registry.rules().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["A-X-002", "C-X-001"]);
        assert_eq!(
            registry.get("A-X-002").unwrap().meta().severity,
            Severity::Critical
        );
    }

    #[test]
    fn test_min_confidence_filter() {
        let mut config = EngineConfig::default();
        config.min_confidence = 0.5;

        let low = RuleMeta::new("A-LOW-001", Category::A).with_confidence(0.3);
        let rules: Vec<Box<dyn Rule>> = vec![
            Box::new(PatternRule::new(low, "x", Scope::Content).unwrap()),
            pattern("A-X-001", Category::A, 50),
        ];
        let registry = RuleRegistry::from_rules(rules, &config).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("A-LOW-001").is_none());
    }

    #[test]
    fn test_load_is_idempotent() {
        let config = EngineConfig::default();
        let first = RuleRegistry::load(&config).unwrap();
        let second = RuleRegistry::load(&config).unwrap();

        assert_eq!(first.fingerprint(), second.fingerprint());
        assert_eq!(first.len(), second.len());
        assert!(first.len() >= 380);
    }

    #[test]
    fn test_fingerprint_tracks_overrides() {
        let base = RuleRegistry::load(&EngineConfig::default()).unwrap();

        let mut config = EngineConfig::default();
        config.rules.insert(
            "C-PUNCT-HALFWIDTH-COMMA".to_string(),
            RuleOption::Severity("error".to_string()),
        );
        let overridden = RuleRegistry::load(&config).unwrap();

        assert_eq!(base.len(), overridden.len());
        assert_ne!(base.fingerprint(), overridden.fingerprint());
    }

    #[test]
    fn test_extra_corpus_from_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("house.jsonc"),
            r#"{ "version": 1, "groups": [ { "prefix": "D-HOUSE", "category": "D",
                 "message": "本刊不用“{matched}”", "entries": ["小编"] } ] }"#,
        )
        .unwrap();
        let config_path = dir.path().join(".jiaodui.jsonc");
        std::fs::write(&config_path, r#"{ "corpus": ["house.jsonc"] }"#).unwrap();

        let config = EngineConfig::from_file(&config_path).unwrap();
        let registry = RuleRegistry::load(&config).unwrap();
        assert!(registry.get("D-HOUSE-001").is_some());
    }

    #[test]
    fn test_extra_corpus_duplicate_of_builtin_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("dup.jsonc"),
            r#"{ "version": 1, "groups": [ { "prefix": "A-TYPO", "category": "A",
                 "message": "m", "entries": ["重复"] } ] }"#,
        )
        .unwrap();
        let mut config = EngineConfig::default();
        config.corpus = vec!["dup.jsonc".to_string()];
        config.base_dir = Some(dir.path().to_path_buf());

        let err = RuleRegistry::load(&config).err().unwrap();
        assert!(matches!(
            err,
            EngineError::Corpus(CorpusError::DuplicateRuleId(ref id)) if id == "A-TYPO-001"
        ));
    }

    #[test]
    fn test_missing_corpus_file_is_config_error() {
        let mut config = EngineConfig::default();
        config.corpus = vec!["/nonexistent/jiaodui/corpus.jsonc".to_string()];

        let err = RuleRegistry::load(&config).err().unwrap();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
