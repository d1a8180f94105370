//! Engine configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use serde::{Deserialize, Serialize};

use jiaodui_model::{Category, Severity};
use jiaodui_rules::RuleLimits;

use crate::EngineError;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Configuration file names, in lookup order.
pub const CONFIG_FILES: [&str; 2] = [".jiaodui.jsonc", ".jiaodui.json"];

/// Configuration for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Per-rule switches and severity overrides.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleOption>,

    /// Enabled categories.
    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,

    /// Rules whose confidence is below this are not loaded.
    #[serde(default)]
    pub min_confidence: f64,

    #[serde(default)]
    pub limits: RuleLimits,

    /// Extra corpus tables.
    #[serde(default)]
    pub corpus: Vec<String>,

    /// Whether to record per-rule durations.
    #[serde(default)]
    pub timings: bool,

    /// Directory of the configuration file, for resolving `corpus` paths.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_categories() -> Vec<Category> {
    Category::ALL.to_vec()
}

/// Configuration for a single rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RuleOption {
    /// Rule is enabled/disabled.
    Enabled(bool),
    /// Severity override; `"off"` disables the rule.
    Severity(String),
}

impl RuleOption {
    /// Returns whether the rule is enabled.
    pub fn is_enabled(&self) -> bool {
        match self {
            RuleOption::Enabled(enabled) => *enabled,
            RuleOption::Severity(s) => s != "off",
        }
    }

    /// Severity override, if any.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            RuleOption::Enabled(_) => None,
            RuleOption::Severity(s) => Severity::parse(s),
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration: every built-in rule, default limits.
    pub fn new() -> Self {
        Self {
            rules: BTreeMap::new(),
            categories: default_categories(),
            min_confidence: 0.0,
            limits: RuleLimits::default(),
            corpus: Vec::new(),
            timings: false,
            base_dir: None,
        }
    }

    /// Finds a configuration file in `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        CONFIG_FILES
            .iter()
            .map(|name| dir.as_ref().join(name))
            .find(|path| path.is_file())
    }

    /// Loads configuration from a file.
    ///
    /// Supports `.jiaodui.jsonc`, `.jiaodui.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| EngineError::config(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_json(&content)?;

        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        Ok(config)
    }

    /// Parses configuration from a JSON or JSONC string with schema validation.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| EngineError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        let schema = CONFIG_SCHEMA.get_or_init(|| {
            let schema_json: serde_json::Value =
                serde_json::from_str(SCHEMA_JSON).expect("Invalid embedded config schema");
            Validator::new(&schema_json).expect("Invalid config schema compilation")
        });

        if let Err(e) = schema.validate(&value) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(EngineError::config(format!(
                "Config validation failed: {}",
                error_msg
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| EngineError::config(format!("Invalid config: {}", e)))
    }

    pub fn is_category_enabled(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    /// Extra corpus tables, resolved against the configuration directory.
    pub fn corpus_paths(&self) -> Vec<PathBuf> {
        self.corpus
            .iter()
            .map(|entry| match &self.base_dir {
                Some(base) => base.join(entry),
                None => PathBuf::from(entry),
            })
            .collect()
    }

    /// Computes a hash of the configuration.
    pub fn hash(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
