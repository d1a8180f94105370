//! The built-in rule set.

use crate::procedural::{
    FeaturedImageRatioRule, HalfwidthPunctuationRule, HeadingLevelRule, HeadingOrderRule,
    ImageAltRule, ImageWidthRule, SentenceLengthRule, TitleLengthRule, UnpairedMarksRule,
};
use crate::{CorpusError, CorpusTable, Rule, RuleLimits};

/// Embedded corpus tables as `(name, content)`.
pub const BUILTIN_TABLES: &[(&str, &str)] = &[
    ("a_typo.jsonc", include_str!("../corpus/a_typo.jsonc")),
    ("b_grammar.jsonc", include_str!("../corpus/b_grammar.jsonc")),
    ("c_punctuation.jsonc", include_str!("../corpus/c_punctuation.jsonc")),
    ("d_style.jsonc", include_str!("../corpus/d_style.jsonc")),
    ("e_structure.jsonc", include_str!("../corpus/e_structure.jsonc")),
    ("f_media.jsonc", include_str!("../corpus/f_media.jsonc")),
];

/// Parses the embedded tables.
pub fn builtin_tables() -> Result<Vec<CorpusTable>, CorpusError> {
    BUILTIN_TABLES
        .iter()
        .map(|(name, content)| CorpusTable::from_jsonc(*name, content))
        .collect()
}

/// Instantiates every procedural rule.
pub fn procedural_rules(limits: &RuleLimits) -> Vec<Box<dyn Rule>> {
    let mut rules: Vec<Box<dyn Rule>> = HalfwidthPunctuationRule::all()
        .into_iter()
        .map(|rule| Box::new(rule) as Box<dyn Rule>)
        .collect();

    rules.push(Box::new(UnpairedMarksRule::new()));
    rules.push(Box::new(SentenceLengthRule::new(limits.sentence_max_chars)));
    rules.push(Box::new(HeadingLevelRule::new()));
    rules.push(Box::new(HeadingOrderRule::new()));
    rules.push(Box::new(TitleLengthRule::new(
        limits.title_min_chars,
        limits.title_max_chars,
    )));
    rules.push(Box::new(FeaturedImageRatioRule::new(
        limits.featured_min_ratio,
    )));
    rules.push(Box::new(ImageWidthRule::new(limits.image_min_width)));
    rules.push(Box::new(ImageAltRule::new()));

    rules
}
