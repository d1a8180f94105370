//! Rules command implementation

use miette::{IntoDiagnostic, Result};

use jiaodui_core::{Category, RuleMeta, RuleRegistry};

use super::load_config;
use crate::cli::Cli;

pub fn run_rules(cli: &Cli, category: Option<Category>) -> Result<()> {
    let config = load_config(cli)?;
    let registry = RuleRegistry::load(&config).into_diagnostic()?;

    let metas: Vec<&RuleMeta> = registry
        .metas()
        .filter(|meta| category.is_none_or(|c| meta.category == c))
        .collect();

    println!(
        "{:<32} {:<3} {:<9} {}",
        "Rule", "Cat", "Severity", "Blocks"
    );
    println!("{:-<32} {:-<3} {:-<9} {:-<6}", "", "", "", "");
    for meta in &metas {
        println!("{}", format_rule_line(meta));
    }

    println!();
    println!("{} rules (fingerprint {})", metas.len(), registry.fingerprint());
    Ok(())
}

fn format_rule_line(meta: &RuleMeta) -> String {
    format!(
        "{:<32} {:<3} {:<9} {}",
        meta.rule_id,
        meta.category.letter(),
        meta.severity.as_str(),
        if meta.blocks_publish { "yes" } else { "" }
    )
    .trim_end()
    .to_string()
}
